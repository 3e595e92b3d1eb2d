//! Zombie Race: a top-down endless driving game for an 84x48 monochrome LCD.

#[cfg(feature = "desktop")]
pub mod app;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod formatter;
pub mod game;
pub mod input;
pub mod logging;
pub mod map;
pub mod render;
pub mod telemetry;
pub mod timer;
