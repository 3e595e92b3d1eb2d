//! The procedurally generated track.

pub mod road;

pub use road::{Road, RoadDirection};
