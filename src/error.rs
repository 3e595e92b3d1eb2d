//! Centralized error types for the game.
//!
//! Gameplay itself never fails: placements that do not fit are banished off-screen and
//! physical quantities are clamped. What remains are the edges of the program: the
//! render sink, the telemetry transport and the configuration.

use std::io;
use std::path::PathBuf;

use crate::telemetry::Command;

/// Main error type for the game.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by a render sink.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("Draw call failed: {0}")]
    DrawFailed(String),

    #[error("Present failed: {0}")]
    PresentFailed(String),
}

/// Errors on the serial telemetry link.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("Unable to open device \"{path}\": {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{0} is not implemented")]
    NotImplemented(Command),

    #[error("Unknown command code: {0}")]
    UnknownCommand(u8),

    #[error("Line is {0} bytes long, the limit is {max}", max = crate::telemetry::MAX_LINE_LEN)]
    LineTooLong(usize),

    #[error("Frame has {0} lines, the limit is {max}", max = u8::MAX)]
    TooManyLines(usize),

    #[error("Line contains a newline: {0:?}")]
    InvalidLine(String),

    #[error("{0} frame ended before its line count")]
    MissingLineCount(Command),

    #[error("Frame ended after {received} of {expected} lines")]
    Truncated { expected: u8, received: u8 },
}

/// Errors loading the configuration from the environment.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
