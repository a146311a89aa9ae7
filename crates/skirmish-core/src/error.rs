//! Error types for skirmish-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Replay is already running")]
    AlreadyRunning,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("RON parse error: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
