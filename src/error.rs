//! Error types for the shredder.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for shredding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running a shred.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during open, write, sync, rename or remove.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Target path does not exist.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Target path exists but is not a regular file.
    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    /// Custom pattern entry is neither RANDOM nor a two-digit hex byte.
    #[error("Invalid pattern entry '{entry}': expected RANDOM or a two-digit hex byte")]
    InvalidPattern { entry: String },

    /// Algorithm name not recognised.
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Settings file could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
