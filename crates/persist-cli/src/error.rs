//! Error types for the persist CLI

use persist_core::{PersistError, WriteOutcome};
use thiserror::Error;

/// Result type alias for CLI commands
pub type CliResult<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("Write to {key} failed: {outcome}")]
    WriteFailed { key: String, outcome: WriteOutcome },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
