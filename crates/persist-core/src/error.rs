//! Error types for persist-core

use thiserror::Error;

/// Result type alias for store and codec operations
pub type Result<T> = std::result::Result<T, PersistError>;

/// Persistence error types
///
/// Only the strict accessor API (`try_get`, `try_set`, `remove`) and the
/// stores themselves surface these. `get`/`set` absorb them into defaults and
/// [`WriteOutcome`](crate::WriteOutcome)s.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Encoding failed: {0}")]
    EncodingError(String),

    #[error("Decoding failed: {0}")]
    DecodingError(String),

    #[error("Keychain error: {0}")]
    KeychainError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl PersistError {
    /// Whether this error came from turning bytes back into a value
    pub fn is_decoding(&self) -> bool {
        matches!(self, PersistError::DecodingError(_))
    }

    /// Whether this error came from turning a value into bytes
    pub fn is_encoding(&self) -> bool {
        matches!(self, PersistError::EncodingError(_))
    }
}
