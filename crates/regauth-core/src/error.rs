//! Error types for Regauth Core.

use thiserror::Error;

/// Errors that can occur while parsing or building core values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown object type: {0}")]
    UnknownObjectType(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid network range: {0}")]
    InvalidRange(String),

    #[error("invalid password hash: {0}")]
    InvalidPasswordHash(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
