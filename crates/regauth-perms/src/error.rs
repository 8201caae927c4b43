//! Error types for the permissions module.

use thiserror::Error;

/// Errors raised while building permission state. These are configuration
/// errors: they surface at startup, never per update.
#[derive(Debug, Error)]
pub enum PermsError {
    /// A maintainer name in a principal set is empty or malformed.
    #[error("invalid maintainer name for {principal}: {name:?}")]
    InvalidMaintainer { principal: String, name: String },
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermsError>;
