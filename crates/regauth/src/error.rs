//! Error types for the authorization engine.
//!
//! These are construction-time errors only. Per-update failures are written
//! into the [`UpdateContext`](crate::UpdateContext) as messages and a status.

use regauth_core::CoreError;
use regauth_perms::PermsError;
use thiserror::Error;

/// Errors that can occur while configuring an [`Authenticator`](crate::Authenticator).
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed value in the configuration (e.g. a trusted range).
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Malformed maintainer registration.
    #[error("permission error: {0}")]
    Permission(#[from] PermsError),

    /// Two strategies registered under the same name.
    #[error("duplicate strategy name: {0}")]
    DuplicateStrategy(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for engine construction.
pub type Result<T> = std::result::Result<T, AuthError>;
