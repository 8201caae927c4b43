//! Diagnostic messages attached to updates.
//!
//! Every rejected update carries at least one of these explaining why. The
//! constructor functions below fix the wording so callers and tests agree.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::origin::Origin;
use crate::record::Record;
use crate::types::CiString;

/// Severity of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MessageKind {
    Error,
    Warning,
    Info,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MessageKind::Error => "Error",
            MessageKind::Warning => "Warning",
            MessageKind::Info => "Info",
        })
    }
}

/// A diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Error, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Info, text)
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***{}: {}", self.kind, self.text)
    }
}

pub fn too_many_passwords_specified() -> Message {
    Message::error("Too many passwords specified")
}

pub fn override_not_allowed_for_origin(origin: &Origin) -> Message {
    Message::error(format!("Override not allowed in {}", origin.name()))
}

pub fn override_only_allowed_by_db_admins() -> Message {
    Message::error("Override only allowed by database administrators")
}

pub fn multiple_override_passwords() -> Message {
    Message::error("Multiple override passwords used")
}

pub fn override_authentication_used() -> Message {
    Message::info("Authorisation override used")
}

pub fn override_authentication_failed() -> Message {
    Message::error("Override authentication failed")
}

pub fn maintainer_updates_only_allowed_from_within_network() -> Message {
    Message::error(
        "Registry maintainers can only update data from within the registry network",
    )
}

/// A strategy could not match any of `candidates` against the credentials.
pub fn authentication_failed(record: &Record, attribute: &str, candidates: &[CiString]) -> Message {
    let names = if candidates.is_empty() {
        "none".to_string()
    } else {
        candidates
            .iter()
            .map(CiString::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    Message::error(format!(
        "Authorisation for [{}] {} failed\nusing \"{}:\"\nnot authenticated by: {}",
        record.object_type(),
        record.key(),
        attribute,
        names
    ))
}

/// A record named by the update could not be found.
pub fn referenced_object_missing(kind: &str, key: &str) -> Message {
    Message::error(format!("Authorisation failed: referenced {} {} does not exist", kind, key))
}
