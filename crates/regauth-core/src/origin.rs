//! Origin: where an update came from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The channel an update arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginKind {
    /// Synchronous HTTP form submission.
    SyncUpdates,
    /// REST API call.
    Rest,
    /// Mail gateway.
    Email,
    /// Internal system caller. Never reachable from user input.
    Internal,
}

/// The provenance of an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    kind: OriginKind,
    from: String,
}

impl Origin {
    pub fn new(kind: OriginKind, from: impl Into<String>) -> Self {
        Self {
            kind,
            from: from.into(),
        }
    }

    pub fn sync_updates(from: impl Into<String>) -> Self {
        Self::new(OriginKind::SyncUpdates, from)
    }

    pub fn rest(from: impl Into<String>) -> Self {
        Self::new(OriginKind::Rest, from)
    }

    pub fn email(from: impl Into<String>) -> Self {
        Self::new(OriginKind::Email, from)
    }

    /// The internal default-override channel.
    pub fn internal() -> Self {
        Self::new(OriginKind::Internal, "127.0.0.1")
    }

    pub fn kind(&self) -> OriginKind {
        self.kind
    }

    /// Source address (IP literal for network channels, sender for mail).
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Human-readable channel name for messages.
    pub fn name(&self) -> &'static str {
        match self.kind {
            OriginKind::SyncUpdates => "sync update",
            OriginKind::Rest => "rest api",
            OriginKind::Email => "mail update",
            OriginKind::Internal => "internal",
        }
    }

    /// Whether administrative operations (override, registry maintainer
    /// updates) may be attempted through this channel at all.
    pub fn allow_admin_operations(&self) -> bool {
        !matches!(self.kind, OriginKind::Email)
    }

    /// Whether this is the trusted channel that bypasses all checks.
    pub fn is_default_override(&self) -> bool {
        matches!(self.kind, OriginKind::Internal)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {}", self.name(), self.from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_capabilities() {
        let sync = Origin::sync_updates("10.0.0.1");
        assert!(sync.allow_admin_operations());
        assert!(!sync.is_default_override());

        let mail = Origin::email("someone@example.net");
        assert!(!mail.allow_admin_operations());
        assert!(!mail.is_default_override());

        let internal = Origin::internal();
        assert!(internal.allow_admin_operations());
        assert!(internal.is_default_override());
    }
}
