//! PreparedUpdate: a proposed change awaiting authorization.
//!
//! Read-only to the authorization engine.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::credential::{Credential, Credentials, OverrideCredential, SignedMessageCredential};
use crate::record::Record;
use crate::types::{Action, CiString, ObjectType};

static NEXT_UPDATE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one update within a submission, for logs and context lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UpdateId(pub u64);

impl UpdateId {
    /// A fresh, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_UPDATE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for UpdateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A change to a single record plus the proof submitted with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedUpdate {
    id: UpdateId,
    action: Action,
    record: Record,
    override_requested: bool,
    credentials: Credentials,
}

impl PreparedUpdate {
    pub fn builder(action: Action, record: Record) -> UpdateBuilder {
        UpdateBuilder::new(action, record)
    }

    pub fn id(&self) -> UpdateId {
        self.id
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// The record as it will look after the update.
    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn object_type(&self) -> ObjectType {
        self.record.object_type()
    }

    pub fn key(&self) -> &CiString {
        self.record.key()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Whether the submitter asked for override semantics.
    pub fn is_override(&self) -> bool {
        self.override_requested
    }
}

impl fmt::Display for PreparedUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] {}",
            self.id,
            self.action,
            self.record.object_type(),
            self.record.key()
        )
    }
}

/// Builder for constructing updates.
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    id: Option<UpdateId>,
    action: Action,
    record: Record,
    override_requested: bool,
    credentials: Credentials,
}

impl UpdateBuilder {
    pub fn new(action: Action, record: Record) -> Self {
        Self {
            id: None,
            action,
            record,
            override_requested: false,
            credentials: Credentials::new(),
        }
    }

    /// Use a specific id instead of a fresh one.
    pub fn id(mut self, id: UpdateId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn credential(mut self, credential: Credential) -> Self {
        if matches!(credential, Credential::Override(_)) {
            self.override_requested = true;
        }
        self.credentials.add(credential);
        self
    }

    pub fn password(self, password: impl Into<String>) -> Self {
        self.credential(Credential::Password(password.into()))
    }

    /// Attach an `override:` value. Marks the update as an override request.
    pub fn override_value(self, value: &str) -> Self {
        self.credential(Credential::Override(OverrideCredential::parse(value)))
    }

    pub fn signed(self, signed: SignedMessageCredential) -> Self {
        self.credential(Credential::SignedMessage(signed))
    }

    /// Ask for override semantics without attaching a credential.
    pub fn request_override(mut self) -> Self {
        self.override_requested = true;
        self
    }

    pub fn build(self) -> PreparedUpdate {
        PreparedUpdate {
            id: self.id.unwrap_or_else(UpdateId::next),
            action: self.action,
            record: self.record,
            override_requested: self.override_requested,
            credentials: self.credentials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Record {
        Record::builder(ObjectType::Person, "JD1-TEST").build()
    }

    #[test]
    fn test_builder_assigns_distinct_ids() {
        let a = PreparedUpdate::builder(Action::Create, person()).build();
        let b = PreparedUpdate::builder(Action::Create, person()).build();
        assert_ne!(a.id(), b.id());

        let fixed = PreparedUpdate::builder(Action::Create, person())
            .id(UpdateId(7))
            .build();
        assert_eq!(fixed.id(), UpdateId(7));
    }

    #[test]
    fn test_override_credential_marks_override() {
        let plain = PreparedUpdate::builder(Action::Modify, person())
            .password("x")
            .build();
        assert!(!plain.is_override());

        let overridden = PreparedUpdate::builder(Action::Modify, person())
            .override_value("admin,secret")
            .build();
        assert!(overridden.is_override());
        assert_eq!(overridden.credentials().overrides().len(), 1);

        let bare = PreparedUpdate::builder(Action::Modify, person())
            .request_override()
            .build();
        assert!(bare.is_override());
        assert!(bare.credentials().overrides().is_empty());
    }

    #[test]
    fn test_display() {
        let update = PreparedUpdate::builder(Action::Delete, person())
            .id(UpdateId(3))
            .build();
        assert_eq!(update.to_string(), "#3 delete [person] JD1-TEST");
    }
}
