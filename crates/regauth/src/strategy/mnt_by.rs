//! Authentication by the maintainers listed in `mnt-by:`.
//!
//! A create is checked against the submitted record. A modify or delete is
//! checked against the stored version, so rewriting `mnt-by:` cannot move an
//! object to another maintainer.

use std::sync::Arc;

use async_trait::async_trait;

use regauth_core::message;
use regauth_core::record::MNT_BY;
use regauth_core::{Action, ObjectType, PreparedUpdate, Record};
use regauth_store::ObjectStore;

use super::credentials::authenticate_by_maintainers;
use super::{AuthenticationFailed, AuthenticationStrategy};
use crate::context::UpdateContext;

const PENDING_TYPES: &[ObjectType] = &[ObjectType::Route, ObjectType::Route6];

/// Passes when the credentials satisfy any maintainer in `mnt-by:`.
///
/// Applies to creates that name at least one maintainer and to every
/// modify or delete. For route objects a failure here may be made good
/// later by the address-space holder, so creates of those types can be
/// left pending.
pub struct MntByAuthentication {
    objects: Arc<dyn ObjectStore>,
}

impl MntByAuthentication {
    pub const NAME: &'static str = "MntByAuthentication";

    pub fn new(objects: Arc<dyn ObjectStore>) -> Self {
        Self { objects }
    }

    /// The version whose `mnt-by:` decides.
    async fn governing_record(
        &self,
        update: &PreparedUpdate,
    ) -> Result<Record, AuthenticationFailed> {
        if update.action() == Action::Create {
            return Ok(update.record().clone());
        }

        let object_type = update.object_type();
        let stored = match self.objects.get_object(object_type, update.key()).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(update = %update, error = %e, "stored object lookup failed");
                None
            }
        };

        stored.ok_or_else(|| {
            AuthenticationFailed::single(message::referenced_object_missing(
                object_type.name(),
                update.key().as_str(),
            ))
        })
    }
}

#[async_trait]
impl AuthenticationStrategy for MntByAuthentication {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn supports(&self, update: &PreparedUpdate) -> bool {
        update.action() != Action::Create || !update.record().maintainers().is_empty()
    }

    async fn authenticate(
        &self,
        update: &PreparedUpdate,
        _context: &UpdateContext,
    ) -> Result<Vec<Record>, AuthenticationFailed> {
        let record = self.governing_record(update).await?;
        let names = record.maintainers();
        if names.is_empty() {
            return Ok(Vec::new());
        }
        authenticate_by_maintainers(self.objects.as_ref(), update, &record, MNT_BY, &names).await
    }

    fn pending_authentication_types(&self) -> &[ObjectType] {
        PENDING_TYPES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regauth_core::{PasswordHash, PASSWORD_SCHEME};
    use regauth_store::MemoryStore;

    fn password_mntner(name: &str, password: &str) -> Record {
        Record::builder(ObjectType::Mntner, name)
            .auth(format!("{} {}", PASSWORD_SCHEME, PasswordHash::new(password)))
            .build()
    }

    fn person(maintainer: &str) -> Record {
        Record::builder(ObjectType::Person, "JD1-TEST")
            .mnt_by(maintainer)
            .build()
    }

    async fn store_with_owner() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.put_object(&password_mntner("OWNER-MNT", "secret")).await.unwrap();
        store.put_object(&person("OWNER-MNT")).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_supports() {
        let strategy = MntByAuthentication::new(store_with_owner().await);
        let bare = Record::builder(ObjectType::Person, "JD1-TEST").build();

        let maintained = PreparedUpdate::builder(Action::Create, person("OWNER-MNT")).build();
        let unmaintained = PreparedUpdate::builder(Action::Create, bare.clone()).build();
        // Dropping mnt-by on a modify does not skip the check.
        let stripped = PreparedUpdate::builder(Action::Modify, bare).build();

        assert!(strategy.supports(&maintained));
        assert!(!strategy.supports(&unmaintained));
        assert!(strategy.supports(&stripped));
        assert_eq!(strategy.name(), "MntByAuthentication");
    }

    #[tokio::test]
    async fn test_authenticate() {
        let strategy = MntByAuthentication::new(store_with_owner().await);

        let good = PreparedUpdate::builder(Action::Modify, person("OWNER-MNT"))
            .password("secret")
            .build();
        let ctx = UpdateContext::new(&good);
        let found = strategy.authenticate(&good, &ctx).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key(), &"OWNER-MNT");

        let bad = PreparedUpdate::builder(Action::Modify, person("OWNER-MNT"))
            .password("guess")
            .build();
        let ctx = UpdateContext::new(&bad);
        assert!(strategy.authenticate(&bad, &ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_modify_uses_stored_maintainers() {
        let store = store_with_owner().await;
        store
            .put_object(&password_mntner("OTHER-MNT", "other"))
            .await
            .unwrap();
        let strategy = MntByAuthentication::new(store);

        let takeover = PreparedUpdate::builder(Action::Modify, person("OTHER-MNT"))
            .password("other")
            .build();
        let ctx = UpdateContext::new(&takeover);
        let failed = strategy.authenticate(&takeover, &ctx).await.unwrap_err();
        assert!(failed.messages()[0].text.contains("OWNER-MNT"));

        let stripped = PreparedUpdate::builder(
            Action::Delete,
            Record::builder(ObjectType::Person, "JD1-TEST").build(),
        )
        .password("secret")
        .build();
        let ctx = UpdateContext::new(&stripped);
        assert_eq!(strategy.authenticate(&stripped, &ctx).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_modify_of_missing_object_fails() {
        let strategy = MntByAuthentication::new(Arc::new(MemoryStore::new()));
        let update = PreparedUpdate::builder(Action::Modify, person("OWNER-MNT"))
            .password("secret")
            .build();
        let ctx = UpdateContext::new(&update);

        let failed = strategy.authenticate(&update, &ctx).await.unwrap_err();
        assert_eq!(
            failed.messages(),
            &[message::referenced_object_missing("person", "JD1-TEST")]
        );
    }

    #[test]
    fn test_pending_types() {
        let strategy = MntByAuthentication::new(Arc::new(MemoryStore::new()));
        assert_eq!(
            strategy.pending_authentication_types(),
            &[ObjectType::Route, ObjectType::Route6]
        );
    }
}
