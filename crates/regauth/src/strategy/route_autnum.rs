//! Authentication of new routes by the holder of the origin AS.

use std::sync::Arc;

use async_trait::async_trait;

use regauth_core::message;
use regauth_core::record::{MNT_BY, ORIGIN};
use regauth_core::{Action, CiString, ObjectType, PreparedUpdate, Record};
use regauth_store::ObjectStore;

use super::credentials::authenticate_by_maintainers;
use super::{AuthenticationFailed, AuthenticationStrategy};
use crate::context::UpdateContext;

const PENDING_TYPES: &[ObjectType] = &[ObjectType::Route, ObjectType::Route6];

/// Creating a `route`/`route6` needs the consent of the `aut-num` named in
/// its `origin:`, expressed through that aut-num's `mnt-by:` maintainers.
pub struct RouteAutnumAuthentication {
    objects: Arc<dyn ObjectStore>,
}

impl RouteAutnumAuthentication {
    pub const NAME: &'static str = "RouteAutnumAuthentication";

    pub fn new(objects: Arc<dyn ObjectStore>) -> Self {
        Self { objects }
    }
}

fn origin_of(record: &Record) -> Option<CiString> {
    record
        .values(ORIGIN)
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(CiString::from)
}

#[async_trait]
impl AuthenticationStrategy for RouteAutnumAuthentication {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn supports(&self, update: &PreparedUpdate) -> bool {
        update.action() == Action::Create
            && matches!(update.object_type(), ObjectType::Route | ObjectType::Route6)
            && origin_of(update.record()).is_some()
    }

    async fn authenticate(
        &self,
        update: &PreparedUpdate,
        _context: &UpdateContext,
    ) -> Result<Vec<Record>, AuthenticationFailed> {
        let Some(origin) = origin_of(update.record()) else {
            return Err(AuthenticationFailed::single(message::referenced_object_missing(
                ObjectType::AutNum.name(),
                "(none)",
            )));
        };

        let autnum = match self.objects.get_object(ObjectType::AutNum, &origin).await {
            Ok(Some(autnum)) => autnum,
            Ok(None) => {
                return Err(AuthenticationFailed::single(
                    message::referenced_object_missing(ObjectType::AutNum.name(), origin.as_str()),
                ))
            }
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "aut-num lookup failed");
                return Err(AuthenticationFailed::single(
                    message::referenced_object_missing(ObjectType::AutNum.name(), origin.as_str()),
                ));
            }
        };

        let names = autnum.maintainers();
        authenticate_by_maintainers(self.objects.as_ref(), update, &autnum, MNT_BY, &names).await
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

    fn route(origin: &str) -> Record {
        Record::builder(ObjectType::Route, "192.0.2.0/24AS65000")
            .attribute(ORIGIN, origin)
            .mnt_by("ROUTE-MNT")
            .build()
    }

    async fn store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .put_object(
                &Record::builder(ObjectType::AutNum, "AS65000")
                    .mnt_by("AS-MNT")
                    .build(),
            )
            .await
            .unwrap();
        store
            .put_object(
                &Record::builder(ObjectType::Mntner, "AS-MNT")
                    .auth(format!("{} {}", PASSWORD_SCHEME, PasswordHash::new("as-pw")))
                    .build(),
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_supports_route_creates_only() {
        let strategy = RouteAutnumAuthentication::new(store().await);

        let create = PreparedUpdate::builder(Action::Create, route("AS65000")).build();
        let modify = PreparedUpdate::builder(Action::Modify, route("AS65000")).build();
        let person = PreparedUpdate::builder(
            Action::Create,
            Record::builder(ObjectType::Person, "JD1-TEST").build(),
        )
        .build();

        assert!(strategy.supports(&create));
        assert!(!strategy.supports(&modify));
        assert!(!strategy.supports(&person));
    }

    #[tokio::test]
    async fn test_authenticated_by_autnum_maintainer() {
        let strategy = RouteAutnumAuthentication::new(store().await);
        let update = PreparedUpdate::builder(Action::Create, route("as65000"))
            .password("as-pw")
            .build();
        let ctx = UpdateContext::new(&update);

        let found = strategy.authenticate(&update, &ctx).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key(), &"AS-MNT");
    }

    #[tokio::test]
    async fn test_wrong_password_names_autnum() {
        let strategy = RouteAutnumAuthentication::new(store().await);
        let update = PreparedUpdate::builder(Action::Create, route("AS65000"))
            .password("route-pw")
            .build();
        let ctx = UpdateContext::new(&update);

        let failed = strategy.authenticate(&update, &ctx).await.unwrap_err();
        assert!(failed.messages()[0].text.contains("[aut-num] AS65000"));
    }

    #[tokio::test]
    async fn test_missing_autnum() {
        let strategy = RouteAutnumAuthentication::new(store().await);
        let update = PreparedUpdate::builder(Action::Create, route("AS64999"))
            .password("as-pw")
            .build();
        let ctx = UpdateContext::new(&update);

        let failed = strategy.authenticate(&update, &ctx).await.unwrap_err();
        assert_eq!(
            failed.messages()[0].text,
            "Authorisation failed: referenced aut-num AS64999 does not exist"
        );
    }
}
