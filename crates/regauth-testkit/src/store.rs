//! A store that fails on demand.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use regauth_core::{CiString, ObjectType, Record};
use regauth_store::{MemoryStore, ObjectStore, Result, StoreError, User, UserStore};

/// Wraps a [`MemoryStore`] and fails the next `n` lookups.
///
/// User and object lookups draw from the same budget, in call order. Writes
/// always go through.
pub struct FailingStore {
    inner: Arc<MemoryStore>,
    failures: AtomicUsize,
}

impl FailingStore {
    pub fn new(inner: Arc<MemoryStore>, failures: usize) -> Self {
        Self {
            inner,
            failures: AtomicUsize::new(failures),
        }
    }

    /// Every lookup fails.
    pub fn always(inner: Arc<MemoryStore>) -> Self {
        Self::new(inner, usize::MAX)
    }

    /// Failures not yet handed out.
    pub fn failures_left(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    fn fail(&self) -> Result<()> {
        let taken = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| match n {
                0 => None,
                usize::MAX => Some(usize::MAX),
                n => Some(n - 1),
            })
            .is_ok();

        if taken {
            Err(StoreError::Task("store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserStore for FailingStore {
    async fn get_override_user(&self, username: &str) -> Result<User> {
        self.fail()?;
        self.inner.get_override_user(username).await
    }

    async fn put_override_user(&self, user: &User) -> Result<()> {
        self.inner.put_override_user(user).await
    }
}

#[async_trait]
impl ObjectStore for FailingStore {
    async fn get_object(&self, object_type: ObjectType, key: &CiString) -> Result<Option<Record>> {
        self.fail()?;
        self.inner.get_object(object_type, key).await
    }

    async fn put_object(&self, record: &Record) -> Result<()> {
        self.inner.put_object(record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fails_then_delegates() {
        let inner = Arc::new(MemoryStore::new());
        inner
            .put_override_user(&User::new("dbadmin", "secret", [ObjectType::Person]))
            .await
            .unwrap();
        let store = FailingStore::new(inner, 1);

        let err = store.get_override_user("dbadmin").await.unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(store.failures_left(), 0);

        let user = store.get_override_user("dbadmin").await.unwrap();
        assert_eq!(user.username(), "dbadmin");
        assert!(store.get_override_user("nobody").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_always_failing() {
        let store = FailingStore::always(Arc::new(MemoryStore::new()));
        let key = CiString::from("OWNER-MNT");

        for _ in 0..3 {
            assert!(store.get_object(ObjectType::Mntner, &key).await.is_err());
        }
        assert_eq!(store.failures_left(), usize::MAX);

        let record = Record::builder(ObjectType::Mntner, "OWNER-MNT").build();
        store.put_object(&record).await.unwrap();
    }
}
