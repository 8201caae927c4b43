//! In-memory implementation of the store traits.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use regauth_core::{CiString, ObjectType, Record};

use crate::error::{Result, StoreError};
use crate::traits::{ObjectStore, User, UserStore};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Override users by exact username.
    users: HashMap<String, User>,

    /// Records by (type, case-insensitive key).
    objects: HashMap<(ObjectType, CiString), Record>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_override_user(&self, username: &str) -> Result<User> {
        self.read()?
            .users
            .get(username)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("override user {}", username)))
    }

    async fn put_override_user(&self, user: &User) -> Result<()> {
        self.write()?
            .users
            .insert(user.username().to_string(), user.clone());
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get_object(&self, object_type: ObjectType, key: &CiString) -> Result<Option<Record>> {
        Ok(self.read()?.objects.get(&(object_type, key.clone())).cloned())
    }

    async fn put_object(&self, record: &Record) -> Result<()> {
        self.write()?.objects.insert(record.identity(), record.clone());
        Ok(())
    }
}
