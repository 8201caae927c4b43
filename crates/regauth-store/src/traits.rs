//! Store traits: the lookup services the authorization engine consumes.
//!
//! These traits keep the engine storage-agnostic. Implementations include
//! SQLite (primary) and in-memory (for tests).

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use regauth_core::{CiString, ObjectType, PasswordHash, Record};

use crate::error::Result;

/// An administrator allowed to use override credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    username: String,
    password_hash: PasswordHash,
    object_types: BTreeSet<ObjectType>,
}

impl User {
    /// Create a user, hashing the cleartext password with a fresh salt.
    pub fn new(
        username: impl Into<String>,
        password: &str,
        object_types: impl IntoIterator<Item = ObjectType>,
    ) -> Self {
        Self::with_hash(username, PasswordHash::new(password), object_types)
    }

    /// Create a user from an existing password digest.
    pub fn with_hash(
        username: impl Into<String>,
        password_hash: PasswordHash,
        object_types: impl IntoIterator<Item = ObjectType>,
    ) -> Self {
        Self {
            username: username.into(),
            password_hash,
            object_types: object_types.into_iter().collect(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn is_valid_password(&self, password: &str) -> bool {
        self.password_hash.verify(password)
    }

    /// Object types this user may override.
    pub fn object_types(&self) -> &BTreeSet<ObjectType> {
        &self.object_types
    }
}

/// Lookup of override users.
///
/// # Design Notes
///
/// - **Misses are errors**: an unknown username yields
///   [`StoreError::NotFound`](crate::StoreError::NotFound).
/// - **Usernames are exact**: no case folding.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find an override user by name.
    async fn get_override_user(&self, username: &str) -> Result<User>;

    /// Insert or replace an override user.
    async fn put_override_user(&self, user: &User) -> Result<()>;
}

/// Lookup of registry records by type and key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Get a record. Keys compare case-insensitively.
    async fn get_object(&self, object_type: ObjectType, key: &CiString) -> Result<Option<Record>>;

    /// Insert or replace a record.
    async fn put_object(&self, record: &Record) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_password_and_types() {
        let user = User::new("dbadmin", "secret", [ObjectType::Inetnum, ObjectType::Route]);
        assert_eq!(user.username(), "dbadmin");
        assert!(user.is_valid_password("secret"));
        assert!(!user.is_valid_password("Secret"));
        assert!(user.object_types().contains(&ObjectType::Route));
        assert!(!user.object_types().contains(&ObjectType::Mntner));
    }
}
