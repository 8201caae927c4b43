//! SQLite implementation of the store traits.
//!
//! This is the primary storage backend. It uses rusqlite with bundled SQLite,
//! wrapped in async via tokio::spawn_blocking.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use regauth_core::{CiString, ObjectType, PasswordHash, Record};

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::{ObjectStore, User, UserStore};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

// Helper to encode a value to CBOR
fn encode_cbor<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(buf)
}

// Helper to decode a value from CBOR
fn decode_cbor<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    ciborium::from_reader(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn get_override_user(&self, username: &str) -> Result<User> {
        let username = username.to_string();

        self.with_conn(move |conn| {
            let row: Option<(String, Vec<u8>)> = conn
                .query_row(
                    "SELECT password_hash, object_types FROM override_users WHERE username = ?1",
                    params![username],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            let (hash_text, types_cbor) =
                row.ok_or_else(|| StoreError::NotFound(format!("override user {}", username)))?;

            let password_hash: PasswordHash = hash_text
                .parse()
                .map_err(|e: regauth_core::CoreError| StoreError::InvalidData(e.to_string()))?;
            let object_types: BTreeSet<ObjectType> = decode_cbor(&types_cbor)?;

            Ok(User::with_hash(username, password_hash, object_types))
        })
        .await
    }

    async fn put_override_user(&self, user: &User) -> Result<()> {
        let username = user.username().to_string();
        let hash_text = user.password_hash().to_string();
        let types_cbor = encode_cbor(user.object_types())?;

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO override_users (username, password_hash, object_types, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(username) DO UPDATE SET
                    password_hash = excluded.password_hash,
                    object_types = excluded.object_types,
                    updated_at = excluded.updated_at",
                params![username, hash_text, types_cbor, now_millis()],
            )?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ObjectStore for SqliteStore {
    async fn get_object(&self, object_type: ObjectType, key: &CiString) -> Result<Option<Record>> {
        let key = key.to_lowercase();

        self.with_conn(move |conn| {
            let blob: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT record FROM objects WHERE object_type = ?1 AND object_key = ?2",
                    params![object_type.name(), key],
                    |row| row.get(0),
                )
                .optional()?;

            blob.map(|b| decode_cbor::<Record>(&b)).transpose()
        })
        .await
    }

    async fn put_object(&self, record: &Record) -> Result<()> {
        let object_type = record.object_type();
        let key = record.key().to_lowercase();
        let blob = encode_cbor(record)?;

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO objects (object_type, object_key, record, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(object_type, object_key) DO UPDATE SET
                    record = excluded.record,
                    updated_at = excluded.updated_at",
                params![object_type.name(), key, blob, now_millis()],
            )?;
            Ok(())
        })
        .await
    }
}
