//! # Regauth Store
//!
//! Lookup services consumed by the authorization engine: override users and
//! registry records. Provides a trait-based interface with SQLite and
//! in-memory implementations.
//!
//! ## Key Types
//!
//! - [`UserStore`] - Async lookup of override users
//! - [`ObjectStore`] - Async lookup of records by type and key
//! - [`User`] - An override user with a password digest and permitted object types
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use regauth_store::{SqliteStore, User, UserStore};
//! use regauth_core::ObjectType;
//!
//! async fn example() {
//!     let store = SqliteStore::open("users.db").unwrap();
//!
//!     let user = User::new("dbadmin", "secret", [ObjectType::Inetnum]);
//!     store.put_override_user(&user).await.unwrap();
//!
//!     let found = store.get_override_user("dbadmin").await.unwrap();
//!     assert!(found.is_valid_password("secret"));
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Not found is an error variant**: `get_override_user` returns
//!   [`StoreError::NotFound`] for unknown users, so callers can tell a miss
//!   from a database failure.
//! - **Keys are case-insensitive**: records are stored under their lowercased key.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ObjectStore, User, UserStore};
