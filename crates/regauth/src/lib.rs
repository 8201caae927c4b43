//! # regauth
//!
//! Authorization decisions for registry updates.
//!
//! ## Overview
//!
//! Every submitted create, modify or delete of a registry record passes
//! through the [`Authenticator`] before it is applied. The authenticator
//! runs a configurable set of [`AuthenticationStrategy`] implementations,
//! folds their outcomes into a [`Subject`], and writes a verdict into the
//! update's [`UpdateContext`]:
//!
//! - **Success**: no messages, status untouched
//! - **Failed**: one or more reasons, status `FailedAuthentication`
//! - **Pending**: a two-party create where only one party has authenticated
//!   so far, status `PendingAuthentication`
//!
//! Administrators bypass strategies with an override credential; internal
//! callers bypass everything.
//!
//! ## Key Types
//!
//! - [`Authenticator`]: the decision engine
//! - [`AuthenticatorConfig`]: trusted ranges, maintainer sets, limits
//! - [`AuthenticationStrategy`]: one way of proving authority
//! - [`DeferredAuthenticationIndex`]: which failures may be left pending
//! - [`UpdateContext`]: per-update status and messages
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use regauth::strategy::{MntByAuthentication, RouteAutnumAuthentication};
//! use regauth::{AuthenticationStrategy, Authenticator, AuthenticatorConfig, UpdateContext};
//! use regauth::core::{Action, ObjectType, Origin, PreparedUpdate, Record};
//! use regauth::store::SqliteStore;
//!
//! async fn example() {
//!     let config = AuthenticatorConfig::from_file("regauth.json").unwrap();
//!     let store = Arc::new(SqliteStore::open("registry.db").unwrap());
//!
//!     let strategies: Vec<Arc<dyn AuthenticationStrategy>> = vec![
//!         Arc::new(MntByAuthentication::new(store.clone())),
//!         Arc::new(RouteAutnumAuthentication::new(store.clone())),
//!     ];
//!     let authenticator = Authenticator::new(&config, strategies, store).unwrap();
//!
//!     let record = Record::builder(ObjectType::Person, "JD1-TEST")
//!         .mnt_by("OWNER-MNT")
//!         .build();
//!     let update = PreparedUpdate::builder(Action::Modify, record)
//!         .password("secret")
//!         .build();
//!
//!     let mut context = UpdateContext::new(&update);
//!     let subject = authenticator
//!         .authenticate(&Origin::sync_updates("10.0.0.1"), &update, &mut context)
//!         .await;
//!
//!     println!("{:?} -> {}", subject.principals(), context.status());
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `regauth::core` - records, credentials, origins, messages
//! - `regauth::store` - override users and record lookup
//! - `regauth::perms` - principals, the maintainer registry, subjects

pub mod authenticator;
pub mod config;
pub mod context;
pub mod error;
pub mod pending;
pub mod strategy;

// Re-export component crates
pub use regauth_core as core;
pub use regauth_perms as perms;
pub use regauth_store as store;

// Re-export main types for convenience
pub use authenticator::Authenticator;
pub use config::AuthenticatorConfig;
pub use context::{UpdateContext, UpdateStatus};
pub use error::{AuthError, Result};
pub use pending::DeferredAuthenticationIndex;
pub use strategy::{AuthenticationFailed, AuthenticationStrategy};

pub use regauth_perms::{Principal, Subject};
