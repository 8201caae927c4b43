//! # Regauth Permissions
//!
//! Principals and the outcome of authorizing an update.
//!
//! ## Overview
//!
//! A maintainer that authenticates an update may carry organizational roles
//! ("principals"). The [`PrincipalRegistry`] maps maintainer names to those
//! roles. It is built once from per-kind name sets ([`Maintainers`]) and is
//! read-only afterwards, so concurrent evaluations share it freely.
//!
//! ## Key Concepts
//!
//! - **Principal**: A role granted to whoever sponsored an update
//! - **Maintainers**: One name set per principal kind, as configured
//! - **PrincipalRegistry**: Case-insensitive maintainer name -> principals
//! - **Subject**: Granted principals plus the names of strategies that passed
//!   and failed
//!
//! ## Usage
//!
//! ```rust
//! use regauth_perms::{Maintainers, Principal, PrincipalRegistry};
//! use regauth_core::CiString;
//!
//! let mut maintainers = Maintainers::default();
//! maintainers.power.insert(CiString::from("POWER-MNT"));
//!
//! let registry = PrincipalRegistry::from_maintainers(&maintainers).unwrap();
//! assert!(registry.lookup(&CiString::from("power-mnt")).contains(&Principal::PowerMaintainer));
//! ```

pub mod error;
pub mod principal;
pub mod registry;
pub mod subject;

pub use error::{PermsError, Result};
pub use principal::Principal;
pub use registry::{Maintainers, PrincipalRegistry};
pub use subject::Subject;
