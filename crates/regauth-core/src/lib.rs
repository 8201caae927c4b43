//! # Regauth Core
//!
//! Pure value types for registry update authorization: records, credentials,
//! origins, and diagnostic messages.
//!
//! This crate contains no I/O, no storage, no networking. Everything the
//! authorization engine consumes or produces per update is defined here.
//!
//! ## Key Types
//!
//! - [`Record`] - An opaque registry object: a type tag, a lookup key, and attributes
//! - [`PreparedUpdate`] - A proposed change to a record plus its credentials
//! - [`Credential`] - Password, override, or signed-message proof
//! - [`Origin`] - Where the update came from
//! - [`Message`] - A diagnostic attached to an update
//! - [`IpRanges`] - The registry's trusted network ranges
//!
//! ## Case Insensitivity
//!
//! Registry keys compare case-insensitively. See [`CiString`].

pub mod credential;
pub mod crypto;
pub mod error;
pub mod message;
pub mod network;
pub mod origin;
pub mod record;
pub mod types;
pub mod update;

pub use credential::{
    Credential, Credentials, OverrideCredential, SignedMessageCredential, UsernamePassword,
};
pub use crypto::{
    Blake3Hash, Ed25519PublicKey, Ed25519Signature, Keypair, PasswordHash, PASSWORD_SCHEME,
};
pub use error::{CoreError, Result};
pub use message::{Message, MessageKind};
pub use network::{IpRange, IpRanges, TrustedNetwork};
pub use origin::{Origin, OriginKind};
pub use record::{Attribute, Record, RecordBuilder};
pub use types::{Action, CiString, ObjectType};
pub use update::{PreparedUpdate, UpdateBuilder, UpdateId};
