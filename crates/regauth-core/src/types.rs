//! Strong type definitions for registry records.
//!
//! Registry keys are case-insensitive, object types and actions are closed
//! enums, so mismatches are caught at compile time.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::CoreError;

/// A string that compares, orders, and hashes ASCII case-insensitively.
///
/// The original spelling is preserved for display.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CiString(String);

impl CiString {
    /// Create from anything string-like.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The value as originally spelled.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased copy of the value.
    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl PartialEq for CiString {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for CiString {}

impl PartialEq<str> for CiString {
    fn eq(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for CiString {
    fn eq(&self, other: &&str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl Hash for CiString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl Ord for CiString {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.0.bytes().map(|b| b.to_ascii_lowercase());
        let rhs = other.0.bytes().map(|b| b.to_ascii_lowercase());
        lhs.cmp(rhs)
    }
}

impl PartialOrd for CiString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for CiString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for CiString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CiString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CiString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The class of a registry object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectType {
    Mntner,
    Person,
    Role,
    Organisation,
    Inetnum,
    Inet6num,
    Route,
    Route6,
    AutNum,
    AsSet,
    Domain,
    Irt,
    KeyCert,
}

impl ObjectType {
    /// Every object type, in declaration order.
    pub const ALL: [ObjectType; 13] = [
        ObjectType::Mntner,
        ObjectType::Person,
        ObjectType::Role,
        ObjectType::Organisation,
        ObjectType::Inetnum,
        ObjectType::Inet6num,
        ObjectType::Route,
        ObjectType::Route6,
        ObjectType::AutNum,
        ObjectType::AsSet,
        ObjectType::Domain,
        ObjectType::Irt,
        ObjectType::KeyCert,
    ];

    /// The registry name of this type, as used in attribute keys.
    pub fn name(self) -> &'static str {
        match self {
            ObjectType::Mntner => "mntner",
            ObjectType::Person => "person",
            ObjectType::Role => "role",
            ObjectType::Organisation => "organisation",
            ObjectType::Inetnum => "inetnum",
            ObjectType::Inet6num => "inet6num",
            ObjectType::Route => "route",
            ObjectType::Route6 => "route6",
            ObjectType::AutNum => "aut-num",
            ObjectType::AsSet => "as-set",
            ObjectType::Domain => "domain",
            ObjectType::Irt => "irt",
            ObjectType::KeyCert => "key-cert",
        }
    }

    /// Look up a type by its registry name (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| CoreError::UnknownObjectType(name.to_string()))
    }

    /// Whether records of this type are maintainers.
    pub fn is_maintainer(self) -> bool {
        self == ObjectType::Mntner
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// What an update does to its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Modify,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Create => "create",
            Action::Modify => "modify",
            Action::Delete => "delete",
        })
    }
}

impl FromStr for Action {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(Action::Create),
            "modify" => Ok(Action::Modify),
            "delete" => Ok(Action::Delete),
            _ => Err(CoreError::UnknownAction(s.to_string())),
        }
    }
}
