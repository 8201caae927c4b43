//! Record: an opaque registry object.
//!
//! The authorization engine only needs a record's type, its lookup key, and a
//! handful of attributes (`mnt-by`, `auth`, `origin`). Everything else is
//! carried through untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};
use crate::types::{CiString, ObjectType};

/// Attribute naming the maintainers of a record.
pub const MNT_BY: &str = "mnt-by";

/// Attribute carrying a maintainer's authentication methods.
pub const AUTH: &str = "auth";

/// Attribute carrying a route's origin AS.
pub const ORIGIN: &str = "origin";

/// A single `name: value` line of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: CiString,
    pub value: String,
}

/// A registry object.
///
/// The first attribute is always `<type>: <key>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    object_type: ObjectType,
    key: CiString,
    attributes: Vec<Attribute>,
}

impl Record {
    /// Start building a record of the given type and key.
    pub fn builder(object_type: ObjectType, key: impl Into<CiString>) -> RecordBuilder {
        RecordBuilder::new(object_type, key)
    }

    /// Parse a record from its text form.
    ///
    /// Blank lines and lines starting with `#` are skipped. The first
    /// attribute decides the type and key.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty() && !l.starts_with('#'));

        let first = lines
            .next()
            .ok_or_else(|| CoreError::MalformedRecord("empty record".into()))?;
        let (type_name, key) = split_attribute(first)?;
        let object_type = ObjectType::from_name(type_name)?;
        if key.is_empty() {
            return Err(CoreError::MalformedRecord("missing primary key".into()));
        }

        let mut builder = RecordBuilder::new(object_type, key);
        for line in lines {
            let (name, value) = split_attribute(line)?;
            builder = builder.attribute(name, value);
        }
        Ok(builder.build())
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn key(&self) -> &CiString {
        &self.key
    }

    /// The identity used for set semantics: two records with the same type
    /// and key are the same record.
    pub fn identity(&self) -> (ObjectType, CiString) {
        (self.object_type, self.key.clone())
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Raw values of every attribute with the given name.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.attributes
            .iter()
            .filter(move |a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Comma-separated values of every attribute with the given name,
    /// split, trimmed, and deduplicated in first-seen order.
    pub fn value_set(&self, name: &str) -> Vec<CiString> {
        let mut out: Vec<CiString> = Vec::new();
        for value in self.values(name) {
            for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let part = CiString::from(part);
                if !out.contains(&part) {
                    out.push(part);
                }
            }
        }
        out
    }

    /// The maintainers named in `mnt-by`.
    pub fn maintainers(&self) -> Vec<CiString> {
        self.value_set(MNT_BY)
    }

    /// Text form: one `name: value` line per attribute, starting with the
    /// type and key.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.object_type.name(), self.key)?;
        for attribute in &self.attributes {
            writeln!(f, "{}: {}", attribute.name, attribute.value)?;
        }
        Ok(())
    }
}

fn split_attribute(line: &str) -> Result<(&str, &str)> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| CoreError::MalformedRecord(format!("not an attribute: {line}")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::MalformedRecord(format!("empty attribute name: {line}")));
    }
    Ok((name, value.trim()))
}

/// Builder for constructing records.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    object_type: ObjectType,
    key: CiString,
    attributes: Vec<Attribute>,
}

impl RecordBuilder {
    pub fn new(object_type: ObjectType, key: impl Into<CiString>) -> Self {
        Self {
            object_type,
            key: key.into(),
            attributes: Vec::new(),
        }
    }

    /// Append an attribute.
    pub fn attribute(mut self, name: impl Into<CiString>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append an `mnt-by` attribute.
    pub fn mnt_by(self, maintainer: &str) -> Self {
        self.attribute(MNT_BY, maintainer)
    }

    /// Append an `auth` attribute.
    pub fn auth(self, method: impl Into<String>) -> Self {
        self.attribute(AUTH, method)
    }

    pub fn build(self) -> Record {
        Record {
            object_type: self.object_type,
            key: self.key,
            attributes: self.attributes,
        }
    }
}
