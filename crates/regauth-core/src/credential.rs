//! Credentials submitted alongside an update.
//!
//! An update carries a set of credentials of mixed kinds. Each authentication
//! check picks out the kinds it understands.

use bytes::Bytes;
use std::collections::HashSet;
use std::fmt;

use crate::crypto::{Ed25519PublicKey, Ed25519Signature, Keypair};

/// A single piece of proof attached to an update.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Credential {
    /// A cleartext password, matched against maintainer `auth:` lines.
    Password(String),
    /// An administrator override, possibly with several candidate logins.
    Override(OverrideCredential),
    /// Content signed with an Ed25519 key.
    SignedMessage(SignedMessageCredential),
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Password(_) => f.write_str("Password(..)"),
            Credential::Override(o) => write!(f, "Override({:?})", o),
            Credential::SignedMessage(s) => write!(f, "SignedMessage({:?})", s),
        }
    }
}

/// The credential set of an update.
///
/// Insertion order is kept; exact duplicates collapse.
#[derive(Clone, Default)]
pub struct Credentials {
    items: Vec<Credential>,
    seen: HashSet<Credential>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a credential. Returns false if an identical one was already present.
    pub fn add(&mut self, credential: Credential) -> bool {
        if !self.seen.insert(credential.clone()) {
            return false;
        }
        self.items.push(credential);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cleartext passwords, in submission order.
    pub fn passwords(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|c| match c {
            Credential::Password(p) => Some(p.as_str()),
            _ => None,
        })
    }

    pub fn password_count(&self) -> usize {
        self.passwords().count()
    }

    /// Override credentials, in submission order.
    pub fn overrides(&self) -> Vec<&OverrideCredential> {
        self.items
            .iter()
            .filter_map(|c| match c {
                Credential::Override(o) => Some(o),
                _ => None,
            })
            .collect()
    }

    /// Signed-message credentials, in submission order.
    pub fn signed_messages(&self) -> impl Iterator<Item = &SignedMessageCredential> {
        self.items.iter().filter_map(|c| match c {
            Credential::SignedMessage(s) => Some(s),
            _ => None,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl PartialEq for Credentials {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for Credentials {}

impl FromIterator<Credential> for Credentials {
    fn from_iter<I: IntoIterator<Item = Credential>>(iter: I) -> Self {
        let mut credentials = Credentials::new();
        for credential in iter {
            credentials.add(credential);
        }
        credentials
    }
}

/// One username/password interpretation of an override value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UsernamePassword {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for UsernamePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsernamePassword")
            .field("username", &self.username)
            .field("password", &"..")
            .finish()
    }
}

/// An `override:` credential.
///
/// The raw value has the form `username,password[,remarks]`. Since passwords
/// may themselves contain commas, every comma boundary after the username
/// yields one candidate password, shortest first.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OverrideCredential {
    value: String,
    candidates: Vec<UsernamePassword>,
}

impl OverrideCredential {
    /// Parse a raw override value. A value without a comma has no candidates.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        let mut candidates = Vec::new();

        if let Some((username, rest)) = trimmed.split_once(',') {
            let username = username.trim();
            if !username.is_empty() {
                let boundaries = rest
                    .match_indices(',')
                    .map(|(i, _)| i)
                    .chain(std::iter::once(rest.len()));
                for end in boundaries {
                    let password = &rest[..end];
                    if password.is_empty() {
                        continue;
                    }
                    candidates.push(UsernamePassword {
                        username: username.to_string(),
                        password: password.to_string(),
                    });
                }
            }
        }

        Self {
            value: trimmed.to_string(),
            candidates,
        }
    }

    /// Candidate logins, tried in order.
    pub fn candidates(&self) -> &[UsernamePassword] {
        &self.candidates
    }
}

impl fmt::Debug for OverrideCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let username = self.candidates.first().map(|c| c.username.as_str());
        write!(f, "OverrideCredential(user={:?}, candidates={})", username, self.candidates.len())
    }
}

/// Content signed by an Ed25519 key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignedMessageCredential {
    pub content: Bytes,
    pub signature: Ed25519Signature,
}

impl SignedMessageCredential {
    /// Sign content with a keypair.
    pub fn sign(keypair: &Keypair, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        let signature = keypair.sign(&content);
        Self { content, signature }
    }

    /// Whether `key` produced this signature.
    pub fn verify(&self, key: &Ed25519PublicKey) -> bool {
        key.verify(&self.content, &self.signature).is_ok()
    }

    /// Whether the signed content is exactly `text`.
    pub fn covers(&self, text: &str) -> bool {
        self.content.as_ref() == text.as_bytes()
    }
}
