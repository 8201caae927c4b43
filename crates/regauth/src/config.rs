//! Engine configuration.
//!
//! Loaded once at startup, usually from a JSON file:
//!
//! ```json
//! {
//!   "trusted_ranges": ["10.0.0.0/8", "2001:db8::/32"],
//!   "restrict_maintainer_updates_to_trusted_network": true,
//!   "max_passwords": 20,
//!   "maintainers": {
//!     "power": ["RIR-POWER-MNT"],
//!     "dbm": ["RIR-DBM-MNT"]
//!   }
//! }
//! ```
//!
//! Every field is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use regauth_core::IpRanges;
use regauth_perms::{Maintainers, PrincipalRegistry};

use crate::error::{AuthError, Result};

/// Default cap on password credentials per update.
pub const DEFAULT_MAX_PASSWORDS: usize = 20;

/// Configuration for the [`Authenticator`](crate::Authenticator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthenticatorConfig {
    /// CIDR prefixes of the registry's own network.
    pub trusted_ranges: Vec<String>,
    /// Whether updates granting a registry principal must come from a
    /// trusted address over an admin-capable channel.
    pub restrict_maintainer_updates_to_trusted_network: bool,
    /// More password credentials than this fails the update outright.
    pub max_passwords: usize,
    /// Maintainer names per principal kind.
    pub maintainers: Maintainers,
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self {
            trusted_ranges: Vec::new(),
            restrict_maintainer_updates_to_trusted_network: true,
            max_passwords: DEFAULT_MAX_PASSWORDS,
            maintainers: Maintainers::default(),
        }
    }
}

impl AuthenticatorConfig {
    /// Parse from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.max_passwords == 0 {
            return Err(AuthError::InvalidConfig(
                "max_passwords must be at least 1".to_string(),
            ));
        }
        self.trusted_network()?;
        self.principal_registry()?;
        Ok(())
    }

    /// Parsed trusted ranges.
    pub fn trusted_network(&self) -> Result<IpRanges> {
        Ok(IpRanges::parse(&self.trusted_ranges)?)
    }

    /// Registry built from the configured maintainer sets.
    pub fn principal_registry(&self) -> Result<PrincipalRegistry> {
        Ok(PrincipalRegistry::from_maintainers(&self.maintainers)?)
    }
}
