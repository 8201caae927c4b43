//! Principal: an organizational role granted to an update's sponsor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A role label. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Principal {
    /// Database administrator acting through override.
    OverrideMaintainer,
    PowerMaintainer,
    EnduserMaintainer,
    AllocMaintainer,
    RsMaintainer,
    EnumMaintainer,
    DbmMaintainer,
}

impl Principal {
    pub fn name(self) -> &'static str {
        match self {
            Principal::OverrideMaintainer => "override-maintainer",
            Principal::PowerMaintainer => "power-maintainer",
            Principal::EnduserMaintainer => "enduser-maintainer",
            Principal::AllocMaintainer => "alloc-maintainer",
            Principal::RsMaintainer => "rs-maintainer",
            Principal::EnumMaintainer => "enum-maintainer",
            Principal::DbmMaintainer => "dbm-maintainer",
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
