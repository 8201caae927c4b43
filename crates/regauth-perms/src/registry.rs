//! Maintainer-to-principal registry.
//!
//! Built once by folding per-kind maintainer sets into a single map. A
//! maintainer listed under several kinds ends up with all of them.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use regauth_core::CiString;

use crate::error::{PermsError, Result};
use crate::principal::Principal;

static NO_PRINCIPALS: BTreeSet<Principal> = BTreeSet::new();

/// Configured maintainer names, one set per principal kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Maintainers {
    pub power: BTreeSet<CiString>,
    pub enduser: BTreeSet<CiString>,
    pub alloc: BTreeSet<CiString>,
    pub rs: BTreeSet<CiString>,
    #[serde(rename = "enum")]
    pub enum_: BTreeSet<CiString>,
    pub dbm: BTreeSet<CiString>,
}

impl Maintainers {
    /// Each name set paired with the principal it confers.
    pub fn groups(&self) -> [(&BTreeSet<CiString>, Principal); 6] {
        [
            (&self.power, Principal::PowerMaintainer),
            (&self.enduser, Principal::EnduserMaintainer),
            (&self.alloc, Principal::AllocMaintainer),
            (&self.rs, Principal::RsMaintainer),
            (&self.enum_, Principal::EnumMaintainer),
            (&self.dbm, Principal::DbmMaintainer),
        ]
    }
}

/// Case-insensitive maintainer name -> principals.
///
/// There is no mutation API: once built, the registry is read-only.
#[derive(Debug, Clone, Default)]
pub struct PrincipalRegistry {
    principals: HashMap<CiString, BTreeSet<Principal>>,
}

impl PrincipalRegistry {
    /// Fold `(names, principal)` groups into a registry.
    ///
    /// The result does not depend on group order. Empty names are rejected.
    pub fn build<'a, G, N>(groups: G) -> Result<Self>
    where
        G: IntoIterator<Item = (N, Principal)>,
        N: IntoIterator<Item = &'a CiString>,
    {
        let mut principals: HashMap<CiString, BTreeSet<Principal>> = HashMap::new();

        for (names, principal) in groups {
            for name in names {
                if name.is_empty() {
                    return Err(PermsError::InvalidMaintainer {
                        principal: principal.to_string(),
                        name: name.to_string(),
                    });
                }
                principals.entry(name.clone()).or_default().insert(principal);
            }
        }

        Ok(Self { principals })
    }

    /// Build from configured maintainer sets.
    pub fn from_maintainers(maintainers: &Maintainers) -> Result<Self> {
        Self::build(maintainers.groups())
    }

    /// Principals carried by a maintainer. Empty if unknown.
    pub fn lookup(&self, maintainer: &CiString) -> &BTreeSet<Principal> {
        self.principals.get(maintainer).unwrap_or(&NO_PRINCIPALS)
    }

    /// Number of distinct maintainers with at least one principal.
    pub fn len(&self) -> usize {
        self.principals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(values: &[&str]) -> BTreeSet<CiString> {
        values.iter().map(|v| CiString::from(*v)).collect()
    }

    #[test]
    fn test_lookup_unknown_is_empty() {
        let registry = PrincipalRegistry::default();
        assert!(registry.lookup(&CiString::from("NOBODY-MNT")).is_empty());
    }

    #[test]
    fn test_union_across_kinds() {
        let maintainers = Maintainers {
            power: names(&["RIR-MNT", "POWER-MNT"]),
            dbm: names(&["rir-mnt"]),
            ..Default::default()
        };

        let registry = PrincipalRegistry::from_maintainers(&maintainers).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.lookup(&CiString::from("Rir-Mnt")),
            &[Principal::PowerMaintainer, Principal::DbmMaintainer]
                .into_iter()
                .collect::<BTreeSet<_>>()
        );
        assert_eq!(
            registry.lookup(&CiString::from("power-mnt")),
            &[Principal::PowerMaintainer].into_iter().collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_rejects_empty_name() {
        let maintainers = Maintainers {
            rs: names(&["  "]),
            ..Default::default()
        };
        let err = PrincipalRegistry::from_maintainers(&maintainers).unwrap_err();
        assert!(matches!(err, PermsError::InvalidMaintainer { .. }));
    }

    #[test]
    fn test_maintainers_from_json() {
        let json = r#"{"power": ["POWER-MNT"], "enum": ["ENUM-MNT"]}"#;
        let maintainers: Maintainers = serde_json::from_str(json).unwrap();
        assert!(maintainers.power.contains(&CiString::from("power-mnt")));
        assert!(maintainers.enum_.contains(&CiString::from("ENUM-MNT")));
        assert!(maintainers.dbm.is_empty());
    }

    fn principal() -> impl Strategy<Value = Principal> {
        prop_oneof![
            Just(Principal::PowerMaintainer),
            Just(Principal::EnduserMaintainer),
            Just(Principal::AllocMaintainer),
            Just(Principal::RsMaintainer),
            Just(Principal::EnumMaintainer),
            Just(Principal::DbmMaintainer),
        ]
    }

    fn group() -> impl Strategy<Value = (Vec<CiString>, Principal)> {
        (
            prop::collection::vec("[A-Ca-c]{1,2}-MNT".prop_map(CiString::from), 0..4),
            principal(),
        )
    }

    proptest! {
        #[test]
        fn registry_is_order_independent(groups in prop::collection::vec(group(), 0..6)) {
            let forward = PrincipalRegistry::build(
                groups.iter().map(|(n, p)| (n.iter(), *p)),
            ).unwrap();
            let reversed = PrincipalRegistry::build(
                groups.iter().rev().map(|(n, p)| (n.iter(), *p)),
            ).unwrap();

            for (names, _) in &groups {
                for name in names {
                    prop_assert_eq!(forward.lookup(name), reversed.lookup(name));
                }
            }
        }

        #[test]
        fn registry_is_union_of_groups(groups in prop::collection::vec(group(), 0..6)) {
            let registry = PrincipalRegistry::build(
                groups.iter().map(|(n, p)| (n.iter(), *p)),
            ).unwrap();

            for (names, _) in &groups {
                for name in names {
                    let expected: BTreeSet<Principal> = groups
                        .iter()
                        .filter(|(ns, _)| ns.contains(name))
                        .map(|(_, p)| *p)
                        .collect();
                    prop_assert_eq!(registry.lookup(name), &expected);
                }
            }
        }
    }
}
