//! Subject: the complete authorization outcome of one update evaluation.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::principal::Principal;

/// Granted principals plus which strategies passed and failed.
///
/// A subject is built in one go and never changed afterwards. The default is
/// empty: no principals, no passes, no failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Subject {
    principals: BTreeSet<Principal>,
    passed_authentications: BTreeSet<String>,
    failed_authentications: BTreeSet<String>,
}

impl Subject {
    pub fn new(
        principals: BTreeSet<Principal>,
        passed_authentications: BTreeSet<String>,
        failed_authentications: BTreeSet<String>,
    ) -> Self {
        Self {
            principals,
            passed_authentications,
            failed_authentications,
        }
    }

    /// A subject granting exactly one principal and running no strategies.
    pub fn with_principal(principal: Principal) -> Self {
        Self {
            principals: BTreeSet::from([principal]),
            ..Self::default()
        }
    }

    pub fn principals(&self) -> &BTreeSet<Principal> {
        &self.principals
    }

    pub fn has_principal(&self, principal: Principal) -> bool {
        self.principals.contains(&principal)
    }

    /// Names of strategies that authenticated the update.
    pub fn passed_authentications(&self) -> &BTreeSet<String> {
        &self.passed_authentications
    }

    /// Names of strategies that applied but failed.
    pub fn failed_authentications(&self) -> &BTreeSet<String> {
        &self.failed_authentications
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
            && self.passed_authentications.is_empty()
            && self.failed_authentications.is_empty()
    }
}
