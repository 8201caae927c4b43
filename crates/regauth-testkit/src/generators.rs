//! Proptest generators for property-based testing.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;

use regauth::AuthenticationStrategy;
use regauth_core::{Action, CiString, ObjectType, Record};
use regauth_perms::{Maintainers, Principal};

use crate::stub::StubStrategy;

/// Generate any object type.
pub fn object_type() -> impl Strategy<Value = ObjectType> {
    prop::sample::select(ObjectType::ALL.to_vec())
}

/// Generate an action.
pub fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Create),
        Just(Action::Modify),
        Just(Action::Delete),
    ]
}

/// Generate a registry principal (never the override principal).
pub fn principal() -> impl Strategy<Value = Principal> {
    prop_oneof![
        Just(Principal::PowerMaintainer),
        Just(Principal::EnduserMaintainer),
        Just(Principal::AllocMaintainer),
        Just(Principal::RsMaintainer),
        Just(Principal::EnumMaintainer),
        Just(Principal::DbmMaintainer),
    ]
}

/// Generate a maintainer name from a small pool, so collisions happen.
pub fn maintainer_name() -> impl Strategy<Value = CiString> {
    "[A-Da-d]{1,2}-MNT".prop_map(CiString::from)
}

fn name_set() -> impl Strategy<Value = BTreeSet<CiString>> {
    prop::collection::btree_set(maintainer_name(), 0..4)
}

/// Generate configured maintainer sets.
pub fn maintainers() -> impl Strategy<Value = Maintainers> {
    (name_set(), name_set(), name_set(), name_set(), name_set(), name_set()).prop_map(
        |(power, enduser, alloc, rs, enum_, dbm)| Maintainers {
            power,
            enduser,
            alloc,
            rs,
            enum_,
            dbm,
        },
    )
}

/// Parameters for one scripted strategy.
#[derive(Debug, Clone)]
pub struct StubParams {
    pub supports: bool,
    pub passes: bool,
    pub deferrable: bool,
    /// Maintainer vouching for the update when the strategy passes.
    pub vouches: Option<CiString>,
}

impl Arbitrary for StubParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            prop::option::of(maintainer_name()),
        )
            .prop_map(|(supports, passes, deferrable, vouches)| StubParams {
                supports,
                passes,
                deferrable,
                vouches,
            })
            .boxed()
    }
}

/// Build stubs named `S0`, `S1`, ... from parameters. Deferrable stubs are
/// deferrable for `deferrable_type`.
pub fn stubs_from_params(params: &[StubParams], deferrable_type: ObjectType) -> Vec<Arc<StubStrategy>> {
    params
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let name = format!("S{}", i);
            let mut stub = if p.passes {
                let records = p
                    .vouches
                    .iter()
                    .map(|m| Record::builder(ObjectType::Mntner, m.clone()).build())
                    .collect();
                StubStrategy::passing(name, records)
            } else {
                StubStrategy::failing(name)
            };
            if !p.supports {
                stub = stub.unsupported();
            }
            if p.deferrable {
                stub = stub.with_pending_types(&[deferrable_type]);
            }
            Arc::new(stub)
        })
        .collect()
}

/// Upcast stubs for handing to an authenticator.
pub fn as_strategies(stubs: &[Arc<StubStrategy>]) -> Vec<Arc<dyn AuthenticationStrategy>> {
    stubs
        .iter()
        .map(|s| s.clone() as Arc<dyn AuthenticationStrategy>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_stub_names_are_unique(params in prop::collection::vec(any::<StubParams>(), 0..8)) {
            let stubs = stubs_from_params(&params, ObjectType::Route);
            let names: BTreeSet<_> = stubs.iter().map(|s| s.name().to_string()).collect();
            prop_assert_eq!(names.len(), stubs.len());
        }

        #[test]
        fn test_maintainer_names_are_well_formed(name in maintainer_name()) {
            prop_assert!(name.as_str().to_ascii_uppercase().ends_with("-MNT"));
        }
    }
}
