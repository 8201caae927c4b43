//! Deferred authentication.
//!
//! Some object types (routes, typically) need consent from two independent
//! parties. When only one of them has authenticated a create, the update is
//! parked as *pending* instead of failed, so the other party can complete it
//! later. [`DeferredAuthenticationIndex`] records which strategies may be
//! deferred for which types and decides whether a failed evaluation
//! qualifies.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use regauth_core::{Action, ObjectType, PreparedUpdate};
use regauth_perms::Subject;

use crate::context::UpdateContext;
use crate::strategy::AuthenticationStrategy;

/// Object type -> names of strategies whose failure may be deferred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeferredAuthenticationIndex {
    by_type: HashMap<ObjectType, BTreeSet<String>>,
}

impl DeferredAuthenticationIndex {
    /// Build from the strategies' declared pending types.
    pub fn build(strategies: &[Arc<dyn AuthenticationStrategy>]) -> Self {
        let mut by_type: HashMap<ObjectType, BTreeSet<String>> = HashMap::new();

        for strategy in strategies {
            for object_type in strategy.pending_authentication_types() {
                by_type
                    .entry(*object_type)
                    .or_default()
                    .insert(strategy.name().to_string());
            }
        }

        Self { by_type }
    }

    /// Deferrable strategies for `object_type`. Empty if none.
    pub fn strategies_for(&self, object_type: ObjectType) -> Option<&BTreeSet<String>> {
        self.by_type.get(&object_type)
    }

    /// Object types with at least one deferrable strategy.
    pub fn object_types(&self) -> impl Iterator<Item = ObjectType> + '_ {
        self.by_type.keys().copied()
    }

    /// Whether a failed evaluation of `update` should be left pending.
    ///
    /// True only for a create of a deferrable type, with no other errors on
    /// the context, where every failed strategy is deferrable for the type
    /// and at least one deferrable strategy passed.
    pub fn is_pending(
        &self,
        update: &PreparedUpdate,
        context: &UpdateContext,
        subject: &Subject,
    ) -> bool {
        if context.has_errors() || update.action() != Action::Create {
            return false;
        }

        let Some(deferrable) = self.by_type.get(&update.object_type()) else {
            return false;
        };

        let failed_only_deferrable = subject
            .failed_authentications()
            .iter()
            .all(|name| deferrable.contains(name));
        let passed_some_deferrable = subject
            .passed_authentications()
            .iter()
            .any(|name| deferrable.contains(name));

        failed_only_deferrable && passed_some_deferrable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use regauth_core::{Message, Record};

    use crate::strategy::AuthenticationFailed;

    struct Declared {
        name: &'static str,
        types: Vec<ObjectType>,
    }

    #[async_trait]
    impl AuthenticationStrategy for Declared {
        fn name(&self) -> &str {
            self.name
        }

        fn supports(&self, _update: &PreparedUpdate) -> bool {
            false
        }

        async fn authenticate(
            &self,
            _update: &PreparedUpdate,
            _context: &UpdateContext,
        ) -> Result<Vec<Record>, AuthenticationFailed> {
            Ok(Vec::new())
        }

        fn pending_authentication_types(&self) -> &[ObjectType] {
            &self.types
        }
    }

    fn declared(name: &'static str, types: &[ObjectType]) -> Arc<dyn AuthenticationStrategy> {
        Arc::new(Declared {
            name,
            types: types.to_vec(),
        })
    }

    fn index() -> DeferredAuthenticationIndex {
        DeferredAuthenticationIndex::build(&[
            declared("A", &[ObjectType::Route, ObjectType::Route6]),
            declared("B", &[ObjectType::Route]),
            declared("C", &[]),
        ])
    }

    fn names(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn subject(passed: &[&str], failed: &[&str]) -> Subject {
        Subject::new(BTreeSet::new(), names(passed), names(failed))
    }

    fn update(action: Action, object_type: ObjectType) -> PreparedUpdate {
        PreparedUpdate::builder(action, Record::builder(object_type, "KEY").build()).build()
    }

    #[test]
    fn test_build_groups_by_type() {
        let index = index();
        assert_eq!(
            index.strategies_for(ObjectType::Route),
            Some(&names(&["A", "B"]))
        );
        assert_eq!(index.strategies_for(ObjectType::Route6), Some(&names(&["A"])));
        assert_eq!(index.strategies_for(ObjectType::Person), None);
        assert_eq!(index.object_types().count(), 2);
    }

    #[test]
    fn test_empty_index() {
        let index = DeferredAuthenticationIndex::build(&[]);
        assert_eq!(index.object_types().count(), 0);
    }

    #[test]
    fn test_pending_when_one_deferrable_passes() {
        let index = index();
        let update = update(Action::Create, ObjectType::Route);
        let ctx = UpdateContext::new(&update);
        assert!(index.is_pending(&update, &ctx, &subject(&["A"], &["B"])));
    }

    #[test]
    fn test_not_pending_when_non_deferrable_failed() {
        let index = index();
        let update = update(Action::Create, ObjectType::Route);
        let ctx = UpdateContext::new(&update);
        assert!(!index.is_pending(&update, &ctx, &subject(&["A"], &["B", "C"])));
    }

    #[test]
    fn test_not_pending_when_nothing_passed() {
        let index = index();
        let update = update(Action::Create, ObjectType::Route);
        let ctx = UpdateContext::new(&update);
        assert!(!index.is_pending(&update, &ctx, &subject(&[], &["A", "B"])));
        // A pass by a strategy that is not deferrable for the type does not count.
        assert!(!index.is_pending(&update, &ctx, &subject(&["C"], &["A"])));
    }

    #[test]
    fn test_not_pending_for_modify_or_unindexed_type() {
        let index = index();

        let modify = update(Action::Modify, ObjectType::Route);
        let ctx = UpdateContext::new(&modify);
        assert!(!index.is_pending(&modify, &ctx, &subject(&["A"], &["B"])));

        let person = update(Action::Create, ObjectType::Person);
        let ctx = UpdateContext::new(&person);
        assert!(!index.is_pending(&person, &ctx, &subject(&["A"], &["B"])));
    }

    #[test]
    fn test_not_pending_with_prior_errors() {
        let index = index();
        let update = update(Action::Create, ObjectType::Route);
        let mut ctx = UpdateContext::new(&update);
        ctx.add_message(Message::error("syntax error in route"));
        assert!(!index.is_pending(&update, &ctx, &subject(&["A"], &["B"])));
    }
}
