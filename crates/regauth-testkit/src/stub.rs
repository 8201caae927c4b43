//! Scripted strategies.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use regauth::{AuthenticationFailed, AuthenticationStrategy, UpdateContext};
use regauth_core::{Message, ObjectType, PreparedUpdate, Record};

/// What a [`StubStrategy`] answers when asked.
#[derive(Debug, Clone)]
pub enum StubOutcome {
    Pass(Vec<Record>),
    Fail(Vec<Message>),
}

/// A strategy with a fixed answer.
///
/// Counts how often [`authenticate`](AuthenticationStrategy::authenticate)
/// ran, so tests can check that unsupported strategies are skipped.
#[derive(Debug)]
pub struct StubStrategy {
    name: String,
    supports: Option<Vec<ObjectType>>,
    outcome: StubOutcome,
    pending_types: Vec<ObjectType>,
    calls: AtomicUsize,
}

impl StubStrategy {
    pub fn new(name: impl Into<String>, outcome: StubOutcome) -> Self {
        Self {
            name: name.into(),
            supports: None,
            outcome,
            pending_types: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Passes, vouched for by `records`.
    pub fn passing(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self::new(name, StubOutcome::Pass(records))
    }

    /// Fails with one message naming the strategy.
    pub fn failing(name: impl Into<String>) -> Self {
        let name = name.into();
        let message = Message::error(format!("{} rejected the update", name));
        Self::new(name, StubOutcome::Fail(vec![message]))
    }

    /// Fails with the given messages.
    pub fn failing_with(name: impl Into<String>, messages: Vec<Message>) -> Self {
        Self::new(name, StubOutcome::Fail(messages))
    }

    /// Only support updates of these types. Default: every update.
    pub fn supporting(mut self, types: &[ObjectType]) -> Self {
        self.supports = Some(types.to_vec());
        self
    }

    /// Never support anything.
    pub fn unsupported(self) -> Self {
        self.supporting(&[])
    }

    pub fn with_pending_types(mut self, types: &[ObjectType]) -> Self {
        self.pending_types = types.to_vec();
        self
    }

    /// Number of times `authenticate` ran.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthenticationStrategy for StubStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, update: &PreparedUpdate) -> bool {
        match &self.supports {
            Some(types) => types.contains(&update.object_type()),
            None => true,
        }
    }

    async fn authenticate(
        &self,
        _update: &PreparedUpdate,
        _context: &UpdateContext,
    ) -> Result<Vec<Record>, AuthenticationFailed> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            StubOutcome::Pass(records) => Ok(records.clone()),
            StubOutcome::Fail(messages) => Err(AuthenticationFailed::new(messages.clone())),
        }
    }

    fn pending_authentication_types(&self) -> &[ObjectType] {
        &self.pending_types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regauth_core::Action;

    fn update(object_type: ObjectType) -> PreparedUpdate {
        PreparedUpdate::builder(Action::Create, Record::builder(object_type, "KEY").build())
            .build()
    }

    #[tokio::test]
    async fn test_stub_counts_calls() {
        let stub = StubStrategy::passing("Stub", Vec::new());
        let update = update(ObjectType::Person);
        let ctx = UpdateContext::new(&update);

        assert_eq!(stub.calls(), 0);
        assert!(stub.authenticate(&update, &ctx).await.is_ok());
        assert!(stub.authenticate(&update, &ctx).await.is_ok());
        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test]
    async fn test_failing_stub_names_itself() {
        let stub = StubStrategy::failing("Picky");
        let update = update(ObjectType::Person);
        let ctx = UpdateContext::new(&update);

        let failed = stub.authenticate(&update, &ctx).await.unwrap_err();
        assert_eq!(failed.messages()[0].text, "Picky rejected the update");
    }

    #[test]
    fn test_supporting_filters_by_type() {
        let stub = StubStrategy::failing("Routes").supporting(&[ObjectType::Route]);
        assert!(stub.supports(&update(ObjectType::Route)));
        assert!(!stub.supports(&update(ObjectType::Person)));
        assert!(!StubStrategy::failing("Never").unsupported().supports(&update(ObjectType::Route)));
    }
}
