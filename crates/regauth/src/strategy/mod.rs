//! Authentication strategies.
//!
//! A strategy is one independent way of proving an update is authorized,
//! for example "the submitter holds a password of a maintainer listed in
//! `mnt-by:`". The [`Authenticator`](crate::Authenticator) runs every
//! strategy that [supports](AuthenticationStrategy::supports) an update and
//! combines the outcomes.
//!
//! ## Key Types
//!
//! - [`AuthenticationStrategy`]: the contract every strategy implements
//! - [`AuthenticationFailed`]: a strategy's rejection, carrying its messages
//! - [`MntByAuthentication`], [`RouteAutnumAuthentication`]: reference strategies

use async_trait::async_trait;
use thiserror::Error;

use regauth_core::{Message, ObjectType, PreparedUpdate, Record};

use crate::context::UpdateContext;

mod credentials;
mod mnt_by;
mod route_autnum;

pub use credentials::{authenticate_by_maintainers, maintainer_authenticates, KEY_SCHEME};
pub use mnt_by::MntByAuthentication;
pub use route_autnum::RouteAutnumAuthentication;

/// A strategy's rejection of an update.
///
/// Not a fault: it is one of the two normal outcomes of
/// [`AuthenticationStrategy::authenticate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("authentication failed ({} message(s))", .messages.len())]
pub struct AuthenticationFailed {
    messages: Vec<Message>,
}

impl AuthenticationFailed {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn single(message: Message) -> Self {
        Self::new(vec![message])
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

/// One way of authenticating an update.
///
/// Implementations are shared across concurrent evaluations and must not
/// keep per-update state.
#[async_trait]
pub trait AuthenticationStrategy: Send + Sync {
    /// Stable name, unique among the strategies given to one authenticator.
    /// Recorded in a subject's passed and failed sets.
    fn name(&self) -> &str;

    /// Whether this strategy has an opinion on `update`.
    fn supports(&self, update: &PreparedUpdate) -> bool;

    /// Authenticate `update`, returning the records that vouched for it.
    ///
    /// Maintainer records in the result confer the principals the
    /// registry lists for them.
    async fn authenticate(
        &self,
        update: &PreparedUpdate,
        context: &UpdateContext,
    ) -> Result<Vec<Record>, AuthenticationFailed>;

    /// Object types for which this strategy's failure may leave a create
    /// pending rather than failed.
    fn pending_authentication_types(&self) -> &[ObjectType] {
        &[]
    }
}
