//! Per-update evaluation context.
//!
//! Earlier pipeline stages (syntax checks, reference validation) and the
//! authenticator all write into the same [`UpdateContext`]. The
//! authenticator reads [`UpdateContext::has_errors`] to tell whether an
//! update is already doomed for reasons other than authorization.

use std::fmt;

use serde::Serialize;

use regauth_core::{Message, PreparedUpdate, UpdateId};
use regauth_perms::Subject;

/// Outcome of processing an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    /// Nothing has rejected the update.
    #[default]
    Success,
    /// Rejected by a non-authorization check.
    Failed,
    /// Rejected by authorization.
    FailedAuthentication,
    /// Partially authenticated; may complete when another party authenticates.
    PendingAuthentication,
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UpdateStatus::Success => "SUCCESS",
            UpdateStatus::Failed => "FAILED",
            UpdateStatus::FailedAuthentication => "FAILED_AUTHENTICATION",
            UpdateStatus::PendingAuthentication => "PENDING_AUTHENTICATION",
        })
    }
}

/// Mutable state for a single update.
///
/// Exclusively owned by whoever is processing the update, so no locking.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateContext {
    update_id: UpdateId,
    status: UpdateStatus,
    messages: Vec<Message>,
    subject: Option<Subject>,
}

impl UpdateContext {
    pub fn new(update: &PreparedUpdate) -> Self {
        Self {
            update_id: update.id(),
            status: UpdateStatus::Success,
            messages: Vec::new(),
            subject: None,
        }
    }

    pub fn update_id(&self) -> UpdateId {
        self.update_id
    }

    pub fn status(&self) -> UpdateStatus {
        self.status
    }

    pub fn set_status(&mut self, status: UpdateStatus) {
        self.status = status;
    }

    /// Append a message. Exact duplicates are dropped.
    pub fn add_message(&mut self, message: Message) {
        if !self.messages.contains(&message) {
            self.messages.push(message);
        }
    }

    /// Messages in the order they were added.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether any error-level message has been recorded.
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(Message::is_error)
    }

    /// The subject recorded by the last authentication, if any.
    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    pub fn set_subject(&mut self, subject: Subject) {
        self.subject = Some(subject);
    }
}
