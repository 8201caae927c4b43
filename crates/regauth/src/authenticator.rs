//! The Authenticator: decides whether an update is authorized.
//!
//! Three paths, chosen by where the update came from and what it asked for:
//!
//! 1. **Internal origin**: unconditionally granted the override principal.
//! 2. **Override requested**: an administrator login is checked against the
//!    user store. All or nothing.
//! 3. **Normal**: every applicable strategy runs; the granted principals
//!    come from the maintainers that vouched for the update.
//!
//! Failures are never returned as errors. They are written into the
//! [`UpdateContext`] as messages plus a status of failed or pending.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use regauth_core::message;
use regauth_core::{
    Action, CiString, Message, ObjectType, Origin, PreparedUpdate, Record, TrustedNetwork,
};
use regauth_perms::{Principal, PrincipalRegistry, Subject};
use regauth_store::UserStore;

use crate::config::AuthenticatorConfig;
use crate::context::{UpdateContext, UpdateStatus};
use crate::error::{AuthError, Result};
use crate::pending::DeferredAuthenticationIndex;
use crate::strategy::AuthenticationStrategy;

/// The authorization decision engine.
///
/// Immutable after construction and safe to share across tasks; each call
/// to [`authenticate`](Self::authenticate) works only on the context it is
/// given.
pub struct Authenticator {
    /// Strategies in evaluation order.
    strategies: Vec<Arc<dyn AuthenticationStrategy>>,
    /// Maintainer name -> principals.
    principals: PrincipalRegistry,
    /// Object type -> deferrable strategies.
    deferred: DeferredAuthenticationIndex,
    /// Override user lookup.
    users: Arc<dyn UserStore>,
    /// Trusted address check.
    network: Arc<dyn TrustedNetwork>,
    max_passwords: usize,
    restrict_to_trusted_network: bool,
}

impl Authenticator {
    /// Create an authenticator.
    ///
    /// Strategies are evaluated in the order given. Their names must be
    /// unique.
    pub fn new(
        config: &AuthenticatorConfig,
        strategies: Vec<Arc<dyn AuthenticationStrategy>>,
        users: Arc<dyn UserStore>,
    ) -> Result<Self> {
        config.validate()?;

        let mut seen = HashSet::new();
        for strategy in &strategies {
            if !seen.insert(strategy.name()) {
                return Err(AuthError::DuplicateStrategy(strategy.name().to_string()));
            }
        }

        let principals = config.principal_registry()?;
        let deferred = DeferredAuthenticationIndex::build(&strategies);
        let network = Arc::new(config.trusted_network()?);

        tracing::debug!(
            strategies = strategies.len(),
            maintainers = principals.len(),
            deferrable_types = deferred.object_types().count(),
            "authenticator ready"
        );

        Ok(Self {
            strategies,
            principals,
            deferred,
            users,
            network,
            max_passwords: config.max_passwords,
            restrict_to_trusted_network: config.restrict_maintainer_updates_to_trusted_network,
        })
    }

    /// Replace the configured trusted ranges with another network check.
    pub fn with_trusted_network(mut self, network: Arc<dyn TrustedNetwork>) -> Self {
        self.network = network;
        self
    }

    pub fn principal_registry(&self) -> &PrincipalRegistry {
        &self.principals
    }

    pub fn deferred_index(&self) -> &DeferredAuthenticationIndex {
        &self.deferred
    }

    /// Strategy names in evaluation order.
    pub fn strategy_names(&self) -> impl Iterator<Item = &str> {
        self.strategies.iter().map(|s| s.name())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch
    // ─────────────────────────────────────────────────────────────────────────

    /// Authenticate `update` and record the resulting subject on `context`.
    ///
    /// The subject is also returned. On rejection the context carries the
    /// reasons and a status of [`UpdateStatus::FailedAuthentication`] or
    /// [`UpdateStatus::PendingAuthentication`]; on success its status is
    /// left alone.
    pub async fn authenticate(
        &self,
        origin: &Origin,
        update: &PreparedUpdate,
        context: &mut UpdateContext,
    ) -> Subject {
        debug_assert_eq!(context.update_id(), update.id());

        let subject = if origin.is_default_override() {
            tracing::debug!(update = %update, "internal origin, override granted");
            Subject::with_principal(Principal::OverrideMaintainer)
        } else if update.is_override() {
            self.perform_override_authentication(origin, update, context)
                .await
        } else {
            self.perform_authentication(origin, update, context).await
        };

        context.set_subject(subject.clone());
        subject
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Normal path
    // ─────────────────────────────────────────────────────────────────────────

    async fn perform_authentication(
        &self,
        origin: &Origin,
        update: &PreparedUpdate,
        context: &mut UpdateContext,
    ) -> Subject {
        let mut messages = Messages::default();
        let mut authenticated = AuthenticatedRecords::default();
        let mut passed = BTreeSet::new();
        let mut failed = BTreeSet::new();

        if update.credentials().password_count() > self.max_passwords {
            messages.push(message::too_many_passwords_specified());
        } else {
            for strategy in &self.strategies {
                if !strategy.supports(update) {
                    continue;
                }

                match strategy.authenticate(update, context).await {
                    Ok(records) => {
                        tracing::trace!(update = %update, strategy = strategy.name(), "strategy passed");
                        authenticated.extend(records);
                        passed.insert(strategy.name().to_string());
                    }
                    Err(rejection) => {
                        tracing::trace!(update = %update, strategy = strategy.name(), "strategy failed");
                        messages.extend(rejection.into_messages());
                        failed.insert(strategy.name().to_string());
                    }
                }
            }
        }

        // A maintainer vouching for its own creation is not yet a registry maintainer.
        let principals = self.principals_for(
            authenticated
                .maintainer_keys()
                .filter(|key| !is_own_creation(update, key)),
        );

        if !principals.is_empty()
            && !origin.is_default_override()
            && self.restrict_to_trusted_network
            && (!origin.allow_admin_operations() || !self.network.is_trusted(origin.from()))
        {
            tracing::info!(
                update = %update,
                origin = %origin,
                "registry maintainer update from outside the trusted network"
            );
            messages.push(message::maintainer_updates_only_allowed_from_within_network());
        }

        let subject = Subject::new(principals, passed, failed);

        if !messages.is_empty() {
            self.authentication_failed(update, context, &subject, messages.into_vec());
        }

        subject
    }

    fn principals_for<'a>(&self, maintainers: impl Iterator<Item = &'a CiString>) -> BTreeSet<Principal> {
        maintainers
            .flat_map(|name| self.principals.lookup(name).iter().copied())
            .collect()
    }

    fn authentication_failed(
        &self,
        update: &PreparedUpdate,
        context: &mut UpdateContext,
        subject: &Subject,
        messages: Vec<Message>,
    ) {
        // Decided before our own messages land, or they would count as other errors.
        let status = if self.deferred.is_pending(update, context, subject) {
            UpdateStatus::PendingAuthentication
        } else {
            UpdateStatus::FailedAuthentication
        };

        tracing::debug!(update = %update, status = %status, messages = messages.len(), "authentication failed");

        context.set_status(status);
        for message in messages {
            context.add_message(message);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Override path
    // ─────────────────────────────────────────────────────────────────────────

    async fn perform_override_authentication(
        &self,
        origin: &Origin,
        update: &PreparedUpdate,
        context: &mut UpdateContext,
    ) -> Subject {
        let overrides = update.credentials().overrides();
        let mut messages = Messages::default();

        if !origin.allow_admin_operations() {
            messages.push(message::override_not_allowed_for_origin(origin));
        } else if !self.network.is_trusted(origin.from()) {
            messages.push(message::override_only_allowed_by_db_admins());
        }

        if overrides.len() != 1 {
            messages.push(message::multiple_override_passwords());
        }

        if !messages.is_empty() {
            self.override_failed(update, context, messages.into_vec());
            return Subject::default();
        }

        for candidate in overrides[0].candidates() {
            match self.users.get_override_user(&candidate.username).await {
                Ok(user) => {
                    if user.is_valid_password(&candidate.password)
                        && user.object_types().contains(&update.object_type())
                    {
                        tracing::info!(
                            update = %update,
                            username = %candidate.username,
                            "override authentication used"
                        );
                        context.add_message(message::override_authentication_used());
                        return Subject::with_principal(Principal::OverrideMaintainer);
                    }
                }
                Err(e) if e.is_not_found() => {
                    tracing::info!(username = %candidate.username, "unknown override user");
                }
                Err(e) => {
                    tracing::warn!(username = %candidate.username, error = %e, "override user lookup failed");
                }
            }
        }

        self.override_failed(
            update,
            context,
            vec![message::override_authentication_failed()],
        );
        Subject::default()
    }

    /// Override failures are final; there is nothing to wait for.
    fn override_failed(
        &self,
        update: &PreparedUpdate,
        context: &mut UpdateContext,
        messages: Vec<Message>,
    ) {
        tracing::debug!(update = %update, messages = messages.len(), "override authentication failed");

        context.set_status(UpdateStatus::FailedAuthentication);
        for message in messages {
            context.add_message(message);
        }
    }
}

fn is_own_creation(update: &PreparedUpdate, key: &CiString) -> bool {
    update.action() == Action::Create
        && update.object_type() == ObjectType::Mntner
        && update.key() == key
}

/// Ordered, duplicate-free message list.
#[derive(Default)]
struct Messages(Vec<Message>);

impl Messages {
    fn push(&mut self, message: Message) {
        if !self.0.contains(&message) {
            self.0.push(message);
        }
    }

    fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        for message in messages {
            self.push(message);
        }
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_vec(self) -> Vec<Message> {
        self.0
    }
}

/// Records that vouched for an update, unique by type and key.
#[derive(Default)]
struct AuthenticatedRecords {
    seen: HashSet<(ObjectType, CiString)>,
    records: Vec<Record>,
}

impl AuthenticatedRecords {
    fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        for record in records {
            if self.seen.insert(record.identity()) {
                self.records.push(record);
            }
        }
    }

    fn maintainer_keys(&self) -> impl Iterator<Item = &CiString> {
        self.records
            .iter()
            .filter(|r| r.object_type().is_maintainer())
            .map(Record::key)
    }
}
