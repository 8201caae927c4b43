//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use regauth::strategy::{MntByAuthentication, RouteAutnumAuthentication, KEY_SCHEME};
use regauth::{AuthenticationStrategy, Authenticator, AuthenticatorConfig};
use regauth_core::record::ORIGIN;
use regauth_core::{CiString, Keypair, ObjectType, Origin, PasswordHash, Record, PASSWORD_SCHEME};
use regauth_perms::Maintainers;
use regauth_store::{MemoryStore, ObjectStore, User, UserStore};

/// Address inside the fixture's trusted ranges.
pub const TRUSTED_ADDRESS: &str = "10.1.2.3";

/// Address outside the fixture's trusted ranges.
pub const UNTRUSTED_ADDRESS: &str = "203.0.113.7";

/// An `auth:` value accepting `password`.
pub fn password_auth(password: &str) -> String {
    format!("{} {}", PASSWORD_SCHEME, PasswordHash::new(password))
}

/// An in-memory registry with a ready-made configuration.
///
/// The configuration trusts `10.0.0.0/8` and `2001:db8::/32`, and registers
/// `RIR-POWER-MNT` as a power maintainer and `RIR-DBM-MNT` as a DBM
/// maintainer.
pub struct TestFixture {
    pub store: Arc<MemoryStore>,
    pub config: AuthenticatorConfig,
}

impl TestFixture {
    /// Create a new fixture with an empty store.
    pub fn new() -> Self {
        let maintainers = Maintainers {
            power: BTreeSet::from([CiString::from("RIR-POWER-MNT")]),
            dbm: BTreeSet::from([CiString::from("RIR-DBM-MNT")]),
            ..Maintainers::default()
        };

        Self {
            store: Arc::new(MemoryStore::new()),
            config: AuthenticatorConfig {
                trusted_ranges: vec!["10.0.0.0/8".to_string(), "2001:db8::/32".to_string()],
                maintainers,
                ..AuthenticatorConfig::default()
            },
        }
    }

    /// An origin from inside the trusted network.
    pub fn trusted_origin(&self) -> Origin {
        Origin::sync_updates(TRUSTED_ADDRESS)
    }

    /// An origin from outside the trusted network.
    pub fn untrusted_origin(&self) -> Origin {
        Origin::sync_updates(UNTRUSTED_ADDRESS)
    }

    /// A maintainer record accepting `password`.
    pub fn maintainer(name: &str, password: &str) -> Record {
        Record::builder(ObjectType::Mntner, name)
            .auth(password_auth(password))
            .mnt_by(name)
            .build()
    }

    /// A maintainer record accepting signatures by `keypair`.
    pub fn keyed_maintainer(name: &str, keypair: &Keypair) -> Record {
        Record::builder(ObjectType::Mntner, name)
            .auth(format!("{} {}", KEY_SCHEME, keypair.public_key().to_hex()))
            .mnt_by(name)
            .build()
    }

    /// A route object for `prefix` originated by `origin`.
    pub fn route(prefix: &str, origin: &str, maintainer: &str) -> Record {
        Record::builder(ObjectType::Route, format!("{}{}", prefix, origin))
            .attribute("route", prefix)
            .attribute(ORIGIN, origin)
            .mnt_by(maintainer)
            .build()
    }

    /// Store a password maintainer and return it.
    pub async fn add_maintainer(&self, name: &str, password: &str) -> Record {
        let record = Self::maintainer(name, password);
        self.add_object(&record).await;
        record
    }

    /// Store an aut-num maintained by `maintainer`.
    pub async fn add_autnum(&self, asn: &str, maintainer: &str) -> Record {
        let record = Record::builder(ObjectType::AutNum, asn)
            .mnt_by(maintainer)
            .build();
        self.add_object(&record).await;
        record
    }

    pub async fn add_object(&self, record: &Record) {
        self.store
            .put_object(record)
            .await
            .expect("memory store write");
    }

    pub async fn add_override_user(
        &self,
        username: &str,
        password: &str,
        object_types: impl IntoIterator<Item = ObjectType>,
    ) {
        self.store
            .put_override_user(&User::new(username, password, object_types))
            .await
            .expect("memory store write");
    }

    /// An authenticator over this fixture's store with the given strategies.
    pub fn authenticator(&self, strategies: Vec<Arc<dyn AuthenticationStrategy>>) -> Authenticator {
        Authenticator::new(&self.config, strategies, self.store.clone())
            .expect("fixture configuration is valid")
    }

    /// An authenticator running the reference `mnt-by` and route strategies.
    pub fn standard_authenticator(&self) -> Authenticator {
        let strategies: Vec<Arc<dyn AuthenticationStrategy>> = vec![
            Arc::new(MntByAuthentication::new(self.store.clone())),
            Arc::new(RouteAutnumAuthentication::new(self.store.clone())),
        ];
        self.authenticator(strategies)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
