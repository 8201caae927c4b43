//! # regauth testkit
//!
//! Testing utilities for the regauth authorization engine.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Stub strategies**: scripted [`AuthenticationStrategy`](regauth::AuthenticationStrategy)
//!   implementations that count their invocations
//! - **Fixtures**: an in-memory registry with maintainers, override users
//!   and a ready-made configuration
//! - **Failing store**: lookups that error on demand, for the store-error paths
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use regauth_testkit::TestFixture;
//!
//! async fn example() {
//!     let fixture = TestFixture::new();
//!     fixture.add_maintainer("OWNER-MNT", "secret").await;
//!     let authenticator = fixture.standard_authenticator();
//! }
//! ```
//!
//! ## Stub Strategies
//!
//! ```rust
//! use std::sync::Arc;
//! use regauth::core::ObjectType;
//! use regauth_testkit::StubStrategy;
//!
//! let stub = Arc::new(
//!     StubStrategy::failing("RouteOwner").with_pending_types(&[ObjectType::Route]),
//! );
//! assert_eq!(stub.calls(), 0);
//! ```

pub mod fixtures;
pub mod generators;
pub mod store;
pub mod stub;

pub use fixtures::{password_auth, TestFixture, TRUSTED_ADDRESS, UNTRUSTED_ADDRESS};
pub use generators::{as_strategies, stubs_from_params, StubParams};
pub use store::FailingStore;
pub use stub::{StubOutcome, StubStrategy};
