//! Subscription access for economia.
//!
//! - `evaluate`: the rule table mapping a record to a verdict
//! - `AccessCache` / `AccessVerifier`: cached, single-flight verification
//! - `PageGuard`: identity wait plus verification for protected pages
//! - `SubscriptionLifecycle`, `check_subscription`: record-side operations

pub mod cache;
pub mod check;
pub mod config;
pub mod evaluator;
pub mod guard;
#[cfg(feature = "remote")]
pub mod http_source;
pub mod lifecycle;
pub mod messages;
pub mod record;
pub mod source;
pub mod status;
pub mod verdict;
pub mod verifier;

pub use cache::AccessCache;
pub use check::{CheckResponse, NO_SUBSCRIPTION_STATUS, check_subscription};
pub use config::GuardConfig;
pub use evaluator::evaluate;
pub use guard::{GuardOutcome, GuardState, PageGuard, Redirect};
#[cfg(feature = "remote")]
pub use http_source::HttpSubscriptionSource;
pub use lifecycle::{LifecycleError, SubscriptionLifecycle, SubscriptionUpdate, TRIAL_DAYS};
pub use messages::denial_message;
pub use record::SubscriptionRecord;
pub use source::{InMemoryRecordStore, SourceError, SubscriptionSource};
pub use status::SubscriptionStatus;
pub use verdict::{AccessVerdict, ReasonCode};
pub use verifier::{AccessVerifier, VerifyError, spawn_sign_in_invalidation};
