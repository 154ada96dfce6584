//! Record-side mutations: trial activation, billing updates, cancellation.
//!
//! Every mutation drops the user's cached verdict so the next check sees the
//! new record.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use economia_core::UserId;

use crate::record::SubscriptionRecord;
use crate::source::InMemoryRecordStore;
use crate::status::SubscriptionStatus;
use crate::verifier::AccessVerifier;

/// Length of the free trial granted by [`SubscriptionLifecycle::start_trial`].
pub const TRIAL_DAYS: i64 = 7;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("no subscription found for user {0}")]
    NotFound(UserId),

    #[error("user {0} already has a subscription; trials are for new users only")]
    AlreadySubscribed(UserId),
}

/// Subscription state pushed by the billing platform.
///
/// Replaces the stored record wholesale. A missing status is stored as
/// `unknown`, which denies access until billing sends a real one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubscriptionUpdate {
    #[serde(default)]
    pub status: Option<SubscriptionStatus>,

    #[serde(default, deserialize_with = "crate::record::lenient_timestamp")]
    pub current_period_end: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "crate::record::lenient_timestamp")]
    pub trial_end: Option<DateTime<Utc>>,

    #[serde(default)]
    pub cancel_at_period_end: Option<bool>,
}

impl From<SubscriptionUpdate> for SubscriptionRecord {
    fn from(update: SubscriptionUpdate) -> Self {
        Self {
            status: update.status.unwrap_or_default(),
            current_period_end: update.current_period_end,
            trial_end: update.trial_end,
            cancel_at_period_end: update.cancel_at_period_end.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubscriptionLifecycle {
    store: Arc<InMemoryRecordStore>,
    verifier: Arc<AccessVerifier>,
}

impl SubscriptionLifecycle {
    pub fn new(store: Arc<InMemoryRecordStore>, verifier: Arc<AccessVerifier>) -> Self {
        Self { store, verifier }
    }

    /// Start a free trial ending `TRIAL_DAYS` after `now`.
    ///
    /// Only users without any record qualify; canceled and expired users go
    /// through billing.
    pub fn start_trial(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<SubscriptionRecord, LifecycleError> {
        let trial_end = now + Duration::days(TRIAL_DAYS);
        let record = SubscriptionRecord::new(SubscriptionStatus::Trialing)
            .with_trial_end(trial_end)
            .with_period_end(trial_end);

        if !self.store.insert_if_absent(user.clone(), record.clone()) {
            tracing::warn!(user_id = %user, "trial refused, user already has a subscription");
            return Err(LifecycleError::AlreadySubscribed(user.clone()));
        }
        self.verifier.invalidate(user);
        tracing::info!(user_id = %user, %trial_end, "trial started");
        Ok(record)
    }

    pub fn apply_update(&self, user: &UserId, update: SubscriptionUpdate) -> SubscriptionRecord {
        let record = SubscriptionRecord::from(update);

        self.store.upsert(user.clone(), record.clone());
        self.verifier.invalidate(user);
        tracing::info!(
            user_id = %user,
            status = %record.status,
            cancel_at_period_end = record.cancel_at_period_end,
            "subscription updated"
        );
        record
    }

    pub fn cancel(&self, user: &UserId) -> Result<SubscriptionRecord, LifecycleError> {
        let mut record = self
            .store
            .get(user)
            .ok_or_else(|| LifecycleError::NotFound(user.clone()))?;
        record.status = SubscriptionStatus::Canceled;

        self.store.upsert(user.clone(), record.clone());
        self.verifier.invalidate(user);
        tracing::info!(user_id = %user, "subscription canceled");
        Ok(record)
    }
}
