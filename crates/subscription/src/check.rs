//! Authoritative subscription check, as served to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use economia_core::UserId;

use crate::evaluator::evaluate;
use crate::record::SubscriptionRecord;
use crate::source::{SourceError, SubscriptionSource};
use crate::verdict::ReasonCode;

/// Status reported when the user has no record at all.
pub const NO_SUBSCRIPTION_STATUS: &str = "no_subscription";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub has_access: bool,
    pub status: String,
    #[serde(default)]
    pub current_period_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub trial_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    pub reason: ReasonCode,
}

impl CheckResponse {
    pub fn from_record(record: Option<&SubscriptionRecord>, now: DateTime<Utc>) -> Self {
        let verdict = evaluate(record, now);
        match record {
            Some(r) => Self {
                has_access: verdict.has_access,
                status: r.status.to_string(),
                current_period_end: r.current_period_end,
                trial_end: r.trial_end,
                cancel_at_period_end: r.cancel_at_period_end,
                reason: verdict.reason,
            },
            None => Self {
                has_access: verdict.has_access,
                status: NO_SUBSCRIPTION_STATUS.to_string(),
                current_period_end: None,
                trial_end: None,
                cancel_at_period_end: false,
                reason: verdict.reason,
            },
        }
    }

    /// Record reconstructed from the response; `None` when the user has none.
    pub fn to_record(&self) -> Option<SubscriptionRecord> {
        if self.status == NO_SUBSCRIPTION_STATUS {
            return None;
        }
        Some(SubscriptionRecord {
            status: self.status.clone().into(),
            current_period_end: self.current_period_end,
            trial_end: self.trial_end,
            cancel_at_period_end: self.cancel_at_period_end,
        })
    }
}

/// Read the record straight from `source`, bypassing any cache.
pub async fn check_subscription(
    source: &dyn SubscriptionSource,
    user: &UserId,
    now: DateTime<Utc>,
) -> Result<CheckResponse, SourceError> {
    let record = source.fetch(user).await?;
    let response = CheckResponse::from_record(record.as_ref(), now);
    tracing::info!(
        user_id = %user,
        status = %response.status,
        has_access = response.has_access,
        reason = %response.reason,
        "subscription checked"
    );
    Ok(response)
}
