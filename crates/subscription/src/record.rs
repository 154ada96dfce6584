//! Subscription record as stored by the billing side.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::status::SubscriptionStatus;

/// Read-only view of a user's subscription.
///
/// Every field tolerates absence: a missing status becomes `unknown`, and
/// missing *or malformed* timestamps become `None` so the evaluator's
/// "absent" branches apply instead of a deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    #[serde(default)]
    pub status: SubscriptionStatus,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub current_period_end: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub trial_end: Option<DateTime<Utc>>,

    #[serde(default)]
    pub cancel_at_period_end: bool,
}

impl SubscriptionRecord {
    pub fn new(status: SubscriptionStatus) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn with_period_end(mut self, at: DateTime<Utc>) -> Self {
        self.current_period_end = Some(at);
        self
    }

    pub fn with_trial_end(mut self, at: DateTime<Utc>) -> Self {
        self.trial_end = Some(at);
        self
    }

    pub fn cancel_at_period_end(mut self, flag: bool) -> Self {
        self.cancel_at_period_end = flag;
        self
    }
}

/// Accepts RFC 3339 strings or integer Unix seconds; anything else is `None`.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_timestamp))
}

pub(crate) fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_safe_defaults() {
        let r: SubscriptionRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(r.status, SubscriptionStatus::default());
        assert_eq!(r.current_period_end, None);
        assert_eq!(r.trial_end, None);
        assert!(!r.cancel_at_period_end);
    }

    #[test]
    fn malformed_timestamps_degrade_to_absent() {
        let r: SubscriptionRecord = serde_json::from_str(
            r#"{"status":"active","current_period_end":"next tuesday","trial_end":{"seconds":1}}"#,
        )
        .unwrap();
        assert_eq!(r.status, SubscriptionStatus::Active);
        assert_eq!(r.current_period_end, None);
        assert_eq!(r.trial_end, None);
    }

    #[test]
    fn accepts_rfc3339_and_unix_seconds() {
        let r: SubscriptionRecord = serde_json::from_str(
            r#"{"status":"trialing","current_period_end":"2030-01-02T03:04:05Z","trial_end":1893456000}"#,
        )
        .unwrap();
        assert_eq!(
            r.current_period_end,
            Some(Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap())
        );
        assert_eq!(r.trial_end, Some(Utc.timestamp_opt(1_893_456_000, 0).unwrap()));
    }

    #[test]
    fn null_timestamps_are_absent() {
        let r: SubscriptionRecord =
            serde_json::from_str(r#"{"status":"canceled","current_period_end":null}"#).unwrap();
        assert_eq!(r.current_period_end, None);
    }
}
