use serde::{Deserialize, Serialize};

/// Why access was granted or denied.
///
/// Serialized as the flat snake_case code (`active_and_valid`,
/// `unknown_status_paused`, ...), which is what clients switch on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReasonCode {
    NoSubscription,
    ActiveAndValid,
    ActiveNoPeriodEnd,
    ActiveButExpired,
    TrialingAndValid,
    TrialingNoEndDate,
    TrialingButWaitingCharge,
    PastDueButPeriodValid,
    PastDueAndExpired,
    IncompleteSubscription,
    Canceled,
    /// Carries the raw status string.
    UnknownStatus(String),
    /// No identity was resolved (page guard only).
    NotAuthenticated,
    /// The record could not be fetched (fail-closed).
    Error,
}

const UNKNOWN_STATUS_PREFIX: &str = "unknown_status_";

impl ReasonCode {
    pub fn code(&self) -> String {
        self.to_string()
    }

    fn static_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::NoSubscription => "no_subscription",
            Self::ActiveAndValid => "active_and_valid",
            Self::ActiveNoPeriodEnd => "active_no_period_end",
            Self::ActiveButExpired => "active_but_expired",
            Self::TrialingAndValid => "trialing_and_valid",
            Self::TrialingNoEndDate => "trialing_no_end_date",
            Self::TrialingButWaitingCharge => "trialing_but_waiting_charge",
            Self::PastDueButPeriodValid => "past_due_but_period_valid",
            Self::PastDueAndExpired => "past_due_and_expired",
            Self::IncompleteSubscription => "incomplete_subscription",
            Self::Canceled => "canceled",
            Self::NotAuthenticated => "not_authenticated",
            Self::Error => "error",
            Self::UnknownStatus(_) => return None,
        })
    }

    pub fn parse(code: &str) -> Self {
        match code {
            "no_subscription" => Self::NoSubscription,
            "active_and_valid" => Self::ActiveAndValid,
            "active_no_period_end" => Self::ActiveNoPeriodEnd,
            "active_but_expired" => Self::ActiveButExpired,
            "trialing_and_valid" => Self::TrialingAndValid,
            "trialing_no_end_date" => Self::TrialingNoEndDate,
            "trialing_but_waiting_charge" => Self::TrialingButWaitingCharge,
            "past_due_but_period_valid" => Self::PastDueButPeriodValid,
            "past_due_and_expired" => Self::PastDueAndExpired,
            "incomplete_subscription" => Self::IncompleteSubscription,
            "canceled" => Self::Canceled,
            "not_authenticated" => Self::NotAuthenticated,
            other => match other.strip_prefix(UNKNOWN_STATUS_PREFIX) {
                Some(raw) => Self::UnknownStatus(raw.to_string()),
                // Codes this build does not know are treated like fetch errors.
                None => Self::Error,
            },
        }
    }
}

impl core::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownStatus(raw) => write!(f, "{UNKNOWN_STATUS_PREFIX}{raw}"),
            other => f.write_str(other.static_code().unwrap_or_default()),
        }
    }
}

impl From<String> for ReasonCode {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ReasonCode> for String {
    fn from(value: ReasonCode) -> Self {
        value.code()
    }
}

/// Access decision for one user at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessVerdict {
    pub has_access: bool,
    pub reason: ReasonCode,
}

impl AccessVerdict {
    pub fn grant(reason: ReasonCode) -> Self {
        Self {
            has_access: true,
            reason,
        }
    }

    pub fn deny(reason: ReasonCode) -> Self {
        Self {
            has_access: false,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_strings() {
        for reason in [
            ReasonCode::NoSubscription,
            ReasonCode::TrialingButWaitingCharge,
            ReasonCode::PastDueAndExpired,
            ReasonCode::UnknownStatus("foo".to_string()),
            ReasonCode::NotAuthenticated,
            ReasonCode::Error,
        ] {
            assert_eq!(ReasonCode::parse(&reason.code()), reason);
        }
    }

    #[test]
    fn unknown_status_code_embeds_raw_status() {
        let r = ReasonCode::UnknownStatus("foo".to_string());
        assert_eq!(r.to_string(), "unknown_status_foo");
        assert_eq!(serde_json::to_string(&r).unwrap(), r#""unknown_status_foo""#);
    }

    #[test]
    fn unrecognized_codes_fail_closed() {
        assert_eq!(ReasonCode::parse("brand_new_reason"), ReasonCode::Error);
    }
}
