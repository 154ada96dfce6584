use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Subscription status as reported by the billing platform.
///
/// Unrecognized values are kept verbatim so the evaluator can report them
/// (`unknown_status_<raw>`). An absent status is `Unknown("unknown")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Incomplete,
    Canceled,
    Unknown(Cow<'static, str>),
}

impl SubscriptionStatus {
    pub const UNKNOWN: &'static str = "unknown";

    pub fn parse(raw: &str) -> Self {
        match raw {
            "active" => Self::Active,
            "trialing" => Self::Trialing,
            "past_due" => Self::PastDue,
            "incomplete" => Self::Incomplete,
            "canceled" => Self::Canceled,
            other => Self::Unknown(Cow::Owned(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Trialing => "trialing",
            Self::PastDue => "past_due",
            Self::Incomplete => "incomplete",
            Self::Canceled => "canceled",
            Self::Unknown(raw) => raw,
        }
    }
}

impl Default for SubscriptionStatus {
    fn default() -> Self {
        Self::Unknown(Cow::Borrowed(Self::UNKNOWN))
    }
}

impl core::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SubscriptionStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SubscriptionStatus> for String {
    fn from(value: SubscriptionStatus) -> Self {
        value.as_str().to_string()
    }
}
