//! Access rule table.
//!
//! This is the single implementation used both by the authoritative server
//! check and by client-side mirrors; do not fork it.
//!
//! Rules are evaluated in order, first match wins:
//!
//! | status       | condition                     | access | reason                         |
//! |--------------|-------------------------------|--------|--------------------------------|
//! | (no record)  |                               | deny   | `no_subscription`              |
//! | `active`     | period end > now              | grant  | `active_and_valid`             |
//! | `active`     | no period end                 | grant  | `active_no_period_end`         |
//! | `active`     | period end <= now             | deny   | `active_but_expired`           |
//! | `trialing`   | trial end > now               | grant  | `trialing_and_valid`           |
//! | `trialing`   | no trial end                  | grant  | `trialing_no_end_date`         |
//! | `trialing`   | trial end <= now              | grant  | `trialing_but_waiting_charge`  |
//! | `past_due`   | period end > now              | grant  | `past_due_but_period_valid`    |
//! | `past_due`   | otherwise                     | deny   | `past_due_and_expired`         |
//! | `incomplete` |                               | deny   | `incomplete_subscription`      |
//! | `canceled`   |                               | deny   | `canceled`                     |
//! | other        |                               | deny   | `unknown_status_<status>`      |
//!
//! An expired trial still grants access: the billing platform may not have
//! moved the subscription out of `trialing` yet. Every other ambiguous state
//! denies.

use chrono::{DateTime, Utc};

use crate::record::SubscriptionRecord;
use crate::status::SubscriptionStatus;
use crate::verdict::{AccessVerdict, ReasonCode};

/// Map a subscription record (or its absence) to an access verdict at `now`.
///
/// - No IO
/// - No panics
pub fn evaluate(record: Option<&SubscriptionRecord>, now: DateTime<Utc>) -> AccessVerdict {
    let Some(record) = record else {
        return AccessVerdict::deny(ReasonCode::NoSubscription);
    };

    match &record.status {
        SubscriptionStatus::Active => match record.current_period_end {
            Some(end) if end > now => AccessVerdict::grant(ReasonCode::ActiveAndValid),
            None => AccessVerdict::grant(ReasonCode::ActiveNoPeriodEnd),
            Some(_) => AccessVerdict::deny(ReasonCode::ActiveButExpired),
        },
        SubscriptionStatus::Trialing => match record.trial_end {
            Some(end) if end > now => AccessVerdict::grant(ReasonCode::TrialingAndValid),
            None => AccessVerdict::grant(ReasonCode::TrialingNoEndDate),
            Some(_) => AccessVerdict::grant(ReasonCode::TrialingButWaitingCharge),
        },
        SubscriptionStatus::PastDue => match record.current_period_end {
            Some(end) if end > now => AccessVerdict::grant(ReasonCode::PastDueButPeriodValid),
            _ => AccessVerdict::deny(ReasonCode::PastDueAndExpired),
        },
        SubscriptionStatus::Incomplete => AccessVerdict::deny(ReasonCode::IncompleteSubscription),
        SubscriptionStatus::Canceled => AccessVerdict::deny(ReasonCode::Canceled),
        SubscriptionStatus::Unknown(raw) => {
            AccessVerdict::deny(ReasonCode::UnknownStatus(raw.to_string()))
        }
    }
}
