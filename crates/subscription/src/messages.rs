use crate::verdict::ReasonCode;

/// User-facing text shown alongside a redirect to plan selection.
pub fn denial_message(reason: &ReasonCode) -> &'static str {
    match reason {
        ReasonCode::NoSubscription => {
            "You need a subscription to use this feature. Start your free 7-day trial!"
        }
        ReasonCode::ActiveButExpired | ReasonCode::PastDueAndExpired => {
            "Your subscription has expired. Renew it to keep using the app."
        }
        ReasonCode::Canceled => "Your subscription was canceled.",
        ReasonCode::NotAuthenticated => "You need to sign in first.",
        ReasonCode::Error => "We could not verify your subscription. Please try again.",
        _ => "You need an active subscription to use the app.",
    }
}
