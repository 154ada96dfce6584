//! Page guard: wait for an identity, then decide whether the page may render.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use economia_auth::{Identity, IdentityProvider};

use crate::config::GuardConfig;
use crate::messages::denial_message;
use crate::verdict::{AccessVerdict, ReasonCode};
use crate::verifier::AccessVerifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardState {
    AwaitingIdentity,
    Evaluating,
    Granted,
    Denied,
}

impl GuardState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Granted | Self::Denied)
    }
}

/// Where a denied visitor is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum Redirect {
    SignIn,
    PlanSelection {
        reason: ReasonCode,
        message: &'static str,
    },
}

impl Redirect {
    pub fn plan_selection(reason: ReasonCode) -> Self {
        let message = denial_message(&reason);
        Self::PlanSelection { reason, message }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Granted {
        identity: Identity,
        verdict: AccessVerdict,
    },
    Denied {
        reason: ReasonCode,
        redirect: Redirect,
    },
}

impl GuardOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }

    pub fn state(&self) -> GuardState {
        match self {
            Self::Granted { .. } => GuardState::Granted,
            Self::Denied { .. } => GuardState::Denied,
        }
    }

    fn denied(reason: ReasonCode, redirect: Redirect) -> Self {
        Self::Denied { reason, redirect }
    }
}

/// One-shot access check for a protected page.
///
/// Each call to [`run`](Self::run) is independent and ends in `Granted` or
/// `Denied`; call it again on the next page load. Dropping the future
/// abandons the check.
pub struct PageGuard<P> {
    identity: P,
    verifier: Arc<AccessVerifier>,
    config: GuardConfig,
    state: watch::Sender<GuardState>,
}

impl<P> PageGuard<P>
where
    P: IdentityProvider,
{
    pub fn new(identity: P, verifier: Arc<AccessVerifier>) -> Self {
        Self::with_config(identity, verifier, GuardConfig::default())
    }

    pub fn with_config(identity: P, verifier: Arc<AccessVerifier>, config: GuardConfig) -> Self {
        let (state, _rx) = watch::channel(GuardState::AwaitingIdentity);
        Self {
            identity,
            verifier,
            config,
            state,
        }
    }

    pub fn state(&self) -> GuardState {
        *self.state.borrow()
    }

    /// Observe state transitions of the guard.
    pub fn subscribe(&self) -> watch::Receiver<GuardState> {
        self.state.subscribe()
    }

    pub async fn run(&self) -> GuardOutcome {
        self.transition(GuardState::AwaitingIdentity);

        let Some(identity) = self.await_identity().await else {
            tracing::warn!(
                attempts = self.config.max_identity_attempts,
                "no identity resolved, redirecting to sign-in"
            );
            self.transition(GuardState::Denied);
            return GuardOutcome::denied(ReasonCode::NotAuthenticated, Redirect::SignIn);
        };

        self.transition(GuardState::Evaluating);
        let verdict = self.verifier.verify_or_deny(&identity.user_id).await;

        if verdict.has_access {
            tracing::info!(user_id = %identity.user_id, reason = %verdict.reason, "page access granted");
            self.transition(GuardState::Granted);
            return GuardOutcome::Granted { identity, verdict };
        }

        tracing::warn!(
            user_id = %identity.user_id,
            reason = %verdict.reason,
            "page access denied, redirecting to plan selection"
        );
        self.transition(GuardState::Denied);
        let reason = verdict.reason;
        GuardOutcome::denied(reason.clone(), Redirect::plan_selection(reason))
    }

    async fn await_identity(&self) -> Option<Identity> {
        let attempts = self.config.max_identity_attempts.max(1);
        for attempt in 1..=attempts {
            if let Some(identity) = self.identity.current() {
                tracing::debug!(attempt, user_id = %identity.user_id, "identity available");
                return Some(identity);
            }
            tracing::debug!(attempt, attempts, "identity not yet available");
            if attempt < attempts {
                tokio::time::sleep(self.config.poll_interval).await;
            }
        }
        None
    }

    fn transition(&self, next: GuardState) {
        self.state.send_replace(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration as StdDuration;

    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use economia_auth::WatchIdentityProvider;
    use economia_core::{ManualClock, UserId};

    use crate::record::SubscriptionRecord;
    use crate::source::{InMemoryRecordStore, SourceError, SubscriptionSource};
    use crate::status::SubscriptionStatus;

    fn uid(id: &str) -> UserId {
        UserId::parse(id).unwrap()
    }

    /// Identity provider that counts how often it was asked.
    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
        appears_on: Option<usize>,
    }

    impl IdentityProvider for CountingProvider {
        fn current(&self) -> Option<Identity> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            match self.appears_on {
                Some(k) if n >= k => Some(Identity::new(uid("late"))),
                _ => None,
            }
        }
    }

    struct FailingSource;

    #[async_trait]
    impl SubscriptionSource for FailingSource {
        async fn fetch(&self, _user: &UserId) -> Result<Option<SubscriptionRecord>, SourceError> {
            Err(SourceError::Unavailable("offline".into()))
        }
    }

    fn verifier_over(source: Arc<dyn SubscriptionSource>) -> Arc<AccessVerifier> {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        Arc::new(AccessVerifier::with_config(source, &GuardConfig::default(), clock))
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_fifteen_polls_and_redirects_to_sign_in() {
        let provider = Arc::new(CountingProvider::default());
        let guard = PageGuard::new(provider.clone(), verifier_over(Arc::new(InMemoryRecordStore::new())));

        let started = tokio::time::Instant::now();
        let outcome = guard.run().await;

        assert_eq!(
            outcome,
            GuardOutcome::Denied {
                reason: ReasonCode::NotAuthenticated,
                redirect: Redirect::SignIn,
            }
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 15);
        let waited = started.elapsed();
        assert!(waited >= StdDuration::from_millis(2_800) && waited < StdDuration::from_secs(3));
        assert_eq!(guard.state(), GuardState::Denied);
    }

    #[tokio::test(start_paused = true)]
    async fn late_identity_is_picked_up_on_a_later_poll() {
        let store = Arc::new(InMemoryRecordStore::new());
        store.upsert(
            uid("late"),
            SubscriptionRecord::new(SubscriptionStatus::Trialing).with_trial_end(Utc::now() + Duration::days(3)),
        );
        let provider = Arc::new(CountingProvider {
            appears_on: Some(4),
            ..Default::default()
        });
        let guard = PageGuard::new(provider.clone(), verifier_over(store));

        let outcome = guard.run().await;

        assert!(outcome.is_granted());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn identity_signed_in_while_waiting_is_seen() {
        let provider = Arc::new(WatchIdentityProvider::new());
        let store = Arc::new(InMemoryRecordStore::new());
        store.upsert(uid("u1"), SubscriptionRecord::new(SubscriptionStatus::Active));
        let guard = PageGuard::new(provider.clone(), verifier_over(store));

        let signer = {
            let provider = provider.clone();
            tokio::spawn(async move {
                tokio::time::sleep(StdDuration::from_millis(650)).await;
                provider.sign_in(Identity::new(UserId::parse("u1").unwrap()));
            })
        };

        let outcome = guard.run().await;
        signer.await.unwrap();

        match outcome {
            GuardOutcome::Granted { identity, verdict } => {
                assert_eq!(identity.user_id.as_str(), "u1");
                assert_eq!(verdict.reason, ReasonCode::ActiveNoPeriodEnd);
            }
            other => panic!("expected grant, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_record_redirects_to_plan_selection_with_trial_message() {
        let provider = WatchIdentityProvider::signed_in(Identity::new(uid("u1")));
        let guard = PageGuard::new(provider, verifier_over(Arc::new(InMemoryRecordStore::new())));

        let outcome = guard.run().await;

        assert_eq!(
            outcome,
            GuardOutcome::Denied {
                reason: ReasonCode::NoSubscription,
                redirect: Redirect::plan_selection(ReasonCode::NoSubscription),
            }
        );
    }

    #[tokio::test]
    async fn source_failure_fails_closed_with_retry_message() {
        let provider = WatchIdentityProvider::signed_in(Identity::new(uid("u1")));
        let guard = PageGuard::new(provider, verifier_over(Arc::new(FailingSource)));

        let outcome = guard.run().await;

        let GuardOutcome::Denied { reason, redirect } = outcome else {
            panic!("expected denial");
        };
        assert_eq!(reason, ReasonCode::Error);
        assert_eq!(
            redirect,
            Redirect::PlanSelection {
                reason: ReasonCode::Error,
                message: "We could not verify your subscription. Please try again.",
            }
        );
    }

    #[tokio::test]
    async fn canceled_subscription_is_denied() {
        let store = Arc::new(InMemoryRecordStore::new());
        store.upsert(uid("u1"), SubscriptionRecord::new(SubscriptionStatus::Canceled));
        let provider = WatchIdentityProvider::signed_in(Identity::new(uid("u1")));
        let guard = PageGuard::new(provider, verifier_over(store));

        let outcome = guard.run().await;

        assert_eq!(outcome.state(), GuardState::Denied);
        assert!(matches!(
            outcome,
            GuardOutcome::Denied { reason: ReasonCode::Canceled, .. }
        ));
    }

    #[tokio::test]
    async fn transitions_are_observable() {
        let provider = WatchIdentityProvider::signed_in(Identity::new(uid("u1")));
        let store = Arc::new(InMemoryRecordStore::new());
        store.upsert(uid("u1"), SubscriptionRecord::new(SubscriptionStatus::Active));
        let guard = PageGuard::new(provider, verifier_over(store));
        let rx = guard.subscribe();

        assert_eq!(guard.state(), GuardState::AwaitingIdentity);
        guard.run().await;

        assert_eq!(*rx.borrow(), GuardState::Granted);
        assert!(guard.state().is_terminal());
    }
}
