//! Cache-aware access verification.
//!
//! `AccessVerifier` is the one path from a user id to a verdict: cache hit,
//! otherwise ask the source for a verdict (bounded by a timeout) and cache
//! the result. Both the page guard and the HTTP subscription gate go through
//! it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use tokio::sync::{Mutex as AsyncMutex, watch};
use tokio::task::JoinHandle;

use economia_auth::Identity;
use economia_core::{Clock, SystemClock, UserId};

use crate::cache::AccessCache;
use crate::config::GuardConfig;
use crate::source::{SourceError, SubscriptionSource};
use crate::verdict::{AccessVerdict, ReasonCode};

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("subscription lookup timed out after {0:?}")]
    Timeout(StdDuration),
}

pub struct AccessVerifier {
    source: Arc<dyn SubscriptionSource>,
    cache: AccessCache,
    clock: Arc<dyn Clock>,
    remote_timeout: StdDuration,
    in_flight: Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
}

impl std::fmt::Debug for AccessVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessVerifier")
            .field("cache", &self.cache)
            .field("remote_timeout", &self.remote_timeout)
            .finish_non_exhaustive()
    }
}

impl AccessVerifier {
    pub fn new(source: Arc<dyn SubscriptionSource>) -> Self {
        Self::with_config(source, &GuardConfig::default(), Arc::new(SystemClock))
    }

    pub fn with_config(
        source: Arc<dyn SubscriptionSource>,
        config: &GuardConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            cache: AccessCache::with_clock(config.cache_ttl, clock.clone()),
            clock,
            remote_timeout: config.remote_timeout,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn cache(&self) -> &AccessCache {
        &self.cache
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Verdict for `user`, from cache when fresh.
    ///
    /// At most one fetch per user is in flight; concurrent callers wait for it
    /// and then read the verdict it cached. Failures are not cached.
    pub async fn verify(&self, user: &UserId) -> Result<AccessVerdict, VerifyError> {
        if let Some(verdict) = self.cache.get(user) {
            tracing::debug!(user_id = %user, reason = %verdict.reason, "access cache hit");
            return Ok(verdict);
        }

        let slot = self.slot_for(user);
        let _turn = slot.gate.lock().await;
        match self.cache.get(user) {
            Some(verdict) => Ok(verdict),
            None => self.fetch_verdict(user).await,
        }
    }

    /// Like [`verify`](Self::verify), but a failed lookup becomes a denial
    /// with reason `error`.
    pub async fn verify_or_deny(&self, user: &UserId) -> AccessVerdict {
        match self.verify(user).await {
            Ok(verdict) => verdict,
            Err(err) => {
                tracing::error!(user_id = %user, error = %err, "access verification failed");
                AccessVerdict::deny(ReasonCode::Error)
            }
        }
    }

    pub fn invalidate(&self, user: &UserId) {
        self.cache.invalidate(user);
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    async fn fetch_verdict(&self, user: &UserId) -> Result<AccessVerdict, VerifyError> {
        let now = self.clock.now();
        let verdict = tokio::time::timeout(self.remote_timeout, self.source.verdict(user, now))
            .await
            .map_err(|_| VerifyError::Timeout(self.remote_timeout))??;

        if verdict.has_access {
            tracing::debug!(user_id = %user, reason = %verdict.reason, "access granted");
        } else {
            tracing::warn!(user_id = %user, reason = %verdict.reason, "access denied");
        }
        self.cache.put(user.clone(), verdict.clone());
        Ok(verdict)
    }

    fn slot_for<'a>(&'a self, user: &'a UserId) -> InFlightSlot<'a> {
        let mut gates = self.in_flight.lock().unwrap_or_else(|p| p.into_inner());
        let gate = gates.entry(user.clone()).or_default().clone();
        InFlightSlot {
            gates: &self.in_flight,
            user,
            gate,
        }
    }
}

/// A caller's claim on a user's gate; released on drop, including when the
/// `verify` future is cancelled mid-wait.
struct InFlightSlot<'a> {
    gates: &'a Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
    user: &'a UserId,
    gate: Arc<AsyncMutex<()>>,
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        let mut gates = self.gates.lock().unwrap_or_else(|p| p.into_inner());
        // Map plus this handle: nobody else is waiting.
        let idle = Arc::strong_count(&self.gate) <= 2;
        let ours = gates
            .get(self.user)
            .is_some_and(|g| Arc::ptr_eq(g, &self.gate));
        if idle && ours {
            gates.remove(self.user);
        }
    }
}

/// Drop the cached verdict of every user who signs in.
///
/// A fresh session must never be served a verdict computed for an earlier
/// one. The task ends when the identity provider is dropped.
pub fn spawn_sign_in_invalidation(
    verifier: Arc<AccessVerifier>,
    mut identities: watch::Receiver<Option<Identity>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while identities.changed().await.is_ok() {
            let signed_in = identities.borrow_and_update().clone();
            if let Some(identity) = signed_in {
                tracing::info!(user_id = %identity.user_id, "sign-in observed, clearing cached verdict");
                verifier.invalidate(&identity.user_id);
            }
        }
    })
}
