use std::time::Duration as StdDuration;

use chrono::Duration;

use crate::cache::default_ttl;

/// Timing knobs shared by the verifier and the page guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Delay between identity polls.
    pub poll_interval: StdDuration,
    /// Identity polls before giving up; the first one is immediate.
    pub max_identity_attempts: u32,
    pub cache_ttl: Duration,
    /// Upper bound on a single record fetch.
    pub remote_timeout: StdDuration,
}

impl GuardConfig {
    pub const DEFAULT_POLL_INTERVAL: StdDuration = StdDuration::from_millis(200);
    pub const DEFAULT_MAX_IDENTITY_ATTEMPTS: u32 = 15;
    pub const DEFAULT_REMOTE_TIMEOUT: StdDuration = StdDuration::from_secs(10);

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_remote_timeout(mut self, timeout: StdDuration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    /// Longest time the guard may spend waiting for an identity.
    pub fn identity_wait_budget(&self) -> StdDuration {
        self.poll_interval * self.max_identity_attempts.saturating_sub(1)
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            max_identity_attempts: Self::DEFAULT_MAX_IDENTITY_ATTEMPTS,
            cache_ttl: default_ttl(),
            remote_timeout: Self::DEFAULT_REMOTE_TIMEOUT,
        }
    }
}
