//! Per-user verdict cache with a fixed TTL.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};

use economia_core::{Clock, SystemClock, UserId};

use crate::verdict::AccessVerdict;

/// Default time-to-live of a cached verdict, in seconds.
pub const DEFAULT_TTL_SECS: i64 = 5 * 60;

pub fn default_ttl() -> Duration {
    Duration::seconds(DEFAULT_TTL_SECS)
}

#[derive(Debug, Clone)]
struct CacheEntry {
    verdict: AccessVerdict,
    expires_at: DateTime<Utc>,
}

/// Verdict cache keyed by user id.
///
/// Entries are served only while `now < expires_at`. Keying per user keeps a
/// multi-user server from handing one user's verdict to another.
#[derive(Debug)]
pub struct AccessCache {
    entries: RwLock<HashMap<UserId, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl AccessCache {
    pub fn new() -> Self {
        Self::with_clock(default_ttl(), Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, user: &UserId) -> Option<AccessVerdict> {
        let now = self.clock.now();
        let entries = read(&self.entries);
        match entries.get(user) {
            Some(entry) if now < entry.expires_at => Some(entry.verdict.clone()),
            _ => None,
        }
    }

    pub fn put(&self, user: UserId, verdict: AccessVerdict) {
        let now = self.clock.now();
        let expires_at = now + self.ttl;
        let mut entries = write(&self.entries);
        // Sweep so abandoned users do not accumulate.
        entries.retain(|_, e| now < e.expires_at);
        entries.insert(user, CacheEntry { verdict, expires_at });
    }

    pub fn invalidate(&self, user: &UserId) {
        if write(&self.entries).remove(user).is_some() {
            tracing::debug!(user_id = %user, "access cache entry invalidated");
        }
    }

    pub fn invalidate_all(&self) {
        let mut entries = write(&self.entries);
        let dropped = entries.len();
        entries.clear();
        tracing::debug!(dropped, "access cache cleared");
    }

    pub fn len(&self) -> usize {
        read(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AccessCache {
    fn default() -> Self {
        Self::new()
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned: PoisonError<RwLockReadGuard<'_, T>>| {
        tracing::warn!("access cache lock poisoned on read, recovering");
        poisoned.into_inner()
    })
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned: PoisonError<RwLockWriteGuard<'_, T>>| {
        tracing::warn!("access cache lock poisoned on write, recovering");
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::ReasonCode;
    use economia_core::ManualClock;

    fn user(id: &str) -> UserId {
        UserId::parse(id).unwrap()
    }

    fn cache() -> (AccessCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        (AccessCache::with_clock(default_ttl(), clock.clone()), clock)
    }

    #[test]
    fn put_then_get_within_ttl_returns_same_verdict() {
        let (cache, clock) = cache();
        let v = AccessVerdict::grant(ReasonCode::ActiveAndValid);
        cache.put(user("a"), v.clone());

        clock.advance(Duration::minutes(4));
        assert_eq!(cache.get(&user("a")), Some(v));
    }

    #[test]
    fn entry_expires_exactly_at_ttl() {
        let (cache, clock) = cache();
        cache.put(user("a"), AccessVerdict::deny(ReasonCode::Canceled));

        clock.advance(default_ttl() - Duration::milliseconds(1));
        assert!(cache.get(&user("a")).is_some());

        clock.advance(Duration::milliseconds(1));
        assert_eq!(cache.get(&user("a")), None);
    }

    #[test]
    fn entries_are_isolated_per_user() {
        let (cache, _clock) = cache();
        cache.put(user("a"), AccessVerdict::grant(ReasonCode::ActiveAndValid));
        assert_eq!(cache.get(&user("b")), None);
    }

    #[test]
    fn invalidate_only_drops_that_user() {
        let (cache, _clock) = cache();
        cache.put(user("a"), AccessVerdict::grant(ReasonCode::ActiveAndValid));
        cache.put(user("b"), AccessVerdict::grant(ReasonCode::TrialingAndValid));

        cache.invalidate(&user("a"));
        assert_eq!(cache.get(&user("a")), None);
        assert!(cache.get(&user("b")).is_some());
    }

    #[test]
    fn invalidate_all_forces_misses() {
        let (cache, _clock) = cache();
        cache.put(user("a"), AccessVerdict::grant(ReasonCode::ActiveAndValid));
        cache.put(user("b"), AccessVerdict::deny(ReasonCode::NoSubscription));

        cache.invalidate_all();
        assert_eq!(cache.get(&user("a")), None);
        assert_eq!(cache.get(&user("b")), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn expired_entries_are_swept_on_put() {
        let (cache, clock) = cache();
        cache.put(user("old"), AccessVerdict::grant(ReasonCode::ActiveAndValid));
        clock.advance(default_ttl() + Duration::seconds(1));

        cache.put(user("new"), AccessVerdict::grant(ReasonCode::ActiveAndValid));
        assert_eq!(cache.len(), 1);
    }
}
