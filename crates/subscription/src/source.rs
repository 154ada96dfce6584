//! Where subscription records come from.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use economia_core::UserId;

use crate::evaluator::evaluate;
use crate::record::SubscriptionRecord;
use crate::verdict::AccessVerdict;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("subscription source unavailable: {0}")]
    Unavailable(String),

    #[error("subscription source returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("not authorized to read subscription")]
    Unauthorized,
}

/// Read access to the subscription record of a user.
///
/// `Ok(None)` means "no record"; errors mean the record could not be
/// obtained and callers must fail closed.
#[async_trait]
pub trait SubscriptionSource: Send + Sync {
    async fn fetch(&self, user: &UserId) -> Result<Option<SubscriptionRecord>, SourceError>;

    /// Access verdict for `user` at `now`.
    ///
    /// Local sources evaluate the fetched record. Sources that front an
    /// authoritative service return that service's verdict instead, so the
    /// caller's clock never decides.
    async fn verdict(&self, user: &UserId, now: DateTime<Utc>) -> Result<AccessVerdict, SourceError> {
        let record = self.fetch(user).await?;
        Ok(evaluate(record.as_ref(), now))
    }
}

#[async_trait]
impl<S> SubscriptionSource for Arc<S>
where
    S: SubscriptionSource + ?Sized,
{
    async fn fetch(&self, user: &UserId) -> Result<Option<SubscriptionRecord>, SourceError> {
        (**self).fetch(user).await
    }

    async fn verdict(&self, user: &UserId, now: DateTime<Utc>) -> Result<AccessVerdict, SourceError> {
        (**self).verdict(user, now).await
    }
}

/// In-memory authoritative record store for the server and tests.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    inner: RwLock<HashMap<UserId, SubscriptionRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user: &UserId) -> Option<SubscriptionRecord> {
        let map = self.inner.read().unwrap_or_else(|p| p.into_inner());
        map.get(user).cloned()
    }

    pub fn upsert(&self, user: UserId, record: SubscriptionRecord) {
        let mut map = self.inner.write().unwrap_or_else(|p| p.into_inner());
        map.insert(user, record);
    }

    /// Store `record` only if `user` has none yet. Returns whether it was stored.
    pub fn insert_if_absent(&self, user: UserId, record: SubscriptionRecord) -> bool {
        let mut map = self.inner.write().unwrap_or_else(|p| p.into_inner());
        match map.entry(user) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    pub fn remove(&self, user: &UserId) -> Option<SubscriptionRecord> {
        let mut map = self.inner.write().unwrap_or_else(|p| p.into_inner());
        map.remove(user)
    }
}

#[async_trait]
impl SubscriptionSource for InMemoryRecordStore {
    async fn fetch(&self, user: &UserId) -> Result<Option<SubscriptionRecord>, SourceError> {
        Ok(self.get(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::SubscriptionStatus;

    #[tokio::test]
    async fn fetch_returns_none_for_unknown_user() {
        let store = InMemoryRecordStore::new();
        let user = UserId::parse("nobody").unwrap();
        assert!(store.fetch(&user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_overwrites_previous_record() {
        let store = Arc::new(InMemoryRecordStore::new());
        let user = UserId::parse("u1").unwrap();

        store.upsert(user.clone(), SubscriptionRecord::new(SubscriptionStatus::Trialing));
        store.upsert(user.clone(), SubscriptionRecord::new(SubscriptionStatus::Active));

        let fetched = store.fetch(&user).await.unwrap().unwrap();
        assert_eq!(fetched.status, SubscriptionStatus::Active);

        assert!(!store.insert_if_absent(user.clone(), SubscriptionRecord::new(SubscriptionStatus::Trialing)));
        assert_eq!(store.get(&user).unwrap().status, SubscriptionStatus::Active);

        assert!(store.remove(&user).is_some());
        assert!(store.get(&user).is_none());
    }
}
