use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use economia_core::{EntryId, UserId};

use crate::entry::Entry;

/// Per-user entry storage.
pub trait EntryStore: Send + Sync {
    fn get(&self, user: &UserId, id: EntryId) -> Option<Entry>;
    fn upsert(&self, user: &UserId, entry: Entry);
    fn remove(&self, user: &UserId, id: EntryId) -> Option<Entry>;
    /// All entries of `user`, oldest date first.
    fn list(&self, user: &UserId) -> Vec<Entry>;
}

impl<S> EntryStore for Arc<S>
where
    S: EntryStore + ?Sized,
{
    fn get(&self, user: &UserId, id: EntryId) -> Option<Entry> {
        (**self).get(user, id)
    }

    fn upsert(&self, user: &UserId, entry: Entry) {
        (**self).upsert(user, entry)
    }

    fn remove(&self, user: &UserId, id: EntryId) -> Option<Entry> {
        (**self).remove(user, id)
    }

    fn list(&self, user: &UserId) -> Vec<Entry> {
        (**self).list(user)
    }
}

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryEntryStore {
    inner: RwLock<HashMap<UserId, HashMap<EntryId, Entry>>>,
}

impl InMemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntryStore for InMemoryEntryStore {
    fn get(&self, user: &UserId, id: EntryId) -> Option<Entry> {
        let map = self.inner.read().unwrap_or_else(|p| p.into_inner());
        map.get(user)?.get(&id).cloned()
    }

    fn upsert(&self, user: &UserId, entry: Entry) {
        let mut map = self.inner.write().unwrap_or_else(|p| p.into_inner());
        map.entry(user.clone()).or_default().insert(entry.id, entry);
    }

    fn remove(&self, user: &UserId, id: EntryId) -> Option<Entry> {
        let mut map = self.inner.write().unwrap_or_else(|p| p.into_inner());
        map.get_mut(user)?.remove(&id)
    }

    fn list(&self, user: &UserId) -> Vec<Entry> {
        let map = self.inner.read().unwrap_or_else(|p| p.into_inner());
        let mut out: Vec<Entry> = map
            .get(user)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default();
        // Ids are time-ordered, so this keeps insertion order within a day.
        out.sort_by_key(|e| (e.date, *e.id.as_uuid()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;
    use crate::money::Money;
    use chrono::NaiveDate;

    fn entry(day: u32) -> Entry {
        Entry {
            id: EntryId::new(),
            kind: EntryKind::Income,
            name: "Salary".to_string(),
            amount: Money::from_cents(100),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
        }
    }

    #[test]
    fn users_are_isolated() {
        let store = InMemoryEntryStore::new();
        let alice = UserId::parse("alice").unwrap();
        let bob = UserId::parse("bob").unwrap();
        let e = entry(1);

        store.upsert(&alice, e.clone());

        assert_eq!(store.get(&alice, e.id), Some(e.clone()));
        assert_eq!(store.get(&bob, e.id), None);
        assert!(store.list(&bob).is_empty());
        assert_eq!(store.remove(&bob, e.id), None);
    }

    #[test]
    fn list_is_sorted_by_date() {
        let store = InMemoryEntryStore::new();
        let u = UserId::parse("u").unwrap();
        for day in [20, 3, 11] {
            store.upsert(&u, entry(day));
        }
        let days: Vec<u32> = store
            .list(&u)
            .iter()
            .map(|e| chrono::Datelike::day(&e.date))
            .collect();
        assert_eq!(days, vec![3, 11, 20]);
    }
}
