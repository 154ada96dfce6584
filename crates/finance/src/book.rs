//! Per-user income and expense book.

use std::sync::Arc;

use chrono::NaiveDate;

use economia_core::{Clock, DomainError, EntryId, SystemClock, UserId};

use crate::entry::{Entry, EntryEdit, EntryKind, NewEntry, validate_amount, validate_name};
use crate::store::EntryStore;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FinanceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("entry {0} not found")]
    EntryNotFound(EntryId),
}

/// Validating front of an [`EntryStore`].
#[derive(Debug)]
pub struct FinanceBook<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S> FinanceBook<S>
where
    S: EntryStore,
{
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    pub fn add(&self, user: &UserId, input: NewEntry) -> Result<Entry, FinanceError> {
        let entry = Entry {
            id: EntryId::new(),
            kind: input.kind,
            name: validate_name(&input.name)?,
            amount: validate_amount(input.amount)?,
            date: input.date.unwrap_or_else(|| self.today()),
        };
        self.store.upsert(user, entry.clone());
        tracing::info!(
            user_id = %user,
            entry_id = %entry.id,
            kind = entry.kind.as_str(),
            "entry added"
        );
        Ok(entry)
    }

    /// Replace name and amount; the original date is kept.
    pub fn edit(&self, user: &UserId, id: EntryId, edit: EntryEdit) -> Result<Entry, FinanceError> {
        let mut entry = self
            .store
            .get(user, id)
            .ok_or(FinanceError::EntryNotFound(id))?;
        entry.name = validate_name(&edit.name)?;
        entry.amount = validate_amount(edit.amount)?;

        self.store.upsert(user, entry.clone());
        tracing::info!(user_id = %user, entry_id = %id, "entry edited");
        Ok(entry)
    }

    pub fn remove(&self, user: &UserId, id: EntryId) -> Result<Entry, FinanceError> {
        let removed = self
            .store
            .remove(user, id)
            .ok_or(FinanceError::EntryNotFound(id))?;
        tracing::info!(user_id = %user, entry_id = %id, "entry removed");
        Ok(removed)
    }

    pub fn get(&self, user: &UserId, id: EntryId) -> Result<Entry, FinanceError> {
        self.store.get(user, id).ok_or(FinanceError::EntryNotFound(id))
    }

    pub fn entries(&self, user: &UserId) -> Vec<Entry> {
        self.store.list(user)
    }

    pub fn entries_of_kind(&self, user: &UserId, kind: EntryKind) -> Vec<Entry> {
        self.store
            .list(user)
            .into_iter()
            .filter(|e| e.kind == kind)
            .collect()
    }
}
