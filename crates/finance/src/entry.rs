use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use economia_core::{DomainError, DomainResult, EntryId};

use crate::money::Money;

/// Longest accepted entry name, in characters.
pub const MAX_NAME_LEN: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// One income or expense line of a user's book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub name: String,
    pub amount: Money,
    pub date: NaiveDate,
}

impl Entry {
    /// Amount with the sign it contributes to the balance.
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            EntryKind::Income => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }
}

/// Input for a new entry. `date` defaults to the current day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub kind: EntryKind,
    pub name: String,
    pub amount: Money,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Replacement name and amount for an existing entry; the date is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryEdit {
    pub name: String,
    pub amount: Money,
}

pub(crate) fn validate_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("name is required"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "name longer than {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn validate_amount(amount: Money) -> DomainResult<Money> {
    if !amount.is_positive() {
        return Err(DomainError::validation("amount must be positive"));
    }
    if amount > Money::MAX_ENTRY {
        return Err(DomainError::validation(format!(
            "amount must not exceed {}",
            Money::MAX_ENTRY
        )));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(validate_name("  Rent ").unwrap(), "Rent");
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn amount_must_be_positive() {
        assert!(validate_amount(Money::from_cents(1)).is_ok());
        assert!(validate_amount(Money::ZERO).is_err());
        assert!(validate_amount(Money::from_cents(-100)).is_err());
    }

    #[test]
    fn amount_is_capped_per_entry() {
        assert!(validate_amount(Money::MAX_ENTRY).is_ok());
        assert!(validate_amount(Money::MAX_ENTRY + Money::from_cents(1)).is_err());
        assert!(validate_amount(Money::parse("92233720368547758.07").unwrap()).is_err());
    }

    #[test]
    fn new_entry_accepts_missing_date() {
        let e: NewEntry =
            serde_json::from_str(r#"{"kind":"expense","name":"Coffee","amount":"4,50"}"#).unwrap();
        assert_eq!(e.kind, EntryKind::Expense);
        assert_eq!(e.amount, Money::from_cents(450));
        assert_eq!(e.date, None);
    }
}
