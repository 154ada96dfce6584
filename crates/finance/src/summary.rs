//! Totals over a set of entries.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use economia_core::DomainError;

use crate::entry::{Entry, EntryKind};
use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    Positive,
    Negative,
    Balanced,
}

impl BalanceStatus {
    pub fn of(balance: Money) -> Self {
        if balance.is_positive() {
            Self::Positive
        } else if balance.is_negative() {
            Self::Negative
        } else {
            Self::Balanced
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Money,
    pub expense: Money,
    pub balance: Money,
    pub status: BalanceStatus,
}

impl Totals {
    pub fn new(income: Money, expense: Money) -> Self {
        let balance = income - expense;
        Self {
            income,
            expense,
            balance,
            status: BalanceStatus::of(balance),
        }
    }
}

impl Default for Totals {
    fn default() -> Self {
        Self::new(Money::ZERO, Money::ZERO)
    }
}

pub fn totals<'a, I>(entries: I) -> Totals
where
    I: IntoIterator<Item = &'a Entry>,
{
    let (mut income, mut expense) = (Money::ZERO, Money::ZERO);
    for e in entries {
        match e.kind {
            EntryKind::Income => income += e.amount,
            EntryKind::Expense => expense += e.amount,
        }
    }
    Totals::new(income, expense)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayDetail {
    pub date: NaiveDate,
    pub totals: Totals,
    pub income: Vec<Entry>,
    pub expense: Vec<Entry>,
}

/// Everything booked on `date`.
pub fn day_detail(entries: &[Entry], date: NaiveDate) -> DayDetail {
    let (income, expense): (Vec<Entry>, Vec<Entry>) = entries
        .iter()
        .filter(|e| e.date == date)
        .cloned()
        .partition(|e| e.kind == EntryKind::Income);
    DayDetail {
        date,
        totals: totals(income.iter().chain(expense.iter())),
        income,
        expense,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub totals: Totals,
    /// Newest first.
    pub income: Vec<Entry>,
    /// Newest first.
    pub expense: Vec<Entry>,
}

impl MonthSummary {
    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.expense.is_empty()
    }
}

pub fn month_summary(entries: &[Entry], year: i32, month: u32) -> Result<MonthSummary, DomainError> {
    first_of_month(year, month)?;

    let mut in_month: Vec<Entry> = entries
        .iter()
        .filter(|e| e.date.year() == year && e.date.month() == month)
        .cloned()
        .collect();
    // Stable sort: same-day entries keep store order.
    in_month.sort_by(|a, b| b.date.cmp(&a.date));

    let (income, expense): (Vec<Entry>, Vec<Entry>) =
        in_month.into_iter().partition(|e| e.kind == EntryKind::Income);
    Ok(MonthSummary {
        year,
        month,
        totals: totals(income.iter().chain(expense.iter())),
        income,
        expense,
    })
}

pub(crate) fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, DomainError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| DomainError::validation(format!("invalid month: {year}-{month:02}")))
}
