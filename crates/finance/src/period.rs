//! Grouping entries into day, week, month or year buckets.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entry::{Entry, EntryKind};
use crate::money::Money;
use crate::summary::Totals;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    /// ISO 8601 week (Monday start).
    Week,
    #[default]
    Month,
    Year,
}

/// Bucket identifier; orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    Day(NaiveDate),
    Week { iso_year: i32, week: u32 },
    Month { year: i32, month: u32 },
    Year(i32),
}

impl PeriodKey {
    pub fn of(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => Self::Day(date),
            Granularity::Week => {
                let w = date.iso_week();
                Self::Week {
                    iso_year: w.year(),
                    week: w.week(),
                }
            }
            Granularity::Month => Self::Month {
                year: date.year(),
                month: date.month(),
            },
            Granularity::Year => Self::Year(date.year()),
        }
    }

    /// `2025-06-15`, `2025-W24`, `2025-06` or `2025`.
    pub fn label(&self) -> String {
        match self {
            Self::Day(d) => d.format("%Y-%m-%d").to_string(),
            Self::Week { iso_year, week } => format!("{iso_year}-W{week:02}"),
            Self::Month { year, month } => format!("{year}-{month:02}"),
            Self::Year(y) => y.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub period: String,
    pub totals: Totals,
    pub entries: usize,
}

/// Per-bucket totals, oldest bucket first. Empty buckets are omitted.
pub fn group_by_period(entries: &[Entry], granularity: Granularity) -> Vec<PeriodTotals> {
    let mut buckets: BTreeMap<PeriodKey, (Money, Money, usize)> = BTreeMap::new();
    for e in entries {
        let slot = buckets
            .entry(PeriodKey::of(e.date, granularity))
            .or_insert((Money::ZERO, Money::ZERO, 0));
        match e.kind {
            EntryKind::Income => slot.0 += e.amount,
            EntryKind::Expense => slot.1 += e.amount,
        }
        slot.2 += 1;
    }

    buckets
        .into_iter()
        .map(|(key, (income, expense, count))| PeriodTotals {
            period: key.label(),
            totals: Totals::new(income, expense),
            entries: count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::totals;
    use economia_core::EntryId;
    use proptest::prelude::*;

    fn entry(kind: EntryKind, cents: i64, date: NaiveDate) -> Entry {
        Entry {
            id: EntryId::new(),
            kind,
            name: "x".to_string(),
            amount: Money::from_cents(cents),
            date,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn iso_week_crosses_year_boundary() {
        // 30 Dec 2024 (Mon) to 5 Jan 2025 (Sun) is ISO week 2025-W01.
        let entries = vec![
            entry(EntryKind::Income, 100, d(2024, 12, 30)),
            entry(EntryKind::Expense, 40, d(2025, 1, 5)),
            entry(EntryKind::Expense, 1, d(2025, 1, 6)),
        ];
        let weeks = group_by_period(&entries, Granularity::Week);

        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].period, "2025-W01");
        assert_eq!(weeks[0].totals.balance, Money::from_cents(60));
        assert_eq!(weeks[1].period, "2025-W02");
    }

    #[test]
    fn labels_per_granularity() {
        let date = d(2025, 6, 15);
        assert_eq!(PeriodKey::of(date, Granularity::Day).label(), "2025-06-15");
        assert_eq!(PeriodKey::of(date, Granularity::Week).label(), "2025-W24");
        assert_eq!(PeriodKey::of(date, Granularity::Month).label(), "2025-06");
        assert_eq!(PeriodKey::of(date, Granularity::Year).label(), "2025");
    }

    #[test]
    fn buckets_are_chronological() {
        let entries = vec![
            entry(EntryKind::Income, 1, d(2025, 11, 1)),
            entry(EntryKind::Income, 1, d(2024, 2, 1)),
            entry(EntryKind::Income, 1, d(2025, 2, 1)),
        ];
        let months: Vec<String> = group_by_period(&entries, Granularity::Month)
            .into_iter()
            .map(|p| p.period)
            .collect();
        assert_eq!(months, vec!["2024-02", "2025-02", "2025-11"]);
    }

    fn granularity() -> impl Strategy<Value = Granularity> {
        prop::sample::select(vec![
            Granularity::Day,
            Granularity::Week,
            Granularity::Month,
            Granularity::Year,
        ])
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        #[test]
        fn grouping_preserves_overall_totals(
            raw in prop::collection::vec((any::<bool>(), 1i64..100_000, 0i64..1_500), 0..60),
            g in granularity(),
        ) {
            let base = d(2024, 1, 1);
            let entries: Vec<Entry> = raw
                .iter()
                .map(|&(is_income, cents, offset)| {
                    let kind = if is_income { EntryKind::Income } else { EntryKind::Expense };
                    entry(kind, cents, base + chrono::Duration::days(offset))
                })
                .collect();

            let grouped = group_by_period(&entries, g);
            let income: Money = grouped.iter().map(|p| p.totals.income).sum();
            let expense: Money = grouped.iter().map(|p| p.totals.expense).sum();
            let count: usize = grouped.iter().map(|p| p.entries).sum();

            let overall = totals(&entries);
            prop_assert_eq!(income, overall.income);
            prop_assert_eq!(expense, overall.expense);
            prop_assert_eq!(count, entries.len());
        }
    }
}
