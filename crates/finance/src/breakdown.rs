//! Pie-chart data.

use serde::Serialize;

use crate::entry::{Entry, EntryKind};
use crate::money::Money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub label: String,
    pub amount: Money,
    /// Share of the chart total, rounded to a whole percent.
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub income: Vec<Slice>,
    pub expense: Vec<Slice>,
    /// Two slices: total income and total expense.
    pub summary: Vec<Slice>,
}

/// Sum `entries` of `kind` by name. Slices keep first-seen order.
pub fn breakdown_by_name(entries: &[Entry], kind: EntryKind) -> Vec<Slice> {
    let mut groups: Vec<(String, Money)> = Vec::new();
    for e in entries.iter().filter(|e| e.kind == kind) {
        match groups.iter_mut().find(|(name, _)| name == &e.name) {
            Some((_, sum)) => *sum += e.amount,
            None => groups.push((e.name.clone(), e.amount)),
        }
    }
    slices(groups)
}

pub fn income_vs_expense(entries: &[Entry]) -> Vec<Slice> {
    let total_of = |kind| {
        entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.amount)
            .sum::<Money>()
    };
    slices(vec![
        ("income".to_string(), total_of(EntryKind::Income)),
        ("expense".to_string(), total_of(EntryKind::Expense)),
    ])
}

pub fn breakdown(entries: &[Entry]) -> Breakdown {
    Breakdown {
        income: breakdown_by_name(entries, EntryKind::Income),
        expense: breakdown_by_name(entries, EntryKind::Expense),
        summary: income_vs_expense(entries),
    }
}

fn slices(groups: Vec<(String, Money)>) -> Vec<Slice> {
    let total: i128 = groups.iter().map(|(_, m)| i128::from(m.cents())).sum();
    groups
        .into_iter()
        .map(|(label, amount)| Slice {
            percent: percent_of(amount, total),
            label,
            amount,
        })
        .collect()
}

fn percent_of(amount: Money, total: i128) -> u8 {
    if total <= 0 {
        return 0;
    }
    let scaled = (i128::from(amount.cents()) * 200 + total) / (2 * total);
    scaled.clamp(0, 100) as u8
}
