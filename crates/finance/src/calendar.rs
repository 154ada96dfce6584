//! Month calendar grid.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use economia_core::DomainError;

use crate::entry::Entry;
use crate::money::Money;
use crate::summary::{Totals, first_of_month, totals};

/// Six weeks of seven days.
pub const GRID_CELLS: usize = 42;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// `false` for the padding days of the neighbouring months.
    pub in_month: bool,
    pub is_today: bool,
    /// Income minus expense; zero for padding days.
    pub net: Money,
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub totals: Totals,
    /// Weeks start on Sunday.
    pub cells: Vec<CalendarCell>,
}

pub fn calendar_month(
    entries: &[Entry],
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Result<CalendarMonth, DomainError> {
    let first = first_of_month(year, month)?;
    let lead = i64::from(first.weekday().num_days_from_sunday());
    let out_of_range = || DomainError::validation(format!("month out of range: {year}-{month:02}"));
    let start = first
        .checked_sub_signed(Duration::days(lead))
        .ok_or_else(out_of_range)?;

    let mut cells = Vec::with_capacity(GRID_CELLS);
    for offset in 0..GRID_CELLS as i64 {
        let date = start
            .checked_add_signed(Duration::days(offset))
            .ok_or_else(out_of_range)?;
        let in_month = date.year() == year && date.month() == month;
        let (net, count) = if in_month {
            let day: Vec<&Entry> = entries.iter().filter(|e| e.date == date).collect();
            (totals(day.iter().copied()).balance, day.len())
        } else {
            (Money::ZERO, 0)
        };
        cells.push(CalendarCell {
            date,
            in_month,
            is_today: date == today,
            net,
            entries: count,
        });
    }

    let month_totals = totals(
        entries
            .iter()
            .filter(|e| e.date.year() == year && e.date.month() == month),
    );

    Ok(CalendarMonth {
        year,
        month,
        totals: month_totals,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;
    use economia_core::EntryId;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn entry(kind: EntryKind, cents: i64, date: NaiveDate) -> Entry {
        Entry {
            id: EntryId::new(),
            kind,
            name: "x".to_string(),
            amount: Money::from_cents(cents),
            date,
        }
    }

    #[test]
    fn grid_starts_on_sunday_and_has_42_cells() {
        // 1 June 2025 is a Sunday, 1 May 2025 a Thursday.
        let june = calendar_month(&[], 2025, 6, d(2025, 6, 10)).unwrap();
        assert_eq!(june.cells.len(), GRID_CELLS);
        assert_eq!(june.cells[0].date, d(2025, 6, 1));

        let may = calendar_month(&[], 2025, 5, d(2025, 6, 10)).unwrap();
        assert_eq!(may.cells[0].date, d(2025, 4, 27));
        assert!(!may.cells[0].in_month);
        assert!(may.cells[4].in_month);
        assert_eq!(may.cells.iter().filter(|c| c.in_month).count(), 31);
    }

    #[test]
    fn cells_carry_daily_net_and_today_flag() {
        let entries = vec![
            entry(EntryKind::Income, 5000, d(2025, 6, 3)),
            entry(EntryKind::Expense, 7000, d(2025, 6, 3)),
            entry(EntryKind::Income, 100, d(2025, 7, 1)),
        ];
        let cal = calendar_month(&entries, 2025, 6, d(2025, 6, 3)).unwrap();

        let cell = cal.cells.iter().find(|c| c.date == d(2025, 6, 3)).unwrap();
        assert_eq!(cell.net, Money::from_cents(-2000));
        assert_eq!(cell.entries, 2);
        assert!(cell.is_today);

        let padding = cal.cells.iter().find(|c| c.date == d(2025, 7, 1)).unwrap();
        assert!(!padding.in_month);
        assert_eq!(padding.net, Money::ZERO);

        assert_eq!(cal.totals.balance, Money::from_cents(-2000));
    }

    #[test]
    fn months_whose_grid_leaves_the_date_range_are_rejected() {
        let today = d(2025, 6, 1);
        let last = NaiveDate::MAX;
        assert!(matches!(
            calendar_month(&[], last.year(), 12, today),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn huge_entries_do_not_overflow_the_grid() {
        let entries = vec![
            entry(EntryKind::Income, Money::MAX_ENTRY.cents(), d(2025, 6, 3)),
            entry(EntryKind::Income, Money::MAX_ENTRY.cents(), d(2025, 6, 3)),
        ];
        let cal = calendar_month(&entries, 2025, 6, d(2025, 6, 3)).unwrap();
        assert_eq!(cal.totals.income, Money::from_cents(2 * Money::MAX_ENTRY.cents()));
    }
}
