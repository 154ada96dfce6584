//! `economia-finance`: personal income/expense book and its aggregations.
//!
//! Amounts are integer cents ([`Money`]); dates are calendar days without a
//! time zone. Aggregations are pure functions over entry slices.

pub mod book;
pub mod breakdown;
pub mod calendar;
pub mod entry;
pub mod money;
pub mod period;
pub mod store;
pub mod summary;

pub use book::{FinanceBook, FinanceError};
pub use breakdown::{Breakdown, Slice, breakdown, breakdown_by_name, income_vs_expense};
pub use calendar::{CalendarCell, CalendarMonth, GRID_CELLS, calendar_month};
pub use entry::{Entry, EntryEdit, EntryKind, NewEntry};
pub use money::Money;
pub use period::{Granularity, PeriodKey, PeriodTotals, group_by_period};
pub use store::{EntryStore, InMemoryEntryStore};
pub use summary::{BalanceStatus, DayDetail, MonthSummary, Totals, day_detail, month_summary, totals};
