//! Budgeted amount of one entry over a date range.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use treso_shared::types::positive_amount;

use crate::budget::{BudgetEntry, Schedule};
use crate::dates::CalendarStep;

/// Budgeted amount of `entry` falling in `[start, end)`.
///
/// Regular series count their occurrences arithmetically from the anchor;
/// for daily entries this is the number of covered calendar days. Malformed
/// entries (non-positive amount, inverted range) contribute zero.
#[must_use]
pub fn amount_for_period(entry: &BudgetEntry, start: NaiveDate, end: NaiveDate) -> Decimal {
    if start >= end {
        return Decimal::ZERO;
    }

    match entry.schedule() {
        Schedule::OneOff { date } => positive_amount(entry.amount)
            .filter(|_| *date >= start && *date < end)
            .unwrap_or(Decimal::ZERO),
        Schedule::Scheduled { payments } => payments
            .iter()
            .filter(|p| p.amount > Decimal::ZERO && p.date >= start && p.date < end)
            .map(|p| p.amount)
            .sum(),
        Schedule::Recurring {
            start_date,
            end_date,
        } => {
            let Some(amount) = positive_amount(entry.amount) else {
                return Decimal::ZERO;
            };
            if *start_date >= end || end_date.is_some_and(|last| last < start) {
                return Decimal::ZERO;
            }
            let Some(step) = entry.frequency().step() else {
                return Decimal::ZERO;
            };
            let upper = series_upper_bound(end, *end_date);
            amount * Decimal::from(occurrences_between(step, *start_date, start, upper))
        }
    }
}

/// Exclusive upper bound of a series window: `end`, cut at the day after `end_date`.
pub(crate) fn series_upper_bound(end: NaiveDate, end_date: Option<NaiveDate>) -> NaiveDate {
    end_date
        .and_then(|last| last.succ_opt())
        .map_or(end, |after_last| after_last.min(end))
}

/// Number of occurrences of the series anchored at `anchor` in `[lo, hi)`.
fn occurrences_between(step: CalendarStep, anchor: NaiveDate, lo: NaiveDate, hi: NaiveDate) -> u32 {
    if hi <= lo {
        return 0;
    }
    match (
        step.first_index_on_or_after(anchor, lo),
        step.first_index_on_or_after(anchor, hi),
    ) {
        (Some(first), Some(past_last)) => past_last.saturating_sub(first),
        _ => 0,
    }
}
