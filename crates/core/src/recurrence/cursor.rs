//! Batch expansion of one entry across an ordered period sequence.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::calculator::series_upper_bound;
use crate::budget::{BudgetEntry, Schedule};
use crate::dates::{CalendarStep, Period};

enum CursorState {
    Empty,
    OneOff {
        date: NaiveDate,
    },
    Series {
        step: CalendarStep,
        anchor: NaiveDate,
        end_date: Option<NaiveDate>,
        next: u32,
    },
    Scheduled {
        payments: Vec<(NaiveDate, Decimal)>,
        next: usize,
    },
}

/// Walks an ordered period sequence once, yielding `(period_index, amount)`.
///
/// The position in the entry's schedule only moves forward; a period that
/// starts before the previous one ended makes the cursor re-seek, so the
/// amounts always match [`amount_for_period`](super::amount_for_period).
/// Build a new cursor to restart.
pub struct OccurrenceCursor<'a> {
    amount: Decimal,
    periods: std::iter::Enumerate<std::slice::Iter<'a, Period>>,
    state: CursorState,
    last_end: Option<NaiveDate>,
}

impl<'a> OccurrenceCursor<'a> {
    /// Creates a cursor over `periods` for `entry`.
    #[must_use]
    pub fn new(entry: &BudgetEntry, periods: &'a [Period]) -> Self {
        let state = match entry.schedule() {
            Schedule::OneOff { date } if entry.amount > Decimal::ZERO => {
                CursorState::OneOff { date: *date }
            }
            Schedule::Recurring {
                start_date,
                end_date,
            } if entry.amount > Decimal::ZERO => match entry.frequency().step() {
                Some(step) => CursorState::Series {
                    step,
                    anchor: *start_date,
                    end_date: *end_date,
                    next: 0,
                },
                None => CursorState::Empty,
            },
            Schedule::Scheduled { payments } => {
                let mut payments: Vec<(NaiveDate, Decimal)> = payments
                    .iter()
                    .filter(|p| p.amount > Decimal::ZERO)
                    .map(|p| (p.date, p.amount))
                    .collect();
                payments.sort_by_key(|(date, _)| *date);
                CursorState::Scheduled { payments, next: 0 }
            }
            _ => CursorState::Empty,
        };

        Self {
            amount: entry.amount,
            periods: periods.iter().enumerate(),
            state,
            last_end: None,
        }
    }

    fn amount_in(&mut self, start: NaiveDate, end: NaiveDate) -> Decimal {
        let rewound = self.last_end.is_some_and(|last| start < last);
        self.last_end = Some(end);
        if start >= end {
            return Decimal::ZERO;
        }

        match &mut self.state {
            CursorState::Empty => Decimal::ZERO,
            CursorState::OneOff { date } => {
                if *date >= start && *date < end {
                    self.amount
                } else {
                    Decimal::ZERO
                }
            }
            CursorState::Series {
                step,
                anchor,
                end_date,
                next,
            } => {
                let upper = series_upper_bound(end, *end_date);
                let behind = rewound || step.nth_after(*anchor, *next).is_none_or(|d| d < start);
                let first = if behind {
                    match step.first_index_on_or_after(*anchor, start) {
                        Some(k) => k,
                        None => return Decimal::ZERO,
                    }
                } else {
                    *next
                };
                let past_last = if upper > start {
                    step.first_index_on_or_after(*anchor, upper)
                        .map_or(first, |k| k.max(first))
                } else {
                    first
                };
                *next = past_last;
                self.amount * Decimal::from(past_last - first)
            }
            CursorState::Scheduled { payments, next } => {
                if rewound {
                    *next = payments.partition_point(|(date, _)| *date < start);
                } else {
                    while payments.get(*next).is_some_and(|(date, _)| *date < start) {
                        *next += 1;
                    }
                }
                let mut total = Decimal::ZERO;
                while let Some((date, amount)) = payments.get(*next) {
                    if *date >= end {
                        break;
                    }
                    total += *amount;
                    *next += 1;
                }
                total
            }
        }
    }
}

impl Iterator for OccurrenceCursor<'_> {
    type Item = (usize, Decimal);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, period) = self.periods.next()?;
        Some((index, self.amount_in(period.start_date, period.end_date)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.periods.size_hint()
    }
}

/// Budgeted amount of `entry` for each period, in order.
#[must_use]
pub fn amounts_by_period(entry: &BudgetEntry, periods: &[Period]) -> Vec<Decimal> {
    OccurrenceCursor::new(entry, periods)
        .map(|(_, amount)| amount)
        .collect()
}
