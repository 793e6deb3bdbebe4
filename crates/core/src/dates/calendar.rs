//! Calendar increments with month-end clamping.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Adds (or subtracts) calendar months, clamping to the end of the target month.
///
/// `2024-01-31 + 1 month` is `2024-02-29`, never `2024-03-02`.
#[must_use]
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let magnitude = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

/// Number of days in the given month (1-based).
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map_or(28, |last| last.day())
}

/// Monday of the week containing `date`.
#[must_use]
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// First day of the month containing `date`.
#[must_use]
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// A fixed calendar increment between two occurrences of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarStep {
    /// Every `n` days.
    Days(u32),
    /// Every `n` calendar months, clamped to month end.
    Months(u32),
}

impl CalendarStep {
    /// The `k`-th occurrence of a series anchored at `anchor` (`k = 0` is the anchor).
    ///
    /// Always computed from the anchor, so month clamping never accumulates:
    /// a series anchored on Jan 31 yields Feb 29, then Mar 31.
    #[must_use]
    pub fn nth_after(self, anchor: NaiveDate, k: u32) -> Option<NaiveDate> {
        match self {
            Self::Days(n) => {
                let days = u64::from(n).checked_mul(u64::from(k))?;
                anchor.checked_add_days(Days::new(days))
            }
            Self::Months(n) => {
                let months = n.checked_mul(k)?;
                anchor.checked_add_months(Months::new(months))
            }
        }
    }

    /// Index of the first occurrence falling on or after `target`.
    ///
    /// Computed arithmetically, without walking the series from its anchor.
    #[must_use]
    pub fn first_index_on_or_after(self, anchor: NaiveDate, target: NaiveDate) -> Option<u32> {
        if target <= anchor {
            return Some(0);
        }
        let mut k = match self {
            Self::Days(0) | Self::Months(0) => return None,
            Self::Days(n) => {
                let diff = (target - anchor).num_days();
                let n = i64::from(n);
                u32::try_from((diff + n - 1) / n).ok()?
            }
            Self::Months(n) => {
                let months_between = (target.year() - anchor.year()) * 12
                    + i32::try_from(target.month()).ok()?
                    - i32::try_from(anchor.month()).ok()?;
                u32::try_from(months_between).ok()? / n
            }
        };
        while self.nth_after(anchor, k)? < target {
            k = k.checked_add(1)?;
        }
        Some(k)
    }
}
