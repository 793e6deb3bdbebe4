//! Caller-defined date buckets.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calendar::{CalendarStep, start_of_month, start_of_week};
use super::error::DateError;

/// A contiguous date bucket: `start_date` inclusive, `end_date` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    /// Display label (e.g. "2024-01").
    pub label: String,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// First day after the period.
    pub end_date: NaiveDate,
}

impl Period {
    /// Creates a new period.
    #[must_use]
    pub fn new(label: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            label: label.into(),
            start_date,
            end_date,
        }
    }

    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date < self.end_date
    }

    /// Number of days covered (0 for an empty or inverted period).
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days().max(0)
    }
}

/// Width of generated periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodGranularity {
    /// One day.
    Day,
    /// Seven days, starting on Monday.
    Week,
    /// Fourteen days, starting on Monday.
    Fortnight,
    /// One calendar month.
    Month,
    /// Two calendar months (Jan-Feb, Mar-Apr, ...).
    Bimonth,
    /// Three calendar months (calendar quarters).
    Quarter,
    /// Six calendar months (Jan-Jun, Jul-Dec).
    Semester,
    /// One calendar year.
    Year,
}

impl PeriodGranularity {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Fortnight => "fortnight",
            Self::Month => "month",
            Self::Bimonth => "bimonth",
            Self::Quarter => "quarter",
            Self::Semester => "semester",
            Self::Year => "year",
        }
    }

    /// Calendar increment between two consecutive period starts.
    #[must_use]
    pub const fn step(self) -> CalendarStep {
        match self {
            Self::Day => CalendarStep::Days(1),
            Self::Week => CalendarStep::Days(7),
            Self::Fortnight => CalendarStep::Days(14),
            Self::Month => CalendarStep::Months(1),
            Self::Bimonth => CalendarStep::Months(2),
            Self::Quarter => CalendarStep::Months(3),
            Self::Semester => CalendarStep::Months(6),
            Self::Year => CalendarStep::Months(12),
        }
    }

    /// Moves `date` back to the start of the period containing it.
    #[must_use]
    pub fn normalize(self, date: NaiveDate) -> NaiveDate {
        match self.step() {
            CalendarStep::Days(1) => date,
            CalendarStep::Days(_) => start_of_week(date),
            CalendarStep::Months(n) => {
                let month_index = date.month0();
                let aligned = (month_index / n) * n + 1;
                NaiveDate::from_ymd_opt(date.year(), aligned, 1)
                    .unwrap_or_else(|| start_of_month(date))
            }
        }
    }

    fn label(self, start: NaiveDate) -> String {
        match self {
            Self::Day | Self::Fortnight => start.format("%Y-%m-%d").to_string(),
            Self::Week => start.format("%G-W%V").to_string(),
            Self::Month => start.format("%Y-%m").to_string(),
            Self::Bimonth => format!("{}-B{}", start.year(), start.month0() / 2 + 1),
            Self::Quarter => format!("{}-Q{}", start.year(), start.month0() / 3 + 1),
            Self::Semester => format!("{}-S{}", start.year(), start.month0() / 6 + 1),
            Self::Year => start.year().to_string(),
        }
    }
}

impl FromStr for PeriodGranularity {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "week" | "weekly" => Ok(Self::Week),
            "fortnight" => Ok(Self::Fortnight),
            "month" | "monthly" => Ok(Self::Month),
            "bimonth" | "bimonthly" => Ok(Self::Bimonth),
            "quarter" | "quarterly" => Ok(Self::Quarter),
            "semester" => Ok(Self::Semester),
            "year" | "yearly" | "annual" => Ok(Self::Year),
            _ => Err(DateError::UnknownGranularity(s.to_string())),
        }
    }
}

impl std::fmt::Display for PeriodGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Builds `count` contiguous periods, the first one containing `anchor`.
///
/// Stops early if the calendar range is exhausted.
#[must_use]
pub fn build_periods(anchor: NaiveDate, granularity: PeriodGranularity, count: u32) -> Vec<Period> {
    let first = granularity.normalize(anchor);
    let step = granularity.step();

    (0..count)
        .map_while(|k| {
            let start = step.nth_after(first, k)?;
            let end = step.nth_after(first, k + 1)?;
            Some(Period::new(granularity.label(start), start, end))
        })
        .collect()
}
