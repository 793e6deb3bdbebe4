//! Calendar arithmetic, "today" resolution, and period buckets.

pub mod calendar;
pub mod error;
pub mod period;
pub mod today;

#[cfg(test)]
mod tests;

pub use calendar::{
    CalendarStep, add_months, days_in_month, start_of_month, start_of_week,
};
pub use error::DateError;
pub use period::{Period, PeriodGranularity, build_periods};
pub use today::today_in_timezone;
