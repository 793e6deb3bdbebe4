//! Timezone-adjusted "today".

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

const MIN_OFFSET_HOURS: i32 = -12;
const MAX_OFFSET_HOURS: i32 = 14;

/// The calendar date at `now` in a timezone `offset_hours` away from UTC.
///
/// This is the single entry point for every past/future decision; callers
/// resolve it once per computation and pass the result down. Offsets outside
/// `-12..=14` are clamped.
#[must_use]
pub fn today_in_timezone(now: DateTime<Utc>, offset_hours: i32) -> NaiveDate {
    let hours = offset_hours.clamp(MIN_OFFSET_HOURS, MAX_OFFSET_HOURS);
    FixedOffset::east_opt(hours * 3600)
        .map_or_else(|| now.date_naive(), |tz| now.with_timezone(&tz).date_naive())
}
