//! Tests for calendar helpers, "today" resolution, and period building.

use chrono::{Days, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rstest::rstest;

use super::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[rstest]
#[case(d(2024, 1, 31), 1, d(2024, 2, 29))]
#[case(d(2023, 1, 31), 1, d(2023, 2, 28))]
#[case(d(2024, 3, 31), 1, d(2024, 4, 30))]
#[case(d(2024, 11, 15), 3, d(2025, 2, 15))]
#[case(d(2024, 2, 29), 12, d(2025, 2, 28))]
#[case(d(2024, 3, 31), -1, d(2024, 2, 29))]
fn test_add_months_clamps_to_month_end(
    #[case] start: NaiveDate,
    #[case] months: i32,
    #[case] expected: NaiveDate,
) {
    assert_eq!(add_months(start, months), Some(expected));
}

#[rstest]
#[case(2024, 2, 29)]
#[case(2023, 2, 28)]
#[case(2024, 12, 31)]
#[case(2024, 4, 30)]
fn test_days_in_month(#[case] year: i32, #[case] month: u32, #[case] expected: u32) {
    assert_eq!(days_in_month(year, month), expected);
}

#[test]
fn test_start_of_week_is_monday() {
    // 2024-01-17 is a Wednesday
    assert_eq!(start_of_week(d(2024, 1, 17)), d(2024, 1, 15));
    assert_eq!(start_of_week(d(2024, 1, 15)), d(2024, 1, 15));
    assert_eq!(start_of_week(d(2024, 1, 21)), d(2024, 1, 15));
}

#[test]
fn test_start_of_month() {
    assert_eq!(start_of_month(d(2024, 2, 29)), d(2024, 2, 1));
}

#[test]
fn test_monthly_step_does_not_drift() {
    let step = CalendarStep::Months(1);
    let anchor = d(2024, 1, 31);
    assert_eq!(step.nth_after(anchor, 1), Some(d(2024, 2, 29)));
    assert_eq!(step.nth_after(anchor, 2), Some(d(2024, 3, 31)));
    assert_eq!(step.nth_after(anchor, 3), Some(d(2024, 4, 30)));
}

#[test]
fn test_first_index_on_or_after() {
    let weekly = CalendarStep::Days(7);
    let anchor = d(2024, 1, 1);
    assert_eq!(weekly.first_index_on_or_after(anchor, d(2023, 12, 1)), Some(0));
    assert_eq!(weekly.first_index_on_or_after(anchor, d(2024, 1, 1)), Some(0));
    assert_eq!(weekly.first_index_on_or_after(anchor, d(2024, 1, 2)), Some(1));
    assert_eq!(weekly.first_index_on_or_after(anchor, d(2024, 1, 8)), Some(1));

    let monthly = CalendarStep::Months(1);
    let anchor = d(2024, 1, 31);
    assert_eq!(monthly.first_index_on_or_after(anchor, d(2024, 2, 1)), Some(1));
    assert_eq!(monthly.first_index_on_or_after(anchor, d(2024, 3, 1)), Some(2));
    assert_eq!(monthly.first_index_on_or_after(anchor, d(2024, 3, 31)), Some(2));
    assert_eq!(monthly.first_index_on_or_after(anchor, d(2024, 4, 1)), Some(3));
}

#[test]
fn test_zero_step_has_no_next_occurrence() {
    assert_eq!(
        CalendarStep::Days(0).first_index_on_or_after(d(2024, 1, 1), d(2024, 2, 1)),
        None
    );
}

#[rstest]
#[case(0, d(2024, 1, 20))]
#[case(2, d(2024, 1, 21))]
#[case(-12, d(2024, 1, 20))]
#[case(-23, d(2024, 1, 20))]
#[case(14, d(2024, 1, 21))]
fn test_today_in_timezone(#[case] offset: i32, #[case] expected: NaiveDate) {
    let now = Utc.with_ymd_and_hms(2024, 1, 20, 23, 30, 0).unwrap();
    assert_eq!(today_in_timezone(now, offset), expected);
}

#[test]
fn test_today_in_negative_timezone_goes_back_a_day() {
    let now = Utc.with_ymd_and_hms(2024, 1, 20, 2, 0, 0).unwrap();
    assert_eq!(today_in_timezone(now, -5), d(2024, 1, 19));
}

#[test]
fn test_period_contains_is_half_open() {
    let period = Period::new("2024-01", d(2024, 1, 1), d(2024, 2, 1));
    assert!(period.contains(d(2024, 1, 1)));
    assert!(period.contains(d(2024, 1, 31)));
    assert!(!period.contains(d(2024, 2, 1)));
    assert_eq!(period.days(), 31);
}

#[test]
fn test_build_monthly_periods() {
    let periods = build_periods(d(2024, 1, 17), PeriodGranularity::Month, 3);
    assert_eq!(periods.len(), 3);
    assert_eq!(periods[0].label, "2024-01");
    assert_eq!(periods[0].start_date, d(2024, 1, 1));
    assert_eq!(periods[0].end_date, d(2024, 2, 1));
    assert_eq!(periods[2].label, "2024-03");
    assert_eq!(periods[2].end_date, d(2024, 4, 1));
}

#[rstest]
#[case(PeriodGranularity::Week, d(2024, 1, 15), "2024-W03")]
#[case(PeriodGranularity::Fortnight, d(2024, 1, 15), "2024-01-15")]
#[case(PeriodGranularity::Bimonth, d(2024, 5, 1), "2024-B3")]
#[case(PeriodGranularity::Quarter, d(2024, 4, 1), "2024-Q2")]
#[case(PeriodGranularity::Semester, d(2024, 7, 1), "2024-S2")]
#[case(PeriodGranularity::Year, d(2024, 1, 1), "2024")]
fn test_build_periods_normalizes_anchor(
    #[case] granularity: PeriodGranularity,
    #[case] expected_start: NaiveDate,
    #[case] expected_label: &str,
) {
    let anchor = match granularity {
        PeriodGranularity::Week | PeriodGranularity::Fortnight => d(2024, 1, 17),
        PeriodGranularity::Bimonth => d(2024, 6, 10),
        PeriodGranularity::Quarter => d(2024, 5, 20),
        PeriodGranularity::Semester => d(2024, 9, 3),
        _ => d(2024, 8, 8),
    };
    let periods = build_periods(anchor, granularity, 2);
    assert_eq!(periods[0].start_date, expected_start);
    assert_eq!(periods[0].label, expected_label);
    assert_eq!(periods[0].end_date, periods[1].start_date);
}

#[test]
fn test_granularity_from_str() {
    assert_eq!("month".parse(), Ok(PeriodGranularity::Month));
    assert_eq!(" Quarterly ".parse(), Ok(PeriodGranularity::Quarter));
    assert_eq!(
        "decade".parse::<PeriodGranularity>(),
        Err(DateError::UnknownGranularity("decade".to_string()))
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Generated periods are contiguous and non-overlapping.
    #[test]
    fn prop_built_periods_are_contiguous(
        offset in 0u64..3000,
        granularity_index in 0usize..8,
        count in 1u32..30,
    ) {
        let granularities = [
            PeriodGranularity::Day,
            PeriodGranularity::Week,
            PeriodGranularity::Fortnight,
            PeriodGranularity::Month,
            PeriodGranularity::Bimonth,
            PeriodGranularity::Quarter,
            PeriodGranularity::Semester,
            PeriodGranularity::Year,
        ];
        let anchor = d(2020, 1, 1) + Days::new(offset);
        let periods = build_periods(anchor, granularities[granularity_index], count);

        prop_assert_eq!(periods.len(), count as usize);
        prop_assert!(periods[0].contains(anchor));
        for pair in periods.windows(2) {
            prop_assert_eq!(pair[0].end_date, pair[1].start_date);
            prop_assert!(pair[0].start_date < pair[0].end_date);
        }
    }

    /// The first index found is never late and never early.
    #[test]
    fn prop_first_index_is_tight(
        anchor_offset in 0u64..2000,
        target_offset in 0u64..4000,
        months in 1u32..13,
    ) {
        let step = CalendarStep::Months(months);
        let anchor = d(2020, 1, 1) + Days::new(anchor_offset);
        let target = d(2020, 1, 1) + Days::new(target_offset);
        let k = step.first_index_on_or_after(anchor, target).unwrap();

        prop_assert!(step.nth_after(anchor, k).unwrap() >= target);
        if k > 0 {
            prop_assert!(step.nth_after(anchor, k - 1).unwrap() < target);
        }
    }
}
