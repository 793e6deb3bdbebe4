//! Property-based tests for budgeted amounts.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::*;
use crate::budget::{BudgetEntry, FlowType, Frequency};
use crate::dates::{Period, PeriodGranularity, build_periods};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn frequency_strategy() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Journalier),
        Just(Frequency::Hebdomadaire),
        Just(Frequency::Mensuel),
        Just(Frequency::Bimestriel),
        Just(Frequency::Trimestriel),
        Just(Frequency::Annuel),
    ]
}

fn granularity_strategy() -> impl Strategy<Value = PeriodGranularity> {
    prop_oneof![
        Just(PeriodGranularity::Day),
        Just(PeriodGranularity::Week),
        Just(PeriodGranularity::Month),
        Just(PeriodGranularity::Quarter),
        Just(PeriodGranularity::Year),
    ]
}

/// Strategy for a recurring entry anchored within a few years of 2020.
fn entry_strategy() -> impl Strategy<Value = BudgetEntry> {
    (
        frequency_strategy(),
        1i64..1_000_000,
        0i64..1500,
        prop::option::of(0i64..1500),
    )
        .prop_map(|(frequency, cents, start_offset, length)| {
            let start = base() + Duration::days(start_offset);
            let end = length.map(|len| start + Duration::days(len));
            BudgetEntry::recurring(
                FlowType::Depense,
                "Charges",
                Decimal::new(cents, 2),
                frequency,
                start,
                end,
            )
            .unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Summing over a contiguous partition equals the amount over the whole window.
    #[test]
    fn prop_partition_additivity(
        entry in entry_strategy(),
        granularity in granularity_strategy(),
        count in 1u32..40,
        anchor_offset in 0i64..1500,
    ) {
        let periods = build_periods(base() + Duration::days(anchor_offset), granularity, count);
        let (Some(first), Some(last)) = (periods.first(), periods.last()) else {
            return Ok(());
        };
        let whole = amount_for_period(&entry, first.start_date, last.end_date);
        let parts: Decimal = periods
            .iter()
            .map(|p| amount_for_period(&entry, p.start_date, p.end_date))
            .sum();
        prop_assert_eq!(parts, whole);
    }

    /// The batch cursor agrees with the single-period function on every period.
    #[test]
    fn prop_cursor_matches_single_period(
        entry in entry_strategy(),
        granularity in granularity_strategy(),
        count in 1u32..40,
        anchor_offset in 0i64..1500,
    ) {
        let periods = build_periods(base() + Duration::days(anchor_offset), granularity, count);
        let batch = amounts_by_period(&entry, &periods);
        for (period, amount) in periods.iter().zip(&batch) {
            prop_assert_eq!(*amount, amount_for_period(&entry, period.start_date, period.end_date));
        }
    }

    /// Repeated calls give the same answer.
    #[test]
    fn prop_idempotent(entry in entry_strategy(), from in 0i64..2000, len in 1i64..400) {
        let start = base() + Duration::days(from);
        let end = start + Duration::days(len);
        prop_assert_eq!(
            amount_for_period(&entry, start, end),
            amount_for_period(&entry, start, end)
        );
    }

    /// Windows entirely before the start, or entirely after the end, are zero.
    #[test]
    fn prop_zero_outside_range(entry in entry_strategy(), gap in 1i64..400, len in 1i64..400) {
        let crate::budget::Schedule::Recurring { start_date, end_date } = entry.schedule().clone() else {
            unreachable!("strategy builds recurring entries");
        };
        let before = Period::new(
            "before",
            start_date - Duration::days(gap + len),
            start_date - Duration::days(gap - 1),
        );
        prop_assert!(before.end_date <= start_date);
        prop_assert_eq!(amount_for_period(&entry, before.start_date, before.end_date), Decimal::ZERO);

        if let Some(last) = end_date {
            let after_start = last + Duration::days(gap);
            prop_assert_eq!(
                amount_for_period(&entry, after_start, after_start + Duration::days(len)),
                Decimal::ZERO
            );
        }
    }
}
