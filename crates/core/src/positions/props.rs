//! Property-based tests for period positions.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::*;
use crate::accounts::{AccountCategory, CashAccount};
use crate::actuals::{ActualKind, ActualTransaction, AdvancePolicy, Payment};
use crate::aggregation::CategoryTree;
use crate::budget::{BudgetEntry, FlowType, Frequency};
use crate::dates::{PeriodGranularity, build_periods};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Strategy to generate an amount from 0.01 to 10,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn flow() -> impl Strategy<Value = FlowType> {
    prop_oneof![Just(FlowType::Revenu), Just(FlowType::Depense)]
}

fn kind() -> impl Strategy<Value = ActualKind> {
    prop_oneof![Just(ActualKind::Payable), Just(ActualKind::Receivable)]
}

fn policy() -> impl Strategy<Value = AdvancePolicy> {
    prop_oneof![
        Just(AdvancePolicy::KeepOnTransaction),
        Just(AdvancePolicy::ApplyToNextDue)
    ]
}

fn entries_strategy() -> impl Strategy<Value = Vec<BudgetEntry>> {
    prop::collection::vec((flow(), amount(), 0i64..365, any::<bool>(), any::<bool>()), 0..8).prop_map(
        |specs| {
            specs
                .into_iter()
                .map(|(flow, amount, offset, recurring, off_budget)| {
                    let date = base() + Duration::days(offset);
                    let entry = if recurring {
                        BudgetEntry::recurring(flow, "Divers", amount, Frequency::Mensuel, date, None)
                            .unwrap()
                    } else {
                        BudgetEntry::one_off(flow, "Divers", amount, date)
                    };
                    if off_budget { entry.off_budget() } else { entry }
                })
                .collect()
        },
    )
}

fn actuals_strategy(account: CashAccount) -> impl Strategy<Value = Vec<ActualTransaction>> {
    prop::collection::vec(
        (kind(), amount(), -60i64..365, prop::collection::vec((amount(), -60i64..365), 0..3)),
        0..8,
    )
    .prop_map(move |specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (kind, due_amount, due_offset, payments))| {
                let mut tx = ActualTransaction::new(kind, base() + Duration::days(due_offset), due_amount)
                    .with_third_party(if i % 2 == 0 { "A" } else { "B" });
                for (paid, offset) in payments {
                    tx.record_payment(Payment::new(base() + Duration::days(offset), paid, account.id), false);
                }
                tx
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Each period starts where the previous one ended, and its movement adds up.
    #[test]
    fn prop_fold_continuity(
        opening in amount(),
        entries in entries_strategy(),
        (account, actuals) in Just(CashAccount::new(
            "Banque",
            AccountCategory::Bank,
            Decimal::ZERO,
            base() - Duration::days(30),
        ))
        .prop_flat_map(|account| (Just(account.clone()), actuals_strategy(account))),
        today_offset in -90i64..500,
        count in 1u32..14,
        advance_policy in policy(),
    ) {
        let mut account = account;
        account.initial_balance = opening;
        let accounts = vec![account];
        let periods = build_periods(base(), PeriodGranularity::Month, count);
        let categories = CategoryTree::inferred(&entries);
        let input = PositionInput {
            periods: &periods,
            accounts: &accounts,
            entries: &entries,
            actuals: &actuals,
            categories: &categories,
            scope: AccountScope::All,
            advance_policy,
        };

        let report = compute_positions(&input, base() + Duration::days(today_offset));
        prop_assert_eq!(report.positions.len(), periods.len());
        prop_assert_eq!(report.positions[0].initial, report.opening_balance);

        for pair in report.positions.windows(2) {
            prop_assert_eq!(pair[0].final_balance, pair[1].initial);
            // Actual mode never follows projected mode.
            prop_assert!(!(pair[0].mode == PositionMode::Projected && pair[1].mode == PositionMode::Actual));
        }
        for (index, p) in report.positions.iter().enumerate() {
            prop_assert_eq!(p.final_balance, p.initial + p.arrears + p.inflow - p.outflow);
            let first_projected = index == 0 || report.positions[index - 1].mode == PositionMode::Actual;
            if p.mode == PositionMode::Actual || !first_projected {
                prop_assert!(p.arrears.is_zero());
            }
        }
    }
}
