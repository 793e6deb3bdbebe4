//! Tests for the VAT stage.

use std::borrow::Cow;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use treso_shared::types::ProjectId;

use super::*;
use crate::budget::{BudgetEntry, FlowType, Frequency, TAXES_MAIN_CATEGORY};
use crate::dates::{Period, PeriodGranularity, build_periods};
use crate::recurrence::amount_for_period;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn monthly(flow: FlowType, category: &str, amount: Decimal) -> BudgetEntry {
    BudgetEntry::recurring(flow, category, amount, Frequency::Mensuel, d(2024, 1, 1), None).unwrap()
}

fn business() -> Vec<BudgetEntry> {
    vec![
        monthly(FlowType::Revenu, "Ventes", dec!(1000)),
        monthly(FlowType::Depense, "Achats", dec!(400)),
        monthly(FlowType::Depense, "Salaires", dec!(2000)),
    ]
}

fn regime(periodicity: DeclarationPeriodicity) -> VatRegime {
    VatRegime::new(ProjectId::new(), periodicity)
        .with_rate("Ventes", dec!(0.2))
        .with_rate("Achats", dec!(0.2))
}

fn month(y: i32, m: u32) -> Period {
    build_periods(d(y, m, 1), PeriodGranularity::Month, 1).remove(0)
}

#[test]
fn test_no_regime_returns_input_by_reference() {
    let entries = business();
    let periods = build_periods(d(2024, 1, 1), PeriodGranularity::Month, 3);

    let expanded = expand_vat_children(&entries, None);
    assert!(matches!(expanded, Cow::Borrowed(_)));
    assert!(std::ptr::eq(expanded.as_ptr(), entries.as_ptr()));

    let staged = apply_vat_stage(&entries, None, &periods);
    assert!(matches!(staged, Cow::Borrowed(_)));
    assert_eq!(staged.as_ref(), entries.as_slice());
}

#[test]
fn test_expansion_adds_children_for_rated_categories() {
    let entries = business();
    let regime = regime(DeclarationPeriodicity::Monthly);
    let expanded = expand_vat_children(&entries, Some(&regime));
    assert_eq!(expanded.len(), 5);

    let collected = expanded
        .iter()
        .find(|e| e.is_vat_child() && e.flow == FlowType::Revenu)
        .unwrap();
    assert_eq!(collected.amount, dec!(200.0));
    assert_eq!(collected.category, regime.collected_category);
    assert_eq!(collected.parent_id(), Some(entries[0].id));
    assert_eq!(collected.frequency(), Frequency::Mensuel);
    assert_eq!(collected.fixed_main_category(), Some(TAXES_MAIN_CATEGORY));

    let deductible = expanded
        .iter()
        .find(|e| e.is_vat_child() && e.flow == FlowType::Depense)
        .unwrap();
    assert_eq!(deductible.amount, dec!(80.0));
    assert_eq!(deductible.category, regime.deductible_category);
}

#[test]
fn test_expansion_is_stable() {
    let entries = business();
    let regime = regime(DeclarationPeriodicity::Monthly);
    let once = expand_vat_children(&entries, Some(&regime)).into_owned();
    let twice = expand_vat_children(&once, Some(&regime));
    assert!(matches!(twice, Cow::Borrowed(_)));
    assert_eq!(twice.as_ref(), once.as_slice());
}

#[test]
fn test_zero_rate_adds_nothing() {
    let entries = business();
    let regime = VatRegime::new(ProjectId::new(), DeclarationPeriodicity::Monthly)
        .with_rate("Ventes", Decimal::ZERO);
    assert!(matches!(expand_vat_children(&entries, Some(&regime)), Cow::Borrowed(_)));
}

#[test]
fn test_monthly_payment_due_next_month() {
    let regime = regime(DeclarationPeriodicity::Monthly);
    let expanded = expand_vat_children(&business(), Some(&regime)).into_owned();

    assert!(vat_payment_for_period(&expanded, &regime, &month(2024, 1)).is_none());

    let payment = vat_payment_for_period(&expanded, &regime, &month(2024, 2)).unwrap();
    assert!(payment.is_vat_payment());
    assert_eq!(payment.flow, FlowType::Depense);
    assert_eq!(payment.frequency(), Frequency::Ponctuel);
    assert_eq!(payment.amount, dec!(120.0));
    assert_eq!(amount_for_period(&payment, d(2024, 2, 20), d(2024, 2, 21)), dec!(120.0));
}

#[test]
fn test_quarterly_payment_with_lag() {
    let mut regime = regime(DeclarationPeriodicity::Quarterly);
    regime.payment_lag_months = 1;
    let expanded = expand_vat_children(&business(), Some(&regime)).into_owned();

    assert!(vat_payment_for_period(&expanded, &regime, &month(2024, 4)).is_none());
    let payment = vat_payment_for_period(&expanded, &regime, &month(2024, 5)).unwrap();
    assert_eq!(payment.amount, dec!(360.0));
    assert_eq!(amount_for_period(&payment, d(2024, 5, 20), d(2024, 5, 21)), dec!(360.0));
}

#[test]
fn test_payment_day_clamped_to_month_end() {
    let mut regime = regime(DeclarationPeriodicity::Monthly);
    regime.payment_day = 31;
    assert_eq!(regime.due_date(d(2024, 2, 1)), Some(d(2024, 2, 29)));
    assert_eq!(regime.due_date(d(2023, 2, 1)), Some(d(2023, 2, 28)));
}

#[test]
fn test_vat_credit_produces_no_payment() {
    let entries = vec![
        monthly(FlowType::Revenu, "Ventes", dec!(100)),
        monthly(FlowType::Depense, "Achats", dec!(900)),
    ];
    let regime = regime(DeclarationPeriodicity::Monthly);
    let expanded = expand_vat_children(&entries, Some(&regime)).into_owned();
    assert!(vat_payment_for_period(&expanded, &regime, &month(2024, 2)).is_none());
}

#[test]
fn test_wide_period_sums_every_due_window() {
    let regime = regime(DeclarationPeriodicity::Monthly);
    let expanded = expand_vat_children(&business(), Some(&regime)).into_owned();
    let year = build_periods(d(2024, 1, 1), PeriodGranularity::Year, 1).remove(0);

    let payment = vat_payment_for_period(&expanded, &regime, &year).unwrap();
    // Windows Jan..Nov 2024 fall due Feb..Dec; the December 2023 window is empty.
    assert_eq!(payment.amount, dec!(1320.0));
    assert_eq!(amount_for_period(&payment, d(2024, 2, 20), d(2024, 2, 21)), dec!(1320.0));
}

#[test]
fn test_apply_stage_is_deterministic() {
    let entries = business();
    let regime = regime(DeclarationPeriodicity::Monthly);
    let periods = build_periods(d(2024, 1, 1), PeriodGranularity::Month, 3);

    let first = apply_vat_stage(&entries, Some(&regime), &periods).into_owned();
    let second = apply_vat_stage(&entries, Some(&regime), &periods).into_owned();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3 + 2 + 2);
    assert_eq!(first.iter().filter(|e| e.is_vat_payment()).count(), 2);
}

#[test]
fn test_stage_reflects_changed_entries() {
    let regime = regime(DeclarationPeriodicity::Monthly);
    let periods = vec![month(2024, 2)];
    let mut entries = business();
    let before = apply_vat_stage(&entries, Some(&regime), &periods).into_owned();
    entries[0].amount = dec!(2000);
    let after = apply_vat_stage(&entries, Some(&regime), &periods).into_owned();

    let payment = |list: &[BudgetEntry]| list.iter().find(|e| e.is_vat_payment()).unwrap().amount;
    assert_eq!(payment(&before), dec!(120.0));
    assert_eq!(payment(&after), dec!(320.0));
}
