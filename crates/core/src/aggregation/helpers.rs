//! Row, main-category, and flow-level totals for one period.

use rust_decimal::Decimal;

use super::types::{FlowKind, MainCategory, PeriodTotals, RowAmounts};
use crate::actuals::{ActualTransaction, CashFlows, realized_for_period};
use crate::budget::{BudgetEntry, FlowType};
use crate::dates::Period;
use crate::recurrence::amount_for_period;

/// Budgeted, realized, and remaining amount of `entry` in `period`.
#[must_use]
pub fn row_amounts(entry: &BudgetEntry, actuals: &[ActualTransaction], period: &Period) -> RowAmounts {
    let budget = amount_for_period(entry, period.start_date, period.end_date);
    let actual = realized_for_period(entry, actuals, period.start_date, period.end_date);
    RowAmounts {
        budget,
        actual,
        reste: budget - actual,
    }
}

/// Sum of row amounts over entries sharing a main category.
pub fn main_category_totals<'a, I>(
    entries: I,
    period: &Period,
    actuals: &[ActualTransaction],
) -> PeriodTotals
where
    I: IntoIterator<Item = &'a BudgetEntry>,
{
    entries
        .into_iter()
        .map(|entry| PeriodTotals::from(row_amounts(entry, actuals, period)))
        .sum()
}

/// Totals of every main category of direction `flow`, plus the off-budget
/// bucket of that direction when enabled.
///
/// Off-budget entries are matched on `is_off_budget` and flow, never on
/// category membership.
#[must_use]
pub fn general_totals(
    main_categories: &[MainCategory],
    period: &Period,
    flow: FlowKind,
    all_entries: &[BudgetEntry],
    actuals: &[ActualTransaction],
    has_off_budget_revenue: bool,
    has_off_budget_expense: bool,
) -> PeriodTotals {
    let in_budget: PeriodTotals = main_categories
        .iter()
        .filter(|main| main.flow == flow)
        .map(|main| {
            main_category_totals(
                all_entries.iter().filter(|e| main.includes(e)),
                period,
                actuals,
            )
        })
        .sum();

    let include_off_budget = match flow {
        FlowKind::Entree => has_off_budget_revenue,
        FlowKind::Sortie => has_off_budget_expense,
    };
    if !include_off_budget {
        return in_budget;
    }

    in_budget + off_budget_totals(all_entries, period, flow, actuals)
}

/// Totals of the off-budget entries of direction `flow`.
#[must_use]
pub fn off_budget_totals(
    entries: &[BudgetEntry],
    period: &Period,
    flow: FlowKind,
    actuals: &[ActualTransaction],
) -> PeriodTotals {
    main_category_totals(
        entries
            .iter()
            .filter(|e| e.is_off_budget && FlowKind::from(e.flow) == flow),
        period,
        actuals,
    )
}

/// True if any off-budget entry of `flow` exists.
#[must_use]
pub fn has_off_budget(entries: &[BudgetEntry], flow: FlowType) -> bool {
    entries.iter().any(|e| e.is_off_budget && e.flow == flow)
}

/// Budgeted inflow and outflow over `period`, off-budget buckets included.
///
/// Only budgeted amounts are summed. In-budget entries no main category
/// claims are still projected, under their own flow.
#[must_use]
pub fn budgeted_flows(
    main_categories: &[MainCategory],
    period: &Period,
    entries: &[BudgetEntry],
) -> CashFlows {
    let budget_of = |flow: FlowKind| -> Decimal {
        let classified: Decimal = main_categories
            .iter()
            .filter(|main| main.flow == flow)
            .map(|main| {
                budget_between(entries.iter().filter(|e| main.includes(e)), period)
            })
            .sum();
        let rest = budget_between(
            entries.iter().filter(|e| {
                FlowKind::from(e.flow) == flow
                    && (e.is_off_budget || !main_categories.iter().any(|m| m.includes(e)))
            }),
            period,
        );
        classified + rest
    };
    CashFlows {
        inflow: budget_of(FlowKind::Entree),
        outflow: budget_of(FlowKind::Sortie),
    }
}

fn budget_between<'a>(entries: impl Iterator<Item = &'a BudgetEntry>, period: &Period) -> Decimal {
    entries
        .map(|entry| amount_for_period(entry, period.start_date, period.end_date))
        .sum()
}
