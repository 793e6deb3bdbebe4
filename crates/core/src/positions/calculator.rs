//! Running cash position over a period sequence.

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::NaiveDate;
use rayon::prelude::*;
use rust_decimal::Decimal;
use tracing::{debug, warn};
use treso_shared::types::{BudgetEntryId, CashAccountId};

use super::types::{
    AccountScope, PeriodPosition, PositionInput, PositionMode, PositionReport, TodayIndex,
};
use crate::actuals::{
    ActualTransaction, CashFlows, Payment, arrears_before, net_payments_between,
    payment_flows_between,
};
use crate::aggregation::budgeted_flows;
use crate::budget::BudgetEntry;

/// Computes the position of every period.
///
/// Periods up to the one containing `today` use recorded payments; later
/// periods use budgeted amounts. Arrears due before `today` are booked into
/// the first projected period, so each period starts where the previous one
/// ended.
#[must_use]
pub fn compute_positions(input: &PositionInput<'_>, today: NaiveDate) -> PositionReport {
    let today_index = TodayIndex::locate(input.periods, today);
    let scope = input.scope;

    let opened_on: HashMap<CashAccountId, NaiveDate> = input
        .accounts
        .iter()
        .map(|a| (a.id, a.initial_balance_date))
        .collect();
    let counts = |p: &Payment| {
        scope.admits(p.cash_account)
            && opened_on
                .get(&p.cash_account)
                .is_none_or(|opened| p.payment_date >= *opened)
    };

    let initial_balances: Decimal = input
        .accounts
        .iter()
        .filter(|a| scope.admits(a.id))
        .map(|a| a.initial_balance)
        .sum();

    let Some(first) = input.periods.first() else {
        return PositionReport {
            today_index,
            opening_balance: initial_balances,
            positions: Vec::new(),
            cached: false,
        };
    };

    let opening_balance =
        initial_balances + net_payments_between(input.actuals, None, first.start_date, counts);

    let entries = scoped_entries(input.entries, scope);
    let unclassified = input.categories.unclassified(&entries).len();
    if unclassified > 0 {
        warn!(
            unclassified,
            "Entries outside every main category are projected under their flow"
        );
    }
    let last_actual = today_index.last_actual(input.periods.len());
    let has_projection = last_actual.is_none_or(|i| i + 1 < input.periods.len());
    let arrears = if has_projection {
        arrears_before(
            input.actuals,
            today,
            input.advance_policy,
            transactions_in_scope(input.entries, scope),
        )
    } else {
        Decimal::ZERO
    };
    debug!(?today_index, %opening_balance, %arrears, "Computing period positions");

    let first_projected = last_actual.map_or(0, |last| last + 1);
    let mut balance = opening_balance;
    let positions = input
        .periods
        .iter()
        .enumerate()
        .map(|(index, period)| {
            let is_actual = last_actual.is_some_and(|last| index <= last);
            let (flows, mode) = if is_actual {
                (
                    payment_flows_between(
                        input.actuals,
                        Some(period.start_date),
                        period.end_date,
                        counts,
                    ),
                    PositionMode::Actual,
                )
            } else {
                (
                    budgeted_flows(&input.categories.main_categories, period, &entries),
                    PositionMode::Projected,
                )
            };
            let booked_arrears = if index == first_projected {
                arrears
            } else {
                Decimal::ZERO
            };

            let initial = balance;
            balance = initial + booked_arrears + flows.net();
            position(period.label.clone(), initial, balance, flows, booked_arrears, mode)
        })
        .collect();

    PositionReport {
        today_index,
        opening_balance,
        positions,
        cached: false,
    }
}

/// One report per open account, computed in parallel.
#[must_use]
pub fn positions_by_account(
    input: &PositionInput<'_>,
    today: NaiveDate,
) -> Vec<(CashAccountId, PositionReport)> {
    input
        .accounts
        .par_iter()
        .filter(|account| !account.is_closed)
        .map(|account| {
            let scoped = PositionInput {
                scope: AccountScope::Account(account.id),
                ..*input
            };
            (account.id, compute_positions(&scoped, today))
        })
        .collect()
}

fn position(
    label: String,
    initial: Decimal,
    final_balance: Decimal,
    flows: CashFlows,
    arrears: Decimal,
    mode: PositionMode,
) -> PeriodPosition {
    PeriodPosition {
        label,
        initial,
        final_balance,
        inflow: flows.inflow,
        outflow: flows.outflow,
        arrears,
        mode,
    }
}

/// Entries projected in `scope`: all of them, or those expected on the account.
fn scoped_entries(entries: &[BudgetEntry], scope: AccountScope) -> Cow<'_, [BudgetEntry]> {
    match scope {
        AccountScope::All => Cow::Borrowed(entries),
        AccountScope::Account(id) => Cow::Owned(
            entries
                .iter()
                .filter(|e| e.cash_account == Some(id))
                .cloned()
                .collect(),
        ),
    }
}

/// Predicate selecting the transactions whose arrears belong to `scope`.
///
/// For one account: transactions whose home account is that account, so an
/// unsettled remainder is booked in exactly one per-account report.
fn transactions_in_scope(
    entries: &[BudgetEntry],
    scope: AccountScope,
) -> impl Fn(&ActualTransaction) -> bool {
    let expected_on: HashMap<BudgetEntryId, CashAccountId> = match scope {
        AccountScope::All => HashMap::new(),
        AccountScope::Account(_) => entries
            .iter()
            .filter_map(|e| e.cash_account.map(|account| (e.id, account)))
            .collect(),
    };
    move |a: &ActualTransaction| match scope {
        AccountScope::All => true,
        AccountScope::Account(id) => home_account(a, &expected_on) == Some(id),
    }
}

/// Account an actual's arrears are booked on: the account its entry is
/// expected on, else the account of its first payment.
fn home_account(
    actual: &ActualTransaction,
    expected_on: &HashMap<BudgetEntryId, CashAccountId>,
) -> Option<CashAccountId> {
    actual
        .budget_id
        .and_then(|id| expected_on.get(&id).copied())
        .or_else(|| actual.payments.first().map(|p| p.cash_account))
}
