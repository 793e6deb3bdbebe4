//! Realized amounts and arrears from recorded payments.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use treso_shared::AdvancePolicySetting;

use super::types::{ActualKind, ActualTransaction, Payment};
use crate::budget::BudgetEntry;

/// What happens to the surplus of an overpaid transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancePolicy {
    /// The surplus stays on its transaction.
    #[default]
    KeepOnTransaction,
    /// The surplus pays down the same counterparty's next unsettled dues.
    ApplyToNextDue,
}

impl From<AdvancePolicySetting> for AdvancePolicy {
    fn from(setting: AdvancePolicySetting) -> Self {
        match setting {
            AdvancePolicySetting::KeepOnTransaction => Self::KeepOnTransaction,
            AdvancePolicySetting::ApplyToNextDue => Self::ApplyToNextDue,
        }
    }
}

/// Money in and out over a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CashFlows {
    /// Total received.
    pub inflow: Decimal,
    /// Total paid out.
    pub outflow: Decimal,
}

impl CashFlows {
    /// `inflow - outflow`.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.inflow - self.outflow
    }
}

/// Amount actually paid against `entry` with a payment date in `[start, end)`.
#[must_use]
pub fn realized_for_period(
    entry: &BudgetEntry,
    actuals: &[ActualTransaction],
    start: NaiveDate,
    end: NaiveDate,
) -> Decimal {
    actuals
        .iter()
        .filter(|a| a.budget_id == Some(entry.id))
        .flat_map(|a| &a.payments)
        .filter(|p| p.is_countable() && p.payment_date >= start && p.payment_date < end)
        .map(|p| p.paid_amount)
        .sum()
}

/// Receivable and payable payments dated in `[start, end)` that pass `filter`.
///
/// A `None` start means "since the beginning".
pub fn payment_flows_between<F>(
    actuals: &[ActualTransaction],
    start: Option<NaiveDate>,
    end: NaiveDate,
    filter: F,
) -> CashFlows
where
    F: Fn(&Payment) -> bool,
{
    let in_window = |p: &Payment| start.is_none_or(|s| p.payment_date >= s) && p.payment_date < end;

    actuals.iter().fold(CashFlows::default(), |mut flows, actual| {
        let total: Decimal = actual
            .payments
            .iter()
            .filter(|p| p.is_countable() && in_window(p) && filter(p))
            .map(|p| p.paid_amount)
            .sum();
        match actual.kind {
            ActualKind::Receivable => flows.inflow += total,
            ActualKind::Payable => flows.outflow += total,
        }
        flows
    })
}

/// Net of payments in `[start, end)`: receivables add, payables subtract.
pub fn net_payments_between<F>(
    actuals: &[ActualTransaction],
    start: Option<NaiveDate>,
    end: NaiveDate,
    filter: F,
) -> Decimal
where
    F: Fn(&Payment) -> bool,
{
    payment_flows_between(actuals, start, end, filter).net()
}

/// Net unpaid remainder of transactions due strictly before `today`.
///
/// Receivables add, payables subtract; settled and written-off transactions
/// contribute nothing.
pub fn arrears_before<F>(
    actuals: &[ActualTransaction],
    today: NaiveDate,
    policy: AdvancePolicy,
    filter: F,
) -> Decimal
where
    F: Fn(&ActualTransaction) -> bool,
{
    let in_scope: Vec<&ActualTransaction> = actuals.iter().filter(|a| filter(*a)).collect();

    let remainders = match policy {
        AdvancePolicy::KeepOnTransaction => in_scope
            .iter()
            .map(|a| (*a, unsettled_remaining(a)))
            .collect(),
        AdvancePolicy::ApplyToNextDue => remainders_after_advances(&in_scope),
    };

    remainders
        .into_iter()
        .filter(|(a, _)| a.date < today)
        .map(|(a, remaining)| a.kind.sign() * remaining)
        .sum()
}

/// Unpaid remainders once each counterparty's surpluses have paid down its later dues.
fn remainders_after_advances<'a>(
    actuals: &[&'a ActualTransaction],
) -> Vec<(&'a ActualTransaction, Decimal)> {
    let mut groups: HashMap<(ActualKind, &str), Vec<&'a ActualTransaction>> = HashMap::new();
    let mut result = Vec::with_capacity(actuals.len());

    for actual in actuals {
        match actual.third_party.as_deref() {
            Some(party) => groups.entry((actual.kind, party)).or_default().push(actual),
            None => result.push((*actual, unsettled_remaining(actual))),
        }
    }

    for mut group in groups.into_values() {
        group.sort_by_key(|a| a.date);
        let mut credit = Decimal::ZERO;
        for actual in group {
            credit += actual.advance();
            let remaining = unsettled_remaining(actual);
            let applied = remaining.min(credit);
            credit -= applied;
            result.push((actual, remaining - applied));
        }
    }

    result
}

fn unsettled_remaining(actual: &ActualTransaction) -> Decimal {
    if actual.is_settled() {
        Decimal::ZERO
    } else {
        actual.remaining()
    }
}
