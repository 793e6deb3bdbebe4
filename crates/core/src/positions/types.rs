//! Position data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use treso_shared::types::CashAccountId;

use crate::accounts::CashAccount;
use crate::actuals::{AdvancePolicy, ActualTransaction};
use crate::aggregation::CategoryTree;
use crate::budget::BudgetEntry;
use crate::dates::Period;

/// Which accounts a projection covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "id")]
pub enum AccountScope {
    /// Every account.
    #[default]
    All,
    /// A single account.
    Account(CashAccountId),
}

impl AccountScope {
    /// True if movements on `account` are in scope.
    #[must_use]
    pub fn admits(self, account: CashAccountId) -> bool {
        match self {
            Self::All => true,
            Self::Account(id) => id == account,
        }
    }
}

/// How a period's movement was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionMode {
    /// From recorded payments.
    Actual,
    /// From budgeted amounts.
    Projected,
}

/// Where "today" falls relative to the period sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TodayIndex {
    /// Before the first period.
    Before,
    /// Inside the period at this index.
    Within(usize),
    /// After the last period.
    After,
}

impl TodayIndex {
    /// Locates `today` in an ordered, contiguous period sequence.
    #[must_use]
    pub fn locate(periods: &[Period], today: NaiveDate) -> Self {
        if let Some(index) = periods.iter().position(|p| p.contains(today)) {
            return Self::Within(index);
        }
        match periods.first() {
            Some(first) if today < first.start_date => Self::Before,
            None => Self::Before,
            Some(_) => Self::After,
        }
    }

    /// Index of the last period computed from recorded payments.
    #[must_use]
    pub fn last_actual(self, period_count: usize) -> Option<usize> {
        match self {
            Self::Before => None,
            Self::Within(index) => Some(index),
            Self::After => period_count.checked_sub(1),
        }
    }
}

/// Everything a position computation reads.
#[derive(Debug, Clone, Copy, Hash)]
pub struct PositionInput<'a> {
    /// Ordered, contiguous periods.
    pub periods: &'a [Period],
    /// Cash accounts with their opening balances.
    pub accounts: &'a [CashAccount],
    /// Entries after the VAT stage.
    pub entries: &'a [BudgetEntry],
    /// Actual transactions with their payments.
    pub actuals: &'a [ActualTransaction],
    /// Main categories the entries roll up under.
    pub categories: &'a CategoryTree,
    /// Accounts covered.
    pub scope: AccountScope,
    /// Treatment of overpayments in arrears.
    pub advance_policy: AdvancePolicy,
}

/// Balance and movement of one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodPosition {
    /// Period label.
    pub label: String,
    /// Balance at the start of the period.
    pub initial: Decimal,
    /// Balance at the end of the period.
    #[serde(rename = "final")]
    pub final_balance: Decimal,
    /// Money in.
    pub inflow: Decimal,
    /// Money out.
    pub outflow: Decimal,
    /// Arrears booked into this period (first projected period only).
    pub arrears: Decimal,
    /// How the movement was computed.
    pub mode: PositionMode,
}

/// Positions over a whole period sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    /// Where today fell.
    pub today_index: TodayIndex,
    /// Balance before the first period.
    pub opening_balance: Decimal,
    /// One position per period, in order.
    pub positions: Vec<PeriodPosition>,
    /// Whether this report came from the cache.
    pub cached: bool,
}

impl PositionReport {
    /// Balance at the end of the last period.
    #[must_use]
    pub fn closing_balance(&self) -> Decimal {
        self.positions
            .last()
            .map_or(self.opening_balance, |p| p.final_balance)
    }
}
