//! Cash accounts holding the running balance.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use treso_shared::types::CashAccountId;

/// Classification of a cash account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountCategory {
    /// Bank account.
    Bank,
    /// Petty cash.
    Cash,
    /// Mobile money wallet.
    MobileMoney,
    /// Savings account.
    Savings,
    /// Account holding provisioned funds.
    Provisions,
}

/// A cash account and its opening balance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashAccount {
    /// Account ID.
    pub id: CashAccountId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Balance on `initial_balance_date`.
    pub initial_balance: Decimal,
    /// Date the opening balance was taken.
    pub initial_balance_date: NaiveDate,
    /// Classification.
    #[serde(rename = "mainCategoryId")]
    pub main_category: AccountCategory,
    /// Closed accounts get no per-account projection.
    #[serde(default)]
    pub is_closed: bool,
}

impl CashAccount {
    /// Creates an open account.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        main_category: AccountCategory,
        initial_balance: Decimal,
        initial_balance_date: NaiveDate,
    ) -> Self {
        Self {
            id: CashAccountId::new(),
            name: name.into(),
            initial_balance,
            initial_balance_date,
            main_category,
            is_closed: false,
        }
    }

    /// True if a payment dated `date` is not already part of the opening balance.
    #[must_use]
    pub fn counts_payment_on(&self, date: NaiveDate) -> bool {
        date >= self.initial_balance_date
    }
}
