//! Loosely-typed persisted shape of a budget entry.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use treso_shared::types::{BudgetEntryId, CashAccountId};

use super::error::BudgetError;
use super::types::{BudgetEntry, FlowType, Frequency, Schedule, ScheduledPayment};

/// A budget entry as stored: frequency as text, every schedule field optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBudgetEntry {
    /// Entry ID.
    pub id: BudgetEntryId,
    /// Revenue or expense.
    #[serde(rename = "type")]
    pub flow: FlowType,
    /// Sub-category name.
    pub category: String,
    /// Counterparty.
    #[serde(default)]
    pub supplier: String,
    /// Amount per occurrence.
    pub amount: Decimal,
    /// Frequency name.
    pub frequency: String,
    /// Date of a one-off entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// First occurrence of a recurring entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Last day of a recurring entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Schedule of an irregular or provision entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payments: Option<Vec<ScheduledPayment>>,
    /// Off-budget flag.
    #[serde(default)]
    pub is_off_budget: bool,
    /// Provision flag.
    #[serde(default)]
    pub is_provision: bool,
    /// Derived VAT child flag.
    #[serde(default)]
    pub is_vat_child: bool,
    /// Derived VAT payment flag.
    #[serde(default)]
    pub is_vat_payment: bool,
    /// Expected cash account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_account: Option<CashAccountId>,
    /// Parent of a VAT child.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<BudgetEntryId>,
}

impl TryFrom<RawBudgetEntry> for BudgetEntry {
    type Error = BudgetError;

    fn try_from(raw: RawBudgetEntry) -> Result<Self, Self::Error> {
        let id = raw.id;
        let frequency: Frequency = raw
            .frequency
            .parse()
            .map_err(|frequency| BudgetError::UnknownFrequency { id, frequency })?;

        let schedule = match frequency {
            Frequency::Ponctuel => Schedule::OneOff {
                date: raw.date.ok_or(BudgetError::MissingDate(id))?,
            },
            Frequency::Irregulier | Frequency::Provision => Schedule::Scheduled {
                payments: raw.payments.ok_or(BudgetError::MissingPayments(id))?,
            },
            _ => Schedule::Recurring {
                start_date: raw.start_date.ok_or(BudgetError::MissingStartDate(id))?,
                end_date: raw.end_date,
            },
        };

        let mut entry = Self::new(id, raw.flow, raw.category, raw.amount, frequency, schedule)?;
        entry.supplier = raw.supplier;
        entry.is_off_budget = raw.is_off_budget;
        entry.is_provision = raw.is_provision || frequency == Frequency::Provision;
        entry.cash_account = raw.cash_account;
        // Derived flags round-trip so an expanded list can be persisted and reloaded.
        entry.is_vat_child = raw.is_vat_child;
        entry.is_vat_payment = raw.is_vat_payment;
        entry.parent_id = raw.parent_id;
        Ok(entry)
    }
}

impl From<BudgetEntry> for RawBudgetEntry {
    fn from(entry: BudgetEntry) -> Self {
        let (date, start_date, end_date, payments) = match entry.schedule {
            Schedule::OneOff { date } => (Some(date), None, None, None),
            Schedule::Recurring {
                start_date,
                end_date,
            } => (None, Some(start_date), end_date, None),
            Schedule::Scheduled { payments } => (None, None, None, Some(payments)),
        };

        Self {
            id: entry.id,
            flow: entry.flow,
            category: entry.category,
            supplier: entry.supplier,
            amount: entry.amount,
            frequency: entry.frequency.as_str().to_string(),
            date,
            start_date,
            end_date,
            payments,
            is_off_budget: entry.is_off_budget,
            is_provision: entry.is_provision,
            is_vat_child: entry.is_vat_child,
            is_vat_payment: entry.is_vat_payment,
            cash_account: entry.cash_account,
            parent_id: entry.parent_id,
        }
    }
}
