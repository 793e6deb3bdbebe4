//! Actual transaction data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use treso_shared::types::{ActualTransactionId, BudgetEntryId, CashAccountId, PaymentId};

/// Whether the transaction is money owed by us or to us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActualKind {
    /// We owe this amount.
    Payable,
    /// This amount is owed to us.
    Receivable,
}

impl ActualKind {
    /// `+1` for receivables, `-1` for payables.
    #[must_use]
    pub fn sign(self) -> Decimal {
        match self {
            Self::Receivable => Decimal::ONE,
            Self::Payable => Decimal::NEGATIVE_ONE,
        }
    }
}

/// Settlement state of an actual transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActualStatus {
    /// Nothing paid yet.
    Pending,
    /// Payable, partly paid.
    PartiallyPaid,
    /// Payable, fully paid.
    Paid,
    /// Receivable, partly received.
    PartiallyReceived,
    /// Receivable, fully received.
    Received,
    /// Closed with an unpaid remainder abandoned.
    WrittenOff,
}

/// One recorded money movement against a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Payment ID.
    pub id: PaymentId,
    /// Date the money moved.
    pub payment_date: NaiveDate,
    /// Amount moved.
    pub paid_amount: Decimal,
    /// Account credited or debited.
    pub cash_account: CashAccountId,
}

impl Payment {
    /// Creates a payment.
    #[must_use]
    pub fn new(payment_date: NaiveDate, paid_amount: Decimal, cash_account: CashAccountId) -> Self {
        Self {
            id: PaymentId::new(),
            payment_date,
            paid_amount,
            cash_account,
        }
    }

    /// Non-positive payments are malformed and never counted.
    #[must_use]
    pub fn is_countable(&self) -> bool {
        self.paid_amount > Decimal::ZERO
    }
}

/// The realized counterpart of a planned movement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualTransaction {
    /// Transaction ID.
    pub id: ActualTransactionId,
    /// Originating budget entry, if any.
    #[serde(default)]
    pub budget_id: Option<BudgetEntryId>,
    /// Payable or receivable.
    #[serde(rename = "type")]
    pub kind: ActualKind,
    /// Counterparty.
    #[serde(default)]
    pub third_party: Option<String>,
    /// Due date.
    pub date: NaiveDate,
    /// Amount due.
    pub amount: Decimal,
    /// Stored status.
    pub status: ActualStatus,
    /// Recorded payments, in order.
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl ActualTransaction {
    /// Creates a pending transaction with no payments.
    #[must_use]
    pub fn new(kind: ActualKind, date: NaiveDate, amount: Decimal) -> Self {
        Self {
            id: ActualTransactionId::new(),
            budget_id: None,
            kind,
            third_party: None,
            date,
            amount,
            status: ActualStatus::Pending,
            payments: Vec::new(),
        }
    }

    /// Links the transaction to a budget entry.
    #[must_use]
    pub fn for_entry(mut self, budget_id: BudgetEntryId) -> Self {
        self.budget_id = Some(budget_id);
        self
    }

    /// Sets the counterparty.
    #[must_use]
    pub fn with_third_party(mut self, third_party: impl Into<String>) -> Self {
        self.third_party = Some(third_party.into());
        self
    }

    /// Records a payment and refreshes the status.
    ///
    /// `is_final` closes the transaction even when underpaid.
    pub fn record_payment(&mut self, payment: Payment, is_final: bool) {
        self.payments.push(payment);
        self.status = self.derive_status(is_final);
    }

    /// Sum of countable payments.
    #[must_use]
    pub fn paid_total(&self) -> Decimal {
        self.payments
            .iter()
            .filter(|p| p.is_countable())
            .map(|p| p.paid_amount)
            .sum()
    }

    /// Amount still due, never negative.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        (self.amount - self.paid_total()).max(Decimal::ZERO)
    }

    /// Amount paid beyond what was due, zero otherwise.
    #[must_use]
    pub fn advance(&self) -> Decimal {
        (self.paid_total() - self.amount).max(Decimal::ZERO)
    }

    /// Written off, or nothing left to pay.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.status == ActualStatus::WrittenOff || self.remaining().is_zero()
    }

    /// Status implied by the payment total.
    #[must_use]
    pub fn derive_status(&self, is_final: bool) -> ActualStatus {
        let paid = self.paid_total();
        if paid >= self.amount && !paid.is_zero() {
            return match self.kind {
                ActualKind::Payable => ActualStatus::Paid,
                ActualKind::Receivable => ActualStatus::Received,
            };
        }
        if is_final {
            return ActualStatus::WrittenOff;
        }
        if paid.is_zero() {
            return ActualStatus::Pending;
        }
        match self.kind {
            ActualKind::Payable => ActualStatus::PartiallyPaid,
            ActualKind::Receivable => ActualStatus::PartiallyReceived,
        }
    }
}
