//! Budget entry data types.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use treso_shared::types::{BudgetEntryId, CashAccountId};

use super::error::BudgetError;
use super::raw::RawBudgetEntry;
use crate::dates::CalendarStep;

/// Main category every VAT-derived entry rolls up under.
pub const TAXES_MAIN_CATEGORY: &str = "Taxes";

/// Direction of a planned movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    /// Money coming in.
    Revenu,
    /// Money going out.
    Depense,
}

impl FlowType {
    /// `+1` for revenue, `-1` for expenses.
    #[must_use]
    pub fn sign(self) -> Decimal {
        match self {
            Self::Revenu => Decimal::ONE,
            Self::Depense => Decimal::NEGATIVE_ONE,
        }
    }
}

/// How often a budget entry occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Once, on a single date.
    Ponctuel,
    /// Every day.
    Journalier,
    /// Every 7 days.
    Hebdomadaire,
    /// Every calendar month.
    Mensuel,
    /// Every 2 months.
    Bimestriel,
    /// Every 3 months.
    Trimestriel,
    /// Every 12 months.
    Annuel,
    /// Explicit, non-regular schedule.
    Irregulier,
    /// Explicit schedule of earmarked funds.
    Provision,
}

impl Frequency {
    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ponctuel => "ponctuel",
            Self::Journalier => "journalier",
            Self::Hebdomadaire => "hebdomadaire",
            Self::Mensuel => "mensuel",
            Self::Bimestriel => "bimestriel",
            Self::Trimestriel => "trimestriel",
            Self::Annuel => "annuel",
            Self::Irregulier => "irregulier",
            Self::Provision => "provision",
        }
    }

    /// Calendar increment between occurrences, for regular frequencies only.
    #[must_use]
    pub const fn step(self) -> Option<CalendarStep> {
        match self {
            Self::Journalier => Some(CalendarStep::Days(1)),
            Self::Hebdomadaire => Some(CalendarStep::Days(7)),
            Self::Mensuel => Some(CalendarStep::Months(1)),
            Self::Bimestriel => Some(CalendarStep::Months(2)),
            Self::Trimestriel => Some(CalendarStep::Months(3)),
            Self::Annuel => Some(CalendarStep::Months(12)),
            Self::Ponctuel | Self::Irregulier | Self::Provision => None,
        }
    }

    /// True for frequencies driven by an explicit payment schedule.
    #[must_use]
    pub const fn is_scheduled(self) -> bool {
        matches!(self, Self::Irregulier | Self::Provision)
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ponctuel" => Ok(Self::Ponctuel),
            "journalier" => Ok(Self::Journalier),
            "hebdomadaire" => Ok(Self::Hebdomadaire),
            "mensuel" => Ok(Self::Mensuel),
            "bimestriel" => Ok(Self::Bimestriel),
            "trimestriel" => Ok(Self::Trimestriel),
            "annuel" => Ok(Self::Annuel),
            "irregulier" | "irrégulier" => Ok(Self::Irregulier),
            "provision" => Ok(Self::Provision),
            _ => Err(s.to_string()),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of an explicit payment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledPayment {
    /// Date the amount is expected.
    pub date: NaiveDate,
    /// Expected amount.
    pub amount: Decimal,
}

/// When a budget entry occurs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    /// A single date.
    OneOff {
        /// Occurrence date.
        date: NaiveDate,
    },
    /// A regular series from `start_date`, optionally bounded.
    Recurring {
        /// First occurrence.
        start_date: NaiveDate,
        /// Last day an occurrence may fall on (inclusive).
        end_date: Option<NaiveDate>,
    },
    /// Explicit dated amounts.
    Scheduled {
        /// Ordered payment schedule.
        payments: Vec<ScheduledPayment>,
    },
}

impl Schedule {
    /// Whether this schedule shape is valid for `frequency`.
    #[must_use]
    pub fn fits(&self, frequency: Frequency) -> bool {
        match self {
            Self::OneOff { .. } => frequency == Frequency::Ponctuel,
            Self::Scheduled { .. } => frequency.is_scheduled(),
            Self::Recurring { .. } => frequency.step().is_some(),
        }
    }

    /// Returns a copy with every scheduled amount multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: Decimal) -> Self {
        match self {
            Self::Scheduled { payments } => Self::Scheduled {
                payments: payments
                    .iter()
                    .map(|p| ScheduledPayment {
                        date: p.date,
                        amount: p.amount * factor,
                    })
                    .collect(),
            },
            other => other.clone(),
        }
    }
}

/// A planned cash movement.
///
/// The `(frequency, schedule)` pair is validated on construction, and the
/// derived VAT flags can only be set by the VAT stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBudgetEntry", into = "RawBudgetEntry")]
pub struct BudgetEntry {
    /// Entry ID.
    pub id: BudgetEntryId,
    /// Revenue or expense.
    pub flow: FlowType,
    /// Sub-category name.
    pub category: String,
    /// Counterparty, free text.
    pub supplier: String,
    /// Amount per occurrence.
    pub amount: Decimal,
    /// Excluded from category totals, aggregated separately.
    pub is_off_budget: bool,
    /// Funds earmarked until released.
    pub is_provision: bool,
    /// Account the movement is expected to hit.
    pub cash_account: Option<CashAccountId>,
    pub(crate) frequency: Frequency,
    pub(crate) schedule: Schedule,
    pub(crate) is_vat_child: bool,
    pub(crate) is_vat_payment: bool,
    pub(crate) parent_id: Option<BudgetEntryId>,
}

impl BudgetEntry {
    /// Creates a validated entry.
    pub fn new(
        id: BudgetEntryId,
        flow: FlowType,
        category: impl Into<String>,
        amount: Decimal,
        frequency: Frequency,
        schedule: Schedule,
    ) -> Result<Self, BudgetError> {
        if !schedule.fits(frequency) {
            return Err(BudgetError::ScheduleMismatch {
                id,
                frequency: frequency.to_string(),
            });
        }
        if let Schedule::Recurring {
            start_date,
            end_date: Some(end),
        } = schedule
        {
            if end < start_date {
                return Err(BudgetError::EndBeforeStart(id));
            }
        }

        Ok(Self {
            id,
            flow,
            category: category.into(),
            supplier: String::new(),
            amount,
            is_off_budget: false,
            is_provision: frequency == Frequency::Provision,
            cash_account: None,
            frequency,
            schedule,
            is_vat_child: false,
            is_vat_payment: false,
            parent_id: None,
        })
    }

    /// Shorthand for a `ponctuel` entry.
    #[must_use]
    pub fn one_off(flow: FlowType, category: impl Into<String>, amount: Decimal, date: NaiveDate) -> Self {
        Self {
            id: BudgetEntryId::new(),
            flow,
            category: category.into(),
            supplier: String::new(),
            amount,
            is_off_budget: false,
            is_provision: false,
            cash_account: None,
            frequency: Frequency::Ponctuel,
            schedule: Schedule::OneOff { date },
            is_vat_child: false,
            is_vat_payment: false,
            parent_id: None,
        }
    }

    /// Shorthand for a regular series.
    pub fn recurring(
        flow: FlowType,
        category: impl Into<String>,
        amount: Decimal,
        frequency: Frequency,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, BudgetError> {
        Self::new(
            BudgetEntryId::new(),
            flow,
            category,
            amount,
            frequency,
            Schedule::Recurring {
                start_date,
                end_date,
            },
        )
    }

    /// Sets the counterparty.
    #[must_use]
    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = supplier.into();
        self
    }

    /// Sets the expected cash account.
    #[must_use]
    pub fn with_cash_account(mut self, account: CashAccountId) -> Self {
        self.cash_account = Some(account);
        self
    }

    /// Marks the entry as off-budget.
    #[must_use]
    pub fn off_budget(mut self) -> Self {
        self.is_off_budget = true;
        self
    }

    /// Occurrence frequency.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Occurrence schedule.
    #[must_use]
    pub const fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// True for VAT children produced by static expansion.
    #[must_use]
    pub const fn is_vat_child(&self) -> bool {
        self.is_vat_child
    }

    /// True for synthesized VAT payments.
    #[must_use]
    pub const fn is_vat_payment(&self) -> bool {
        self.is_vat_payment
    }

    /// True for any entry produced by the VAT stage.
    #[must_use]
    pub const fn is_vat_derived(&self) -> bool {
        self.is_vat_child || self.is_vat_payment
    }

    /// Entry a VAT child was derived from.
    #[must_use]
    pub const fn parent_id(&self) -> Option<BudgetEntryId> {
        self.parent_id
    }

    /// Main category the entry rolls up under when it is fixed by construction.
    #[must_use]
    pub const fn fixed_main_category(&self) -> Option<&'static str> {
        if self.is_vat_derived() {
            Some(TAXES_MAIN_CATEGORY)
        } else {
            None
        }
    }

    /// Builds the VAT child of this entry.
    pub(crate) fn vat_child(&self, rate: Decimal, category: &str) -> Self {
        Self {
            id: self.id.derive("vat"),
            flow: self.flow,
            category: category.to_string(),
            supplier: self.supplier.clone(),
            amount: self.amount * rate,
            is_off_budget: self.is_off_budget,
            is_provision: self.is_provision,
            cash_account: self.cash_account,
            frequency: self.frequency,
            schedule: self.schedule.scaled(rate),
            is_vat_child: true,
            is_vat_payment: false,
            parent_id: Some(self.id),
        }
    }

    /// Builds a synthesized VAT payment.
    pub(crate) fn vat_payment(
        id: BudgetEntryId,
        category: &str,
        amount: Decimal,
        date: NaiveDate,
        cash_account: Option<CashAccountId>,
    ) -> Self {
        let mut entry = Self::one_off(FlowType::Depense, category, amount, date);
        entry.id = id;
        entry.supplier = "VAT".to_string();
        entry.cash_account = cash_account;
        entry.is_vat_payment = true;
        entry
    }
}
