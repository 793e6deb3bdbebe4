//! VAT regime configuration.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use treso_shared::types::{CashAccountId, ProjectId};

use crate::dates::{add_months, days_in_month, start_of_month};

/// How often VAT is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationPeriodicity {
    /// One declaration per calendar month.
    Monthly,
    /// One declaration per calendar quarter.
    Quarterly,
    /// One declaration per calendar year.
    Annual,
}

impl DeclarationPeriodicity {
    /// Length of a declaration window in months.
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Annual => 12,
        }
    }

    /// True if `date` is the first day of a declaration window.
    #[must_use]
    pub fn starts_window(self, date: NaiveDate) -> bool {
        date.day() == 1 && date.month0() % self.months() == 0
    }
}

fn default_payment_day() -> u32 {
    20
}

fn default_collected_category() -> String {
    "TVA collectée".to_string()
}

fn default_deductible_category() -> String {
    "TVA déductible".to_string()
}

fn default_payment_category() -> String {
    "TVA à payer".to_string()
}

/// Per-project VAT rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatRegime {
    /// Project the regime applies to.
    pub project_id: ProjectId,
    /// Declaration window length.
    pub periodicity: DeclarationPeriodicity,
    /// VAT rate per sub-category (0.2 for 20%).
    #[serde(default)]
    pub rates: HashMap<String, Decimal>,
    /// Months between the end of a window and the month it is paid in.
    #[serde(default)]
    pub payment_lag_months: u32,
    /// Day of month the payment is due, clamped to the month length.
    #[serde(default = "default_payment_day")]
    pub payment_day: u32,
    /// Category of VAT children of revenue entries.
    #[serde(default = "default_collected_category")]
    pub collected_category: String,
    /// Category of VAT children of expense entries.
    #[serde(default = "default_deductible_category")]
    pub deductible_category: String,
    /// Category of synthesized VAT payments.
    #[serde(default = "default_payment_category")]
    pub payment_category: String,
    /// Account VAT payments are made from.
    #[serde(default)]
    pub payment_account: Option<CashAccountId>,
}

impl VatRegime {
    /// Creates a regime with no rates and default categories.
    #[must_use]
    pub fn new(project_id: ProjectId, periodicity: DeclarationPeriodicity) -> Self {
        Self {
            project_id,
            periodicity,
            rates: HashMap::new(),
            payment_lag_months: 0,
            payment_day: default_payment_day(),
            collected_category: default_collected_category(),
            deductible_category: default_deductible_category(),
            payment_category: default_payment_category(),
            payment_account: None,
        }
    }

    /// Adds a rate for `category`.
    #[must_use]
    pub fn with_rate(mut self, category: impl Into<String>, rate: Decimal) -> Self {
        self.rates.insert(category.into(), rate);
        self
    }

    /// Positive rate applying to `category`, if any.
    #[must_use]
    pub fn rate_for(&self, category: &str) -> Option<Decimal> {
        self.rates
            .get(category)
            .copied()
            .filter(|rate| *rate > Decimal::ZERO)
    }

    /// Due date of the window ending (exclusively) on `window_end`.
    #[must_use]
    pub fn due_date(&self, window_end: NaiveDate) -> Option<NaiveDate> {
        let month = start_of_month(add_months(window_end, i32::try_from(self.payment_lag_months).ok()?)?);
        let day = self
            .payment_day
            .clamp(1, days_in_month(month.year(), month.month()));
        month.with_day(day)
    }

    /// End of the window paid in the month starting on `due_month`, if that month is a due month.
    pub(crate) fn window_end_paid_in(&self, due_month: NaiveDate) -> Option<NaiveDate> {
        let window_end = add_months(due_month, -i32::try_from(self.payment_lag_months).ok()?)?;
        self.periodicity
            .starts_window(window_end)
            .then_some(window_end)
    }
}
