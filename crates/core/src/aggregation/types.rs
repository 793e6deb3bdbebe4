//! Aggregation data types.

use std::collections::BTreeSet;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budget::{BudgetEntry, FlowType, TAXES_MAIN_CATEGORY};

/// Flow direction of a main category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    /// Money in.
    Entree,
    /// Money out.
    Sortie,
}

impl From<FlowType> for FlowKind {
    fn from(flow: FlowType) -> Self {
        match flow {
            FlowType::Revenu => Self::Entree,
            FlowType::Depense => Self::Sortie,
        }
    }
}

/// Budgeted, realized, and remaining amounts of one row for one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowAmounts {
    /// Budgeted amount.
    pub budget: Decimal,
    /// Realized amount.
    pub actual: Decimal,
    /// `budget - actual`.
    pub reste: Decimal,
}

/// Budgeted and realized totals for one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Budgeted total.
    pub budget: Decimal,
    /// Realized total.
    pub actual: Decimal,
}

impl Add for PeriodTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            budget: self.budget + rhs.budget,
            actual: self.actual + rhs.actual,
        }
    }
}

impl AddAssign for PeriodTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for PeriodTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl From<RowAmounts> for PeriodTotals {
    fn from(row: RowAmounts) -> Self {
        Self {
            budget: row.budget,
            actual: row.actual,
        }
    }
}

/// A named group of sub-categories sharing a flow direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainCategory {
    /// Display name.
    pub name: String,
    /// Flow direction.
    #[serde(rename = "type")]
    pub flow: FlowKind,
    /// Sub-category names.
    #[serde(default)]
    pub sub_categories: Vec<String>,
}

impl MainCategory {
    /// Creates a main category.
    #[must_use]
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        flow: FlowKind,
        sub_categories: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            flow,
            sub_categories: sub_categories.into_iter().map(Into::into).collect(),
        }
    }

    /// True if `entry` rolls up under this main category.
    ///
    /// Off-budget entries belong to no main category; VAT-derived entries
    /// belong to the taxes category of their flow.
    #[must_use]
    pub fn includes(&self, entry: &BudgetEntry) -> bool {
        if entry.is_off_budget || FlowKind::from(entry.flow) != self.flow {
            return false;
        }
        match entry.fixed_main_category() {
            Some(name) => name == self.name,
            None => self.sub_categories.iter().any(|c| *c == entry.category),
        }
    }
}

/// Main categories an entry set is grouped under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryTree {
    /// Main categories, in display order.
    pub main_categories: Vec<MainCategory>,
}

impl CategoryTree {
    /// Builds a tree from user-defined main categories, adding the taxes
    /// categories when missing.
    #[must_use]
    pub fn new(main_categories: Vec<MainCategory>) -> Self {
        let mut tree = Self { main_categories };
        for flow in [FlowKind::Entree, FlowKind::Sortie] {
            let present = tree
                .main_categories
                .iter()
                .any(|m| m.name == TAXES_MAIN_CATEGORY && m.flow == flow);
            if !present {
                tree.main_categories
                    .push(MainCategory::new(TAXES_MAIN_CATEGORY, flow, Vec::<String>::new()));
            }
        }
        tree
    }

    /// One "Entrées" and one "Sorties" main category holding every
    /// sub-category seen in `entries`.
    #[must_use]
    pub fn inferred(entries: &[BudgetEntry]) -> Self {
        let collect = |flow: FlowType| -> BTreeSet<&str> {
            entries
                .iter()
                .filter(|e| e.flow == flow && !e.is_vat_derived())
                .map(|e| e.category.as_str())
                .collect()
        };
        Self::new(vec![
            MainCategory::new("Entrées", FlowKind::Entree, collect(FlowType::Revenu)),
            MainCategory::new("Sorties", FlowKind::Sortie, collect(FlowType::Depense)),
        ])
    }

    /// Main categories of one flow direction.
    pub fn of_flow(&self, flow: FlowKind) -> impl Iterator<Item = &MainCategory> {
        self.main_categories.iter().filter(move |m| m.flow == flow)
    }

    /// Entries grouped under each main category, in display order.
    #[must_use]
    pub fn group<'a>(&self, entries: &'a [BudgetEntry]) -> Vec<(&MainCategory, Vec<&'a BudgetEntry>)> {
        self.main_categories
            .iter()
            .map(|main| (main, entries.iter().filter(|e| main.includes(e)).collect()))
            .collect()
    }

    /// In-budget entries no main category claims.
    #[must_use]
    pub fn unclassified<'a>(&self, entries: &'a [BudgetEntry]) -> Vec<&'a BudgetEntry> {
        entries
            .iter()
            .filter(|e| !e.is_off_budget && !self.main_categories.iter().any(|m| m.includes(e)))
            .collect()
    }
}
