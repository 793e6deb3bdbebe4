//! In-memory data set handed to the engine, loadable from JSON.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};
use treso_shared::AppError;
use treso_shared::types::ProjectId;

use crate::accounts::CashAccount;
use crate::actuals::ActualTransaction;
use crate::aggregation::{CategoryTree, MainCategory};
use crate::budget::BudgetEntry;
use crate::vat::VatRegime;

/// Errors raised while loading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The document is not valid JSON or has the wrong shape.
    #[error("Invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SnapshotError> for AppError {
    fn from(err: SnapshotError) -> Self {
        Self::Input(err.to_string())
    }
}

/// Everything the engine reads for one project.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Project the data belongs to.
    pub project_id: Option<ProjectId>,
    /// Cash accounts.
    pub accounts: Vec<CashAccount>,
    /// Valid budget entries.
    pub entries: Vec<BudgetEntry>,
    /// Actual transactions with payments.
    pub actuals: Vec<ActualTransaction>,
    /// VAT regimes by project.
    pub vat_regimes: HashMap<ProjectId, VatRegime>,
    /// User-defined main categories; inferred from entries when empty.
    pub main_categories: Vec<MainCategory>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    #[serde(default)]
    project_id: Option<ProjectId>,
    #[serde(default)]
    accounts: Vec<Value>,
    #[serde(default)]
    entries: Vec<Value>,
    #[serde(default)]
    actuals: Vec<Value>,
    #[serde(default)]
    vat_regimes: HashMap<ProjectId, VatRegime>,
    #[serde(default)]
    main_categories: Vec<MainCategory>,
}

impl Snapshot {
    /// Parses a snapshot, skipping accounts, budget entries, transactions,
    /// and payments that cannot be read.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        let total = raw.entries.len() + raw.actuals.len() + raw.accounts.len();

        let accounts: Vec<CashAccount> = parse_each(raw.accounts, "cash account");
        let entries: Vec<BudgetEntry> = parse_each(raw.entries, "budget entry");
        let actuals: Vec<ActualTransaction> = raw
            .actuals
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| parse_actual(index, value))
            .collect();

        info!(
            accounts = accounts.len(),
            entries = entries.len(),
            actuals = actuals.len(),
            skipped = total - accounts.len() - entries.len() - actuals.len(),
            "Snapshot loaded"
        );

        Ok(Self {
            project_id: raw.project_id,
            accounts,
            entries,
            actuals,
            vat_regimes: raw.vat_regimes,
            main_categories: raw.main_categories,
        })
    }

    /// VAT regime of the snapshot's project, if configured.
    #[must_use]
    pub fn vat_regime(&self) -> Option<&VatRegime> {
        self.vat_regimes.get(&self.project_id?)
    }

    /// Main categories to aggregate under.
    #[must_use]
    pub fn category_tree(&self) -> CategoryTree {
        if self.main_categories.is_empty() {
            CategoryTree::inferred(&self.entries)
        } else {
            CategoryTree::new(self.main_categories.clone())
        }
    }
}

/// Reads every value as `T`, dropping the unreadable ones.
fn parse_each<T: DeserializeOwned>(values: Vec<Value>, kind: &'static str) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(index, kind, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect()
}

/// Reads a transaction, keeping it when only some of its payments are malformed.
fn parse_actual(index: usize, mut value: Value) -> Option<ActualTransaction> {
    let payments = value
        .as_object_mut()
        .and_then(|fields| fields.remove("payments"));
    let mut actual: ActualTransaction = match serde_json::from_value(value) {
        Ok(actual) => actual,
        Err(e) => {
            warn!(index, error = %e, "Skipping malformed actual transaction");
            return None;
        }
    };
    if let Some(Value::Array(payments)) = payments {
        actual.payments = parse_each(payments, "payment");
    }
    Some(actual)
}
