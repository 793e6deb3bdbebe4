//! Forecast façade: one resolved "today", VAT stage, rows, and positions.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use treso_shared::AppConfig;
use treso_shared::types::{BudgetEntryId, CashAccountId};

use crate::actuals::{ActualTransaction, AdvancePolicy, realized_for_period};
use crate::aggregation::RowAmounts;
use crate::budget::{BudgetEntry, FlowType};
use crate::cache::PositionCache;
use crate::dates::{Period, today_in_timezone};
use crate::positions::{AccountScope, PositionInput, PositionReport, positions_by_account};
use crate::recurrence::OccurrenceCursor;
use crate::snapshot::Snapshot;
use crate::vat::apply_vat_stage;

/// Per-period amounts of one budget row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRow {
    /// Entry the row shows.
    pub entry_id: BudgetEntryId,
    /// Sub-category name.
    pub category: String,
    /// Revenue or expense.
    pub flow: FlowType,
    /// One triple per period, in period order.
    pub amounts: Vec<RowAmounts>,
}

/// Result of one forecast pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    /// The date every phase decision used.
    pub today: NaiveDate,
    /// Budget rows, VAT entries included.
    pub rows: Vec<EntryRow>,
    /// Running positions.
    pub report: PositionReport,
}

/// Runs forecasts over snapshots with a consistent notion of today.
pub struct ForecastEngine {
    timezone_offset_hours: i32,
    advance_policy: AdvancePolicy,
    cache: PositionCache,
}

impl ForecastEngine {
    /// Creates an engine.
    #[must_use]
    pub fn new(timezone_offset_hours: i32, advance_policy: AdvancePolicy, cache: PositionCache) -> Self {
        Self {
            timezone_offset_hours,
            advance_policy,
            cache,
        }
    }

    /// Creates an engine from the `project` and `cache` configuration sections.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.project.timezone_offset_hours,
            config.project.advance_policy.into(),
            PositionCache::from_config(config),
        )
    }

    /// Today in the project's timezone. The engine's only clock read.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        today_in_timezone(Utc::now(), self.timezone_offset_hours)
    }

    /// Forecast as of now.
    #[must_use]
    pub fn run(&self, snapshot: &Snapshot, periods: &[Period], scope: AccountScope) -> Forecast {
        self.run_at(snapshot, periods, scope, self.today())
    }

    /// Forecast as of `today`.
    #[must_use]
    pub fn run_at(
        &self,
        snapshot: &Snapshot,
        periods: &[Period],
        scope: AccountScope,
        today: NaiveDate,
    ) -> Forecast {
        let entries = apply_vat_stage(&snapshot.entries, snapshot.vat_regime(), periods);
        let categories = snapshot.category_tree();
        let input = PositionInput {
            periods,
            accounts: &snapshot.accounts,
            entries: &entries,
            actuals: &snapshot.actuals,
            categories: &categories,
            scope,
            advance_policy: self.advance_policy,
        };

        let report = self.cache.get_or_compute(&input, today);
        let rows = entry_rows(&entries, &snapshot.actuals, periods);
        info!(
            %today,
            periods = periods.len(),
            rows = rows.len(),
            cached = report.cached,
            "Forecast computed"
        );

        Forecast {
            today,
            rows,
            report,
        }
    }

    /// One report per open account, as of `today`.
    #[must_use]
    pub fn run_by_account(
        &self,
        snapshot: &Snapshot,
        periods: &[Period],
        today: NaiveDate,
    ) -> Vec<(CashAccountId, PositionReport)> {
        let entries = apply_vat_stage(&snapshot.entries, snapshot.vat_regime(), periods);
        let categories = snapshot.category_tree();
        let input = PositionInput {
            periods,
            accounts: &snapshot.accounts,
            entries: &entries,
            actuals: &snapshot.actuals,
            categories: &categories,
            scope: AccountScope::All,
            advance_policy: self.advance_policy,
        };
        positions_by_account(&input, today)
    }

    /// Drops cached positions. Call after any change to the underlying data.
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new(0, AdvancePolicy::default(), PositionCache::new())
    }
}

/// Budget, realized, and remaining amounts of every entry for every period.
#[must_use]
pub fn entry_rows(
    entries: &[BudgetEntry],
    actuals: &[ActualTransaction],
    periods: &[Period],
) -> Vec<EntryRow> {
    entries
        .iter()
        .map(|entry| EntryRow {
            entry_id: entry.id,
            category: entry.category.clone(),
            flow: entry.flow,
            amounts: OccurrenceCursor::new(entry, periods)
                .zip(periods)
                .map(|((_, budget), period)| {
                    let actual =
                        realized_for_period(entry, actuals, period.start_date, period.end_date);
                    RowAmounts {
                        budget,
                        actual,
                        reste: budget - actual,
                    }
                })
                .collect(),
        })
        .collect()
}
