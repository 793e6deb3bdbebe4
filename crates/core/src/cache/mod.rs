//! Position report caching using Moka.
//!
//! Positions are pure in their input, so a report can be reused until the
//! underlying data changes. Callers invalidate on every mutation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::sync::Cache;
use tracing::debug;
use treso_shared::AppConfig;

use crate::positions::{PositionInput, PositionReport, compute_positions};

/// Default cache capacity (number of reports).
const DEFAULT_CACHE_CAPACITY: u64 = 64;

/// Default time-to-live for cached reports (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// Cache for position reports, keyed by a fingerprint of the input and today.
#[derive(Clone)]
pub struct PositionCache {
    cache: Cache<String, Arc<PositionReport>>,
}

impl PositionCache {
    /// Creates a cache with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a cache holding at most `max_capacity` reports for `ttl_secs` each.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Creates a cache from the `cache` configuration section.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_config(config.cache.max_capacity, config.cache.ttl_secs)
    }

    /// Fingerprint of a position computation.
    #[must_use]
    pub fn fingerprint(input: &PositionInput<'_>, today: NaiveDate) -> String {
        let mut hasher = DefaultHasher::new();
        input.hash(&mut hasher);
        today.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    /// Returns the cached report for this input, computing it on a miss.
    ///
    /// Hits come back with `cached: true`.
    #[must_use]
    pub fn get_or_compute(&self, input: &PositionInput<'_>, today: NaiveDate) -> PositionReport {
        let key = Self::fingerprint(input, today);

        if let Some(cached) = self.cache.get(&key) {
            debug!(%key, "Position cache hit");
            let mut report = (*cached).clone();
            report.cached = true;
            return report;
        }

        let report = compute_positions(input, today);
        self.cache.insert(key, Arc::new(report.clone()));
        report
    }

    /// Drops every cached report. Call after any data mutation.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Number of cached reports.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs pending maintenance so counts and invalidations are observable.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl Default for PositionCache {
    fn default() -> Self {
        Self::new()
    }
}
