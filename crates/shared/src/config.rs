//! Application configuration management.

use chrono::NaiveDate;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Project-level settings.
    #[serde(default)]
    pub project: ProjectConfig,
    /// Forecast horizon settings.
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// Position cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// How a payment exceeding the amount due is handled when computing arrears.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancePolicySetting {
    /// The surplus stays on its transaction.
    #[default]
    KeepOnTransaction,
    /// The surplus settles the same third party's next unsettled transactions.
    ApplyToNextDue,
}

/// Project-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Offset from UTC, in hours, used to resolve "today".
    #[serde(default)]
    pub timezone_offset_hours: i32,
    /// Symbol appended to formatted amounts.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Advance-payment handling.
    #[serde(default)]
    pub advance_policy: AdvancePolicySetting,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            timezone_offset_hours: 0,
            currency_symbol: default_currency_symbol(),
            advance_policy: AdvancePolicySetting::default(),
        }
    }
}

fn default_currency_symbol() -> String {
    "€".to_string()
}

/// Forecast horizon settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    /// Period granularity (day, week, fortnight, month, bimonth, quarter, semester, year).
    #[serde(default = "default_granularity")]
    pub granularity: String,
    /// Number of periods to build.
    #[serde(default = "default_horizon")]
    pub horizon: u32,
    /// First day of the horizon. Defaults to January 1st of the current year.
    #[serde(default)]
    pub start: Option<NaiveDate>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            granularity: default_granularity(),
            horizon: default_horizon(),
            start: None,
        }
    }
}

fn default_granularity() -> String {
    "month".to_string()
}

fn default_horizon() -> u32 {
    12
}

/// Position cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached position reports.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// Time-to-live of a cached report, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_max_capacity() -> u64 {
    64
}

fn default_ttl_secs() -> u64 {
    300 // 5 minutes
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "treso=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `TRESO__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("TRESO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
