//! Treso forecast CLI
//!
//! Loads a JSON snapshot and prints the cash position of every period.
//!
//! Usage: treso-forecast <snapshot.json> [--account <id>] [--start <date>] [--horizon <n>]

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Datelike, NaiveDate};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use treso_core::dates::{PeriodGranularity, build_periods};
use treso_core::positions::{AccountScope, PositionMode};
use treso_core::{ForecastEngine, Snapshot};
use treso_shared::types::{CashAccountId, format_amount};
use treso_shared::{AppConfig, AppError, AppResult};

/// Treso - cash position forecast
#[derive(Debug, Parser)]
#[command(name = "treso-forecast")]
#[command(about = "Prints the cash position of every period of a JSON snapshot")]
#[command(version)]
struct Cli {
    /// Snapshot file (JSON)
    snapshot: PathBuf,

    /// Only count this cash account
    #[arg(short, long)]
    account: Option<CashAccountId>,

    /// First day of the horizon (YYYY-MM-DD), overrides `forecast.start`
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Number of periods, overrides `forecast.horizon`
    #[arg(long)]
    horizon: Option<u32>,
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<AppError>()
                .map_or(1, AppError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = AppConfig::load().map_err(AppError::from)?;

    // Initialize tracing; RUST_LOG overrides the configured filter
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let json = std::fs::read_to_string(&cli.snapshot)
        .map_err(|e| AppError::NotFound(format!("{}: {e}", cli.snapshot.display())))?;
    let snapshot = Snapshot::from_json(&json).map_err(AppError::from)?;

    let engine = ForecastEngine::from_config(&config);
    let today = engine.today();
    let granularity: PeriodGranularity = config
        .forecast
        .granularity
        .parse()
        .map_err(|e| AppError::Config(format!("{e}")))?;
    let start = horizon_start(cli.start.or(config.forecast.start), today)?;
    let horizon = cli.horizon.unwrap_or(config.forecast.horizon);
    let periods = build_periods(start, granularity, horizon);
    info!(%today, %start, %granularity, periods = periods.len(), "Forecast horizon");

    let scope = cli.account.map_or(AccountScope::All, AccountScope::Account);
    let forecast = engine.run_at(&snapshot, &periods, scope, today);

    let symbol = &config.project.currency_symbol;
    for position in &forecast.report.positions {
        let mode = match position.mode {
            PositionMode::Actual => "actual",
            PositionMode::Projected => "projected",
        };
        println!(
            "{}\t{}\t{}\t{}",
            position.label,
            mode,
            format_amount(position.initial, symbol),
            format_amount(position.final_balance, symbol)
        );
    }

    Ok(())
}

/// The configured start, or January 1st of the current year.
fn horizon_start(start: Option<NaiveDate>, today: NaiveDate) -> AppResult<NaiveDate> {
    match start {
        Some(start) => Ok(start),
        None => NaiveDate::from_ymd_opt(today.year(), 1, 1)
            .ok_or_else(|| AppError::Internal(format!("no January 1st in {}", today.year()))),
    }
}
