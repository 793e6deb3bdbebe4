//! Core calculation engine for Treso.
//!
//! This crate contains pure business logic with ZERO I/O: it never reads a
//! clock inside a calculator, never touches a database, and never rounds.
//!
//! # Modules
//!
//! - `dates` - Calendar steps, period buckets, and "today" resolution
//! - `budget` - Planned cash movements and their schedules
//! - `accounts` - Cash accounts and opening balances
//! - `actuals` - Recorded transactions, payments, and arrears
//! - `recurrence` - Budgeted amount of an entry over a date range
//! - `vat` - VAT children and synthesized VAT payments
//! - `aggregation` - Row, main-category, and flow-level totals
//! - `positions` - Running cash positions per period
//! - `cache` - Memoized position reports
//! - `snapshot` - JSON-loadable input data set
//! - `engine` - Forecast façade

pub mod accounts;
pub mod actuals;
pub mod aggregation;
pub mod budget;
pub mod cache;
pub mod dates;
pub mod engine;
pub mod positions;
pub mod recurrence;
pub mod snapshot;
pub mod vat;

pub use engine::{EntryRow, Forecast, ForecastEngine};
pub use snapshot::{Snapshot, SnapshotError};
