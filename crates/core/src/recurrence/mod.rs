//! Budgeted amounts of recurring, one-off, and scheduled entries.

pub mod calculator;
pub mod cursor;

#[cfg(test)]
mod props;

pub use calculator::amount_for_period;
pub use cursor::{OccurrenceCursor, amounts_by_period};
