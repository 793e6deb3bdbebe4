//! Running cash positions: recorded history up to today, budget afterwards.

pub mod calculator;
pub mod types;

#[cfg(test)]
mod props;

pub use calculator::{compute_positions, positions_by_account};
pub use types::{
    AccountScope, PeriodPosition, PositionInput, PositionMode, PositionReport, TodayIndex,
};
