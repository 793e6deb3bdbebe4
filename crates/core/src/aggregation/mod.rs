//! Category, main-category, and flow-level totals.

pub mod helpers;
pub mod types;


pub use helpers::{
    budgeted_flows, general_totals, has_off_budget, main_category_totals, off_budget_totals,
    row_amounts,
};
pub use treso_shared::types::completion_rate;
pub use types::{CategoryTree, FlowKind, MainCategory, PeriodTotals, RowAmounts};
