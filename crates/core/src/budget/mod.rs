//! Budget entries: planned cash movements and their schedules.

pub mod error;
pub mod raw;
pub mod types;


pub use error::BudgetError;
pub use raw::RawBudgetEntry;
pub use types::{
    BudgetEntry, FlowType, Frequency, Schedule, ScheduledPayment, TAXES_MAIN_CATEGORY,
};
