//! Budget entry error types.

use thiserror::Error;
use treso_shared::types::BudgetEntryId;

/// Errors raised when a budget entry cannot be built from its fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// A one-off entry has no date.
    #[error("Budget entry {0}: one-off entry has no date")]
    MissingDate(BudgetEntryId),

    /// A recurring entry has no start date.
    #[error("Budget entry {0}: recurring entry has no start date")]
    MissingStartDate(BudgetEntryId),

    /// An irregular or provision entry has no payment schedule.
    #[error("Budget entry {0}: irregular entry has no payment schedule")]
    MissingPayments(BudgetEntryId),

    /// The frequency name is not recognized.
    #[error("Budget entry {id}: unknown frequency '{frequency}'")]
    UnknownFrequency {
        /// Entry ID.
        id: BudgetEntryId,
        /// Frequency as received.
        frequency: String,
    },

    /// The schedule shape does not match the frequency.
    #[error("Budget entry {id}: schedule does not match frequency '{frequency}'")]
    ScheduleMismatch {
        /// Entry ID.
        id: BudgetEntryId,
        /// Declared frequency.
        frequency: String,
    },

    /// A recurring entry ends before it starts.
    #[error("Budget entry {0}: end date is before start date")]
    EndBeforeStart(BudgetEntryId),
}
