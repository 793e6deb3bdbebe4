//! Date and period error types.

use thiserror::Error;

/// Date-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// Unknown period granularity name.
    #[error("Unknown period granularity: {0}")]
    UnknownGranularity(String),
}
