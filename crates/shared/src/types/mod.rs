//! Common types used across the application.

pub mod id;
pub mod money;

#[cfg(test)]
mod id_tests;

pub use id::*;
pub use money::{completion_rate, format_amount, positive_amount};
