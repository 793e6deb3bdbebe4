//! Shared types, errors, and configuration for Treso.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Amount helpers with decimal precision
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AdvancePolicySetting, AppConfig};
pub use error::{AppError, AppResult};
