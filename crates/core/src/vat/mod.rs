//! VAT regimes, derived VAT children, and synthesized VAT payments.

pub mod engine;
pub mod types;

#[cfg(test)]
mod tests;

pub use engine::{apply_vat_stage, expand_vat_children, net_vat_between, vat_payment_for_period};
pub use types::{DeclarationPeriodicity, VatRegime};
