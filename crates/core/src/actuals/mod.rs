//! Actual transactions, their payments, and realized amounts.

pub mod calculator;
pub mod types;


pub use calculator::{
    AdvancePolicy, CashFlows, arrears_before, net_payments_between, payment_flows_between,
    realized_for_period,
};
pub use types::{ActualKind, ActualStatus, ActualTransaction, Payment};
