//! Amount helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal`; only display code rounds.

use rust_decimal::Decimal;

/// Returns the amount when it is strictly positive.
///
/// Zero and negative amounts are treated as invalid per-occurrence amounts
/// and must contribute nothing to a total.
#[must_use]
pub fn positive_amount(amount: Decimal) -> Option<Decimal> {
    amount.is_sign_positive().then_some(amount).filter(|a| !a.is_zero())
}

/// Percentage of `part` relative to `whole`, rounded to 2 decimal places.
///
/// A zero `whole` yields 0 instead of a division error.
#[must_use]
pub fn completion_rate(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part / whole * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Formats an amount for display: two decimals, space-grouped thousands,
/// trailing currency symbol (e.g. `-1 234.50 €`).
#[must_use]
pub fn format_amount(amount: Decimal, currency_symbol: &str) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (units, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    if currency_symbol.is_empty() {
        format!("{sign}{grouped}.{cents}")
    } else {
        format!("{sign}{grouped}.{cents} {currency_symbol}")
    }
}
