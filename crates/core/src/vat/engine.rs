//! VAT expansion and VAT-payment synthesis.

use std::borrow::Cow;
use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;
use treso_shared::types::BudgetEntryId;

use super::types::VatRegime;
use crate::budget::{BudgetEntry, FlowType};
use crate::dates::{CalendarStep, Period, add_months, start_of_month};
use crate::recurrence::amount_for_period;

/// Appends a VAT child to every entry whose category carries a positive rate.
///
/// Without a regime the input is returned borrowed, untouched. Child ids are
/// derived from the parent id, so expanding an already expanded list adds
/// nothing.
#[must_use]
pub fn expand_vat_children<'a>(
    entries: &'a [BudgetEntry],
    regime: Option<&VatRegime>,
) -> Cow<'a, [BudgetEntry]> {
    let Some(regime) = regime else {
        return Cow::Borrowed(entries);
    };

    let existing: HashSet<BudgetEntryId> = entries.iter().map(|e| e.id).collect();
    let children: Vec<BudgetEntry> = entries
        .iter()
        .filter(|e| !e.is_vat_derived())
        .filter_map(|e| {
            let rate = regime.rate_for(&e.category)?;
            let category = match e.flow {
                FlowType::Revenu => &regime.collected_category,
                FlowType::Depense => &regime.deductible_category,
            };
            Some(e.vat_child(rate, category))
        })
        .filter(|child| !existing.contains(&child.id))
        .collect();

    if children.is_empty() {
        return Cow::Borrowed(entries);
    }

    debug!(
        project_id = %regime.project_id,
        children = children.len(),
        "Expanded VAT children"
    );
    let mut expanded = Vec::with_capacity(entries.len() + children.len());
    expanded.extend_from_slice(entries);
    expanded.extend(children);
    Cow::Owned(expanded)
}

/// Net VAT (collected minus deductible) budgeted over `[start, end)`.
#[must_use]
pub fn net_vat_between(entries: &[BudgetEntry], start: NaiveDate, end: NaiveDate) -> Decimal {
    entries
        .iter()
        .filter(|e| e.is_vat_child())
        .map(|e| e.flow.sign() * amount_for_period(e, start, end))
        .sum()
}

/// The VAT payment falling due in `period`, if any.
///
/// Every declaration window whose due date lies in `period` contributes its
/// net VAT when positive; the sum is emitted as one expense dated at the
/// earliest such due date. `entries` must already contain the VAT children.
#[must_use]
pub fn vat_payment_for_period(
    entries: &[BudgetEntry],
    regime: &VatRegime,
    period: &Period,
) -> Option<BudgetEntry> {
    let first_month = start_of_month(period.start_date);
    let window_months = i32::try_from(regime.periodicity.months()).ok()?;

    let mut total = Decimal::ZERO;
    let mut earliest: Option<NaiveDate> = None;

    let months = (0..)
        .map_while(|k| CalendarStep::Months(1).nth_after(first_month, k))
        .take_while(|month| *month < period.end_date);
    for due_month in months {
        let Some(window_end) = regime.window_end_paid_in(due_month) else {
            continue;
        };
        let Some(due) = regime.due_date(window_end).filter(|due| period.contains(*due)) else {
            continue;
        };
        let Some(window_start) = add_months(window_end, -window_months) else {
            continue;
        };

        let net = net_vat_between(entries, window_start, window_end);
        if net > Decimal::ZERO {
            total += net;
            earliest = Some(earliest.map_or(due, |e| e.min(due)));
        }
    }

    let due = earliest?;
    let id = BudgetEntryId::from_uuid(
        regime
            .project_id
            .derive(&format!("vat-payment:{due}"))
            .into_inner(),
    );
    debug!(project_id = %regime.project_id, %due, amount = %total, "Synthesized VAT payment");
    Some(BudgetEntry::vat_payment(
        id,
        &regime.payment_category,
        total,
        due,
        regime.payment_account,
    ))
}

/// Expands VAT children, then adds the VAT payment due in each period.
///
/// Recomputed on every call from the current entries; callers must not keep
/// the result across a data change.
#[must_use]
pub fn apply_vat_stage<'a>(
    entries: &'a [BudgetEntry],
    regime: Option<&VatRegime>,
    periods: &[Period],
) -> Cow<'a, [BudgetEntry]> {
    let Some(regime) = regime else {
        return Cow::Borrowed(entries);
    };

    let expanded = expand_vat_children(entries, Some(regime));
    let mut seen: HashSet<BudgetEntryId> = expanded.iter().map(|e| e.id).collect();
    let payments: Vec<BudgetEntry> = periods
        .iter()
        .filter_map(|period| vat_payment_for_period(&expanded, regime, period))
        .filter(|payment| seen.insert(payment.id))
        .collect();

    if payments.is_empty() {
        return expanded;
    }
    let mut staged = expanded.into_owned();
    staged.extend(payments);
    Cow::Owned(staged)
}
