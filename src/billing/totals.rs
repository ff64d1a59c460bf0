//! Derived-total computation
//!
//! Recomputes line totals, subtotal, tax and grand total from line items.
//! Uses rust_decimal for precise calculations, stores as f64.
//! Runs unconditionally on every persist so stored totals can never go
//! stale relative to the line items.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::AppError;
use crate::utils::validation::{MAX_NOTE_LEN, validate_required_text};

/// Default VAT rate (percent) when the caller does not provide one
pub const DEFAULT_TAX_RATE: f64 = 20.0;

/// Rounding for monetary values: 2 decimal places, half away from zero
const DECIMAL_PLACES: u32 = 2;

/// Upper bound for a line quantity or unit price. Values past this are
/// data-entry errors; it also keeps every amount well inside the range
/// `Decimal` can represent, so the f64 conversion below cannot fail.
pub const MAX_LINE_VALUE: f64 = 1_000_000_000_000.0;

/// Convert f64 to Decimal for calculation
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// One billed line of an invoice or quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    /// Computed on save, never trusted from the request
    #[serde(default)]
    pub total_line: f64,
}

/// Computed document totals
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DocumentTotals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
}

/// Validate line items before any totals or numbering work happens.
///
/// A rejected document consumes no sequence number.
pub fn validate_line_items(items: &[LineItem]) -> Result<(), AppError> {
    if items.is_empty() {
        return Err(AppError::validation(
            "Document must contain at least one line item",
        ));
    }
    for (i, item) in items.iter().enumerate() {
        validate_required_text(&item.description, "line item description", MAX_NOTE_LEN)
            .map_err(|_| {
                AppError::validation(format!("Line {}: description must not be empty", i + 1))
            })?;
        if !item.quantity.is_finite() || item.quantity <= 0.0 {
            return Err(AppError::validation(format!(
                "Line {}: quantity must be positive",
                i + 1
            )));
        }
        if item.quantity > MAX_LINE_VALUE {
            return Err(AppError::validation(format!(
                "Line {}: quantity exceeds the maximum of {MAX_LINE_VALUE}",
                i + 1
            )));
        }
        if !item.unit_price.is_finite() || item.unit_price < 0.0 {
            return Err(AppError::validation(format!(
                "Line {}: unit price must be a non-negative number",
                i + 1
            )));
        }
        if item.unit_price > MAX_LINE_VALUE {
            return Err(AppError::validation(format!(
                "Line {}: unit price exceeds the maximum of {MAX_LINE_VALUE}",
                i + 1
            )));
        }
    }
    Ok(())
}

/// Recompute every line total and the document totals.
///
/// Each `total_line` is set to `quantity * unit_price` (2dp); the subtotal
/// is the rounded sum of the exact line amounts, the tax is
/// `subtotal * tax_rate / 100` and the total is their sum.
pub fn compute_totals(items: &mut [LineItem], tax_rate: f64) -> DocumentTotals {
    let mut subtotal = Decimal::ZERO;

    for item in items.iter_mut() {
        let line = to_decimal(item.quantity) * to_decimal(item.unit_price);
        item.total_line = to_f64(line);
        subtotal += line;
    }

    let subtotal = subtotal
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let tax_amount = (subtotal * to_decimal(tax_rate) / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let total = subtotal + tax_amount;

    DocumentTotals {
        subtotal: to_f64(subtotal),
        tax_amount: to_f64(tax_amount),
        total: to_f64(total),
    }
}
