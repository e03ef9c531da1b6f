// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Input validation rules for shopping event operations.
//!
//! Validation is structural only: non-empty identifiers, non-negative
//! values, at least one line. Cost arithmetic is never re-derived here —
//! the estimation source's per-line totals are authoritative input.

use crate::error::DomainError;
use crate::estimate::NewEstimateLine;
use rust_decimal::Decimal;

/// Validates a car number: non-empty, alphanumeric.
///
/// # Errors
///
/// Returns `DomainError::InvalidCarNumber` if the value is empty or
/// contains non-alphanumeric characters.
pub fn validate_car_number(value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidCarNumber(
            "car number must not be empty".to_string(),
        ));
    }
    if !value.trim().chars().all(char::is_alphanumeric) {
        return Err(DomainError::InvalidCarNumber(format!(
            "car number '{value}' must be alphanumeric"
        )));
    }
    Ok(())
}

/// Validates a shop code: non-empty, alphanumeric.
///
/// # Errors
///
/// Returns `DomainError::InvalidShopCode` if the value is empty or
/// contains non-alphanumeric characters.
pub fn validate_shop_code(value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidShopCode(
            "shop code must not be empty".to_string(),
        ));
    }
    if !value.trim().chars().all(char::is_alphanumeric) {
        return Err(DomainError::InvalidShopCode(format!(
            "shop code '{value}' must be alphanumeric"
        )));
    }
    Ok(())
}

/// Validates an event type code: non-empty.
///
/// # Errors
///
/// Returns `DomainError::InvalidTypeCode` if the value is empty.
pub fn validate_type_code(value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidTypeCode(
            "type code must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates a cancellation reason: non-empty after trimming.
///
/// # Errors
///
/// Returns `DomainError::EmptyCancellationReason` if the reason is blank.
pub fn validate_cancellation_reason(reason: &str) -> Result<(), DomainError> {
    if reason.trim().is_empty() {
        return Err(DomainError::EmptyCancellationReason);
    }
    Ok(())
}

/// Validates the lines of an estimate submission.
///
/// Requires at least one line; each line needs a non-empty task code and
/// non-negative labor hours, material cost, and total cost.
///
/// # Errors
///
/// Returns the first violation found, with its 1-based line number.
pub fn validate_estimate_lines(lines: &[NewEstimateLine]) -> Result<(), DomainError> {
    if lines.is_empty() {
        return Err(DomainError::EmptyEstimate);
    }

    for (index, line) in lines.iter().enumerate() {
        let line_number: usize = index + 1;
        if line.task_code.trim().is_empty() {
            return Err(DomainError::EmptyTaskCode { line_number });
        }
        validate_non_negative(line_number, "labor_hours", line.labor_hours)?;
        validate_non_negative(line_number, "material_cost", line.material_cost)?;
        validate_non_negative(line_number, "total_cost", line.total_cost)?;
    }

    Ok(())
}

fn validate_non_negative(
    line_number: usize,
    field: &'static str,
    value: Decimal,
) -> Result<(), DomainError> {
    if value < Decimal::ZERO {
        return Err(DomainError::NegativeLineValue {
            line_number,
            field,
            value,
        });
    }
    Ok(())
}

/// Computes the aggregate totals of a submission from its lines.
///
/// Returns `(labor_hours_total, material_cost_total, total_cost)`.
#[must_use]
pub fn aggregate_totals(lines: &[NewEstimateLine]) -> (Decimal, Decimal, Decimal) {
    let labor: Decimal = lines.iter().map(|l| l.labor_hours).sum();
    let material: Decimal = lines.iter().map(|l| l.material_cost).sum();
    let total: Decimal = lines.iter().map(|l| l.total_cost).sum();
    (labor, material, total)
}
