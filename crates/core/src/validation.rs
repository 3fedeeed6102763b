//! Input validation utilities.
//!
//! Checks applied to caller-supplied values before they reach the ranking pipeline.

use crate::{TriageError, TriageResult};

/// Validates that free text is present.
///
/// The text itself is not modified; only whitespace-only or empty input is rejected.
///
/// # Errors
///
/// Returns a `TriageError::InvalidInput` naming `field` if the text is blank.
pub fn validate_not_blank(field: &str, text: &str) -> TriageResult<()> {
    if text.trim().is_empty() {
        return Err(TriageError::InvalidInput(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Validates that a measurement is a finite number strictly greater than zero.
///
/// # Errors
///
/// Returns a `TriageError::InvalidInput` naming `field` otherwise.
pub fn validate_positive_measurement(field: &str, value: f64) -> TriageResult<f64> {
    if !value.is_finite() {
        return Err(TriageError::InvalidInput(format!(
            "{field} must be a finite number"
        )));
    }
    if value <= 0.0 {
        return Err(TriageError::InvalidInput(format!(
            "{field} must be greater than 0"
        )));
    }
    Ok(value)
}

/// Validates that a measurement is finite. Zero and negative values are allowed.
///
/// # Errors
///
/// Returns a `TriageError::InvalidInput` naming `field` for NaN or infinity.
pub fn validate_finite_measurement(field: &str, value: f64) -> TriageResult<f64> {
    if !value.is_finite() {
        return Err(TriageError::InvalidInput(format!(
            "{field} must be a finite number"
        )));
    }
    Ok(value)
}

/// Validates a patient age in whole years, which must be greater than zero.
///
/// # Errors
///
/// Returns a `TriageError::InvalidInput` for zero, negative or oversized ages.
pub fn validate_patient_age(age: i64) -> TriageResult<u32> {
    if age <= 0 {
        return Err(TriageError::InvalidInput("age must be greater than 0".into()));
    }
    u32::try_from(age).map_err(|_| TriageError::InvalidInput("age is out of range".into()))
}
