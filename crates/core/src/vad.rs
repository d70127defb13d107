//! Valence/arousal input validation.
//!
//! Both the interactive edit path and any batch-import path must accept a
//! candidate value only if it is a finite number inside the VAD domain.
//! These checks run before any state mutation or network call.

use crate::error::CoreError;

/// Lower bound of the VAD domain (inclusive).
pub const VAD_MIN: f64 = -1.0;

/// Upper bound of the VAD domain (inclusive).
pub const VAD_MAX: f64 = 1.0;

/// Validate that a VAD value is finite and within `[-1.0, 1.0]`.
pub fn validate_vad_value(value: f64) -> Result<(), CoreError> {
    if value.is_nan() || value.is_infinite() {
        return Err(CoreError::Validation(
            "VAD value must be a finite number".to_string(),
        ));
    }
    if !(VAD_MIN..=VAD_MAX).contains(&value) {
        return Err(CoreError::Validation(format!(
            "VAD value must be between {VAD_MIN} and {VAD_MAX}, got {value}"
        )));
    }
    Ok(())
}

/// Parse raw text from a VAD input field.
///
/// Empty (or whitespace-only) input is the clear sentinel and yields
/// `Ok(None)`. Anything else must parse as a finite number within the
/// VAD domain, yielding `Ok(Some(v))`.
pub fn parse_vad_input(raw: &str) -> Result<Option<f64>, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| CoreError::Validation(format!("'{trimmed}' is not a number")))?;
    validate_vad_value(value)?;
    Ok(Some(value))
}
