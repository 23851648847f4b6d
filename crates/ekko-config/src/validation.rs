//! Control and preset validation.
//!
//! Validation reports controls that fall outside their declared range. It
//! never rejects a preset on its own: loading clamps, and callers decide
//! whether a diagnostic is worth surfacing.
//!
//! # Example
//!
//! ```rust
//! use ekko_config::{Preset, validate_param, validate_preset};
//!
//! assert!(validate_param("delay_ms", 250.0).is_ok());
//! assert!(validate_param("mix", 140.0).is_err());
//!
//! let mut preset = Preset::new("Too Hot");
//! preset.feedback_db = 35.0;
//! assert!(validate_preset(&preset).is_err());
//! ```

use ekko_core::{CONTROL_DESCRIPTORS, ParamDescriptor};
use thiserror::Error;

use crate::Preset;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown parameter name.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Invalid parameter format.
    #[error("invalid format for parameter '{param}': {reason}")]
    InvalidFormat {
        /// Name of the parameter.
        param: String,
        /// Description of the format error.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Look up a control descriptor by string ID, display name or short name.
///
/// Matching is case-insensitive, so `"feedback"`, `"Feedback Gain"` and
/// `"feedback_db"` all resolve to the same control.
pub fn find_param(name: &str) -> Option<(usize, ParamDescriptor)> {
    let name = name.trim();
    CONTROL_DESCRIPTORS
        .iter()
        .enumerate()
        .find(|(_, d)| {
            d.string_id.eq_ignore_ascii_case(name)
                || d.name.eq_ignore_ascii_case(name)
                || d.short_name.eq_ignore_ascii_case(name)
        })
        .map(|(i, d)| (i, *d))
}

/// Validate one control value against its declared range.
pub fn validate_param(name: &str, value: f32) -> ValidationResult<()> {
    let (_, desc) =
        find_param(name).ok_or_else(|| ValidationError::UnknownParameter(name.to_string()))?;

    if value >= desc.min && value <= desc.max {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            param: desc.string_id.to_string(),
            value,
            min: desc.min,
            max: desc.max,
        })
    }
}

/// Validate every control in a preset.
///
/// Returns the single error directly, or [`ValidationError::Multiple`] when
/// more than one control is out of range.
pub fn validate_preset(preset: &Preset) -> ValidationResult<()> {
    let values = [preset.feedback_db, preset.mix_percent, preset.delay_ms];
    let mut errors: Vec<ValidationError> = CONTROL_DESCRIPTORS
        .iter()
        .zip(values)
        .filter_map(|(desc, value)| validate_param(desc.string_id, value).err())
        .collect();

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Parse a parameter value from a string.
///
/// Supports plain numbers (`"0.5"`, `"-6"`) and the unit suffixes the
/// controls use: `"dB"`, `"%"` and `"ms"`.
pub fn parse_param_value(param_name: &str, value_str: &str) -> ValidationResult<f32> {
    let s = value_str.trim();

    let number = s
        .strip_suffix("dB")
        .or_else(|| s.strip_suffix("db"))
        .or_else(|| s.strip_suffix("ms"))
        .or_else(|| s.strip_suffix('%'))
        .unwrap_or(s)
        .trim();

    number
        .parse::<f32>()
        .ok()
        .filter(|v| !v.is_nan())
        .ok_or_else(|| ValidationError::InvalidFormat {
            param: param_name.to_string(),
            reason: format!("cannot parse '{number}' as number"),
        })
}
