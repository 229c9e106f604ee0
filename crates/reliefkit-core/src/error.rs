//! Error types for parameter validation.
//!
//! Toolpath generation fails fast on bad parameters, before any grid
//! allocation; these types carry enough context to tell the caller which
//! parameter was at fault.

use thiserror::Error;

/// Errors related to job parameter validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// Dimensions are invalid (zero or negative).
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// Result type alias for parameter validation.
pub type ParameterResult<T> = Result<T, ParameterError>;
