//! Error types for motion-stream parsing and time estimation.

use thiserror::Error;

use crate::command::HeaderType;
use reliefkit_core::error::ParameterError;

/// A motion-stream line that could not be tokenized.
///
/// Fatal for direct [`crate::parser::parse_line`] callers; the time
/// estimator downgrades it to a warning and an empty marker.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("malformed motion line {line:?}: bad word {word:?}")]
pub struct ParseLineError {
    pub line: String,
    pub word: String,
}

/// Errors from constructing a time estimator.
#[derive(Error, Debug)]
pub enum EstimateError {
    /// The job's header type is outside the estimator's supported set.
    #[error("unsupported job type: {0}")]
    UnsupportedJob(HeaderType),

    /// Job metadata failed validation.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),
}

/// Result type alias for estimator operations.
pub type EstimateResult<T> = Result<T, EstimateError>;
