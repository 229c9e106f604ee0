//! Error types for relief toolpath generation.

use thiserror::Error;

use reliefkit_core::error::ParameterError;
use reliefkit_gcode::error::EstimateError;

/// Errors that can occur while generating a relief toolpath.
///
/// Generation failures abort the whole job; no partial motion stream is
/// ever returned.
#[derive(Error, Debug)]
pub enum ReliefError {
    /// A parameter validation error occurred.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// Image decoding or processing failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Building the time estimate for the generated stream failed.
    #[error("Time estimation error: {0}")]
    Estimate(#[from] EstimateError),

    /// The job's cancellation token was set.
    #[error("Job cancelled")]
    Cancelled,
}

/// Result type alias for relief generation.
pub type ReliefResult<T> = Result<T, ReliefError>;
