//! # ReliefKit Core
//!
//! Shared machine-space types for the ReliefKit toolpath engine:
//! parameter validation errors, feed rates, the anchor-based coordinate
//! normalizer, and cooperative job cancellation.

pub mod cancel;
pub mod error;
pub mod machine;
pub mod normalizer;

pub use cancel::CancelToken;
pub use error::{ParameterError, ParameterResult};
pub use machine::FeedRates;
pub use normalizer::{round2, Anchor, Normalizer};
