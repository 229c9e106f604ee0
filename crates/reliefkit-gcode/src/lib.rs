//! # ReliefKit G-code
//!
//! The textual motion-stream micro-format and its consumers: the
//! fixed-shape [`MotionCommand`] record, the line tokenizer, and the
//! [`TimeEstimator`] that replays a stream to derive machine time.

pub mod command;
pub mod error;
pub mod estimator;
pub mod parser;

pub use command::{HeaderType, MotionCommand, MovementMode, ProcessMode, ToolpathObject};
pub use error::{EstimateError, EstimateResult, ParseLineError};
pub use estimator::{JobMetadata, TimeEstimator};
pub use parser::parse_line;
