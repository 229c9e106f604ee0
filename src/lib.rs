//! # ReliefKit
//!
//! A relief (greyscale) toolpath generation engine for CNC routers: pixel
//! intensity becomes carve depth, constrained by the cutting tool's
//! geometry and emitted as a multi-pass motion stream with an execution
//! time estimate.
//!
//! ## Architecture
//!
//! ReliefKit is organized as a workspace with three crates:
//!
//! 1. **reliefkit-core** - coordinate normalization, feed rates, parameter
//!    errors, cancellation
//! 2. **reliefkit-gcode** - motion commands, line parsing, time estimation
//! 3. **reliefkit-camtools** - height-map sampling, tool-constrained
//!    smoothing, multi-pass toolpath generation
//!
//! This facade re-exports the public surface of all three so callers can
//! depend on a single crate.
//!
//! ## Pipeline
//!
//! An image flows through sampling (greyscale grid at a capped density),
//! smoothing (walls limited to what the tool flank can cut), generation
//! (column-by-column step-down passes) and estimation (replay of the
//! motion stream against the feed rates), ending in a [`ToolpathObject`]
//! ready for G-code assembly.

pub use reliefkit_core::{
    round2, Anchor, CancelToken, FeedRates, Normalizer, ParameterError, ParameterResult,
};

pub use reliefkit_gcode::{
    parse_line, EstimateError, EstimateResult, HeaderType, JobMetadata, MotionCommand,
    MovementMode, ParseLineError, ProcessMode, TimeEstimator, ToolpathObject,
};

pub use reliefkit_camtools::{
    effective_density, DepthSmoother, HeightMapGrid, HeightMapSampler, ModelTransformation,
    ReliefError, ReliefParameters, ReliefResult, ReliefToolpathGenerator,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
