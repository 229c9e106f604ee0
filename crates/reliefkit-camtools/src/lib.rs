//! # ReliefKit CAM tools
//!
//! Relief (greyscale) toolpath generation. A greyscale image is sampled
//! into a depth grid at a density derived from the physical footprint,
//! smoothed so no wall exceeds what the cutter's cone angle can carve, and
//! walked in multiple stepdown passes to produce a motion stream plus a
//! time-estimated toolpath object.

pub mod error;
pub mod heightmap;
pub mod relief;
pub mod smoother;

pub use error::{ReliefError, ReliefResult};
pub use heightmap::{effective_density, HeightMapGrid, HeightMapSampler};
pub use relief::{ModelTransformation, ReliefParameters, ReliefToolpathGenerator};
pub use smoother::DepthSmoother;
