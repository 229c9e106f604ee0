//! Relief toolpath generation from greyscale height maps.
//!
//! A relief job interprets pixel intensity as carve depth: a cell value of
//! 255 maps to the full `target_depth`, 0 to the surface. The generator
//! walks the sampled and smoothed grid column by column, cutting in
//! successive step-down passes until every cell has reached its target
//! depth, then hands the motion stream to the time estimator so the caller
//! receives a complete [`ToolpathObject`].

use std::path::Path;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use reliefkit_core::{round2, Anchor, CancelToken, FeedRates, Normalizer, ParameterError};
use reliefkit_gcode::{
    HeaderType, JobMetadata, MovementMode, ProcessMode, TimeEstimator, ToolpathObject,
};

use crate::error::{ReliefError, ReliefResult};
use crate::heightmap::{effective_density, HeightMapGrid, HeightMapSampler};
use crate::smoother::DepthSmoother;

/// Minimum progress advance between two callback invocations.
const PROGRESS_STEP: f64 = 0.05;

/// Cutting parameters for one relief job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReliefParameters {
    /// Full included angle of the conical cutter, in degrees.
    pub tool_angle: f64,
    /// Depth carved for a cell value of 255, in mm.
    pub target_depth: f64,
    /// Maximum depth removed per pass, in mm.
    pub step_down: f64,
    /// Retract height between columns, in mm.
    pub safety_height: f64,
    /// Parking height after the job, in mm.
    pub stop_height: f64,
    /// Requested sampling density, in samples per mm.
    pub density: f64,
    /// Carve bright pixels shallow instead of deep.
    pub invert: bool,
}

impl Default for ReliefParameters {
    fn default() -> Self {
        Self {
            tool_angle: 90.0,
            target_depth: 5.0,
            step_down: 2.0,
            safety_height: 5.0,
            stop_height: 20.0,
            density: 10.0,
            invert: false,
        }
    }
}

impl ReliefParameters {
    /// Radius gained per unit of depth: `tan(tool_angle / 2)`.
    pub fn tool_slope(&self) -> f64 {
        (self.tool_angle.to_radians() / 2.0).tan()
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if !self.tool_angle.is_finite() || self.tool_angle <= 0.0 || self.tool_angle >= 180.0 {
            return Err(ParameterError::OutOfRange {
                name: "tool_angle".to_string(),
                value: self.tool_angle,
                min: 0.0,
                max: 180.0,
            });
        }
        for (name, value) in [
            ("target_depth", self.target_depth),
            ("step_down", self.step_down),
            ("density", self.density),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParameterError::InvalidValue {
                    name: name.to_string(),
                    reason: format!("must be positive, got {}", value),
                });
            }
        }
        for (name, value) in [
            ("safety_height", self.safety_height),
            ("stop_height", self.stop_height),
        ] {
            if !value.is_finite() {
                return Err(ParameterError::InvalidValue {
                    name: name.to_string(),
                    reason: format!("must be finite, got {}", value),
                });
            }
        }
        Ok(())
    }
}

/// Placement of the relief within machine space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelTransformation {
    /// Physical output width, in mm.
    pub width: f64,
    /// Physical output height, in mm.
    pub height: f64,
    /// Source rotation in radians, counter-clockwise positive.
    pub rotation: f64,
    pub position_x: f64,
    pub position_y: f64,
    pub position_z: f64,
}

impl Default for ModelTransformation {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
            position_x: 0.0,
            position_y: 0.0,
            position_z: 0.0,
        }
    }
}

impl ModelTransformation {
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !self.width.is_finite()
            || self.width <= 0.0
            || !self.height.is_finite()
            || self.height <= 0.0
        {
            return Err(ParameterError::InvalidDimensions(format!(
                "{} x {}",
                self.width, self.height
            )));
        }
        for (name, value) in [
            ("rotation", self.rotation),
            ("position_x", self.position_x),
            ("position_y", self.position_y),
            ("position_z", self.position_z),
        ] {
            if !value.is_finite() {
                return Err(ParameterError::InvalidValue {
                    name: name.to_string(),
                    reason: format!("must be finite, got {}", value),
                });
            }
        }
        Ok(())
    }
}

/// Multi-pass relief toolpath generator.
///
/// Construction does all the expensive preparation up front: the source
/// image is sampled into a depth grid and the grid is smoothed against the
/// tool geometry. Generation afterwards only walks the prepared grid, so it
/// can run repeatedly (for example after a feed rate change) without
/// re-decoding the image.
#[derive(Debug, Clone)]
pub struct ReliefToolpathGenerator {
    grid: HeightMapGrid,
    params: ReliefParameters,
    transform: ModelTransformation,
    feeds: FeedRates,
    /// Capped density actually used for sampling, in samples per mm.
    density: f64,
    cancel: CancelToken,
}

impl ReliefToolpathGenerator {
    /// Load an image from disk and prepare a generator for it.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        params: ReliefParameters,
        transform: ModelTransformation,
        feeds: FeedRates,
    ) -> ReliefResult<Self> {
        let img = image::open(path.as_ref())?;
        Self::from_image(img, params, transform, feeds)
    }

    /// Prepare a generator from an already decoded image.
    pub fn from_image(
        img: DynamicImage,
        params: ReliefParameters,
        transform: ModelTransformation,
        feeds: FeedRates,
    ) -> ReliefResult<Self> {
        params.validate()?;
        transform.validate()?;
        feeds.validate()?;

        let density = effective_density(params.density, transform.width, transform.height);
        let sampler = HeightMapSampler::new(
            transform.width,
            transform.height,
            transform.rotation,
            density,
            params.invert,
        );
        let mut grid = sampler.sample(img)?;
        DepthSmoother::new(params.target_depth, density, params.tool_slope()).smooth(&mut grid);

        Ok(Self {
            grid,
            params,
            transform,
            feeds,
            density,
            cancel: CancelToken::new(),
        })
    }

    /// Install a cancellation token checked between columns.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Grid dimensions in samples, `(columns, rows)`.
    pub fn grid_size(&self) -> (usize, usize) {
        (self.grid.width(), self.grid.height())
    }

    pub fn generate_gcode(&self) -> ReliefResult<String> {
        self.generate_gcode_with_progress(|_| {})
    }

    /// Generate the motion stream, reporting progress in `[0, 1]`.
    ///
    /// Each pass lowers a virtual depth limit by `step_down` and revisits
    /// every column; a cell whose target lies below the limit is cut no
    /// deeper than one step per pass. The loop ends when a whole pass makes
    /// no cutting move, bounded by `ceil(target_depth / step_down) + 1`
    /// passes.
    pub fn generate_gcode_with_progress<F>(&self, mut progress_callback: F) -> ReliefResult<String>
    where
        F: FnMut(f32),
    {
        progress_callback(0.0);

        let width = self.grid.width();
        let height = self.grid.height();
        let pitch = 1.0 / self.density;
        let normalizer = Normalizer::new(
            Anchor::Center,
            0.0,
            width as f64,
            0.0,
            height as f64,
            pitch,
            pitch,
        );
        let y_start = normalizer.y(height as f64);
        let column_span = (width - 1).max(1) as f64;
        let z_steps = (self.params.target_depth / self.params.step_down).ceil() as usize + 1;

        let mut gcode = String::new();
        gcode.push_str("M3\n");
        gcode.push_str(&format!(
            "G0 Z{:.2} F{:.0}\n",
            round2(self.params.safety_height),
            self.feeds.jog_speed
        ));
        gcode.push('\n');

        let mut cur_z = self.params.safety_height;
        let mut cur_depth = 0.0f64;
        let mut passes = 0usize;
        let mut last_reported = 0.0f64;
        let mut cut_down = true;

        while cut_down {
            cut_down = false;
            for i in 0..width {
                let col_x = normalizer.x(i as f64);
                for j in 0..height {
                    // machine Y grows upwards while rows scan downwards
                    let y = normalizer.y((height - j) as f64);
                    let z = -self.grid.get(i, j) * self.params.target_depth / 255.0;

                    if z > cur_z {
                        // rise first, then either keep cutting at the new
                        // level or just reposition if this cell is done
                        gcode.push_str(&format!("G0 Z{:.2}\n", round2(z)));
                        if z < cur_depth {
                            gcode.push_str(&format!(
                                "G1 X{:.2} Y{:.2} F{:.0}\n",
                                col_x, y, self.feeds.work_speed
                            ));
                            cut_down = true;
                        } else {
                            gcode.push_str(&format!(
                                "G0 X{:.2} Y{:.2} F{:.0}\n",
                                col_x, y, self.feeds.work_speed
                            ));
                        }
                        cur_z = z;
                    } else if z < cur_depth {
                        // plunge, at most one step_down below the previous pass
                        let z = (cur_depth - self.params.step_down).max(z);
                        gcode.push_str(&format!(
                            "G1 X{:.2} Y{:.2} Z{:.2} F{:.0}\n",
                            col_x,
                            y,
                            round2(z),
                            self.feeds.plunge_speed
                        ));
                        cut_down = true;
                        cur_z = z;
                    } else {
                        gcode.push_str(&format!(
                            "G0 X{:.2} Y{:.2} F{:.0}\n",
                            col_x, y, self.feeds.work_speed
                        ));
                    }
                }

                // retract and return to the column start before moving on
                gcode.push_str(&format!(
                    "G0 Z{:.2} F{:.0}\n",
                    round2(self.params.safety_height),
                    self.feeds.jog_speed
                ));
                gcode.push_str(&format!(
                    "G0 X{:.2} Y{:.2} F{:.0}\n",
                    col_x, y_start, self.feeds.jog_speed
                ));
                cur_z = self.params.safety_height;

                if self.cancel.is_cancelled() {
                    return Err(ReliefError::Cancelled);
                }

                let fraction = (i as f64 / column_span + passes as f64) / z_steps as f64;
                if fraction - last_reported > PROGRESS_STEP {
                    progress_callback(fraction as f32);
                    last_reported = fraction;
                }
            }

            cur_depth -= self.params.step_down;
            passes += 1;
            if passes >= z_steps {
                break;
            }
        }

        gcode.push('\n');
        gcode.push_str(&format!(
            "G0 Z{:.2} F{:.0}\n",
            round2(self.params.stop_height),
            self.feeds.jog_speed
        ));
        gcode.push_str("M5\n");

        debug!(
            "generated relief toolpath: {}x{} grid, {} passes",
            width, height, passes
        );
        progress_callback(1.0);
        Ok(gcode)
    }

    pub fn generate_toolpath(&self) -> ReliefResult<ToolpathObject> {
        self.generate_toolpath_with_progress(|_| {})
    }

    /// Generate the motion stream and wrap it in a [`ToolpathObject`] with
    /// an execution time estimate.
    pub fn generate_toolpath_with_progress<F>(
        &self,
        progress_callback: F,
    ) -> ReliefResult<ToolpathObject>
    where
        F: FnMut(f32),
    {
        let gcode = self.generate_gcode_with_progress(progress_callback)?;
        let estimator = TimeEstimator::new(JobMetadata {
            header_type: HeaderType::Cnc,
            mode: ProcessMode::Greyscale,
            movement_mode: MovementMode::GreyscaleLine,
            jog_speed: self.feeds.jog_speed,
            work_speed: self.feeds.work_speed,
            dwell_time: 0.0,
            position_x: self.transform.position_x,
            position_y: self.transform.position_y,
            position_z: self.transform.position_z,
        })?;
        Ok(estimator.process(&gcode))
    }
}
