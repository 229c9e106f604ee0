//! G-code time estimation by motion-stream replay.
//!
//! The estimator tokenizes a textual motion stream line by line, classifies
//! each line by its modal group and accumulates elapsed time from segment
//! geometry and the job's feed rates. Estimates are always recomputed from
//! the full stream, never patched incrementally, so they cannot drift from
//! the stream they were computed over.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::command::{HeaderType, MotionCommand, MovementMode, ProcessMode, ToolpathObject};
use crate::error::{EstimateError, EstimateResult};
use crate::parser::parse_line;
use reliefkit_core::error::ParameterError;

/// Straight-line feed math underestimates real machines; measured jobs run
/// roughly 40% longer once acceleration ramps are included.
const TIME_CORRECTION_FACTOR: f64 = 1.4;

/// Job-level metadata the estimator needs alongside the raw stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMetadata {
    pub header_type: HeaderType,
    pub mode: ProcessMode,
    pub movement_mode: MovementMode,
    /// Rapid feed rate in units per minute; times `G0` moves.
    pub jog_speed: f64,
    /// Cutting feed rate in units per minute; times `G1` moves.
    pub work_speed: f64,
    /// Dwell duration charged per `G4`, in milliseconds.
    pub dwell_time: f64,
    pub position_x: f64,
    pub position_y: f64,
    pub position_z: f64,
}

impl Default for JobMetadata {
    fn default() -> Self {
        Self {
            header_type: HeaderType::Cnc,
            mode: ProcessMode::Greyscale,
            movement_mode: MovementMode::GreyscaleLine,
            jog_speed: 3000.0,
            work_speed: 1200.0,
            dwell_time: 0.0,
            position_x: 0.0,
            position_y: 0.0,
            position_z: 0.0,
        }
    }
}

/// Replays a textual motion stream and accumulates elapsed machine time.
#[derive(Debug)]
pub struct TimeEstimator {
    meta: JobMetadata,
}

impl TimeEstimator {
    /// Validate job metadata and build an estimator.
    ///
    /// 3D-printing jobs are produced and timed by the external slicer, so
    /// [`HeaderType::Printing`] is rejected here rather than silently
    /// mis-timed.
    pub fn new(meta: JobMetadata) -> EstimateResult<Self> {
        if meta.header_type == HeaderType::Printing {
            return Err(EstimateError::UnsupportedJob(meta.header_type));
        }
        for (name, value) in [("jog_speed", meta.jog_speed), ("work_speed", meta.work_speed)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParameterError::InvalidValue {
                    name: name.to_string(),
                    reason: format!("feed rate must be positive, got {}", value),
                }
                .into());
            }
        }
        if !meta.dwell_time.is_finite() || meta.dwell_time < 0.0 {
            return Err(ParameterError::InvalidValue {
                name: "dwell_time".to_string(),
                reason: format!("must be a non-negative duration, got {}", meta.dwell_time),
            }
            .into());
        }
        Ok(Self { meta })
    }

    /// Tokenize the stream and produce the toolpath object carrying it,
    /// with the time estimate.
    ///
    /// Lines that fail to tokenize contribute zero time and are kept as
    /// empty markers, so `data` stays index-aligned with the input lines.
    pub fn process(&self, gcode: &str) -> ToolpathObject {
        let mut data = Vec::new();
        let mut seconds = 0.0;
        let mut last_x: Option<f64> = None;
        let mut last_y: Option<f64> = None;

        for line in gcode.lines() {
            let cmd = match parse_line(line) {
                Ok(cmd) => cmd,
                Err(err) => {
                    warn!("skipping unparseable motion line: {}", err);
                    MotionCommand::empty()
                }
            };

            if cmd.g == Some(4) {
                seconds += self.meta.dwell_time * 0.001;
            } else if cmd.x.is_some() {
                let dist = xy_distance(last_x, last_y, cmd.x, cmd.y);
                match cmd.g {
                    Some(0) => seconds += dist * 60.0 / self.meta.jog_speed,
                    Some(1) => seconds += dist * 60.0 / self.meta.work_speed,
                    _ => {}
                }
            }

            if let Some(x) = cmd.x {
                last_x = Some(x);
            }
            if let Some(y) = cmd.y {
                last_y = Some(y);
            }
            data.push(cmd);
        }

        ToolpathObject {
            header_type: self.meta.header_type,
            mode: self.meta.mode,
            movement_mode: self.meta.movement_mode,
            data,
            estimated_time: seconds * TIME_CORRECTION_FACTOR,
            position_x: self.meta.position_x,
            position_y: self.meta.position_y,
            position_z: self.meta.position_z,
        }
    }
}

/// XY distance between consecutive tracked points.
///
/// A point with an undefined coordinate, and deltas below a micron on both
/// axes, count as zero distance.
fn xy_distance(last_x: Option<f64>, last_y: Option<f64>, x: Option<f64>, y: Option<f64>) -> f64 {
    let (lx, ly, cx, cy) = match (last_x, last_y, x, y) {
        (Some(lx), Some(ly), Some(cx), Some(cy)) => (lx, ly, cx, cy),
        _ => return 0.0,
    };
    let dx = cx - lx;
    let dy = cy - ly;
    if dx.abs() < 1e-6 && dy.abs() < 1e-6 {
        return 0.0;
    }
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn estimator(work_speed: f64) -> TimeEstimator {
        TimeEstimator::new(JobMetadata {
            work_speed,
            ..JobMetadata::default()
        })
        .unwrap()
    }

    #[test]
    fn test_linear_move_time_with_correction_factor() {
        let toolpath = estimator(600.0).process("G0 X0 Y0\nG1 X10 Y0 F600");
        // 10 units at 600/min is 1.0s, times the 1.4 correction
        assert!((toolpath.estimated_time - 1.4).abs() < 1e-9);
        assert_eq!(toolpath.data.len(), 2);
    }

    #[test]
    fn test_rapid_moves_use_jog_speed() {
        let est = TimeEstimator::new(JobMetadata {
            jog_speed: 6000.0,
            work_speed: 600.0,
            ..JobMetadata::default()
        })
        .unwrap();
        let toolpath = est.process("G0 X0 Y0\nG0 X10 Y0");
        assert!((toolpath.estimated_time - 0.1 * 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_first_move_has_no_prior_point() {
        let toolpath = estimator(600.0).process("G1 X10 Y10");
        assert_eq!(toolpath.estimated_time, 0.0);
    }

    #[test]
    fn test_dwell_adds_scaled_metadata_time() {
        let base = "G0 X0 Y0\nG1 X10 Y0";
        let est = TimeEstimator::new(JobMetadata {
            work_speed: 600.0,
            dwell_time: 500.0,
            ..JobMetadata::default()
        })
        .unwrap();
        let without = est.process(base);
        let with = est.process(&format!("{}\nG4 P500", base));
        let delta = with.estimated_time - without.estimated_time;
        assert!((delta - 1.4 * 0.5).abs() < 1e-9, "dwell delta was {delta}");
    }

    #[test]
    fn test_missing_coordinate_contributes_zero_distance() {
        // X-only line travels for free but still updates the tracked point
        let toolpath = estimator(600.0).process("G0 X0 Y0\nG1 X10\nG1 X20 Y0");
        assert!((toolpath.estimated_time - 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_sub_micron_deltas_are_ignored() {
        let toolpath = estimator(600.0).process("G0 X0 Y0\nG1 X0.0000001 Y0");
        assert_eq!(toolpath.estimated_time, 0.0);
    }

    #[test]
    fn test_malformed_lines_warn_and_keep_alignment() {
        let toolpath = estimator(600.0).process("G0 X0 Y0\nnot gcode !!\nG1 X10 Y0");
        assert_eq!(toolpath.data.len(), 3);
        assert!(toolpath.data[1].is_empty());
        assert!((toolpath.estimated_time - 1.4).abs() < 1e-9);
    }

    #[test]
    fn test_blank_and_comment_lines_are_free() {
        let toolpath = estimator(600.0).process("; relief job\n\nM3\nG0 X0 Y0");
        assert_eq!(toolpath.data.len(), 4);
        assert!(toolpath.data[1].is_empty());
        assert_eq!(toolpath.data[0].comment.as_deref(), Some("relief job"));
        assert_eq!(toolpath.estimated_time, 0.0);
    }

    #[test]
    fn test_estimates_are_never_negative() {
        let streams = [
            "",
            "M3\nM5",
            "G0 X-10 Y-10\nG1 X-20 Y-30\nG0 X0 Y0",
            "G4\nG4\nG4",
        ];
        for stream in streams {
            let toolpath = estimator(600.0).process(stream);
            assert!(
                toolpath.estimated_time >= 0.0,
                "negative estimate for {stream:?}"
            );
        }
    }

    #[test]
    fn test_printing_jobs_are_unsupported() {
        let err = TimeEstimator::new(JobMetadata {
            header_type: HeaderType::Printing,
            ..JobMetadata::default()
        })
        .unwrap_err();
        assert!(matches!(err, EstimateError::UnsupportedJob(_)));
    }

    #[test]
    fn test_invalid_feed_rates_are_rejected() {
        for bad in [0.0, -600.0, f64::NAN] {
            let err = TimeEstimator::new(JobMetadata {
                work_speed: bad,
                ..JobMetadata::default()
            });
            assert!(err.is_err(), "work_speed {bad} should be rejected");
        }
        let err = TimeEstimator::new(JobMetadata {
            dwell_time: -1.0,
            ..JobMetadata::default()
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_metadata_is_carried_through() {
        let est = TimeEstimator::new(JobMetadata {
            position_x: 1.5,
            position_y: -2.0,
            position_z: 0.5,
            ..JobMetadata::default()
        })
        .unwrap();
        let toolpath = est.process("M3");
        assert_eq!(toolpath.header_type, HeaderType::Cnc);
        assert_eq!(toolpath.mode, ProcessMode::Greyscale);
        assert_eq!(toolpath.movement_mode, MovementMode::GreyscaleLine);
        assert_eq!(toolpath.position_x, 1.5);
        assert_eq!(toolpath.position_y, -2.0);
        assert_eq!(toolpath.position_z, 0.5);
    }

    proptest! {
        #[test]
        fn prop_estimates_stay_non_negative_and_dwell_adds_exactly(
            moves in proptest::collection::vec(
                (0u8..=1, -100.0f64..100.0, -100.0f64..100.0),
                0..32,
            ),
        ) {
            let mut stream = String::new();
            for (mode, x, y) in &moves {
                stream.push_str(&format!("G{} X{:.3} Y{:.3}\n", mode, x, y));
            }

            let est = TimeEstimator::new(JobMetadata {
                dwell_time: 250.0,
                ..JobMetadata::default()
            })
            .unwrap();
            let base = est.process(&stream).estimated_time;
            prop_assert!(base.is_finite());
            prop_assert!(base >= 0.0);

            let with_dwell = est.process(&format!("{}G4\n", stream)).estimated_time;
            prop_assert!((with_dwell - base - 1.4 * 0.25).abs() < 1e-9);
        }
    }
}
