//! Motion-command data model and the toolpath output contract.
//!
//! Downstream renderers and the G-code assembly stage consume these types as
//! JSON, so the serde shapes here are wire contracts: motion words keyed by
//! their uppercase command letter, object metadata in camelCase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine family a toolpath is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderType {
    Cnc,
    Laser,
    Printing,
}

impl fmt::Display for HeaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderType::Cnc => write!(f, "cnc"),
            HeaderType::Laser => write!(f, "laser"),
            HeaderType::Printing => write!(f, "printing"),
        }
    }
}

/// How the source model is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessMode {
    Greyscale,
    Vector,
}

/// How greyscale motion is organized; downstream renderers pick their
/// drawing primitive from this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementMode {
    GreyscaleLine,
    GreyscaleDot,
}

/// One parsed or emitted motion line.
///
/// Fields mirror the single-letter words of the textual stream; a word that
/// is absent from the line stays `None`. A command with every field `None`
/// is the empty marker kept in place of blank (or unparseable) lines so the
/// command sequence stays index-aligned with the text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionCommand {
    #[serde(rename = "G", skip_serializing_if = "Option::is_none")]
    pub g: Option<u8>,
    #[serde(rename = "M", skip_serializing_if = "Option::is_none")]
    pub m: Option<u8>,
    #[serde(rename = "X", skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(rename = "Y", skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(rename = "Z", skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(rename = "F", skip_serializing_if = "Option::is_none")]
    pub f: Option<f64>,
    #[serde(rename = "S", skip_serializing_if = "Option::is_none")]
    pub s: Option<f64>,
    #[serde(rename = "P", skip_serializing_if = "Option::is_none")]
    pub p: Option<f64>,
    #[serde(rename = "C", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl MotionCommand {
    /// The empty marker stored for blank stream lines.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no word and no comment was present on the line.
    pub fn is_empty(&self) -> bool {
        self.g.is_none()
            && self.m.is_none()
            && self.x.is_none()
            && self.y.is_none()
            && self.z.is_none()
            && self.f.is_none()
            && self.s.is_none()
            && self.p.is_none()
            && self.comment.is_none()
    }
}

/// Completed toolpath: the motion stream plus job metadata and the time
/// estimate derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolpathObject {
    pub header_type: HeaderType,
    pub mode: ProcessMode,
    pub movement_mode: MovementMode,
    pub data: Vec<MotionCommand>,
    /// Estimated execution time in seconds.
    pub estimated_time: f64,
    pub position_x: f64,
    pub position_y: f64,
    pub position_z: f64,
}
