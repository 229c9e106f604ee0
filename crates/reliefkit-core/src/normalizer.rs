//! Anchor-based coordinate normalization.
//!
//! Maps model-space values (grid indices, canvas units) into machine
//! coordinates: pick an origin from the model's bounds according to an
//! anchor, scale, translate, and round to the two-decimal precision the
//! emitted G-code carries. The mapping is pure; a `Normalizer` holds only
//! its configuration.

use serde::{Deserialize, Serialize};

/// Reference corner/edge/center used to position normalized coordinates in
/// machine space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    /// Resolve an anchor from a label such as `"Bottom Left"` or `"Center"`.
    ///
    /// The horizontal origin is chosen by suffix (`Left`/`Right`) and the
    /// vertical origin by prefix (`Top`/`Bottom`); an axis with neither is
    /// centered, so unrecognized labels fall back to [`Anchor::Center`].
    pub fn from_label(label: &str) -> Self {
        let left = label.ends_with("Left");
        let right = label.ends_with("Right");
        let top = label.starts_with("Top");
        let bottom = label.starts_with("Bottom");
        match (top, bottom) {
            (true, _) => {
                if left {
                    Anchor::TopLeft
                } else if right {
                    Anchor::TopRight
                } else {
                    Anchor::TopCenter
                }
            }
            (_, true) => {
                if left {
                    Anchor::BottomLeft
                } else if right {
                    Anchor::BottomRight
                } else {
                    Anchor::BottomCenter
                }
            }
            _ => {
                if left {
                    Anchor::CenterLeft
                } else if right {
                    Anchor::CenterRight
                } else {
                    Anchor::Center
                }
            }
        }
    }

    fn origin_x(&self, min_x: f64, max_x: f64) -> f64 {
        match self {
            Anchor::TopLeft | Anchor::CenterLeft | Anchor::BottomLeft => min_x,
            Anchor::TopRight | Anchor::CenterRight | Anchor::BottomRight => max_x,
            _ => (min_x + max_x) / 2.0,
        }
    }

    fn origin_y(&self, min_y: f64, max_y: f64) -> f64 {
        match self {
            Anchor::TopLeft | Anchor::TopCenter | Anchor::TopRight => min_y,
            Anchor::BottomLeft | Anchor::BottomCenter | Anchor::BottomRight => max_y,
            _ => (min_y + max_y) / 2.0,
        }
    }
}

/// Round to two decimal places, halves away from zero.
///
/// Emitted coordinates are compared textually by downstream consumers, so
/// the rounding rule is part of the output contract.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Pure model-space to machine-space coordinate mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Normalizer {
    origin_x: f64,
    origin_y: f64,
    scale_x: f64,
    scale_y: f64,
    translate_x: f64,
    translate_y: f64,
}

impl Normalizer {
    /// Build a normalizer over the model bounds `[min_x, max_x] x [min_y, max_y]`
    /// with a per-axis scale and no translation.
    pub fn new(
        anchor: Anchor,
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
        scale_x: f64,
        scale_y: f64,
    ) -> Self {
        Self {
            origin_x: anchor.origin_x(min_x, max_x),
            origin_y: anchor.origin_y(min_y, max_y),
            scale_x,
            scale_y,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }

    /// Add a per-axis translation applied after scaling.
    pub fn with_translate(mut self, translate_x: f64, translate_y: f64) -> Self {
        self.translate_x = translate_x;
        self.translate_y = translate_y;
        self
    }

    /// Map a model-space X value into machine space.
    pub fn x(&self, v: f64) -> f64 {
        round2((v - self.origin_x) * self.scale_x + self.translate_x)
    }

    /// Map a model-space Y value into machine space.
    pub fn y(&self, v: f64) -> f64 {
        round2((v - self.origin_y) * self.scale_y + self.translate_y)
    }
}
