//! Height-map sampling from greyscale images.
//!
//! The sampler turns a decoded image into a grid of depth-indicator values
//! in `[0, 255]`. Grid resolution ("density", samples per physical unit) is
//! capped against the physical footprint so grid size stays bounded no
//! matter what the caller requests.

use image::{DynamicImage, GrayImage, Luma};
use tracing::debug;

use crate::error::ReliefResult;
use reliefkit_core::error::ParameterError;

/// Upper bound on total grid samples used by the density cap.
const MAX_GRID_SAMPLES: f64 = 200_000.0;

/// Cap a requested density against the physical footprint.
///
/// The effective density never produces more than [`MAX_GRID_SAMPLES`]
/// cells; oversized footprints can cap all the way to zero, which the
/// sampler then rejects as an empty grid.
pub fn effective_density(requested: f64, width: f64, height: f64) -> f64 {
    requested.min((MAX_GRID_SAMPLES / width / height).sqrt().floor())
}

/// Column-major grid of depth-indicator values.
///
/// Cell `(i, j)` addresses column `i`, row `j`. Values are `f64` because
/// smoothing raises cells to non-integral levels; they stay within
/// `[0, 255]`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMapGrid {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl HeightMapGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.height + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!((0.0..=255.0).contains(&value), "grid value {value}");
        self.data[i * self.height + j] = value;
    }
}

/// Samples a source image into a [`HeightMapGrid`].
#[derive(Debug, Clone)]
pub struct HeightMapSampler {
    /// Physical output width.
    width: f64,
    /// Physical output height.
    height: f64,
    /// Model rotation in radians, counter-clockwise positive; the raster is
    /// rotated by its negation.
    rotation: f64,
    /// Effective samples per physical unit (already capped).
    density: f64,
    invert: bool,
}

impl HeightMapSampler {
    pub fn new(width: f64, height: f64, rotation: f64, density: f64, invert: bool) -> Self {
        Self {
            width,
            height,
            rotation,
            density,
            invert,
        }
    }

    /// Produce the depth grid for `img`.
    ///
    /// Pipeline: optional inversion, greyscale conversion, rotation over an
    /// expanded white canvas, then nearest-neighbor sampling into a grid of
    /// `round(width * density) x round(height * density)` cells, rescaled
    /// proportionally when rotation changed the raster's pixel dimensions.
    pub fn sample(&self, mut img: DynamicImage) -> ReliefResult<HeightMapGrid> {
        if img.width() == 0 || img.height() == 0 {
            return Err(ParameterError::InvalidDimensions(format!(
                "source image has no pixels ({} x {})",
                img.width(),
                img.height()
            ))
            .into());
        }

        if self.invert {
            img.invert();
        }
        let mut gray = img.to_luma8();

        let (orig_w, orig_h) = gray.dimensions();
        let mut target_w = (self.width * self.density).round();
        let mut target_h = (self.height * self.density).round();

        if self.rotation != 0.0 {
            gray = rotate_about_center(&gray, -self.rotation);
            // the canvas grew; keep cells square by rescaling the grid with
            // the raster
            target_w = (target_w * gray.width() as f64 / orig_w as f64).round();
            target_h = (target_h * gray.height() as f64 / orig_h as f64).round();
        }

        if target_w < 1.0 || target_h < 1.0 {
            return Err(ParameterError::InvalidDimensions(format!(
                "target grid is empty ({} x {} at density {})",
                target_w, target_h, self.density
            ))
            .into());
        }
        let target_w = target_w as usize;
        let target_h = target_h as usize;

        let (src_w, src_h) = gray.dimensions();
        let mut grid = HeightMapGrid::new(target_w, target_h);
        for i in 0..target_w {
            let sx = (i as f64 / target_w as f64 * src_w as f64).floor() as u32;
            let sx = sx.min(src_w - 1);
            for j in 0..target_h {
                let sy = (j as f64 / target_h as f64 * src_h as f64).floor() as u32;
                let sy = sy.min(src_h - 1);
                let Luma([value]) = *gray.get_pixel(sx, sy);
                grid.set(i, j, value as f64);
            }
        }

        debug!(
            "sampled {}x{} grid from {}x{} raster at density {}",
            target_w, target_h, src_w, src_h, self.density
        );
        Ok(grid)
    }
}

/// Rotate `src` by `angle` radians about its center over an expanded
/// canvas, nearest-neighbor sampled with white fill.
fn rotate_about_center(src: &GrayImage, angle: f64) -> GrayImage {
    let (w, h) = src.dimensions();
    let (sin, cos) = angle.sin_cos();
    // the epsilon keeps ulp noise at axis-aligned angles from adding a row
    let new_w = (w as f64 * cos.abs() + h as f64 * sin.abs() - 1e-9).ceil().max(1.0) as u32;
    let new_h = (w as f64 * sin.abs() + h as f64 * cos.abs() - 1e-9).ceil().max(1.0) as u32;

    let cx_src = w as f64 / 2.0;
    let cy_src = h as f64 / 2.0;
    let cx_dst = new_w as f64 / 2.0;
    let cy_dst = new_h as f64 / 2.0;

    let mut out = GrayImage::from_pixel(new_w, new_h, Luma([255u8]));
    for y in 0..new_h {
        for x in 0..new_w {
            let dx = x as f64 + 0.5 - cx_dst;
            let dy = y as f64 + 0.5 - cy_dst;
            let sx = (cos * dx + sin * dy + cx_src).floor();
            let sy = (-sin * dx + cos * dy + cy_src).floor();
            if sx >= 0.0 && sy >= 0.0 && (sx as u32) < w && (sy as u32) < h {
                out.put_pixel(x, y, *src.get_pixel(sx as u32, sy as u32));
            }
        }
    }
    out
}
