//! Tool-constrained depth smoothing.
//!
//! A conical cutter cannot carve a wall steeper than its own flank: cutting
//! one cell to full depth forces every neighbor down to at least that depth
//! minus one pixel pitch of climb along the tool slope. The smoother
//! propagates this constraint across the grid as a raise-only fixed-point
//! iteration (a greyscale dilation parameterized by tool geometry), so the
//! generator downstream never asks for a physically impossible wall.

use tracing::{debug, warn};

use crate::heightmap::HeightMapGrid;

/// Raise-only fixed-point smoother for one tool/density combination.
#[derive(Debug, Clone)]
pub struct DepthSmoother {
    /// `target_depth * density * tool_slope`; adjacent cells may differ by
    /// at most `255 / depth_offset_ratio` grey levels.
    depth_offset_ratio: f64,
}

impl DepthSmoother {
    pub fn new(target_depth: f64, density: f64, tool_slope: f64) -> Self {
        Self {
            depth_offset_ratio: target_depth * density * tool_slope,
        }
    }

    /// Sweep the grid until no cell changes, returning the sweep count.
    ///
    /// Every sweep only raises values and 255 bounds them above, so the
    /// fixed point is reached naturally; the `width + height` cap is a
    /// backstop that is never expected to fire.
    pub fn smooth(&self, grid: &mut HeightMapGrid) -> usize {
        let max_sweeps = grid.width() + grid.height();
        let mut sweeps = 0;
        loop {
            let mut changed = false;
            for i in 0..grid.width() {
                for j in 0..grid.height() {
                    let allowed = self.allowed_depth(grid, i, j);
                    if grid.get(i, j) < allowed {
                        grid.set(i, j, allowed);
                        changed = true;
                    }
                }
            }
            sweeps += 1;
            if !changed {
                break;
            }
            if sweeps >= max_sweeps {
                warn!(
                    "depth smoothing hit the {} sweep cap before reaching a fixed point",
                    max_sweeps
                );
                break;
            }
        }
        debug!("depth smoothing settled after {} sweeps", sweeps);
        sweeps
    }

    /// Smallest value the 8-neighborhood forces onto cell `(i, j)`.
    ///
    /// Returns 0 (which never raises anything) for boundary cells, and for
    /// tools steep enough that one pixel of travel spans the whole grey
    /// range (`depth_offset_ratio >= 255`) where the constraint is skipped
    /// wholesale.
    fn allowed_depth(&self, grid: &HeightMapGrid, i: usize, j: usize) -> f64 {
        if self.depth_offset_ratio >= 255.0 {
            return 0.0;
        }
        if i == 0 || j == 0 || i == grid.width() - 1 || j == grid.height() - 1 {
            return 0.0;
        }

        let mut max_neighbor = 0.0f64;
        for di in -1i32..=1 {
            for dj in -1i32..=1 {
                if di == 0 && dj == 0 {
                    continue;
                }
                let ni = (i as i32 + di) as usize;
                let nj = (j as i32 + dj) as usize;
                max_neighbor = max_neighbor.max(grid.get(ni, nj));
            }
        }
        max_neighbor - 255.0 / self.depth_offset_ratio
    }
}
