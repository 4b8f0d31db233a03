//! Clip region separating present data from missing samples.
//!
//! A binary occupancy field (1 = data, 0 = missing) is traced at
//! [`GAP_MASK_LEVEL`] and stitched like any other level. The level sits below
//! 1 so isolated present samples next to missing ones keep a visible sliver
//! instead of being swallowed by the gap.

use contour_common::{Grid, Perimeter};

use crate::levels::LevelInfo;
use crate::stitch::{stitch, StitchResult};
use crate::trace::{PixelAxes, Tracer};

/// Level at which the occupancy field is traced.
pub const GAP_MASK_LEVEL: f64 = 0.9;

/// Occupancy field: same shape as `grid`, 1 everywhere except 0 at each
/// `(row, col)` in `missing`. Out-of-range coordinates are skipped.
pub fn build_mask(grid: &Grid, missing: &[(usize, usize)]) -> Grid {
    let mut mask = grid.filled(1.0);
    for &(row, col) in missing {
        if !mask.set(row, col, 0.0) {
            tracing::warn!(row, col, "Missing sample outside the grid, skipped");
        }
    }
    mask
}

/// The occupancy field and the clip region traced from it.
///
/// The occupancy grid is handed back so callers can keep it for hover lookups.
#[derive(Debug, Clone)]
pub struct GapClip {
    pub occupancy: Grid,
    /// `None` when nothing survives, i.e. every sample is missing.
    pub clip: Option<StitchResult>,
}

/// Build the occupancy field and stitch its boundary into a clip region.
pub fn build_gap_clip(
    grid: &Grid,
    missing: &[(usize, usize)],
    tracer: &dyn Tracer,
    axes: &PixelAxes<'_>,
    perimeter: &Perimeter,
) -> GapClip {
    let occupancy = build_mask(grid, missing);
    let clip = {
        let level = LevelInfo::empty(GAP_MASK_LEVEL, &occupancy, 0.0);
        let traced = tracer.trace(&level, axes);
        tracing::debug!(
            missing = missing.len(),
            edgepaths = traced.edgepaths.len(),
            paths = traced.paths.len(),
            "Traced gap mask"
        );
        stitch(&traced, perimeter)
    };
    GapClip { occupancy, clip }
}
