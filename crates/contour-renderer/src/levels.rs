//! Per-level work records and the level series builder.

use std::collections::BTreeMap;

use contour_common::{ContourOptions, Grid, Point};

/// Hard cap on the number of levels one trace may produce.
pub const MAX_CONTOUR_LEVELS: usize = 1000;

/// A lattice cell, addressed by `(col, row)` of its top-left sample.
pub type CellIndex = (usize, usize);

/// Everything known about one contour level.
///
/// Built empty by [`build_levels`]; a tracer returns a new record with the
/// crossings and polylines filled in.
#[derive(Debug, Clone)]
pub struct LevelInfo<'g> {
    pub level: f64,
    /// Non-trivial cells and their marching index.
    pub crossings: BTreeMap<CellIndex, u8>,
    /// Boundary cell each open path starts in.
    pub starts: Vec<CellIndex>,
    /// Open polylines; both ends lie on the perimeter.
    pub edgepaths: Vec<Vec<Point>>,
    /// Closed polylines inside the perimeter, stored without a repeated end point.
    pub paths: Vec<Vec<Point>>,
    /// Curve smoothing applied when the polylines are drawn.
    pub smoothing: f64,
    /// The sampled field this level slices.
    pub grid: &'g Grid,
}

impl<'g> LevelInfo<'g> {
    /// A record with no geometry yet.
    pub fn empty(level: f64, grid: &'g Grid, smoothing: f64) -> Self {
        Self {
            level,
            crossings: BTreeMap::new(),
            starts: Vec::new(),
            edgepaths: Vec::new(),
            paths: Vec::new(),
            smoothing,
            grid,
        }
    }

    /// True once a tracer has produced at least one polyline.
    pub fn has_geometry(&self) -> bool {
        !self.edgepaths.is_empty() || !self.paths.is_empty()
    }
}

/// Exclusive end bound for the level series.
///
/// Nudged past `end` so a level sitting exactly on `end` survives rounding.
pub fn end_plus(contours: &ContourOptions) -> f64 {
    contours.end + contours.size / 1e6
}

/// Enumerate levels from `start` up to the exclusive end bound.
///
/// Stops with a warning at [`MAX_CONTOUR_LEVELS`], so a zero or negative step
/// never loops forever.
pub fn build_levels<'g>(
    contours: &ContourOptions,
    grid: &'g Grid,
    smoothing: f64,
) -> Vec<LevelInfo<'g>> {
    let end = end_plus(contours);
    let mut levels = Vec::new();

    let mut value = contours.start;
    while value < end {
        if levels.len() == MAX_CONTOUR_LEVELS {
            tracing::warn!(
                start = contours.start,
                end = contours.end,
                size = contours.size,
                "Too many contours, clipping at {}",
                MAX_CONTOUR_LEVELS
            );
            break;
        }
        levels.push(LevelInfo::empty(value, grid, smoothing));
        value += contours.size;
    }

    tracing::debug!(count = levels.len(), "Built contour levels");
    levels
}
