//! Perimeter stitching: turns one level's open and closed polylines into
//! closed loops whose even-odd fill covers exactly the area above the level.
//!
//! Open paths are joined by walking clockwise along the plotted rectangle from
//! the end of one path to the start of the next. When the whole boundary is
//! above the level and nothing crosses it, the rectangle itself is emitted
//! first so interior loops punch holes in it.

use std::ops::Range;

use contour_common::{Perimeter, Point, PERIMETER_TOLERANCE};
use serde::Serialize;

use crate::levels::LevelInfo;
use crate::path::{format_point, smooth_closed, smooth_open, straight_closed};

/// How a loop's points were assembled, which decides how it is smoothed.
#[derive(Debug, Clone, PartialEq, Default)]
enum Outline {
    /// Straight segments only.
    #[default]
    Straight,
    /// A contour closed inside the grid.
    Interior,
    /// Edge path runs (ranges into `points`) joined by perimeter corners.
    Edge(Vec<Range<usize>>),
}

/// One closed loop; the first point is repeated at the end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StitchedLoop {
    pub points: Vec<Point>,
    #[serde(skip)]
    outline: Outline,
}

impl StitchedLoop {
    fn close(mut points: Vec<Point>) -> Self {
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if points.len() == 1 || first != last {
                points.push(first);
            }
        }
        Self {
            points,
            outline: Outline::Straight,
        }
    }

    fn with_outline(mut self, outline: Outline) -> Self {
        self.outline = outline;
        self
    }

    /// The loop without its repeated closing point.
    fn ring(&self) -> &[Point] {
        &self.points[..self.points.len().saturating_sub(1)]
    }

    /// Path data smoothed the same way the level's lines are drawn.
    ///
    /// Edge path runs are curved, perimeter corners stay sharp.
    pub fn to_smoothed_path_data(&self, smoothing: f64) -> String {
        match &self.outline {
            Outline::Straight => straight_closed(self.ring()),
            Outline::Interior => smooth_closed(self.ring(), smoothing),
            Outline::Edge(runs) => {
                let ring_end = self.points.len().saturating_sub(1);
                let mut d = String::new();
                let mut at = 0;
                for run in runs {
                    for corner in &self.points[at.min(run.start)..run.start] {
                        d.push('L');
                        d.push_str(&format_point(corner));
                    }
                    let piece = smooth_open(&self.points[run.clone()], smoothing);
                    if d.is_empty() {
                        d.push_str(&piece);
                    } else {
                        // Continue the current sub-path instead of moving
                        d.push('L');
                        d.push_str(piece.get(1..).unwrap_or_default());
                    }
                    at = run.end;
                }
                for corner in &self.points[at.min(ring_end)..ring_end] {
                    d.push('L');
                    d.push_str(&format_point(corner));
                }
                if !d.is_empty() {
                    d.push('Z');
                }
                d
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }

    /// Signed shoelace area in pixel space; positive is clockwise on screen.
    pub fn signed_area(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].x * w[1].y - w[1].x * w[0].y)
            .sum::<f64>()
            / 2.0
    }
}

/// All fillable loops for one level.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StitchResult {
    pub loops: Vec<StitchedLoop>,
    /// True when the loops start with the whole perimeter.
    pub includes_perimeter: bool,
}

impl StitchResult {
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    /// Total number of points across all loops, closing points included.
    pub fn point_count(&self) -> usize {
        self.loops.iter().map(|l| l.points.len()).sum()
    }

    /// Straight-segment path data, one `M…Z` sub-path per loop.
    pub fn to_path_data(&self) -> String {
        self.loops.iter().map(|l| straight_closed(l.ring())).collect()
    }

    /// Fill path data matching the smoothed contour lines of the level.
    pub fn to_smoothed_path_data(&self, smoothing: f64) -> String {
        self.loops
            .iter()
            .map(|l| l.to_smoothed_path_data(smoothing))
            .collect()
    }

    /// Even-odd containment test against all loops.
    pub fn contains(&self, pt: &Point) -> bool {
        let mut inside = false;
        for l in &self.loops {
            for w in l.points.windows(2) {
                let (a, b) = (w[0], w[1]);
                if (a.y > pt.y) != (b.y > pt.y) {
                    let x = a.x + (pt.y - a.y) / (b.y - a.y) * (b.x - a.x);
                    if pt.x < x {
                        inside = !inside;
                    }
                }
            }
        }
        inside
    }
}

/// Whether every point of the perimeter is above `level`, judged from the
/// first two samples of the grid.
fn perimeter_above(level: &LevelInfo<'_>) -> bool {
    level.grid.origin_min() > level.level
}

/// Is `candidate` on the straight stretch from `from` towards `to`?
///
/// Returns `None` when `from -> to` is neither horizontal nor vertical.
fn on_stretch(from: &Point, to: &Point, candidate: &Point) -> Option<bool> {
    if (from.x - to.x).abs() < PERIMETER_TOLERANCE {
        Some(
            (from.x - candidate.x).abs() < PERIMETER_TOLERANCE
                && (candidate.y - from.y) * (to.y - candidate.y) >= 0.0,
        )
    } else if (from.y - to.y).abs() < PERIMETER_TOLERANCE {
        Some(
            (from.y - candidate.y).abs() < PERIMETER_TOLERANCE
                && (candidate.x - from.x) * (to.x - candidate.x) >= 0.0,
        )
    } else {
        None
    }
}

/// Join all paths of one level into fillable loops.
///
/// Returns `None` when there is nothing to fill. Inconsistent endpoint
/// geometry never fails the call: the affected loop is logged and dropped and
/// stitching carries on with the remaining paths.
pub fn stitch(level: &LevelInfo<'_>, perimeter: &Perimeter) -> Option<StitchResult> {
    let edgepaths = &level.edgepaths;
    let mut result = StitchResult::default();

    if edgepaths.is_empty() && perimeter_above(level) {
        result.loops.push(StitchedLoop {
            points: perimeter.closed_loop(),
            outline: Outline::Straight,
        });
        result.includes_perimeter = true;
    }

    let mut starts_left: Vec<usize> = (0..edgepaths.len()).collect();
    let mut current: Vec<Point> = Vec::new();
    let mut runs: Vec<Range<usize>> = Vec::new();
    let mut i = 0;

    while !starts_left.is_empty() {
        let path = &edgepaths[i];
        runs.push(current.len()..current.len() + path.len());
        current.extend_from_slice(path);
        starts_left.retain(|&k| k != i);

        let mut endpt = path.last().copied();
        let mut next: Option<usize> = None;

        // A path re-entering its own side behind its end needs a fifth stretch
        for _ in 0..5 {
            let Some(end) = endpt else {
                tracing::warn!(level = level.level, edgepath = i, "Missing end point");
                break;
            };
            let Some(side) = perimeter.side_of(&end) else {
                tracing::warn!(
                    level = level.level,
                    edgepath = i,
                    x = end.x,
                    y = end.y,
                    "Edge path ends off the perimeter"
                );
                break;
            };

            let mut target = perimeter.corner(side.next_corner());
            for (k, candidate) in edgepaths.iter().enumerate() {
                let Some(start) = candidate.first() else {
                    continue;
                };
                match on_stretch(&end, &target, start) {
                    Some(true) => {
                        target = *start;
                        next = Some(k);
                    }
                    Some(false) => {}
                    None => tracing::debug!(
                        level = level.level,
                        "Perimeter stretch is neither horizontal nor vertical"
                    ),
                }
            }

            endpt = Some(target);
            if next.is_some() {
                break;
            }
            tracing::trace!(x = target.x, y = target.y, "Walked to perimeter corner");
            current.push(target);
        }

        let Some(n) = next else {
            tracing::warn!(
                level = level.level,
                edgepath = i,
                "Unclosed perimeter path, abandoning loop"
            );
            current.clear();
            runs.clear();
            match starts_left.first() {
                Some(&k) => {
                    i = k;
                    continue;
                }
                None => break,
            }
        };

        // Back at a path already in this loop: close it and start another.
        if starts_left.contains(&n) {
            i = n;
        } else {
            let closed = StitchedLoop::close(std::mem::take(&mut current))
                .with_outline(Outline::Edge(std::mem::take(&mut runs)));
            result.loops.push(closed);
            if let Some(&k) = starts_left.first() {
                i = k;
            }
        }
    }

    for interior in &level.paths {
        if interior.len() < 2 {
            continue;
        }
        result
            .loops
            .push(StitchedLoop::close(interior.clone()).with_outline(Outline::Interior));
    }

    tracing::debug!(
        level = level.level,
        loops = result.loops.len(),
        full_perimeter = result.includes_perimeter,
        "Stitched contour level"
    );

    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}
