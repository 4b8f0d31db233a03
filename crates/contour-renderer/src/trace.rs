//! Contour tracing using the marching squares algorithm.
//!
//! The tracer turns one [`LevelInfo`] plus the axis transforms into a new
//! record holding the level's crossings and its pixel-space polylines. Every
//! polyline is oriented so the area above the level lies on its clockwise
//! (right-hand, in screen space) side, which is what the perimeter stitcher
//! relies on.

use std::collections::{HashMap, VecDeque};

use contour_common::{AxisTransform, Point};

use crate::levels::{CellIndex, LevelInfo};

/// Axis transforms used to place traced points in pixel space.
#[derive(Clone, Copy)]
pub struct PixelAxes<'a> {
    pub x: &'a dyn AxisTransform,
    pub y: &'a dyn AxisTransform,
}

impl<'a> PixelAxes<'a> {
    pub fn new(x: &'a dyn AxisTransform, y: &'a dyn AxisTransform) -> Self {
        Self { x, y }
    }

    fn to_pixel(&self, x: f64, y: f64) -> Point {
        Point::new(self.x.c2p(x), self.y.c2p(y))
    }
}

/// Produces the polylines of one contour level.
pub trait Tracer {
    /// Trace `level` against its grid, returning a new, populated record.
    fn trace<'g>(&self, level: &LevelInfo<'g>, axes: &PixelAxes<'_>) -> LevelInfo<'g>;
}

/// Trace every level in order.
pub fn trace_all<'g>(
    tracer: &dyn Tracer,
    levels: &[LevelInfo<'g>],
    axes: &PixelAxes<'_>,
) -> Vec<LevelInfo<'g>> {
    levels.iter().map(|level| tracer.trace(level, axes)).collect()
}

/// A cell edge, identified by its lower-index endpoint `(col, row)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EdgeKey {
    /// Between `(col, row)` and `(col + 1, row)`.
    Horizontal(usize, usize),
    /// Between `(col, row)` and `(col, row + 1)`.
    Vertical(usize, usize),
}

/// A crossing of one cell edge.
#[derive(Debug, Clone, Copy)]
struct EdgePoint {
    key: EdgeKey,
    point: Point,
}

/// One cell's piece of contour.
#[derive(Debug, Clone, Copy)]
struct Segment {
    from: EdgePoint,
    to: EdgePoint,
    /// +1 when `from -> to` already has the high side on the right, -1 when it
    /// must be reversed, 0 when the segment is degenerate.
    vote: i8,
}

/// Marching squares over a rectangular grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarchingSquares;

impl Tracer for MarchingSquares {
    fn trace<'g>(&self, level: &LevelInfo<'g>, axes: &PixelAxes<'_>) -> LevelInfo<'g> {
        let mut traced = LevelInfo::empty(level.level, level.grid, level.smoothing);

        let segments = march_squares(&mut traced, axes);
        let rows = traced.grid.rows();
        let cols = traced.grid.cols();

        for chain in connect_segments(&segments) {
            if chain.closed {
                traced.paths.push(chain.points);
                continue;
            }
            let on_boundary = |key: &EdgeKey| is_boundary_edge(*key, cols, rows);
            if !(on_boundary(&chain.first) && on_boundary(&chain.last)) {
                tracing::debug!(
                    level = traced.level,
                    points = chain.points.len(),
                    "Open contour ends away from the grid boundary"
                );
            }
            traced.starts.push(edge_cell(chain.first, cols, rows));
            traced.edgepaths.push(chain.points);
        }

        tracing::debug!(
            level = traced.level,
            crossings = traced.crossings.len(),
            edgepaths = traced.edgepaths.len(),
            paths = traced.paths.len(),
            "Traced contour level"
        );
        traced
    }
}

/// Marching index bit for each corner strictly above the level.
fn marching_index(tl: f64, tr: f64, br: f64, bl: f64, level: f64) -> u8 {
    let mut index = 0;
    if tl > level {
        index |= 1;
    }
    if tr > level {
        index |= 2;
    }
    if br > level {
        index |= 4;
    }
    if bl > level {
        index |= 8;
    }
    index
}

/// Fraction along an edge where the level is crossed.
fn crossing_fraction(v0: f64, v1: f64, level: f64) -> f64 {
    if (v1 - v0).abs() < 1e-12 {
        return 0.5;
    }
    ((level - v0) / (v1 - v0)).clamp(0.0, 1.0)
}

/// Walk every cell, record its crossing index and emit oriented segments.
fn march_squares(traced: &mut LevelInfo<'_>, axes: &PixelAxes<'_>) -> Vec<Segment> {
    let grid = traced.grid;
    let (z, xs, ys) = (grid.z(), grid.x(), grid.y());
    let level = traced.level;
    let mut segments = Vec::new();

    if grid.rows() < 2 || grid.cols() < 2 {
        return segments;
    }

    for row in 0..(grid.rows() - 1) {
        for col in 0..(grid.cols() - 1) {
            let tl = z[row][col];
            let tr = z[row][col + 1];
            let br = z[row + 1][col + 1];
            let bl = z[row + 1][col];

            // Skip cells touching missing samples
            if tl.is_nan() || tr.is_nan() || br.is_nan() || bl.is_nan() {
                continue;
            }

            let index = marching_index(tl, tr, br, bl, level);
            if index == 0 || index == 15 {
                continue;
            }
            traced.crossings.insert((col, row), index);

            let (x0, x1, y0, y1) = (xs[col], xs[col + 1], ys[row], ys[row + 1]);
            let top = || {
                let t = crossing_fraction(tl, tr, level);
                EdgePoint {
                    key: EdgeKey::Horizontal(col, row),
                    point: axes.to_pixel(x0 + t * (x1 - x0), y0),
                }
            };
            let bottom = || {
                let t = crossing_fraction(bl, br, level);
                EdgePoint {
                    key: EdgeKey::Horizontal(col, row + 1),
                    point: axes.to_pixel(x0 + t * (x1 - x0), y1),
                }
            };
            let left = || {
                let t = crossing_fraction(tl, bl, level);
                EdgePoint {
                    key: EdgeKey::Vertical(col, row),
                    point: axes.to_pixel(x0, y0 + t * (y1 - y0)),
                }
            };
            let right = || {
                let t = crossing_fraction(tr, br, level);
                EdgePoint {
                    key: EdgeKey::Vertical(col + 1, row),
                    point: axes.to_pixel(x1, y0 + t * (y1 - y0)),
                }
            };

            let corners = [
                (axes.to_pixel(x0, y0), tl > level),
                (axes.to_pixel(x1, y0), tr > level),
                (axes.to_pixel(x1, y1), br > level),
                (axes.to_pixel(x0, y1), bl > level),
            ];

            let pairs = match index {
                1 | 14 => vec![(left(), top())],
                2 | 13 => vec![(top(), right())],
                3 | 12 => vec![(left(), right())],
                4 | 11 => vec![(right(), bottom())],
                // Saddle: each segment isolates one high corner
                5 => vec![(left(), top()), (right(), bottom())],
                6 | 9 => vec![(top(), bottom())],
                7 | 8 => vec![(left(), bottom())],
                10 => vec![(top(), right()), (left(), bottom())],
                _ => vec![],
            };

            for (from, to) in pairs {
                segments.push(Segment {
                    from,
                    to,
                    vote: orientation_vote(from.point, to.point, &corners),
                });
            }
        }
    }

    segments
}

/// Decide whether `p -> q` keeps the high corners on its clockwise side.
///
/// Corners are split by the side of the segment they fall on; the smaller
/// group is homogeneous (it is the isolated corner of a saddle or single-corner
/// cell), so one of its corners decides.
fn orientation_vote(p: Point, q: Point, corners: &[(Point, bool); 4]) -> i8 {
    let (dx, dy) = (q.x - p.x, q.y - p.y);
    if dx.abs() < 1e-12 && dy.abs() < 1e-12 {
        return 0;
    }

    let mut positive = Vec::with_capacity(4);
    let mut negative = Vec::with_capacity(4);
    for (corner, high) in corners {
        let cross = dx * (corner.y - p.y) - dy * (corner.x - p.x);
        if cross > 1e-9 {
            positive.push(*high);
        } else if cross < -1e-9 {
            negative.push(*high);
        }
    }

    let (high, on_positive) = match (positive.first(), negative.first()) {
        (Some(&h), Some(_)) if positive.len() <= negative.len() => (h, true),
        (_, Some(&h)) => (h, false),
        (Some(&h), None) => (h, true),
        (None, None) => return 0,
    };

    if high == on_positive {
        1
    } else {
        -1
    }
}

fn is_boundary_edge(key: EdgeKey, cols: usize, rows: usize) -> bool {
    match key {
        EdgeKey::Horizontal(_, row) => row == 0 || row + 1 == rows,
        EdgeKey::Vertical(col, _) => col == 0 || col + 1 == cols,
    }
}

/// The cell that owns an edge, preferring the one inside the grid.
fn edge_cell(key: EdgeKey, cols: usize, rows: usize) -> CellIndex {
    match key {
        EdgeKey::Horizontal(col, row) => (col, row.min(rows.saturating_sub(2))),
        EdgeKey::Vertical(col, row) => (col.min(cols.saturating_sub(2)), row),
    }
}

/// A polyline assembled from segments.
#[derive(Debug)]
struct Chain {
    points: Vec<Point>,
    first: EdgeKey,
    last: EdgeKey,
    closed: bool,
}

/// Connect segments sharing a cell edge into polylines.
///
/// Each chain grows forward from a seed segment and, unless it closes on
/// itself, backward as well. The summed orientation votes decide the final
/// direction.
fn connect_segments(segments: &[Segment]) -> Vec<Chain> {
    let mut by_edge: HashMap<EdgeKey, Vec<usize>> = HashMap::new();
    for (i, seg) in segments.iter().enumerate() {
        by_edge.entry(seg.from.key).or_default().push(i);
        by_edge.entry(seg.to.key).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let next_unused = |key: EdgeKey, used: &[bool]| -> Option<usize> {
        by_edge
            .get(&key)
            .and_then(|ids| ids.iter().copied().find(|&i| !used[i]))
    };

    let mut chains = Vec::new();
    for seed in 0..segments.len() {
        if used[seed] {
            continue;
        }
        used[seed] = true;

        let seg = segments[seed];
        let mut keys: VecDeque<EdgeKey> = VecDeque::from([seg.from.key, seg.to.key]);
        let mut points: VecDeque<Point> = VecDeque::from([seg.from.point, seg.to.point]);
        let mut vote = i32::from(seg.vote);
        let mut closed = false;

        // Forward
        while let Some(&tail) = keys.back() {
            let Some(k) = next_unused(tail, &used) else {
                break;
            };
            used[k] = true;
            let s = segments[k];
            let (next, sign) = if s.from.key == tail {
                (s.to, 1)
            } else {
                (s.from, -1)
            };
            vote += sign * i32::from(s.vote);
            if Some(&next.key) == keys.front() {
                closed = true;
                break;
            }
            keys.push_back(next.key);
            points.push_back(next.point);
        }

        // Backward
        while !closed {
            let Some(&head) = keys.front() else {
                break;
            };
            let Some(k) = next_unused(head, &used) else {
                break;
            };
            used[k] = true;
            let s = segments[k];
            let (prev, sign) = if s.to.key == head {
                (s.from, 1)
            } else {
                (s.to, -1)
            };
            vote += sign * i32::from(s.vote);
            keys.push_front(prev.key);
            points.push_front(prev.point);
        }

        let mut points: Vec<Point> = points.into_iter().collect();
        let (mut first, mut last) = (keys[0], keys[keys.len() - 1]);
        if vote < 0 {
            points.reverse();
            std::mem::swap(&mut first, &mut last);
        }

        chains.push(Chain {
            points,
            first,
            last,
            closed,
        });
    }

    chains
}
