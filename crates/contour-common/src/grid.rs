//! Sampled scalar grids and input cleaning.

use serde::{Deserialize, Serialize};

use crate::{ContourError, ContourResult};

/// Marker for a missing sample.
pub const BADNUM: f64 = f64::NAN;

/// Upper bound on relaxation sweeps when interpolating gaps.
const MAX_GAP_ITERATIONS: usize = 100;

/// Relaxation stops once the largest correction is below this fraction of the
/// data range.
const GAP_TOLERANCE: f64 = 1e-4;

/// A raw input cell before cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Number(f64),
    Text(String),
    Missing,
}

impl RawCell {
    /// Coerce to a number, or `None` when the cell is not numeric.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            RawCell::Number(v) if v.is_finite() => Some(*v),
            RawCell::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

impl From<f64> for RawCell {
    fn from(v: f64) -> Self {
        RawCell::Number(v)
    }
}

/// Remaps indices of a category axis onto a trace's own category order.
#[derive(Debug, Clone)]
pub struct CategoryMap {
    mapping: Vec<Option<usize>>,
}

impl CategoryMap {
    /// `axis_categories` is the order shown on the axis; `trace_categories` is
    /// the order of the trace's rows or columns.
    pub fn new<S: AsRef<str>>(axis_categories: &[S], trace_categories: &[S]) -> Self {
        let mapping = axis_categories
            .iter()
            .map(|cat| {
                trace_categories
                    .iter()
                    .position(|t| t.as_ref() == cat.as_ref())
            })
            .collect();
        Self { mapping }
    }

    /// Number of categories on the axis.
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Trace index for axis position `i`; `None` when the category is absent.
    pub fn get(&self, i: usize) -> Option<usize> {
        self.mapping.get(i).copied().flatten()
    }
}

/// Clean a raw z matrix into numeric rows.
///
/// Non-numeric cells and cells addressed through an absent category become
/// [`BADNUM`]. Returns an empty matrix when a transposed input has no columns.
pub fn clean_2d_array(
    z_old: &[Vec<RawCell>],
    transpose: bool,
    x_categories: Option<&CategoryMap>,
    y_categories: Option<&CategoryMap>,
) -> Vec<Vec<f64>> {
    let read = |row: usize, col: usize| -> Option<f64> {
        let (r, c) = if transpose { (col, row) } else { (row, col) };
        z_old.get(r).and_then(|cells| cells.get(c)).and_then(RawCell::to_number)
    };

    let row_count = match y_categories {
        Some(map) => map.len(),
        None if transpose => {
            let widest = z_old.iter().map(Vec::len).max().unwrap_or(0);
            if widest == 0 {
                return Vec::new();
            }
            widest
        }
        None => z_old.len(),
    };

    (0..row_count)
        .map(|i| {
            let col_count = match x_categories {
                Some(map) => map.len(),
                None if transpose => z_old.len(),
                None => z_old.get(i).map_or(0, Vec::len),
            };
            let src_row = match y_categories {
                Some(map) => map.get(i),
                None => Some(i),
            };
            (0..col_count)
                .map(|j| {
                    let src_col = match x_categories {
                        Some(map) => map.get(j),
                        None => Some(j),
                    };
                    match (src_row, src_col) {
                        (Some(r), Some(c)) => read(r, c).unwrap_or(BADNUM),
                        _ => BADNUM,
                    }
                })
                .collect()
        })
        .collect()
}

/// Positions `(row, col)` of every missing sample, in row-major order.
pub fn find_empties(z: &[Vec<f64>]) -> Vec<(usize, usize)> {
    z.iter()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, v)| v.is_nan())
                .map(move |(j, _)| (i, j))
        })
        .collect()
}

fn neighbours(z: &[Vec<f64>], i: usize, j: usize) -> impl Iterator<Item = f64> + '_ {
    let up = i.checked_sub(1).and_then(|r| z.get(r)).and_then(|row| row.get(j));
    let down = z.get(i + 1).and_then(|row| row.get(j));
    let left = j.checked_sub(1).and_then(|c| z[i].get(c));
    let right = z[i].get(j + 1);
    [up, down, left, right]
        .into_iter()
        .flatten()
        .copied()
        .filter(|v| !v.is_nan())
}

/// Fill the listed missing samples from their neighbours.
///
/// Samples are seeded from the mean of their known neighbours, most
/// constrained first, then relaxed towards the neighbour average.
pub fn interpolate_gaps(z: &mut [Vec<f64>], empties: &[(usize, usize)]) {
    if empties.is_empty() {
        return;
    }

    let known: Vec<f64> = z.iter().flatten().copied().filter(|v| !v.is_nan()).collect();
    if known.is_empty() {
        tracing::debug!(empties = empties.len(), "No known samples, gaps left unfilled");
        return;
    }
    let min = known.iter().copied().fold(f64::INFINITY, f64::min);
    let max = known.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let tolerance = ((max - min) * GAP_TOLERANCE).max(f64::EPSILON);

    let mut pending: Vec<(usize, usize)> = empties
        .iter()
        .copied()
        .filter(|&(i, j)| z.get(i).and_then(|row| row.get(j)).is_some())
        .collect();
    let targets = pending.clone();

    // Seed pass: fill from known neighbours, most constrained first.
    while !pending.is_empty() {
        let mut ranked: Vec<(usize, (usize, usize))> = pending
            .iter()
            .map(|&(i, j)| (neighbours(&*z, i, j).count(), (i, j)))
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        let mut filled_any = false;
        for (count, (i, j)) in ranked {
            if count == 0 {
                continue;
            }
            let (sum, n) = neighbours(z, i, j).fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            if n > 0 {
                z[i][j] = sum / n as f64;
                filled_any = true;
            }
        }
        pending.retain(|&(i, j)| z[i][j].is_nan());
        if !filled_any {
            break;
        }
    }

    // Relaxation towards the neighbour average.
    for iteration in 0..MAX_GAP_ITERATIONS {
        let mut max_change: f64 = 0.0;
        for &(i, j) in &targets {
            let (sum, n) = neighbours(z, i, j).fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            if n == 0 {
                continue;
            }
            let next = sum / n as f64;
            max_change = max_change.max((next - z[i][j]).abs());
            z[i][j] = next;
        }
        if max_change < tolerance {
            tracing::trace!(iteration, "Gap interpolation converged");
            break;
        }
    }
}

/// An immutable sampled field: `z[row][col]` with column coordinates `x` and
/// row coordinates `y`. Missing samples are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    z: Vec<Vec<f64>>,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Grid {
    /// Build a rectangular grid. `x` must have one entry per column and `y` one
    /// per row.
    pub fn new(z: Vec<Vec<f64>>, x: Vec<f64>, y: Vec<f64>) -> ContourResult<Self> {
        let cols = match z.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err(ContourError::EmptyGrid),
        };
        for (row, values) in z.iter().enumerate() {
            if values.len() != cols {
                return Err(ContourError::RaggedGrid {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
        }
        if x.len() != cols {
            return Err(ContourError::CoordinateMismatch {
                axis: 'x',
                expected: cols,
                found: x.len(),
            });
        }
        if y.len() != z.len() {
            return Err(ContourError::CoordinateMismatch {
                axis: 'y',
                expected: z.len(),
                found: y.len(),
            });
        }
        Ok(Self { z, x, y })
    }

    /// Build a grid whose coordinates are the sample indices.
    pub fn from_rows(z: Vec<Vec<f64>>) -> ContourResult<Self> {
        let rows = z.len();
        let cols = z.first().map_or(0, Vec::len);
        let x = (0..cols).map(|i| i as f64).collect();
        let y = (0..rows).map(|j| j as f64).collect();
        Self::new(z, x, y)
    }

    /// A grid with the same coordinates and new values.
    pub fn with_values(&self, z: Vec<Vec<f64>>) -> ContourResult<Self> {
        Self::new(z, self.x.clone(), self.y.clone())
    }

    /// Same shape and coordinates, every sample set to `value`.
    pub fn filled(&self, value: f64) -> Self {
        Self {
            z: vec![vec![value; self.cols()]; self.rows()],
            x: self.x.clone(),
            y: self.y.clone(),
        }
    }

    /// Overwrite one sample. Returns false when `(row, col)` is out of range.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> bool {
        match self.z.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    pub fn z(&self) -> &[Vec<f64>] {
        &self.z
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn rows(&self) -> usize {
        self.z.len()
    }

    pub fn cols(&self) -> usize {
        self.x.len()
    }

    /// Sample at `(row, col)`, `None` out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.z.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Smaller of the first two samples of the first row.
    ///
    /// Used to decide whether a level with no boundary crossings lies below
    /// the whole perimeter. NaN when either sample is missing.
    pub fn origin_min(&self) -> f64 {
        match (self.get(0, 0), self.get(0, 1)) {
            (Some(a), Some(b)) if !a.is_nan() && !b.is_nan() => a.min(b),
            (Some(a), None) => a,
            _ => f64::NAN,
        }
    }

    /// Minimum and maximum of the present samples.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.z
            .iter()
            .flatten()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
