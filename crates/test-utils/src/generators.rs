//! Synthetic scalar fields with known contour geometry.
//!
//! All generators return `z[row][col]` matrices.

/// A single Gaussian bump centred on the grid, peaking at `peak`.
///
/// Every level strictly between 0 and `peak` (and above the edge values)
/// produces one closed interior loop around the centre.
///
/// # Example
///
/// ```
/// use test_utils::single_peak_field;
///
/// let z = single_peak_field(9, 9, 10.0);
/// assert_eq!(z.len(), 9);
/// assert_eq!(z[4][4], 10.0);
/// ```
pub fn single_peak_field(rows: usize, cols: usize, peak: f64) -> Vec<Vec<f64>> {
    let cy = (rows.max(1) - 1) as f64 / 2.0;
    let cx = (cols.max(1) - 1) as f64 / 2.0;
    let sigma = (rows.min(cols).max(2) as f64) / 4.0;
    (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| {
                    let dx = col as f64 - cx;
                    let dy = row as f64 - cy;
                    peak * (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp()
                })
                .collect()
        })
        .collect()
}

/// A plane rising left to right from `min` to `max`.
///
/// Every level inside `(min, max)` produces one open path from the top edge
/// to the bottom edge.
pub fn linear_ramp_field(rows: usize, cols: usize, min: f64, max: f64) -> Vec<Vec<f64>> {
    let span = (cols.max(2) - 1) as f64;
    (0..rows)
        .map(|_| {
            (0..cols)
                .map(|col| min + (max - min) * col as f64 / span)
                .collect()
        })
        .collect()
}

/// `z = (x - cx)·(y - cy)`: a saddle with opposite quadrants above and below
/// zero.
pub fn saddle_field(rows: usize, cols: usize) -> Vec<Vec<f64>> {
    let cy = (rows.max(1) - 1) as f64 / 2.0;
    let cx = (cols.max(1) - 1) as f64 / 2.0;
    (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| (col as f64 - cx) * (row as f64 - cy))
                .collect()
        })
        .collect()
}

/// Constant field, e.g. for "everything above" / "everything below" cases.
pub fn constant_field(rows: usize, cols: usize, value: f64) -> Vec<Vec<f64>> {
    vec![vec![value; cols]; rows]
}

/// Uniform random field in `[0, 1)` from a fixed seed.
///
/// Driven by a linear congruential generator, so the same seed always gives
/// the same field.
pub fn noise_field(rows: usize, cols: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (0..rows)
        .map(|_| {
            (0..cols)
                .map(|_| {
                    state = state
                        .wrapping_mul(6364136223846793005)
                        .wrapping_add(1442695040888963407);
                    (state >> 11) as f64 / (1u64 << 53) as f64
                })
                .collect()
        })
        .collect()
}
