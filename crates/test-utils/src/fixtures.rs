//! Common fixtures for contour tests.

use contour_common::{LinearAxis, Perimeter};

/// Pixel size of the fixture plot area.
pub const PLOT_SIZE: f64 = 100.0;

/// The `(0,0)-(100,0)-(100,100)-(0,100)` perimeter.
pub fn square_perimeter() -> Perimeter {
    Perimeter::from_edges(0.0, PLOT_SIZE, 0.0, PLOT_SIZE)
}

/// Axes mapping `[0, cols - 1] × [0, rows - 1]` onto the fixture plot area.
///
/// The y axis is vertical, so row 0 lands at the bottom of the plot.
pub fn pixel_axes(rows: usize, cols: usize) -> (LinearAxis, LinearAxis) {
    let x = LinearAxis::horizontal((0.0, (cols.max(2) - 1) as f64), PLOT_SIZE);
    let y = LinearAxis::vertical((0.0, (rows.max(2) - 1) as f64), PLOT_SIZE);
    (x, y)
}

/// Coordinates `0, 1, …, n - 1`.
pub fn index_coords(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}
