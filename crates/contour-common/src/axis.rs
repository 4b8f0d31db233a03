//! Data-to-pixel axis transforms.

use serde::{Deserialize, Serialize};

/// Maps data coordinates on one axis to pixel offsets inside the plot area.
pub trait AxisTransform {
    /// Convert a data coordinate to a pixel offset.
    fn c2p(&self, value: f64) -> f64;

    /// Length of the axis in pixels.
    fn length(&self) -> f64;
}

/// A linear axis spanning `range` over `length` pixels.
///
/// Horizontal axes grow to the right. Vertical axes are `reversed` so the
/// first range value lands at the bottom of the plot area, as on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearAxis {
    pub range: (f64, f64),
    pub length: f64,
    #[serde(default)]
    pub reversed: bool,
}

impl LinearAxis {
    /// Horizontal axis: `range.0` maps to pixel 0.
    pub fn horizontal(range: (f64, f64), length: f64) -> Self {
        Self {
            range,
            length,
            reversed: false,
        }
    }

    /// Vertical axis: `range.0` maps to pixel `length`.
    pub fn vertical(range: (f64, f64), length: f64) -> Self {
        Self {
            range,
            length,
            reversed: true,
        }
    }
}

impl AxisTransform for LinearAxis {
    fn c2p(&self, value: f64) -> f64 {
        let span = self.range.1 - self.range.0;
        if span == 0.0 {
            return self.length / 2.0;
        }
        let frac = (value - self.range.0) / span;
        if self.reversed {
            (1.0 - frac) * self.length
        } else {
            frac * self.length
        }
    }

    fn length(&self) -> f64 {
        self.length
    }
}
