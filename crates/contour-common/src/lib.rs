//! Common types shared by the contour renderer: pixel geometry, the plotted
//! perimeter, sampled grids and trace options.

pub mod axis;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod options;

pub use axis::{AxisTransform, LinearAxis};
pub use error::{ContourError, ContourResult};
pub use geometry::{Corner, Perimeter, PerimeterSide, Point, PERIMETER_TOLERANCE};
pub use grid::{clean_2d_array, find_empties, interpolate_gaps, CategoryMap, Grid, RawCell, BADNUM};
pub use options::{Coloring, ColorStop, ContourOptions, ContourTraceOptions, LabelFont, LineOptions};
