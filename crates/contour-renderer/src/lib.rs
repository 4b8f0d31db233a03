//! Contour construction and rendering for 2-D scalar fields.
//!
//! The pipeline for one trace:
//! - Level series (`levels`)
//! - Marching squares tracing (`trace`)
//! - Perimeter stitching into fillable loops (`stitch`)
//! - Gap clipping for missing data (`gap_mask`)
//! - Label placement along contour lines (`labels`)
//! - Scene orchestration, SVG output and rasterization (`plot`, `svg`, `raster`)

pub mod format;
pub mod gap_mask;
pub mod labels;
pub mod levels;
pub mod measure;
pub mod path;
pub mod plot;
pub mod raster;
pub mod scene;
pub mod stitch;
pub mod style;
pub mod svg;
pub mod trace;

pub use format::{LabelFormatter, NumberFormat};
pub use gap_mask::{build_gap_clip, build_mask, GapClip, GAP_MASK_LEVEL};
pub use labels::{place_labels, LabelLayout, LabelPlacement, LABEL_INCREASE, LABEL_MIN};
pub use levels::{build_levels, LevelInfo, MAX_CONTOUR_LEVELS};
pub use measure::{ApproximateMeasurer, FontMeasurer, TextMeasurer, TextMetrics};
pub use path::{smooth_closed, smooth_open};
pub use plot::{ContourGroup, ContourPlot, ContourTrace, PlotSummary, SceneDocument};
pub use scene::{reconcile, KeyedNodes, Reconciliation};
pub use stitch::{stitch, StitchResult, StitchedLoop};
pub use trace::{trace_all, MarchingSquares, PixelAxes, Tracer};
