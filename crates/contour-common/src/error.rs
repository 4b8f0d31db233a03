//! Error types for contour construction.

use thiserror::Error;

/// Result type alias using ContourError.
pub type ContourResult<T> = Result<T, ContourError>;

/// Errors raised at construction boundaries.
///
/// Inside a render pass nothing here is returned for geometry problems: those
/// are logged and the affected loop, label or level is dropped instead.
#[derive(Debug, Error)]
pub enum ContourError {
    // === Grid Errors ===
    #[error("Grid has no samples")]
    EmptyGrid,

    #[error("Ragged grid: row {row} has {found} columns, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Coordinate array '{axis}' has {found} entries, grid needs {expected}")]
    CoordinateMismatch {
        axis: char,
        expected: usize,
        found: usize,
    },

    // === Geometry Errors ===
    #[error("Invalid perimeter: {0}")]
    InvalidPerimeter(String),

    // === Configuration Errors ===
    #[error("Invalid label format '{spec}': {message}")]
    InvalidLabelFormat { spec: String, message: String },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    // === Rendering Errors ===
    #[error("Font error: {0}")]
    FontError(String),

    #[error("SVG error: {0}")]
    SvgError(String),

    #[error("Rasterization failed: {0}")]
    RasterError(String),
}

impl From<serde_json::Error> for ContourError {
    fn from(err: serde_json::Error) -> Self {
        ContourError::InvalidOptions(format!("JSON error: {}", err))
    }
}
