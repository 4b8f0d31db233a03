//! Contour trace options, loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::ContourResult;

/// How the area between contour levels is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coloring {
    /// Fill every band with its own colour.
    #[default]
    Fill,
    /// Leave fills to a heatmap layer drawn behind the lines.
    Heatmap,
    /// Colour the lines only.
    Lines,
    /// No colouring at all.
    None,
}

/// Font used for contour labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelFont {
    pub family: String,
    pub size: f64,
    pub color: Option<String>,
}

impl Default for LabelFont {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 12.0,
            color: None,
        }
    }
}

/// Level range and display options for one contour trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourOptions {
    pub start: f64,
    pub end: f64,
    pub size: f64,
    pub coloring: Coloring,
    pub showlines: bool,
    pub showlabels: bool,
    /// Explicit numeric format for labels; overrides the default rounding.
    pub labelformat: Option<String>,
    pub font: LabelFont,
}

impl Default for ContourOptions {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 1.0,
            size: 0.1,
            coloring: Coloring::Fill,
            showlines: true,
            showlabels: false,
            labelformat: None,
            font: LabelFont::default(),
        }
    }
}

/// Stroke options for contour lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineOptions {
    pub color: String,
    pub width: f64,
    /// Curve smoothing factor; 0 draws straight segments.
    pub smoothing: f64,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            color: "#444444".to_string(),
            width: 0.5,
            smoothing: 1.0,
        }
    }
}

/// Color stop for a colorscale, `value` in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub value: f64,
    pub color: String,
}

impl ColorStop {
    pub fn new(value: f64, color: &str) -> Self {
        Self {
            value,
            color: color.to_string(),
        }
    }
}

/// Everything the renderer needs to know about one contour trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourTraceOptions {
    /// Unique trace id; scopes clip ids in the scene.
    pub uid: String,
    pub visible: bool,
    /// Draw through missing data instead of clipping it out.
    pub connectgaps: bool,
    pub transpose: bool,
    pub contours: ContourOptions,
    pub line: LineOptions,
    pub colorscale: Vec<ColorStop>,
}

impl Default for ContourTraceOptions {
    fn default() -> Self {
        Self {
            uid: "0".to_string(),
            visible: true,
            connectgaps: false,
            transpose: false,
            contours: ContourOptions::default(),
            line: LineOptions::default(),
            colorscale: vec![ColorStop::new(0.0, "#f0f0f0"), ColorStop::new(1.0, "#303030")],
        }
    }
}

impl ContourTraceOptions {
    /// Load trace options from a JSON string; missing fields take defaults.
    pub fn from_json(json_str: &str) -> ContourResult<Self> {
        Ok(serde_json::from_str(json_str)?)
    }
}
