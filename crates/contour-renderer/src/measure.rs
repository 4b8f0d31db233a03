//! Text measurement for label placement.

use contour_common::{ContourError, ContourResult, LabelFont};
use rusttype::{point, Font, Scale};

/// Extent of a rendered glyph run, relative to a baseline at `y = 0`.
///
/// `top` is negative (above the baseline), `bottom` positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub bottom: f64,
}

impl TextMetrics {
    /// Offset that centres the run vertically on its anchor.
    pub fn vertical_offset(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }
}

/// Measures label text.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font: &LabelFont) -> TextMetrics;
}

/// Estimates metrics from the font size alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasurer;

impl TextMeasurer for ApproximateMeasurer {
    fn measure(&self, text: &str, font: &LabelFont) -> TextMetrics {
        let size = font.size;
        TextMetrics {
            width: text.chars().count() as f64 * size * 0.6,
            height: size,
            top: -0.8 * size,
            bottom: 0.2 * size,
        }
    }
}

/// Measures real glyph runs from a TrueType font.
///
/// The font family of the [`LabelFont`] is ignored; only its size is used.
pub struct FontMeasurer {
    font: Font<'static>,
}

impl FontMeasurer {
    pub fn from_bytes(data: Vec<u8>) -> ContourResult<Self> {
        let font = Font::try_from_vec(data)
            .ok_or_else(|| ContourError::FontError("Unreadable TrueType data".to_string()))?;
        Ok(Self { font })
    }
}

impl std::fmt::Debug for FontMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMeasurer")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl TextMeasurer for FontMeasurer {
    fn measure(&self, text: &str, font: &LabelFont) -> TextMetrics {
        let scale = Scale::uniform(font.size as f32);
        let v_metrics = self.font.v_metrics(scale);

        let width = self
            .font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);

        // rusttype reports descent as a negative distance below the baseline
        let ascent = v_metrics.ascent as f64;
        let descent = -v_metrics.descent as f64;
        TextMetrics {
            width: width as f64,
            height: ascent + descent,
            top: -ascent,
            bottom: descent,
        }
    }
}
