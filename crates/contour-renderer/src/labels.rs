//! Label placement along finished contour lines.
//!
//! Labels are spread evenly by arc length. Each level's text is measured once,
//! every polyline long enough to carry it gets `ceil(length / norm_length)`
//! anchors, and each anchor adds its rotated box to an exclusion clip path so
//! the lines can be cut away underneath. No overlap search is done.

use contour_common::{LabelFont, Perimeter, Point};
use serde::Serialize;

use crate::format::LabelFormatter;
use crate::levels::LevelInfo;
use crate::measure::TextMeasurer;
use crate::path::{format_num, straight_closed, MeasuredPath};

/// Minimum ratio of path length to label width for a path to be labelled.
pub const LABEL_MIN: f64 = 3.0;

/// Level count beyond which labels thin out.
pub const LABEL_INCREASE: f64 = 10.0;

/// One placed label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub text: String,
    /// Anchor on the contour line.
    pub x: f64,
    pub y: f64,
    /// Vertical-centering offset of the glyph run.
    pub dy: f64,
    /// Text rotation in radians, within `(-π/2, π/2]`.
    pub angle: f64,
    pub level: f64,
    pub width: f64,
    pub height: f64,
}

impl LabelPlacement {
    /// Stable identity for re-render diffing.
    pub fn key(&self) -> String {
        format!(
            "{}@{},{},{}",
            self.text,
            format_num(self.x),
            format_num(self.y),
            format_num(self.angle.to_degrees())
        )
    }

    /// Where the text is drawn: the anchor shifted along the label normal.
    pub fn render_position(&self) -> Point {
        Point::new(
            self.x + self.angle.sin() * self.dy,
            self.y - self.angle.cos() * self.dy,
        )
    }

    /// SVG transform rotating the text about its anchor.
    pub fn transform(&self) -> String {
        format!(
            "rotate({} {} {})",
            format_num(self.angle.to_degrees()),
            format_num(self.x),
            format_num(self.y)
        )
    }

    /// Corners of the rotated label box.
    pub fn corners(&self) -> [Point; 4] {
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        let (sin, cos) = self.angle.sin_cos();
        let (dxw, dxh) = (hw * cos, hh * sin);
        let (dyw, dyh) = (hw * sin, -hh * cos);
        let (x, y) = (self.x, self.y);
        [
            Point::new(x - dxw - dxh, y - dyw - dyh),
            Point::new(x + dxw - dxh, y + dyw - dyh),
            Point::new(x + dxw + dxh, y + dyw + dyh),
            Point::new(x - dxw + dxh, y - dyw + dyh),
        ]
    }
}

/// Labels for one render pass plus the exclusion clip path for the lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelLayout {
    pub labels: Vec<LabelPlacement>,
    /// The perimeter followed by one box per label; use with even-odd clipping.
    pub clip_path: String,
}

/// Axis-aligned bounds in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn diagonal(&self) -> f64 {
        (self.right - self.left).hypot(self.bottom - self.top)
    }

    pub fn contains(&self, pt: &Point) -> bool {
        pt.x >= self.left && pt.x <= self.right && pt.y >= self.top && pt.y <= self.bottom
    }

    /// The part of the perimeter inside a `width × height` plot area.
    pub fn visible(perimeter: &Perimeter, width: f64, height: f64) -> Option<Self> {
        let bounds = Bounds {
            left: perimeter.left().max(0.0),
            top: perimeter.top().max(0.0),
            right: perimeter.right().min(width),
            bottom: perimeter.bottom().min(height),
        };
        if bounds.right > bounds.left && bounds.bottom > bounds.top {
            Some(bounds)
        } else {
            None
        }
    }
}

/// Arc length between successive labels for a plot with `level_count` levels.
pub fn norm_length(diagonal: f64, level_count: usize) -> f64 {
    diagonal / (level_count as f64 / LABEL_INCREASE).max(1.0)
}

/// How many labels a path of `path_length` carries.
pub fn label_count(path_length: f64, norm_length: f64) -> usize {
    if norm_length <= 0.0 || !path_length.is_finite() || path_length <= 0.0 {
        return 0;
    }
    (path_length / norm_length).ceil() as usize
}

/// Fold an angle into `(-π/2, π/2]` so text never reads upside down.
fn upright(angle: f64) -> f64 {
    use std::f64::consts::{FRAC_PI_2, PI};
    if angle > FRAC_PI_2 {
        angle - PI
    } else if angle <= -FRAC_PI_2 {
        angle + PI
    } else {
        angle
    }
}

/// Place labels along every polyline of every level.
pub fn place_labels(
    levels: &[LevelInfo<'_>],
    perimeter: &Perimeter,
    plot_size: (f64, f64),
    measurer: &dyn TextMeasurer,
    font: &LabelFont,
    formatter: &LabelFormatter,
) -> LabelLayout {
    let mut layout = LabelLayout {
        labels: Vec::new(),
        clip_path: straight_closed(&perimeter.corners()[..]),
    };

    let Some(bounds) = Bounds::visible(perimeter, plot_size.0, plot_size.1) else {
        tracing::debug!("Contour perimeter is outside the plot area, no labels");
        return layout;
    };
    let norm = norm_length(bounds.diagonal(), levels.len());

    for level in levels {
        let text = formatter.format(level.level);
        let metrics = measurer.measure(&text, font);
        if metrics.width <= 0.0 {
            continue;
        }

        let polylines = level
            .edgepaths
            .iter()
            .map(|p| (p, false))
            .chain(level.paths.iter().map(|p| (p, true)));

        let before = layout.labels.len();
        for (points, closed) in polylines {
            let path = MeasuredPath::new(points, closed);
            let length = path.length();
            if length < metrics.width * LABEL_MIN {
                continue;
            }

            let count = label_count(length, norm);
            for i in 0..count {
                let s = (i as f64 + 0.5) * length / count as f64;
                let quarter = metrics.width / 4.0;
                let (Some(anchor), Some(p0), Some(p1)) = (
                    path.point_at(s),
                    path.point_at(s - quarter),
                    path.point_at(s + quarter),
                ) else {
                    continue;
                };
                if !bounds.contains(&anchor) {
                    tracing::trace!(x = anchor.x, y = anchor.y, "Label anchor outside plot");
                    continue;
                }

                let label = LabelPlacement {
                    text: text.clone(),
                    x: anchor.x,
                    y: anchor.y,
                    dy: metrics.vertical_offset(),
                    angle: upright((p1.y - p0.y).atan2(p1.x - p0.x)),
                    level: level.level,
                    width: metrics.width,
                    height: metrics.height,
                };
                layout.clip_path.push_str(&straight_closed(&label.corners()));
                layout.labels.push(label);
            }
        }

        tracing::debug!(
            level = level.level,
            text = %text,
            labels = layout.labels.len() - before,
            "Placed contour labels"
        );
    }

    layout
}
