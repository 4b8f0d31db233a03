//! Polyline measurement and SVG path data.
//!
//! Straight paths are emitted as `M`/`L` commands. Smoothed paths use
//! Catmull-Rom style tangents turned into quadratic and cubic Bézier segments;
//! a smoothing factor of 0 falls back to straight segments.

use contour_common::Point;

/// Exponent of the centripetal Catmull-Rom parameterization.
const CATMULL_ROM_EXP: f64 = 0.5;

/// Format a coordinate rounded to 2 decimals, without trailing zeros.
pub fn format_num(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}

pub fn format_point(p: &Point) -> String {
    format!("{},{}", format_num(p.x), format_num(p.y))
}

/// `M p0 L p1 L p2 …`
pub fn straight_open(points: &[Point]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        d.push(if i == 0 { 'M' } else { 'L' });
        d.push_str(&format_point(p));
    }
    d
}

/// `M p0 L p1 … Z`
pub fn straight_closed(points: &[Point]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = straight_open(points);
    d.push('Z');
    d
}

/// Control points on either side of `this` along its tangent.
fn make_tangent(prev: &Point, this: &Point, next: &Point, smoothing: f64) -> (Point, Point) {
    let (d1x, d1y) = (prev.x - this.x, prev.y - this.y);
    let (d2x, d2y) = (next.x - this.x, next.y - this.y);
    let d1a = (d1x * d1x + d1y * d1y).powf(CATMULL_ROM_EXP / 2.0);
    let d2a = (d2x * d2x + d2y * d2y).powf(CATMULL_ROM_EXP / 2.0);
    let numx = (d2a * d2a * d1x - d1a * d1a * d2x) * smoothing;
    let numy = (d2a * d2a * d1y - d1a * d1a * d2y) * smoothing;
    let denom1 = 3.0 * d2a * (d1a + d2a);
    let denom2 = 3.0 * d1a * (d1a + d2a);

    let offset = |num: f64, denom: f64| if denom == 0.0 { 0.0 } else { num / denom };
    (
        Point::new(this.x + offset(numx, denom1), this.y + offset(numy, denom1)),
        Point::new(this.x - offset(numx, denom2), this.y - offset(numy, denom2)),
    )
}

/// Path data for an open polyline with curve smoothing.
pub fn smooth_open(points: &[Point], smoothing: f64) -> String {
    if points.len() < 3 || smoothing == 0.0 {
        return straight_open(points);
    }

    let last = points.len() - 1;
    let tangents: Vec<(Point, Point)> = (1..last)
        .map(|i| make_tangent(&points[i - 1], &points[i], &points[i + 1], smoothing))
        .collect();

    let mut d = format!("M{}", format_point(&points[0]));
    d.push_str(&format!(
        "Q{} {}",
        format_point(&tangents[0].0),
        format_point(&points[1])
    ));
    for i in 2..last {
        d.push_str(&format!(
            "C{} {} {}",
            format_point(&tangents[i - 2].1),
            format_point(&tangents[i - 1].0),
            format_point(&points[i])
        ));
    }
    d.push_str(&format!(
        "Q{} {}",
        format_point(&tangents[last - 2].1),
        format_point(&points[last])
    ));
    d
}

/// Path data for a closed polyline (no repeated end point) with smoothing.
pub fn smooth_closed(points: &[Point], smoothing: f64) -> String {
    if points.len() < 3 || smoothing == 0.0 {
        return straight_closed(points);
    }

    let last = points.len() - 1;
    let mut tangents = Vec::with_capacity(points.len());
    tangents.push(make_tangent(&points[last], &points[0], &points[1], smoothing));
    for i in 1..last {
        tangents.push(make_tangent(&points[i - 1], &points[i], &points[i + 1], smoothing));
    }
    tangents.push(make_tangent(&points[last - 1], &points[last], &points[0], smoothing));

    let mut d = format!("M{}", format_point(&points[0]));
    for i in 1..=last {
        d.push_str(&format!(
            "C{} {} {}",
            format_point(&tangents[i - 1].1),
            format_point(&tangents[i].0),
            format_point(&points[i])
        ));
    }
    d.push_str(&format!(
        "C{} {} {}Z",
        format_point(&tangents[last].1),
        format_point(&tangents[0].0),
        format_point(&points[0])
    ));
    d
}

/// A polyline with cumulative arc lengths for sampling by distance.
#[derive(Debug, Clone)]
pub struct MeasuredPath<'a> {
    points: &'a [Point],
    closed: bool,
    /// `cumulative[i]` is the length from the first point to vertex `i`; for
    /// closed paths one extra entry covers the closing segment.
    cumulative: Vec<f64>,
}

impl<'a> MeasuredPath<'a> {
    pub fn new(points: &'a [Point], closed: bool) -> Self {
        let mut cumulative = Vec::with_capacity(points.len() + 1);
        let mut total = 0.0;
        if !points.is_empty() {
            cumulative.push(0.0);
        }
        for w in points.windows(2) {
            total += w[0].distance(&w[1]);
            cumulative.push(total);
        }
        if closed && points.len() > 1 {
            total += points[points.len() - 1].distance(&points[0]);
            cumulative.push(total);
        }
        Self {
            points,
            closed,
            cumulative,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Total arc length.
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    fn vertex(&self, i: usize) -> Point {
        self.points[i % self.points.len()]
    }

    /// Point at arc length `s`. Closed paths wrap around, open paths clamp.
    pub fn point_at(&self, s: f64) -> Option<Point> {
        let first = *self.points.first()?;
        let total = self.length();
        if total <= 0.0 {
            return Some(first);
        }
        let s = if self.closed {
            s.rem_euclid(total)
        } else {
            s.clamp(0.0, total)
        };

        let seg = match self
            .cumulative
            .binary_search_by(|c| c.partial_cmp(&s).unwrap_or(std::cmp::Ordering::Less))
        {
            Ok(i) => return Some(self.vertex(i)),
            Err(i) => i.saturating_sub(1),
        };
        let seg = seg.min(self.cumulative.len().saturating_sub(2));
        let (c0, c1) = (self.cumulative[seg], self.cumulative[seg + 1]);
        let t = if c1 > c0 { (s - c0) / (c1 - c0) } else { 0.0 };
        Some(self.vertex(seg).lerp(&self.vertex(seg + 1), t))
    }
}
