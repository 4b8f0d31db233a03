//! Colorscale sampling for contour fills and lines.

use contour_common::{ColorStop, ContourOptions};

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Parse a `#rrggbb` or `#rgb` hex colour.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let hex = hex.trim().trim_start_matches('#');
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb(r, g, b))
        }
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some(Rgb(digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

fn parse_color(hex: &str) -> Rgb {
    hex_to_rgb(hex).unwrap_or_else(|| {
        tracing::warn!(color = hex, "Unparsable colour, using black");
        Rgb(0, 0, 0)
    })
}

/// Colour at normalized position `t` of a colorscale, interpolating linearly
/// between stops and clamping outside them.
pub fn color_at(t: f64, stops: &[ColorStop]) -> Rgb {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Rgb(0, 0, 0);
    };
    if t.is_nan() || t <= first.value {
        return parse_color(&first.color);
    }
    if t >= last.value {
        return parse_color(&last.color);
    }

    for pair in stops.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        if t > upper.value {
            continue;
        }
        let lower_color = parse_color(&lower.color);
        let upper_color = parse_color(&upper.color);
        if upper.value <= lower.value {
            return upper_color;
        }
        let f = ((t - lower.value) / (upper.value - lower.value)).clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + f * (b as f64 - a as f64)).round() as u8;
        return Rgb(
            mix(lower_color.0, upper_color.0),
            mix(lower_color.1, upper_color.1),
            mix(lower_color.2, upper_color.2),
        );
    }
    parse_color(&last.color)
}

/// Maps contour bands onto a colorscale.
///
/// Band `i` spans `[start + (i - 1/2)·size, start + (i + 1/2)·size]` and is
/// coloured at its midpoint, normalized over all `count` bands.
#[derive(Debug, Clone)]
pub struct LevelColors<'a> {
    stops: &'a [ColorStop],
    start: f64,
    size: f64,
    count: usize,
}

impl<'a> LevelColors<'a> {
    pub fn new(contours: &ContourOptions, count: usize, stops: &'a [ColorStop]) -> Self {
        Self {
            stops,
            start: contours.start,
            size: contours.size,
            count,
        }
    }

    fn normalize(&self, value: f64) -> f64 {
        let lo = self.start - self.size / 2.0;
        let span = self.count as f64 * self.size;
        if span == 0.0 || !span.is_finite() {
            return 0.5;
        }
        (value - lo) / span
    }

    /// Fill of the band above the `index`-th level.
    pub fn fill(&self, index: usize) -> Rgb {
        let mid = self.start + index as f64 * self.size + self.size / 2.0;
        color_at(self.normalize(mid), self.stops)
    }

    /// Fill of the band below the first level, painted as the background.
    pub fn background(&self) -> Rgb {
        color_at(self.normalize(self.start - self.size / 2.0), self.stops)
    }

    /// Line colour of the `index`-th level when lines are coloured.
    pub fn line(&self, index: usize) -> Rgb {
        color_at(self.normalize(self.start + index as f64 * self.size), self.stops)
    }
}
