//! Label text for contour levels.
//!
//! Levels are formatted either with the default rounding rule, which keeps two
//! significant decimals beyond the magnitude of the contour step, or with an
//! explicit numeric format of the form `[sign][,][.precision][~][type]`.

use contour_common::{ContourError, ContourResult};

/// Sign handling of an explicit format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignMode {
    /// Minus for negatives only.
    #[default]
    Minus,
    /// Plus for zero and positives, minus for negatives.
    Plus,
    /// Space for zero and positives, minus for negatives.
    Space,
}

/// Output notation of an explicit format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// `f`: fixed point.
    Fixed,
    /// `e`: exponent notation.
    Exponent,
    /// `g`: significant digits, fixed or exponent depending on magnitude.
    General,
    /// `d`: rounded integer.
    Integer,
    /// `%`: multiplied by 100, fixed point, with a percent sign.
    Percent,
}

/// A parsed explicit label format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    pub sign: SignMode,
    pub grouping: bool,
    pub precision: Option<usize>,
    pub trim: bool,
    pub kind: Option<FormatType>,
}

impl NumberFormat {
    /// Parse a format such as `.2f`, `+,.0f`, `.3~g` or `%`.
    pub fn parse(spec: &str) -> ContourResult<Self> {
        let invalid = |message: &str| ContourError::InvalidLabelFormat {
            spec: spec.to_string(),
            message: message.to_string(),
        };

        let mut chars = spec.chars().peekable();
        let mut format = NumberFormat {
            sign: SignMode::Minus,
            grouping: false,
            precision: None,
            trim: false,
            kind: None,
        };

        match chars.peek() {
            Some('+') => format.sign = SignMode::Plus,
            Some('-') => format.sign = SignMode::Minus,
            Some(' ') => format.sign = SignMode::Space,
            _ => {}
        }
        if matches!(chars.peek(), Some('+' | '-' | ' ')) {
            chars.next();
        }

        if chars.peek() == Some(&',') {
            format.grouping = true;
            chars.next();
        }

        if chars.peek() == Some(&'.') {
            chars.next();
            let mut digits = String::new();
            while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
                digits.push(c);
                chars.next();
            }
            if digits.is_empty() {
                return Err(invalid("precision expects digits after '.'"));
            }
            let precision = digits
                .parse::<usize>()
                .map_err(|e| invalid(&e.to_string()))?;
            if precision > 20 {
                return Err(invalid("precision must be at most 20"));
            }
            format.precision = Some(precision);
        }

        if chars.peek() == Some(&'~') {
            format.trim = true;
            chars.next();
        }

        format.kind = match chars.next() {
            None => None,
            Some('f') => Some(FormatType::Fixed),
            Some('e') => Some(FormatType::Exponent),
            Some('g') => Some(FormatType::General),
            Some('d') => Some(FormatType::Integer),
            Some('%') => Some(FormatType::Percent),
            Some(c) => return Err(invalid(&format!("unsupported type '{}'", c))),
        };

        if let Some(c) = chars.next() {
            return Err(invalid(&format!("unexpected trailing '{}'", c)));
        }
        Ok(format)
    }

    /// Format one value.
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let (body, suffix) = match self.kind {
            Some(FormatType::Fixed) => (fixed(value.abs(), self.precision.unwrap_or(6)), ""),
            Some(FormatType::Exponent) => (exponent(value.abs(), self.precision.unwrap_or(6)), ""),
            Some(FormatType::General) => (general(value.abs(), self.precision.unwrap_or(6)), ""),
            Some(FormatType::Integer) => (fixed(value.abs(), 0), ""),
            Some(FormatType::Percent) => (
                fixed(value.abs() * 100.0, self.precision.unwrap_or(6)),
                "%",
            ),
            None => match self.precision {
                Some(p) => (trim_zeros(&general(value.abs(), p)), ""),
                None => (value.abs().to_string(), ""),
            },
        };

        let mut body = if self.trim { trim_zeros(&body) } else { body };
        if self.grouping {
            body = group_thousands(&body);
        }

        let negative = value < 0.0 && body.chars().any(|c| matches!(c, '1'..='9'));
        let sign = match (negative, self.sign) {
            (true, _) => "-",
            (false, SignMode::Plus) => "+",
            (false, SignMode::Space) => " ",
            (false, SignMode::Minus) => "",
        };
        format!("{}{}{}", sign, body, suffix)
    }
}

/// Fixed-point text with halves rounded away from zero.
fn fixed(value: f64, precision: usize) -> String {
    let scale = 10f64.powi(precision as i32);
    let scaled = value * scale;
    // Past 2^53 every f64 is already an integer at this scale
    if scaled.is_finite() && scaled.abs() < 9_007_199_254_740_992.0 {
        format!("{:.*}", precision, scaled.round() / scale)
    } else {
        format!("{:.*}", precision, value)
    }
}

/// Exponent notation with an explicitly signed exponent, e.g. `1.50e+3`.
fn exponent(value: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, value);
    match raw.split_once('e') {
        Some((mantissa, exp)) if exp.starts_with('-') => format!("{}e{}", mantissa, exp),
        Some((mantissa, exp)) => format!("{}e+{}", mantissa, exp),
        None => raw,
    }
}

/// `precision` significant digits, switching to exponent notation for very
/// small or very large magnitudes.
fn general(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if value == 0.0 {
        return fixed(0.0, precision - 1);
    }
    // Exponent after rounding to the requested digits
    let rounded = format!("{:.*e}", precision - 1, value);
    let exp = rounded
        .split_once('e')
        .and_then(|(_, e)| e.parse::<i32>().ok())
        .unwrap_or(0);
    if exp < -6 || exp >= precision as i32 {
        exponent(value, precision - 1)
    } else {
        fixed(value, (precision as i32 - 1 - exp).max(0) as usize)
    }
}

/// Drop insignificant trailing zeros (and a dangling point) from the
/// fractional part, keeping any exponent.
fn trim_zeros(s: &str) -> String {
    let (number, exp) = match s.find('e') {
        Some(i) => s.split_at(i),
        None => (s, ""),
    };
    if !number.contains('.') {
        return s.to_string();
    }
    let trimmed = number.trim_end_matches('0').trim_end_matches('.');
    format!("{}{}", trimmed, exp)
}

fn group_thousands(s: &str) -> String {
    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (int_part, rest) = s.split_at(split);
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped.push_str(rest);
    grouped
}

/// Number of decimals the default rule keeps for a contour step, or `None`
/// when labels are formatted as integers.
pub fn default_decimals(step: f64) -> Option<usize> {
    if !step.is_finite() || step <= 0.0 {
        return None;
    }
    let digits = 2.0 - (step.log10() + 0.01).floor();
    if digits <= 0.0 {
        None
    } else {
        Some(digits as usize)
    }
}

/// Turns contour level values into label text.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelFormatter {
    /// Round relative to the contour step, then strip trailing zeros.
    Default { step: f64 },
    /// A caller-supplied numeric format.
    Explicit(NumberFormat),
}

impl LabelFormatter {
    pub fn with_step(step: f64) -> Self {
        LabelFormatter::Default { step }
    }

    /// An explicit formatter from a format string.
    pub fn parse(spec: &str) -> ContourResult<Self> {
        Ok(LabelFormatter::Explicit(NumberFormat::parse(spec)?))
    }

    /// The explicit format when it parses, the default rule otherwise.
    pub fn for_contours(labelformat: Option<&str>, step: f64) -> Self {
        match labelformat.filter(|s| !s.is_empty()) {
            None => Self::with_step(step),
            Some(spec) => Self::parse(spec).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Falling back to default label format");
                Self::with_step(step)
            }),
        }
    }

    pub fn format(&self, value: f64) -> String {
        let text = match self {
            LabelFormatter::Default { step } => match default_decimals(*step) {
                None => fixed(value, 0),
                Some(decimals) => trim_zeros(&fixed(value, decimals)),
            },
            LabelFormatter::Explicit(format) => format.format(value),
        };
        normalize_negative_zero(text)
    }
}

/// `-0`, `-0.0`, … read as zero.
fn normalize_negative_zero(text: String) -> String {
    match text.strip_prefix('-') {
        Some(rest) if !rest.chars().any(|c| matches!(c, '1'..='9')) => rest.to_string(),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_decimals() {
        assert_eq!(default_decimals(1.0), Some(2));
        assert_eq!(default_decimals(0.1), Some(3));
        assert_eq!(default_decimals(10.0), Some(1));
        assert_eq!(default_decimals(100.0), None);
        assert_eq!(default_decimals(0.0), None);
        assert_eq!(default_decimals(-1.0), None);
        assert_eq!(default_decimals(f64::NAN), None);
    }

    #[test]
    fn test_default_rule_strips_trailing_zeros() {
        let f = LabelFormatter::with_step(1.0);
        assert_eq!(f.format(5.0), "5");
        assert_eq!(f.format(2.5), "2.5");
        assert_eq!(f.format(1.2345), "1.23");

        let f = LabelFormatter::with_step(0.1);
        assert_eq!(f.format(0.30000000000000004), "0.3");
    }

    #[test]
    fn test_default_rule_integer_for_large_steps() {
        let f = LabelFormatter::with_step(500.0);
        assert_eq!(f.format(1500.0), "1500");
        assert_eq!(f.format(1234.6), "1235");
    }

    #[test]
    fn test_negative_zero_normalized() {
        let f = LabelFormatter::with_step(1.0);
        assert_eq!(f.format(-0.0001), "0");
        let f = LabelFormatter::with_step(1000.0);
        assert_eq!(f.format(-0.2), "0");
    }

    #[test]
    fn test_halves_round_away_from_zero() {
        assert_eq!(LabelFormatter::with_step(1.0).format(0.125), "0.13");
        assert_eq!(LabelFormatter::with_step(100.0).format(2.5), "3");
        assert_eq!(LabelFormatter::with_step(100.0).format(-2.5), "-3");
    }

    #[test]
    fn test_explicit_fixed() {
        let f = LabelFormatter::parse(".2f").unwrap();
        assert_eq!(f.format(3.14159), "3.14");
        assert_eq!(f.format(-2.0), "-2.00");
    }

    #[test]
    fn test_explicit_trim_and_grouping() {
        assert_eq!(NumberFormat::parse(",.2~f").unwrap().format(12345.5), "12,345.5");
        assert_eq!(NumberFormat::parse(",d").unwrap().format(1234567.0), "1,234,567");
        assert_eq!(NumberFormat::parse("+d").unwrap().format(7.0), "+7");
    }

    #[test]
    fn test_explicit_exponent_and_general() {
        assert_eq!(NumberFormat::parse(".2e").unwrap().format(1500.0), "1.50e+3");
        assert_eq!(NumberFormat::parse(".1e").unwrap().format(0.00025), "2.5e-4");
        assert_eq!(NumberFormat::parse(".3g").unwrap().format(1234.0), "1.23e+3");
        assert_eq!(NumberFormat::parse(".3g").unwrap().format(1.5), "1.50");
        assert_eq!(NumberFormat::parse(".3~g").unwrap().format(1.5), "1.5");
    }

    #[test]
    fn test_explicit_percent() {
        assert_eq!(NumberFormat::parse(".0%").unwrap().format(0.25), "25%");
    }

    #[test]
    fn test_invalid_formats() {
        for spec in [".f", "x", ".2fz", ".99f"] {
            let err = NumberFormat::parse(spec).unwrap_err();
            assert!(
                matches!(err, ContourError::InvalidLabelFormat { .. }),
                "{} should be rejected",
                spec
            );
        }
    }

    #[test]
    fn test_for_contours_falls_back() {
        assert_eq!(
            LabelFormatter::for_contours(Some("nope"), 1.0),
            LabelFormatter::with_step(1.0)
        );
        assert_eq!(
            LabelFormatter::for_contours(Some(""), 2.0),
            LabelFormatter::with_step(2.0)
        );
        assert!(matches!(
            LabelFormatter::for_contours(Some(".1f"), 1.0),
            LabelFormatter::Explicit(_)
        ));
    }
}
