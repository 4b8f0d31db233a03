//! Pixel-space geometry: points, the plotted rectangle and its sides.

use serde::{Deserialize, Serialize};

use crate::{AxisTransform, ContourError, ContourResult};

/// Distance in pixels within which a point counts as lying on a perimeter side.
pub const PERIMETER_TOLERANCE: f64 = 0.01;

/// A point in pixel space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`.
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + t * (other.x - self.x),
            self.y + t * (other.y - self.y),
        )
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// One of the four perimeter corners, in clockwise order from top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    /// Index into [`Perimeter::corners`].
    pub fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomRight => 2,
            Corner::BottomLeft => 3,
        }
    }
}

/// Where a point sits on the perimeter.
///
/// A point exactly on a corner is reported as `Corner`; everything else on the
/// boundary gets the side it lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerimeterSide {
    Top,
    Right,
    Bottom,
    Left,
    Corner(Corner),
}

impl PerimeterSide {
    /// The corner reached by walking clockwise from a point on this side.
    ///
    /// Corners continue along the side that starts at them, so a walk from the
    /// top-left corner heads for the top-right one.
    pub fn next_corner(self) -> Corner {
        match self {
            PerimeterSide::Top | PerimeterSide::Corner(Corner::TopLeft) => Corner::TopRight,
            PerimeterSide::Right | PerimeterSide::Corner(Corner::TopRight) => Corner::BottomRight,
            PerimeterSide::Bottom | PerimeterSide::Corner(Corner::BottomRight) => {
                Corner::BottomLeft
            }
            PerimeterSide::Left | PerimeterSide::Corner(Corner::BottomLeft) => Corner::TopLeft,
        }
    }
}

/// The plotted rectangle in pixel space.
///
/// Corners are stored clockwise in screen space: top-left, top-right,
/// bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Perimeter {
    corners: [Point; 4],
}

impl Perimeter {
    /// Build from the four edge coordinates, in any orientation.
    ///
    /// Reversed axes produce swapped edges; they are normalized so the corner
    /// order is always clockwise on screen.
    pub fn from_edges(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        let (left, right) = (left.min(right), left.max(right));
        let (top, bottom) = (top.min(bottom), top.max(bottom));
        Self {
            corners: [
                Point::new(left, top),
                Point::new(right, top),
                Point::new(right, bottom),
                Point::new(left, bottom),
            ],
        }
    }

    /// Build from the first and last sample coordinates of each axis.
    pub fn from_axes(
        x: &[f64],
        y: &[f64],
        xaxis: &dyn AxisTransform,
        yaxis: &dyn AxisTransform,
    ) -> ContourResult<Self> {
        let (Some(x0), Some(x1), Some(y0), Some(y1)) = (x.first(), x.last(), y.first(), y.last())
        else {
            return Err(ContourError::InvalidPerimeter(
                "coordinate arrays must not be empty".to_string(),
            ));
        };

        Ok(Self::from_edges(
            xaxis.c2p(*x0),
            xaxis.c2p(*x1),
            yaxis.c2p(*y1),
            yaxis.c2p(*y0),
        ))
    }

    /// Validate four explicit corners (top-left, top-right, bottom-right,
    /// bottom-left) as an axis-aligned rectangle.
    pub fn try_from_corners(corners: [Point; 4]) -> ContourResult<Self> {
        let [tl, tr, br, bl] = corners;
        let aligned = (tl.y - tr.y).abs() < PERIMETER_TOLERANCE
            && (bl.y - br.y).abs() < PERIMETER_TOLERANCE
            && (tl.x - bl.x).abs() < PERIMETER_TOLERANCE
            && (tr.x - br.x).abs() < PERIMETER_TOLERANCE;
        if !aligned {
            return Err(ContourError::InvalidPerimeter(format!(
                "corners {:?} are not an axis-aligned rectangle",
                corners
            )));
        }
        if tl.x > tr.x || tl.y > bl.y {
            return Err(ContourError::InvalidPerimeter(
                "corners must run clockwise from top-left".to_string(),
            ));
        }
        Ok(Self { corners })
    }

    pub fn corners(&self) -> &[Point; 4] {
        &self.corners
    }

    pub fn corner(&self, corner: Corner) -> Point {
        self.corners[corner.index()]
    }

    pub fn left(&self) -> f64 {
        self.corners[0].x
    }

    pub fn right(&self) -> f64 {
        self.corners[2].x
    }

    pub fn top(&self) -> f64 {
        self.corners[0].y
    }

    pub fn bottom(&self) -> f64 {
        self.corners[2].y
    }

    pub fn width(&self) -> f64 {
        self.right() - self.left()
    }

    pub fn height(&self) -> f64 {
        self.bottom() - self.top()
    }

    pub fn is_on_top(&self, pt: &Point) -> bool {
        (pt.y - self.top()).abs() < PERIMETER_TOLERANCE
    }

    pub fn is_on_bottom(&self, pt: &Point) -> bool {
        (pt.y - self.bottom()).abs() < PERIMETER_TOLERANCE
    }

    pub fn is_on_left(&self, pt: &Point) -> bool {
        (pt.x - self.left()).abs() < PERIMETER_TOLERANCE
    }

    pub fn is_on_right(&self, pt: &Point) -> bool {
        (pt.x - self.right()).abs() < PERIMETER_TOLERANCE
    }

    /// Classify a point against the four sides; `None` when it is not on the
    /// perimeter at all.
    pub fn side_of(&self, pt: &Point) -> Option<PerimeterSide> {
        let top = self.is_on_top(pt);
        let bottom = self.is_on_bottom(pt);
        let left = self.is_on_left(pt);
        let right = self.is_on_right(pt);

        let side = match (top, right, bottom, left) {
            (true, _, _, true) => PerimeterSide::Corner(Corner::TopLeft),
            (true, true, _, _) => PerimeterSide::Corner(Corner::TopRight),
            (_, true, true, _) => PerimeterSide::Corner(Corner::BottomRight),
            (_, _, true, true) => PerimeterSide::Corner(Corner::BottomLeft),
            (true, _, _, _) => PerimeterSide::Top,
            (_, true, _, _) => PerimeterSide::Right,
            (_, _, true, _) => PerimeterSide::Bottom,
            (_, _, _, true) => PerimeterSide::Left,
            _ => return None,
        };
        Some(side)
    }

    /// The whole rectangle as a closed clockwise loop (first point repeated).
    pub fn closed_loop(&self) -> Vec<Point> {
        let mut pts = self.corners.to_vec();
        pts.push(self.corners[0]);
        pts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Perimeter {
        Perimeter::from_edges(0.0, 100.0, 0.0, 100.0)
    }

    #[test]
    fn test_from_edges_normalizes_reversed_axes() {
        let p = Perimeter::from_edges(100.0, 0.0, 80.0, 10.0);
        assert_eq!(p.corner(Corner::TopLeft), Point::new(0.0, 10.0));
        assert_eq!(p.corner(Corner::BottomRight), Point::new(100.0, 80.0));
    }

    #[test]
    fn test_side_classification() {
        let p = square();
        assert_eq!(p.side_of(&Point::new(50.0, 0.0)), Some(PerimeterSide::Top));
        assert_eq!(p.side_of(&Point::new(100.0, 40.0)), Some(PerimeterSide::Right));
        assert_eq!(p.side_of(&Point::new(30.0, 100.0)), Some(PerimeterSide::Bottom));
        assert_eq!(p.side_of(&Point::new(0.0, 70.0)), Some(PerimeterSide::Left));
        assert_eq!(p.side_of(&Point::new(50.0, 50.0)), None);
    }

    #[test]
    fn test_corner_walks_continue_clockwise() {
        let p = square();
        let tl = p.side_of(&Point::new(0.0, 0.0)).unwrap();
        assert_eq!(tl, PerimeterSide::Corner(Corner::TopLeft));
        assert_eq!(tl.next_corner(), Corner::TopRight);

        let tr = p.side_of(&Point::new(100.0, 0.005)).unwrap();
        assert_eq!(tr.next_corner(), Corner::BottomRight);
        let br = p.side_of(&Point::new(100.0, 100.0)).unwrap();
        assert_eq!(br.next_corner(), Corner::BottomLeft);
        let bl = p.side_of(&Point::new(0.0, 100.0)).unwrap();
        assert_eq!(bl.next_corner(), Corner::TopLeft);
    }

    #[test]
    fn test_try_from_corners_rejects_skewed() {
        let skewed = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 5.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        assert!(Perimeter::try_from_corners(skewed).is_err());
        assert!(Perimeter::try_from_corners(*square().corners()).is_ok());
    }
}
