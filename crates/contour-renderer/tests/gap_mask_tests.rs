//! Tests for the missing-data clip region.

use contour_common::{find_empties, Grid, Point};
use contour_renderer::gap_mask::{build_gap_clip, build_mask, GAP_MASK_LEVEL};
use contour_renderer::trace::{MarchingSquares, PixelAxes};
use test_utils::{constant_field, init_tracing, pixel_axes, square_perimeter};

// ============================================================================
// Occupancy grid
// ============================================================================

#[test]
fn test_single_missing_sample_gives_one_zero() {
    let mut z = constant_field(5, 5, 3.0);
    z[2][3] = f64::NAN;
    let grid = Grid::from_rows(z).unwrap();
    let missing = find_empties(grid.z());
    assert_eq!(missing, vec![(2, 3)]);

    let mask = build_mask(&grid, &missing);
    let zeros: Vec<(usize, usize)> = (0..5)
        .flat_map(|r| (0..5).map(move |c| (r, c)))
        .filter(|&(r, c)| mask.get(r, c) == Some(0.0))
        .collect();
    assert_eq!(zeros, vec![(2, 3)]);
    assert!(mask.z().iter().flatten().all(|&v| v == 0.0 || v == 1.0));
}

// ============================================================================
// Clip region
// ============================================================================

#[test]
fn test_interior_gap_is_a_small_hole() {
    init_tracing();
    let mut z = constant_field(5, 5, 1.0);
    z[2][2] = f64::NAN;
    let grid = Grid::from_rows(z).unwrap();
    let missing = find_empties(grid.z());
    let (xa, ya) = pixel_axes(5, 5);

    let gap = build_gap_clip(
        &grid,
        &missing,
        &MarchingSquares,
        &PixelAxes::new(&xa, &ya),
        &square_perimeter(),
    );

    assert_eq!(gap.occupancy.get(2, 2), Some(0.0));
    let clip = gap.clip.expect("clip region");
    assert!(clip.includes_perimeter);
    assert_eq!(clip.loops.len(), 2);

    // The hole is a diamond around the missing sample at pixel (50, 50),
    // reaching most of the way to its 25px-distant neighbours
    let hole = &clip.loops[1];
    assert!(hole.is_closed());
    assert_eq!(hole.points.len(), 5);
    for p in &hole.points {
        let d = p.distance(&Point::new(50.0, 50.0));
        assert!((d - 25.0 * GAP_MASK_LEVEL).abs() < 1e-9, "vertex at {}", d);
    }
    assert!(!clip.contains(&Point::new(50.0, 50.0)));
    assert!(!clip.contains(&Point::new(60.0, 50.0)));
    assert!(clip.contains(&Point::new(80.0, 50.0)));
    assert!(clip.contains(&Point::new(30.0, 30.0)));
}

#[test]
fn test_corner_gap_cuts_the_perimeter() {
    let mut z = constant_field(3, 3, 1.0);
    z[0][2] = f64::NAN;
    let grid = Grid::from_rows(z).unwrap();
    let missing = find_empties(grid.z());
    let (xa, ya) = pixel_axes(3, 3);

    let gap = build_gap_clip(
        &grid,
        &missing,
        &MarchingSquares,
        &PixelAxes::new(&xa, &ya),
        &square_perimeter(),
    );
    let clip = gap.clip.expect("clip region");
    assert!(!clip.includes_perimeter);
    assert_eq!(clip.loops.len(), 1);
    // Row 0, column 2 is the bottom-right pixel corner
    assert!(!clip.contains(&Point::new(99.0, 99.0)));
    assert!(clip.contains(&Point::new(10.0, 10.0)));
}

#[test]
fn test_all_missing_leaves_no_region() {
    let grid = Grid::from_rows(constant_field(2, 2, f64::NAN)).unwrap();
    let missing = find_empties(grid.z());
    let (xa, ya) = pixel_axes(2, 2);
    let gap = build_gap_clip(
        &grid,
        &missing,
        &MarchingSquares,
        &PixelAxes::new(&xa, &ya),
        &square_perimeter(),
    );
    assert!(gap.clip.is_none());
    assert!(gap.occupancy.z().iter().flatten().all(|&v| v == 0.0));
}
