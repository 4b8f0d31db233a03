//! Tests for perimeter stitching.

use contour_common::{AxisTransform, Grid, LinearAxis, Point};
use contour_renderer::levels::LevelInfo;
use contour_renderer::path::{smooth_closed, smooth_open};
use contour_renderer::stitch::stitch;
use contour_renderer::trace::{MarchingSquares, PixelAxes, Tracer};
use test_utils::{
    constant_field, index_coords, init_tracing, noise_field, pixel_axes, single_peak_field,
    square_perimeter,
};

fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
    coords.iter().map(|&c| Point::from(c)).collect()
}

fn traced<'g>(grid: &'g Grid, level: f64, rows: usize, cols: usize) -> LevelInfo<'g> {
    let (xa, ya) = pixel_axes(rows, cols);
    MarchingSquares.trace(
        &LevelInfo::empty(level, grid, 0.0),
        &PixelAxes::new(&xa, &ya),
    )
}

// ============================================================================
// Whole-perimeter cases
// ============================================================================

#[test]
fn test_grid_above_level_yields_full_rectangle() {
    let grid = Grid::from_rows(constant_field(3, 3, 10.0)).unwrap();
    let level = traced(&grid, 5.0, 3, 3);
    assert!(level.edgepaths.is_empty());

    let result = stitch(&level, &square_perimeter()).unwrap();
    assert!(result.includes_perimeter);
    assert_eq!(result.loops.len(), 1);
    assert_eq!(
        result.loops[0].points,
        pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0), (0.0, 0.0)])
    );
}

#[test]
fn test_grid_below_level_yields_nothing() {
    let grid = Grid::from_rows(constant_field(3, 3, 1.0)).unwrap();
    let level = traced(&grid, 5.0, 3, 3);
    assert!(stitch(&level, &square_perimeter()).is_none());
}

#[test]
fn test_level_equal_to_grid_is_not_above() {
    let grid = Grid::from_rows(constant_field(2, 2, 5.0)).unwrap();
    let level = LevelInfo::empty(5.0, &grid, 0.0);
    assert!(stitch(&level, &square_perimeter()).is_none());
}

#[test]
fn test_peak_is_a_lone_interior_loop() {
    let grid = Grid::from_rows(single_peak_field(9, 9, 10.0)).unwrap();
    let level = traced(&grid, 5.0, 9, 9);
    assert!(level.edgepaths.is_empty());
    assert_eq!(level.paths.len(), 1);

    let result = stitch(&level, &square_perimeter()).unwrap();
    assert!(!result.includes_perimeter);
    assert_eq!(result.loops.len(), 1);
    assert!(result.loops[0].is_closed());
    assert!(result.contains(&Point::new(50.0, 50.0)));
    assert!(!result.contains(&Point::new(2.0, 2.0)));
}

#[test]
fn test_pit_punches_a_hole_in_the_rectangle() {
    let mut z = constant_field(9, 9, 10.0);
    z[4][4] = 0.0;
    let grid = Grid::from_rows(z).unwrap();
    let level = traced(&grid, 5.0, 9, 9);

    let result = stitch(&level, &square_perimeter()).unwrap();
    assert!(result.includes_perimeter);
    assert_eq!(result.loops.len(), 2);
    assert!(result.contains(&Point::new(10.0, 10.0)));
    assert!(!result.contains(&Point::new(50.0, 50.0)));
}

// ============================================================================
// Concrete corner scenario
// ============================================================================

#[test]
fn test_single_high_corner_scenario() {
    init_tracing();
    let grid = Grid::new(
        vec![vec![0.0, 0.0], vec![0.0, 10.0]],
        vec![0.0, 1.0],
        vec![0.0, 1.0],
    )
    .unwrap();
    let xa = LinearAxis::horizontal((0.0, 1.0), 100.0);
    let ya = LinearAxis::vertical((0.0, 1.0), 100.0);
    let level = MarchingSquares.trace(
        &LevelInfo::empty(5.0, &grid, 0.0),
        &PixelAxes::new(&xa, &ya),
    );
    assert_eq!(level.edgepaths.len(), 1);

    let result = stitch(&level, &square_perimeter()).unwrap();
    assert!(!result.includes_perimeter);
    assert_eq!(result.loops.len(), 1);

    let ring = &result.loops[0];
    assert_eq!(ring.points.first(), ring.points.last());
    assert_eq!(
        ring.points,
        pts(&[(100.0, 50.0), (50.0, 0.0), (100.0, 0.0), (100.0, 50.0)])
    );
    // z = 10 sits at x = 1, y = 1, i.e. the top-right pixel corner
    assert!(result.contains(&Point::new(95.0, 5.0)));
    assert!(!result.contains(&Point::new(5.0, 95.0)));
    assert!(ring.signed_area() > 0.0);
    assert_eq!(result.to_path_data(), "M100,50L50,0L100,0Z");
}

// ============================================================================
// Hand-built edge paths
// ============================================================================

#[test]
fn test_tiling_paths_round_trip_point_count() {
    let grid = Grid::from_rows(constant_field(2, 2, 0.0)).unwrap();
    let mut level = LevelInfo::empty(1.0, &grid, 0.0);
    level.edgepaths = vec![
        pts(&[(50.0, 0.0), (75.0, 25.0), (100.0, 50.0)]),
        pts(&[(100.0, 80.0), (60.0, 90.0), (20.0, 100.0)]),
    ];

    let result = stitch(&level, &square_perimeter()).unwrap();
    assert_eq!(result.loops.len(), 1);

    let input_points = 6;
    let inserted_corners = 2; // bottom-left and top-left
    let closing = 1;
    assert_eq!(result.point_count(), input_points + inserted_corners + closing);
    for ring in &result.loops {
        assert!(ring.is_closed());
    }
    assert_eq!(
        result.loops[0].points,
        pts(&[
            (50.0, 0.0),
            (75.0, 25.0),
            (100.0, 50.0),
            (100.0, 80.0),
            (60.0, 90.0),
            (20.0, 100.0),
            (0.0, 100.0),
            (0.0, 0.0),
            (50.0, 0.0),
        ])
    );
}

#[test]
fn test_two_separate_loops() {
    let grid = Grid::from_rows(constant_field(2, 2, 0.0)).unwrap();
    let mut level = LevelInfo::empty(1.0, &grid, 0.0);
    // Two opposite corners cut off
    level.edgepaths = vec![
        pts(&[(100.0, 20.0), (80.0, 0.0)]),
        pts(&[(0.0, 80.0), (20.0, 100.0)]),
    ];

    let result = stitch(&level, &square_perimeter()).unwrap();
    assert_eq!(result.loops.len(), 2);
    assert_eq!(result.point_count(), 4 + 4);
    assert!(result.contains(&Point::new(95.0, 5.0)));
    assert!(result.contains(&Point::new(5.0, 95.0)));
    assert!(!result.contains(&Point::new(50.0, 50.0)));
}

#[test]
fn test_interior_paths_follow_edge_loops() {
    let grid = Grid::from_rows(constant_field(2, 2, 0.0)).unwrap();
    let mut level = LevelInfo::empty(1.0, &grid, 0.0);
    level.edgepaths = vec![pts(&[(100.0, 20.0), (80.0, 0.0)])];
    level.paths = vec![pts(&[(40.0, 40.0), (60.0, 40.0), (60.0, 60.0), (40.0, 60.0)])];

    let result = stitch(&level, &square_perimeter()).unwrap();
    assert_eq!(result.loops.len(), 2);
    assert_eq!(result.loops[1].points.len(), 5);
    assert_eq!(result.loops[1].points[0], Point::new(40.0, 40.0));
}

#[test]
fn test_path_ending_off_perimeter_is_dropped() {
    init_tracing();
    let grid = Grid::from_rows(constant_field(2, 2, 0.0)).unwrap();
    let mut level = LevelInfo::empty(1.0, &grid, 0.0);
    level.edgepaths = vec![
        pts(&[(100.0, 20.0), (50.0, 50.0)]),
        pts(&[(0.0, 80.0), (20.0, 100.0)]),
    ];

    // The broken first loop is abandoned; the second still closes
    let result = stitch(&level, &square_perimeter()).unwrap();
    assert_eq!(result.loops.len(), 1);
    assert_eq!(result.loops[0].points[0], Point::new(0.0, 80.0));
}

#[test]
fn test_path_reentering_its_own_side_wraps_the_whole_perimeter() {
    init_tracing();
    let grid = Grid::from_rows(constant_field(2, 2, 0.0)).unwrap();
    let mut level = LevelInfo::empty(1.0, &grid, 0.0);
    // Leaves and re-enters the right side below its own start
    level.edgepaths = vec![pts(&[(100.0, 30.0), (60.0, 30.0), (60.0, 40.0), (100.0, 40.0)])];

    let result = stitch(&level, &square_perimeter()).unwrap();
    assert_eq!(result.loops.len(), 1);
    assert_eq!(
        result.loops[0].points,
        pts(&[
            (100.0, 30.0),
            (60.0, 30.0),
            (60.0, 40.0),
            (100.0, 40.0),
            (100.0, 100.0),
            (0.0, 100.0),
            (0.0, 0.0),
            (100.0, 0.0),
            (100.0, 30.0),
        ])
    );
    assert!(result.contains(&Point::new(50.0, 50.0)));
    assert!(result.contains(&Point::new(10.0, 10.0)));
    assert!(!result.contains(&Point::new(80.0, 35.0)));
}

#[test]
fn test_fill_matches_samples_on_noise() {
    let (rows, cols) = (10, 10);
    let (xa, ya) = pixel_axes(rows, cols);
    for seed in 0..20 {
        let z = noise_field(rows, cols, seed);
        let grid = Grid::from_rows(z.clone()).unwrap();
        for step in 1..=9 {
            let value = step as f64 / 10.0;
            let level = traced(&grid, value, rows, cols);
            let result = stitch(&level, &square_perimeter());
            for row in 1..rows - 1 {
                for col in 1..cols - 1 {
                    let pixel = Point::new(xa.c2p(col as f64), ya.c2p(row as f64));
                    let inside = result.as_ref().is_some_and(|r| r.contains(&pixel));
                    assert_eq!(
                        inside,
                        z[row][col] > value,
                        "seed {} level {} sample ({}, {}) z = {}",
                        seed,
                        value,
                        row,
                        col,
                        z[row][col]
                    );
                }
            }
        }
    }
}

/// Known edge case: when several unconsumed starts coincide on the stretch
/// being walked, the one scanned last wins.
#[test]
fn test_coincident_starts_resolve_by_scan_order() {
    let grid = Grid::from_rows(constant_field(2, 2, 0.0)).unwrap();
    let mut level = LevelInfo::empty(1.0, &grid, 0.0);
    level.edgepaths = vec![
        pts(&[(50.0, 0.0), (100.0, 10.0)]),
        pts(&[(100.0, 40.0), (90.0, 50.0), (100.0, 60.0)]),
        pts(&[(100.0, 40.0), (70.0, 50.0), (50.0, 100.0)]),
    ];

    let result = stitch(&level, &square_perimeter()).unwrap();
    let first = &result.loops[0].points;
    assert_eq!(first[2], Point::new(100.0, 40.0));
    assert_eq!(first[3], Point::new(70.0, 50.0));
}

#[test]
fn test_stitching_does_not_touch_input() {
    let grid = Grid::new(
        constant_field(3, 3, 0.0),
        index_coords(3),
        index_coords(3),
    )
    .unwrap();
    let mut level = LevelInfo::empty(1.0, &grid, 0.0);
    level.edgepaths = vec![pts(&[(100.0, 20.0), (80.0, 0.0)])];
    let before = level.edgepaths.clone();
    let _ = stitch(&level, &square_perimeter());
    assert_eq!(level.edgepaths, before);
}

// ============================================================================
// Smoothed fill outlines
// ============================================================================

fn tiling_level(grid: &Grid) -> LevelInfo<'_> {
    let mut level = LevelInfo::empty(1.0, grid, 0.0);
    level.edgepaths = vec![
        pts(&[(50.0, 0.0), (75.0, 25.0), (100.0, 50.0)]),
        pts(&[(100.0, 80.0), (60.0, 90.0), (20.0, 100.0)]),
    ];
    level.paths = vec![pts(&[(40.0, 40.0), (60.0, 40.0), (60.0, 60.0), (40.0, 60.0)])];
    level
}

#[test]
fn test_unsmoothed_fill_matches_straight_path() {
    let grid = Grid::from_rows(constant_field(2, 2, 0.0)).unwrap();
    let level = tiling_level(&grid);
    let result = stitch(&level, &square_perimeter()).unwrap();
    assert_eq!(result.to_smoothed_path_data(0.0), result.to_path_data());

    let grid = Grid::from_rows(constant_field(3, 3, 10.0)).unwrap();
    let level = traced(&grid, 5.0, 3, 3);
    let result = stitch(&level, &square_perimeter()).unwrap();
    assert_eq!(result.to_smoothed_path_data(1.0), "M0,0L100,0L100,100L0,100Z");
}

#[test]
fn test_smoothed_fill_follows_smoothed_lines() {
    let grid = Grid::from_rows(constant_field(2, 2, 0.0)).unwrap();
    let mut level = tiling_level(&grid);
    level.smoothing = 1.0;
    let result = stitch(&level, &square_perimeter()).unwrap();
    assert_eq!(result.loops.len(), 2);

    let first = smooth_open(&level.edgepaths[0], 1.0);
    let second = smooth_open(&level.edgepaths[1], 1.0);
    let expected_edge = format!("{}L{}L0,100L0,0Z", first, &second[1..]);
    assert_eq!(result.loops[0].to_smoothed_path_data(1.0), expected_edge);
    assert_eq!(
        result.loops[1].to_smoothed_path_data(1.0),
        smooth_closed(&level.paths[0], 1.0)
    );
    assert_eq!(
        result.to_smoothed_path_data(1.0),
        format!("{}{}", expected_edge, smooth_closed(&level.paths[0], 1.0))
    );
    assert!(result.to_smoothed_path_data(1.0).contains('Q'));
}
