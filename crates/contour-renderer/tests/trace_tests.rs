//! Tests for the reference marching squares tracer.

use contour_common::{ContourOptions, Grid, Point};
use contour_renderer::levels::build_levels;
use contour_renderer::stitch::stitch;
use contour_renderer::trace::{trace_all, MarchingSquares, PixelAxes};
use test_utils::{
    assert_approx_eq, linear_ramp_field, noise_field, pixel_axes, saddle_field, square_perimeter,
};

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_ramp_levels_cross_top_to_bottom() {
    let grid = Grid::from_rows(linear_ramp_field(4, 5, 0.0, 4.0)).unwrap();
    let (xa, ya) = pixel_axes(4, 5);
    let contours = ContourOptions {
        start: 0.5,
        end: 3.5,
        size: 1.0,
        ..Default::default()
    };
    let levels = build_levels(&contours, &grid, 1.0);
    let traced = trace_all(&MarchingSquares, &levels, &PixelAxes::new(&xa, &ya));

    assert_eq!(traced.len(), 4);
    for level in &traced {
        assert_eq!(level.edgepaths.len(), 1);
        assert!(level.paths.is_empty());
        assert_eq!(level.starts.len(), 1);
        assert_eq!(level.crossings.len(), 3);

        let path = &level.edgepaths[0];
        let x = level.level / 4.0 * 100.0;
        for p in path {
            assert_approx_eq!(p.x, x, 1e-9);
        }
        // High values lie to the right, so the path runs up the screen
        assert_approx_eq!(path[0].y, 100.0, 1e-9);
        assert_approx_eq!(path[path.len() - 1].y, 0.0, 1e-9);
    }
}

#[test]
fn test_ramp_fill_covers_the_high_side() {
    let grid = Grid::from_rows(linear_ramp_field(3, 3, 0.0, 2.0)).unwrap();
    let (xa, ya) = pixel_axes(3, 3);
    let contours = ContourOptions {
        start: 0.75,
        end: 0.75,
        size: 1.0,
        ..Default::default()
    };
    let levels = build_levels(&contours, &grid, 0.0);
    let traced = trace_all(&MarchingSquares, &levels, &PixelAxes::new(&xa, &ya));
    let result = stitch(&traced[0], &square_perimeter()).unwrap();

    assert!(result.contains(&Point::new(90.0, 50.0)));
    assert!(!result.contains(&Point::new(10.0, 50.0)));
}

#[test]
fn test_saddle_keeps_high_quadrants_apart() {
    let grid = Grid::from_rows(saddle_field(5, 5)).unwrap();
    let (xa, ya) = pixel_axes(5, 5);
    let contours = ContourOptions {
        start: 0.5,
        end: 0.5,
        size: 1.0,
        ..Default::default()
    };
    let levels = build_levels(&contours, &grid, 0.0);
    let traced = trace_all(&MarchingSquares, &levels, &PixelAxes::new(&xa, &ya));
    assert_eq!(traced[0].edgepaths.len(), 2);

    let result = stitch(&traced[0], &square_perimeter()).unwrap();
    assert_eq!(result.loops.len(), 2);
    // Row 0 sits at the bottom, so the positive quadrants are bottom-left
    // and top-right on screen
    assert!(result.contains(&Point::new(5.0, 95.0)));
    assert!(result.contains(&Point::new(95.0, 5.0)));
    assert!(!result.contains(&Point::new(5.0, 5.0)));
    assert!(!result.contains(&Point::new(95.0, 95.0)));
}

#[test]
fn test_noise_paths_end_on_the_perimeter() {
    let grid = Grid::from_rows(noise_field(12, 12, 42)).unwrap();
    let (xa, ya) = pixel_axes(12, 12);
    let perimeter = square_perimeter();
    let contours = ContourOptions {
        start: 0.1,
        end: 0.9,
        size: 0.2,
        ..Default::default()
    };
    let levels = build_levels(&contours, &grid, 0.0);
    let traced = trace_all(&MarchingSquares, &levels, &PixelAxes::new(&xa, &ya));

    for level in &traced {
        for path in &level.edgepaths {
            let first = path.first().unwrap();
            let last = path.last().unwrap();
            assert!(perimeter.side_of(first).is_some(), "start {:?}", first);
            assert!(perimeter.side_of(last).is_some(), "end {:?}", last);
        }
        if let Some(result) = stitch(level, &perimeter) {
            assert!(result.loops.iter().all(|l| l.is_closed()));
        }
    }
}
