//! Order and sizing behaviour of local mercator grids.

use geo_common::BoundingBox;
use ndarray::{s, Array2};
use projection::{local_mercator_grid, Grid, LocalGridBuilder, PixelOrder};
use test_utils::assert_approx_eq;

const INNSBRUCK: (f64, f64) = (11.38, 47.26);

/// Element-wise closeness with a relative tolerance.
fn assert_allclose(left: &Array2<f64>, right: &Array2<f64>) {
    assert_eq!(left.dim(), right.dim(), "shape mismatch");
    for (a, b) in left.iter().zip(right.iter()) {
        let tol = 1e-7 * b.abs().max(1.0);
        assert!((a - b).abs() <= tol, "{} != {}", a, b);
    }
}

fn assert_extent_close(left: BoundingBox, right: BoundingBox) {
    for (a, b) in left.to_array().iter().zip(right.to_array().iter()) {
        assert_approx_eq!(*a, *b, 1e-6);
    }
}

fn mercator_grid(extent: (f64, f64), nx: Option<usize>, order: PixelOrder) -> Grid {
    local_mercator_grid(INNSBRUCK, extent, nx, None, order).unwrap()
}

fn flipped(array: &Array2<f64>) -> Array2<f64> {
    array.slice(s![..;-1, ..]).to_owned()
}

#[test]
fn test_center_coordinates_flip_with_order() {
    let extent = (2_000_000.0, 2_000_000.0);
    let ll = mercator_grid(extent, None, PixelOrder::LowerLeft);
    let ul = mercator_grid(extent, None, PixelOrder::UpperLeft);

    assert_extent_close(ll.extent(), ul.extent());
    assert_eq!(ll.dimensions(), (600, 600));

    let (lon1, lat1) = ll.center_grid().ll_coordinates();
    let (lon2, lat2) = ul.center_grid().ll_coordinates();
    assert_allclose(&lon1, &flipped(&lon2));
    assert_allclose(&lat1, &flipped(&lat2));

    // Row 0 is south for ll, north for ul
    assert!(lat1[[0, 300]] < lat1[[599, 300]]);
    assert!(lat2[[0, 300]] > lat2[[599, 300]]);
}

#[test]
fn test_corner_coordinates_flip_with_order() {
    let ll = LocalGridBuilder::new(INNSBRUCK, (2000.0, 2000.0))
        .nx(100)
        .build()
        .unwrap();
    let ul = LocalGridBuilder::new(INNSBRUCK, (2000.0, 2000.0))
        .nx(100)
        .order(PixelOrder::UpperLeft)
        .build()
        .unwrap();

    assert_extent_close(ll.extent(), ul.extent());

    let (lon1, lat1) = ll.pixcorner_ll_coordinates();
    let (lon2, lat2) = ul.pixcorner_ll_coordinates();
    assert_eq!(lon1.dim(), (101, 101));
    assert_allclose(&lon1, &flipped(&lon2));
    assert_allclose(&lat1, &flipped(&lat2));
}

#[test]
fn test_extent_independent_of_pixel_count() {
    let ll = mercator_grid((2000.0, 2000.0), Some(10), PixelOrder::LowerLeft);
    let ul = mercator_grid((2000.0, 2000.0), Some(9), PixelOrder::UpperLeft);
    let (e1, e2) = (ll.extent(), ul.extent());

    assert_approx_eq!(e1.min_x, e2.min_x, 1e-9);
    assert_approx_eq!(e1.max_x, e2.max_x, 1e-9);
    assert_approx_eq!(e1.min_y, e2.min_y, 1e-6);
    assert_approx_eq!(e1.max_y, e2.max_y, 1e-6);
    assert_approx_eq!(e1.width(), 2000.0, 1e-9);
    assert_approx_eq!(e1.height(), 2000.0, 1e-6);
}

#[test]
fn test_resolution_sizing_independent_of_order() {
    // 2000 / 210.5 = 9.501..; 2000 / 211 = 9.478..
    for res in [200.0, 210.5, 211.0, 222.2, 222.3] {
        let ll = LocalGridBuilder::new(INNSBRUCK, (2000.0, 2000.0))
            .resolution(res)
            .build()
            .unwrap();
        let ul = LocalGridBuilder::new(INNSBRUCK, (2000.0, 2000.0))
            .resolution(res)
            .order(PixelOrder::UpperLeft)
            .build()
            .unwrap();
        assert_eq!(ll.dimensions(), ul.dimensions(), "resolution {}", res);
        assert_extent_close(ll.extent(), ul.extent());
    }

    let grid = LocalGridBuilder::new(INNSBRUCK, (2000.0, 2000.0))
        .resolution(210.5)
        .build()
        .unwrap();
    assert_eq!(grid.dimensions(), (10, 10));
    let grid = LocalGridBuilder::new(INNSBRUCK, (2000.0, 2000.0))
        .resolution(211.0)
        .build()
        .unwrap();
    assert_eq!(grid.dimensions(), (9, 9));
}

#[test]
fn test_grid_center_is_center_ll() {
    let grid = LocalGridBuilder::new(INNSBRUCK, (2000.0, 2000.0))
        .nx(2)
        .build()
        .unwrap();
    // The shared corner of the four pixels is the requested center
    let (lon, lat) = grid.corner_grid().ij_to_ll(1.0, 1.0);
    assert_approx_eq!(lon, INNSBRUCK.0, 1e-9);
    assert_approx_eq!(lat, INNSBRUCK.1, 1e-9);

    let bounds = grid.ll_bounds();
    assert!(bounds.contains_point(INNSBRUCK.0, INNSBRUCK.1));
    assert!(grid.contains(INNSBRUCK.0, INNSBRUCK.1));
}
