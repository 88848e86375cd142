//! Local transverse Mercator grids centered on a geographic point.
//!
//! The projection's central meridian passes through the center point, so the
//! grid is nearly conformal and distortion-free over a few hundred
//! kilometres. The footprint is always `extent` wide and high, centered on
//! the projected center; only the pixel count and the row order vary.

use geo_common::{GeoError, GeoResult};
use tracing::debug;

use crate::grid::{Grid, PixelOrder, PixelRef};
use crate::TransverseMercator;

/// Row count used when neither a count nor a resolution is requested.
pub const DEFAULT_NY: usize = 600;

/// How the pixel counts of a local grid are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GridSize {
    /// `ny = 600`, `nx` follows the aspect ratio.
    #[default]
    Auto,
    /// Fixed column count, rows follow the aspect ratio.
    Nx(usize),
    /// Fixed row count, columns follow the aspect ratio.
    Ny(usize),
    /// Both counts fixed.
    NxNy(usize, usize),
    /// Target pixel size in projection units along both axes.
    Resolution(f64),
}

/// Builder for [`Grid`]s centered on a geographic point.
///
/// ```ignore
/// let grid = LocalGridBuilder::new((11.38, 47.26), (2000.0, 2000.0))
///     .nx(100)
///     .order(PixelOrder::UpperLeft)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct LocalGridBuilder {
    center_ll: (f64, f64),
    extent: (f64, f64),
    size: GridSize,
    order: PixelOrder,
    pixel_ref: PixelRef,
}

impl LocalGridBuilder {
    /// Start a grid centered on `center_ll` (lon, lat in degrees) covering
    /// `extent` (full width, full height in meters).
    pub fn new(center_ll: (f64, f64), extent: (f64, f64)) -> Self {
        Self {
            center_ll,
            extent,
            size: GridSize::Auto,
            order: PixelOrder::LowerLeft,
            pixel_ref: PixelRef::Corner,
        }
    }

    /// Fix the number of columns. Combined with an earlier `ny`, both are kept.
    pub fn nx(mut self, nx: usize) -> Self {
        self.size = match self.size {
            GridSize::Ny(ny) | GridSize::NxNy(_, ny) => GridSize::NxNy(nx, ny),
            _ => GridSize::Nx(nx),
        };
        self
    }

    /// Fix the number of rows. Combined with an earlier `nx`, both are kept.
    pub fn ny(mut self, ny: usize) -> Self {
        self.size = match self.size {
            GridSize::Nx(nx) | GridSize::NxNy(nx, _) => GridSize::NxNy(nx, ny),
            _ => GridSize::Ny(ny),
        };
        self
    }

    /// Derive both counts from a target pixel size.
    pub fn resolution(mut self, resolution: f64) -> Self {
        self.size = GridSize::Resolution(resolution);
        self
    }

    pub fn size(mut self, size: GridSize) -> Self {
        self.size = size;
        self
    }

    pub fn order(mut self, order: PixelOrder) -> Self {
        self.order = order;
        self
    }

    pub fn pixel_ref(mut self, pixel_ref: PixelRef) -> Self {
        self.pixel_ref = pixel_ref;
        self
    }

    /// Pixel counts (nx, ny) for the requested sizing.
    ///
    /// Only the extent and the sizing request are read, so the result does
    /// not depend on the pixel order.
    pub fn resolve_size(&self) -> GeoResult<(usize, usize)> {
        let (width, height) = self.validated_extent()?;

        match self.size {
            GridSize::Auto => {
                let nx = round_count(DEFAULT_NY as f64 * width / height)?;
                Ok((nx, DEFAULT_NY))
            }
            GridSize::Nx(nx) => {
                require_count("nx", nx)?;
                Ok((nx, round_count(nx as f64 * height / width)?))
            }
            GridSize::Ny(ny) => {
                require_count("ny", ny)?;
                Ok((round_count(ny as f64 * width / height)?, ny))
            }
            GridSize::NxNy(nx, ny) => {
                require_count("nx", nx)?;
                require_count("ny", ny)?;
                Ok((nx, ny))
            }
            GridSize::Resolution(res) => {
                if !(res.is_finite() && res > 0.0) {
                    return Err(GeoError::invalid_input(format!(
                        "resolution must be positive, got {}",
                        res
                    )));
                }
                Ok((round_count(width / res)?, round_count(height / res)?))
            }
        }
    }

    /// Build the grid.
    pub fn build(&self) -> GeoResult<Grid> {
        let (lon, lat) = self.center_ll;
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::invalid_input(format!(
                "center must have lon in [-180, 180] and lat in [-90, 90], got ({}, {})",
                lon, lat
            )));
        }

        let (width, height) = self.validated_extent()?;
        let (nx, ny) = self.resolve_size()?;

        let proj = TransverseMercator::local(lon);
        let (e, n) = proj.forward(lon, lat);

        let dx = width / nx as f64;
        let (corner, dy) = match self.order {
            PixelOrder::LowerLeft => ((e - width / 2.0, n - height / 2.0), height / ny as f64),
            PixelOrder::UpperLeft => ((e - width / 2.0, n + height / 2.0), -height / ny as f64),
        };

        debug!(
            lon,
            lat,
            width,
            height,
            nx,
            ny,
            order = %self.order,
            "Building local mercator grid"
        );

        Grid::new(proj, nx, ny, dx, dy, corner, self.pixel_ref)
    }

    fn validated_extent(&self) -> GeoResult<(f64, f64)> {
        let (width, height) = self.extent;
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(GeoError::invalid_input(format!(
                "extent must be positive, got ({}, {})",
                width, height
            )));
        }
        Ok((width, height))
    }
}

/// Local transverse Mercator grid centered on `center_ll`.
///
/// With only `nx` (or only `ny`) given, the other count keeps the aspect
/// ratio of `extent`; with neither, `ny` defaults to 600.
pub fn local_mercator_grid(
    center_ll: (f64, f64),
    extent: (f64, f64),
    nx: Option<usize>,
    ny: Option<usize>,
    order: PixelOrder,
) -> GeoResult<Grid> {
    let size = match (nx, ny) {
        (Some(nx), Some(ny)) => GridSize::NxNy(nx, ny),
        (Some(nx), None) => GridSize::Nx(nx),
        (None, Some(ny)) => GridSize::Ny(ny),
        (None, None) => GridSize::Auto,
    };
    LocalGridBuilder::new(center_ll, extent)
        .size(size)
        .order(order)
        .build()
}

/// Round a fractional pixel count half away from zero, at least one pixel.
fn round_count(value: f64) -> GeoResult<usize> {
    if !value.is_finite() {
        return Err(GeoError::invalid_input(format!(
            "pixel count is not finite: {}",
            value
        )));
    }
    Ok((value.round() as usize).max(1))
}

fn require_count(name: &str, value: usize) -> GeoResult<()> {
    if value == 0 {
        return Err(GeoError::invalid_input(format!("{} must be > 0", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: (f64, f64) = (11.38, 47.26);

    #[test]
    fn test_default_size() {
        let size = LocalGridBuilder::new(CENTER, (3000.0, 1000.0))
            .resolve_size()
            .unwrap();
        assert_eq!(size, (1800, 600));
    }

    #[test]
    fn test_nx_keeps_aspect_ratio() {
        let size = LocalGridBuilder::new(CENTER, (2000.0, 1000.0))
            .nx(100)
            .resolve_size()
            .unwrap();
        assert_eq!(size, (100, 50));
    }

    #[test]
    fn test_ny_then_nx_keeps_both() {
        let size = LocalGridBuilder::new(CENTER, (2000.0, 1000.0))
            .ny(7)
            .nx(3)
            .resolve_size()
            .unwrap();
        assert_eq!(size, (3, 7));
    }

    #[test]
    fn test_resolution_rounds_half_away_from_zero() {
        // 1900 / 200 = 9.5 sits on the rounding boundary
        let size = LocalGridBuilder::new(CENTER, (2000.0, 1900.0))
            .resolution(200.0)
            .resolve_size()
            .unwrap();
        assert_eq!(size, (10, 10));
    }

    #[test]
    fn test_resolution_never_below_one_pixel() {
        let size = LocalGridBuilder::new(CENTER, (10.0, 10.0))
            .resolution(1000.0)
            .resolve_size()
            .unwrap();
        assert_eq!(size, (1, 1));
    }

    #[test]
    fn test_grid_centered_on_projected_center() {
        let grid = LocalGridBuilder::new(CENTER, (2000.0, 1000.0))
            .nx(20)
            .build()
            .unwrap();
        let (cx, cy) = grid.extent().center();
        let (e, n) = grid.projection().forward(CENTER.0, CENTER.1);
        assert!((cx - e).abs() < 1e-6);
        assert!((cy - n).abs() < 1e-6);
        assert!((grid.dx() - 100.0).abs() < 1e-12);
        assert!((grid.dy() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_arguments() {
        let cases = [
            LocalGridBuilder::new(CENTER, (0.0, 10.0)),
            LocalGridBuilder::new(CENTER, (10.0, -1.0)),
            LocalGridBuilder::new(CENTER, (f64::NAN, 10.0)),
            LocalGridBuilder::new((11.0, 91.0), (10.0, 10.0)),
            LocalGridBuilder::new((180.5, 47.0), (10.0, 10.0)),
            LocalGridBuilder::new((1e20, 47.26), (2000.0, 2000.0)).nx(10),
            LocalGridBuilder::new((f64::NAN, 47.26), (10.0, 10.0)),
            LocalGridBuilder::new(CENTER, (10.0, 10.0)).nx(0),
            LocalGridBuilder::new(CENTER, (10.0, 10.0)).resolution(0.0),
        ];
        for builder in cases {
            let err = builder.build().unwrap_err();
            assert!(err.is_invalid_input(), "{:?} -> {}", builder, err);
        }
    }

    #[test]
    fn test_dateline_center_accepted() {
        let grid = LocalGridBuilder::new((180.0, -16.5), (2000.0, 2000.0))
            .nx(10)
            .build()
            .unwrap();
        let (lon, lat) = grid.center_grid().ij_to_ll(4.5, 4.5);
        assert!((lon.abs() - 180.0).abs() < 1e-6, "lon = {}", lon);
        assert!((lat + 16.5).abs() < 1e-6);
    }
}
