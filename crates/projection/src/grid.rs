//! Regular pixel grids in a transverse Mercator plane.

use std::fmt;
use std::str::FromStr;

use geo_common::{BoundingBox, GeoError, GeoResult};
use ndarray::Array2;

use crate::TransverseMercator;

/// Row origin of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelOrder {
    /// Row 0 is the southern edge, rows go south to north.
    #[default]
    LowerLeft,
    /// Row 0 is the northern edge, rows go north to south.
    UpperLeft,
}

impl PixelOrder {
    /// Short name, `ll` or `ul`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowerLeft => "ll",
            Self::UpperLeft => "ul",
        }
    }
}

impl FromStr for PixelOrder {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ll" | "lower-left" => Ok(Self::LowerLeft),
            "ul" | "upper-left" => Ok(Self::UpperLeft),
            other => Err(GeoError::invalid_input(format!(
                "pixel order must be 'll' or 'ul', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for PixelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which point of a pixel its coordinates refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelRef {
    /// The pixel's outer corner nearest to the grid origin.
    #[default]
    Corner,
    /// The pixel center.
    Center,
}

impl PixelRef {
    fn offset(&self) -> f64 {
        match self {
            Self::Corner => 0.0,
            Self::Center => 0.5,
        }
    }
}

/// A rectangular array of `nx × ny` pixels in a transverse Mercator plane.
///
/// `(x0, y0)` is the outer corner of pixel `(0, 0)`. `dy` is positive for
/// [`PixelOrder::LowerLeft`] grids and negative for [`PixelOrder::UpperLeft`]
/// ones. Coordinate arrays are indexed `[row, column]`, i.e. shaped
/// `(ny, nx)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    proj: TransverseMercator,
    nx: usize,
    ny: usize,
    dx: f64,
    dy: f64,
    x0: f64,
    y0: f64,
    pixel_ref: PixelRef,
}

impl Grid {
    /// Create a grid from its outer corner and pixel size.
    pub fn new(
        proj: TransverseMercator,
        nx: usize,
        ny: usize,
        dx: f64,
        dy: f64,
        corner: (f64, f64),
        pixel_ref: PixelRef,
    ) -> GeoResult<Self> {
        if nx == 0 || ny == 0 {
            return Err(GeoError::invalid_input(format!(
                "grid needs at least one pixel, got {}x{}",
                nx, ny
            )));
        }
        if !(dx.is_finite() && dx > 0.0) {
            return Err(GeoError::invalid_input(format!("dx must be positive, got {}", dx)));
        }
        if !dy.is_finite() || dy == 0.0 {
            return Err(GeoError::invalid_input(format!("dy must be non-zero, got {}", dy)));
        }
        if !(corner.0.is_finite() && corner.1.is_finite()) {
            return Err(GeoError::Projection(format!(
                "grid corner is not finite: {:?}",
                corner
            )));
        }

        Ok(Self {
            proj,
            nx,
            ny,
            dx,
            dy,
            x0: corner.0,
            y0: corner.1,
            pixel_ref,
        })
    }

    /// Number of columns.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of rows.
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Grid dimensions as (nx, ny).
    pub fn dimensions(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Pixel width in projection units.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Signed pixel height in projection units.
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Outer corner of pixel (0, 0).
    pub fn corner(&self) -> (f64, f64) {
        (self.x0, self.y0)
    }

    pub fn order(&self) -> PixelOrder {
        if self.dy > 0.0 {
            PixelOrder::LowerLeft
        } else {
            PixelOrder::UpperLeft
        }
    }

    pub fn pixel_ref(&self) -> PixelRef {
        self.pixel_ref
    }

    pub fn projection(&self) -> &TransverseMercator {
        &self.proj
    }

    /// Physical footprint of the grid in projection units.
    ///
    /// Independent of the pixel order and the pixel reference.
    pub fn extent(&self) -> BoundingBox {
        let x1 = self.x0 + self.nx as f64 * self.dx;
        let y1 = self.y0 + self.ny as f64 * self.dy;
        BoundingBox::new(self.x0, self.y0.min(y1), x1, self.y0.max(y1))
    }

    /// The same grid with coordinates referring to pixel centers.
    pub fn center_grid(&self) -> Grid {
        self.with_pixel_ref(PixelRef::Center)
    }

    /// The same grid with coordinates referring to pixel corners.
    pub fn corner_grid(&self) -> Grid {
        self.with_pixel_ref(PixelRef::Corner)
    }

    fn with_pixel_ref(&self, pixel_ref: PixelRef) -> Grid {
        Grid {
            pixel_ref,
            ..self.clone()
        }
    }

    /// Projected coordinates of pixel index (i, j), which may be fractional.
    pub fn ij_to_crs(&self, i: f64, j: f64) -> (f64, f64) {
        let off = self.pixel_ref.offset();
        (
            self.x0 + (i + off) * self.dx,
            self.y0 + (j + off) * self.dy,
        )
    }

    /// Geographic coordinates (lon, lat) of pixel index (i, j).
    pub fn ij_to_ll(&self, i: f64, j: f64) -> (f64, f64) {
        let (x, y) = self.ij_to_crs(i, j);
        self.proj.inverse(x, y)
    }

    /// Fractional pixel index (i, j) of a geographic point.
    pub fn transform(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = self.proj.forward(lon, lat);
        let off = self.pixel_ref.offset();
        (
            (x - self.x0) / self.dx - off,
            (y - self.y0) / self.dy - off,
        )
    }

    /// Check if a geographic point falls inside the grid footprint.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let (x, y) = self.proj.forward(lon, lat);
        self.extent().contains_point(x, y)
    }

    /// Projected (x, y) arrays at the pixel reference points, shaped (ny, nx).
    pub fn xy_coordinates(&self) -> (Array2<f64>, Array2<f64>) {
        let x = Array2::from_shape_fn((self.ny, self.nx), |(j, i)| {
            self.ij_to_crs(i as f64, j as f64).0
        });
        let y = Array2::from_shape_fn((self.ny, self.nx), |(j, i)| {
            self.ij_to_crs(i as f64, j as f64).1
        });
        (x, y)
    }

    /// Geographic (lon, lat) arrays at the pixel reference points, shaped (ny, nx).
    pub fn ll_coordinates(&self) -> (Array2<f64>, Array2<f64>) {
        self.to_ll(self.xy_coordinates())
    }

    /// Projected (x, y) arrays of all pixel corners, shaped (ny + 1, nx + 1).
    pub fn pixcorner_xy_coordinates(&self) -> (Array2<f64>, Array2<f64>) {
        let shape = (self.ny + 1, self.nx + 1);
        let x = Array2::from_shape_fn(shape, |(_, i)| self.x0 + i as f64 * self.dx);
        let y = Array2::from_shape_fn(shape, |(j, _)| self.y0 + j as f64 * self.dy);
        (x, y)
    }

    /// Geographic (lon, lat) arrays of all pixel corners, shaped (ny + 1, nx + 1).
    pub fn pixcorner_ll_coordinates(&self) -> (Array2<f64>, Array2<f64>) {
        self.to_ll(self.pixcorner_xy_coordinates())
    }

    /// Geographic bounding box enclosing every pixel corner.
    pub fn ll_bounds(&self) -> BoundingBox {
        let (lon, lat) = self.pixcorner_ll_coordinates();
        BoundingBox::from_points(lon.iter().copied().zip(lat.iter().copied()))
            .unwrap_or_else(BoundingBox::empty)
    }

    fn to_ll(&self, (x, y): (Array2<f64>, Array2<f64>)) -> (Array2<f64>, Array2<f64>) {
        let mut lon = Array2::zeros(x.raw_dim());
        let mut lat = Array2::zeros(x.raw_dim());
        for ((idx, &xv), &yv) in x.indexed_iter().zip(y.iter()) {
            let (lo, la) = self.proj.inverse(xv, yv);
            lon[idx] = lo;
            lat[idx] = la;
        }
        (lon, lat)
    }
}
