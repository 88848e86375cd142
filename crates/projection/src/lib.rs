//! Map projections and projected pixel grids.
//!
//! Implements the transverse Mercator projection from scratch and builds
//! local grids centered on a geographic point.

pub mod grid;
pub mod local_grid;
pub mod transverse_mercator;

pub use grid::{Grid, PixelOrder, PixelRef};
pub use local_grid::{local_mercator_grid, GridSize, LocalGridBuilder, DEFAULT_NY};
pub use transverse_mercator::TransverseMercator;
