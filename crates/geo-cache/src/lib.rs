//! Freshness-checked caching of derived spatial data.
//!
//! Expensive read products (parsed shapefiles, for now) are stored below a
//! configurable cache root and reused until their source file changes.
//!
//! # Example
//!
//! ```ignore
//! use geo_cache::ShapeCache;
//! use geo_common::CacheConfig;
//!
//! let cache = ShapeCache::new(CacheConfig::from_env())?;
//! let table = cache.read_shapefile(Path::new("borders.shp"), true)?;
//! println!("{:?}", table.min_x());
//! ```

pub mod format;
pub mod reader;
pub mod shape_cache;
pub mod table;

// Re-export commonly used types at crate root
pub use format::{SourceFormat, ARTIFACT_EXTENSION};
pub use reader::read_shapefile;
pub use shape_cache::{CacheEnvelope, CacheStats, ShapeCache};
pub use table::{AttributeValue, Coord, Geometry, Ring, ShapeRecord, ShapeTable};
