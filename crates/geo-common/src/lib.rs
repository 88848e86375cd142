//! Common types and utilities shared across the geotool crates.

pub mod bbox;
pub mod config;
pub mod demo;
pub mod error;

pub use bbox::BoundingBox;
pub use config::CacheConfig;
pub use demo::{get_demo_file, DemoFiles};
pub use error::{GeoError, GeoResult};
