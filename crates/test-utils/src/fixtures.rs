//! Common test fixtures for geotool tests.
//!
//! This module provides small shapefiles with known geometry and a few
//! reference locations used across the test suite.

use std::path::{Path, PathBuf};

use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, Polygon, PolygonRing, Writer};

/// Reference locations as (lon, lat) in degrees.
pub mod locations {
    /// Innsbruck, Austria
    pub const INNSBRUCK: (f64, f64) = (11.38, 47.26);
}

/// Bounding boxes of the two features written by [`write_dummy_shapefile`].
pub mod dummy {
    pub const MIN_X: [f64; 2] = [1.0, 2.0];
    pub const MAX_X: [f64; 2] = [2.0, 3.0];
    pub const MIN_Y: [f64; 2] = [1.0, 1.3];
    pub const MAX_Y: [f64; 2] = [2.0, 2.3];
    pub const NAMES: [&str; 2] = ["Polygon", "Line"];
}

fn ring(coords: &[(f64, f64)]) -> Vec<Point> {
    let mut points: Vec<Point> = coords.iter().map(|&(x, y)| Point::new(x, y)).collect();
    if let Some(&first) = points.first() {
        points.push(first);
    }
    points
}

fn name_field() -> FieldName {
    FieldName::try_from("name").expect("valid dbase field name")
}

fn named_record(name: &str) -> Record {
    let mut record = Record::default();
    record.insert(
        "name".to_string(),
        FieldValue::Character(Some(name.to_string())),
    );
    record
}

fn write_polygons(path: &Path, features: &[(&str, Polygon)]) -> PathBuf {
    let table = TableWriterBuilder::new().add_character_field(name_field(), 50);
    let mut writer = Writer::from_path(path, table).expect("Failed to create shapefile");
    for (name, polygon) in features {
        writer
            .write_shape_and_record(polygon, &named_record(name))
            .expect("Failed to write shape");
    }
    // Headers are finalized on drop
    drop(writer);
    path.to_path_buf()
}

/// Writes two polygon features to `path`.
///
/// The first is a diamond with a square hole, the second a plain diamond.
/// Their bounding boxes are listed in [`dummy`].
pub fn write_dummy_shapefile(path: &Path) -> PathBuf {
    let p1 = Polygon::with_rings(vec![
        PolygonRing::Outer(ring(&[(1.5, 1.0), (1.0, 1.5), (1.5, 2.0), (2.0, 1.5)])),
        PolygonRing::Inner(ring(&[(1.4, 1.4), (1.6, 1.4), (1.6, 1.6), (1.4, 1.6)])),
    ]);
    let p2 = Polygon::with_rings(vec![PolygonRing::Outer(ring(&[
        (2.5, 1.3),
        (2.0, 1.8),
        (2.5, 2.3),
        (3.0, 1.8),
    ]))]);

    write_polygons(path, &[(dummy::NAMES[0], p1), (dummy::NAMES[1], p2)])
}

/// Writes a single unit-square polygon with its lower-left corner at `origin`.
pub fn write_square_shapefile(path: &Path, origin: (f64, f64)) -> PathBuf {
    let (x, y) = origin;
    let square = Polygon::with_rings(vec![PolygonRing::Outer(ring(&[
        (x, y),
        (x, y + 1.0),
        (x + 1.0, y + 1.0),
        (x + 1.0, y),
    ]))]);

    write_polygons(path, &[("Square", square)])
}
