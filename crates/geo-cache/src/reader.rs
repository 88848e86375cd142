//! Shapefile reading into a [`ShapeTable`].

use std::collections::BTreeMap;
use std::path::Path;

use geo_common::{GeoError, GeoResult};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{PolygonRing, Shape};
use tracing::debug;

use crate::table::{AttributeValue, Coord, Geometry, Ring, ShapeRecord, ShapeTable};

macro_rules! coords {
    ($points:expr) => {
        $points
            .iter()
            .map(|p| Coord::new(p.x, p.y))
            .collect::<Vec<_>>()
    };
}

macro_rules! rings {
    ($polygon:expr) => {
        $polygon
            .rings()
            .iter()
            .map(|ring| Ring {
                exterior: matches!(ring, PolygonRing::Outer(_)),
                points: coords!(ring.points()),
            })
            .collect::<Vec<_>>()
    };
}

/// Reads all shapes and attribute records from a `.shp` file.
///
/// Failures of the underlying reader are reported as `ReadFailure`.
pub fn read_shapefile(path: &Path) -> GeoResult<ShapeTable> {
    let mut reader = shapefile::Reader::from_path(path).map_err(|e| {
        GeoError::read_failure(format!("failed to open shapefile {}: {}", path.display(), e))
    })?;

    let mut records = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.map_err(|e| {
            GeoError::read_failure(format!(
                "error reading shape+record from {}: {}",
                path.display(),
                e
            ))
        })?;
        records.push(ShapeRecord::new(convert_shape(shape)?, convert_record(record)));
    }

    debug!(path = %path.display(), records = records.len(), "Read shapefile");
    Ok(ShapeTable::new(records))
}

fn convert_shape(shape: Shape) -> GeoResult<Geometry> {
    let geometry = match shape {
        Shape::NullShape => Geometry::Null,
        Shape::Point(p) => Geometry::Point(Coord::new(p.x, p.y)),
        Shape::PointM(p) => Geometry::Point(Coord::new(p.x, p.y)),
        Shape::PointZ(p) => Geometry::Point(Coord::new(p.x, p.y)),
        Shape::Multipoint(mp) => Geometry::MultiPoint(coords!(mp.points())),
        Shape::MultipointM(mp) => Geometry::MultiPoint(coords!(mp.points())),
        Shape::MultipointZ(mp) => Geometry::MultiPoint(coords!(mp.points())),
        Shape::Polyline(pl) => Geometry::Polyline(pl.parts().iter().map(|p| coords!(p)).collect()),
        Shape::PolylineM(pl) => {
            Geometry::Polyline(pl.parts().iter().map(|p| coords!(p)).collect())
        }
        Shape::PolylineZ(pl) => {
            Geometry::Polyline(pl.parts().iter().map(|p| coords!(p)).collect())
        }
        Shape::Polygon(pg) => Geometry::Polygon(rings!(pg)),
        Shape::PolygonM(pg) => Geometry::Polygon(rings!(pg)),
        Shape::PolygonZ(pg) => Geometry::Polygon(rings!(pg)),
        _ => return Err(GeoError::read_failure("multipatch shapes are not supported")),
    };

    if let Some(c) = geometry.coords().find(|c| !c.is_finite()) {
        return Err(GeoError::read_failure(format!(
            "non-finite coordinate ({}, {})",
            c.x, c.y
        )));
    }
    Ok(geometry)
}

fn convert_record(record: Record) -> BTreeMap<String, AttributeValue> {
    record
        .into_iter()
        .map(|(name, value)| (name, convert_value(value)))
        .collect()
}

fn convert_value(value: FieldValue) -> AttributeValue {
    match value {
        FieldValue::Character(Some(s)) => AttributeValue::Text(s),
        FieldValue::Numeric(Some(n)) => number(n),
        FieldValue::Float(Some(f)) => number(f as f64),
        FieldValue::Logical(Some(b)) => AttributeValue::Bool(b),
        FieldValue::Integer(i) => AttributeValue::Integer(i as i64),
        FieldValue::Double(d) => number(d),
        FieldValue::Currency(c) => number(c),
        FieldValue::Character(None)
        | FieldValue::Numeric(None)
        | FieldValue::Float(None)
        | FieldValue::Logical(None) => AttributeValue::Null,
        other => AttributeValue::Text(format!("{:?}", other)),
    }
}

// JSON artifacts cannot hold NaN or infinities.
fn number(value: f64) -> AttributeValue {
    if value.is_finite() {
        AttributeValue::Number(value)
    } else {
        AttributeValue::Null
    }
}
