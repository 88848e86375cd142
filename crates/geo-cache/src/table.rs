//! In-memory tabular geometry produced by source readers.

use std::collections::BTreeMap;

use geo_common::BoundingBox;
use serde::{Deserialize, Serialize};

/// A planar coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A polygon ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    /// Outer boundary (true) or hole (false)
    pub exterior: bool,
    pub points: Vec<Coord>,
}

/// Feature geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates", rename_all = "snake_case")]
pub enum Geometry {
    Null,
    Point(Coord),
    MultiPoint(Vec<Coord>),
    Polyline(Vec<Vec<Coord>>),
    Polygon(Vec<Ring>),
}

impl Geometry {
    /// Every vertex, in storage order.
    pub fn coords(&self) -> Box<dyn Iterator<Item = &Coord> + '_> {
        match self {
            Geometry::Null => Box::new(std::iter::empty()),
            Geometry::Point(p) => Box::new(std::iter::once(p)),
            Geometry::MultiPoint(points) => Box::new(points.iter()),
            Geometry::Polyline(parts) => Box::new(parts.iter().flatten()),
            Geometry::Polygon(rings) => Box::new(rings.iter().flat_map(|r| r.points.iter())),
        }
    }

    /// Bounding box of all vertices, `None` for empty geometries.
    pub fn bbox(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.coords().map(|c| (c.x, c.y)))
    }

    /// Number of vertices.
    pub fn num_points(&self) -> usize {
        match self {
            Geometry::Null => 0,
            Geometry::Point(_) => 1,
            Geometry::MultiPoint(points) => points.len(),
            Geometry::Polyline(parts) => parts.iter().map(Vec::len).sum(),
            Geometry::Polygon(rings) => rings.iter().map(|r| r.points.len()).sum(),
        }
    }
}

/// A single attribute value.
///
/// `Number` is always finite; readers store NaN and infinities as `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One feature: geometry, attributes and the geometry's bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub geometry: Geometry,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub bbox: Option<BoundingBox>,
}

impl ShapeRecord {
    pub fn new(geometry: Geometry, attributes: BTreeMap<String, AttributeValue>) -> Self {
        let bbox = geometry.bbox();
        Self {
            geometry,
            attributes,
            bbox,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

/// Features read from a source file, in file order.
///
/// The `min_x`/`max_x`/`min_y`/`max_y` columns hold one value per record;
/// records without geometry contribute NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeTable {
    records: Vec<ShapeRecord>,
}

impl ShapeTable {
    pub fn new(records: Vec<ShapeRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ShapeRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_x(&self) -> Vec<f64> {
        self.bbox_column(|b| b.min_x)
    }

    pub fn max_x(&self) -> Vec<f64> {
        self.bbox_column(|b| b.max_x)
    }

    pub fn min_y(&self) -> Vec<f64> {
        self.bbox_column(|b| b.min_y)
    }

    pub fn max_y(&self) -> Vec<f64> {
        self.bbox_column(|b| b.max_y)
    }

    /// Bounding box of every record, `None` if no record has geometry.
    pub fn total_bounds(&self) -> Option<BoundingBox> {
        self.records
            .iter()
            .filter_map(|r| r.bbox)
            .reduce(|a, b| a.union(&b))
    }

    /// Values of one attribute column, `None` where a record lacks the field.
    pub fn column(&self, name: &str) -> Vec<Option<&AttributeValue>> {
        self.records.iter().map(|r| r.attribute(name)).collect()
    }

    fn bbox_column(&self, f: impl Fn(&BoundingBox) -> f64) -> Vec<f64> {
        self.records
            .iter()
            .map(|r| r.bbox.as_ref().map(&f).unwrap_or(f64::NAN))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64) -> Geometry {
        Geometry::Polygon(vec![Ring {
            exterior: true,
            points: vec![
                Coord::new(x, y),
                Coord::new(x, y + 1.0),
                Coord::new(x + 1.0, y + 1.0),
                Coord::new(x + 1.0, y),
                Coord::new(x, y),
            ],
        }])
    }

    #[test]
    fn test_bbox_columns() {
        let table = ShapeTable::new(vec![
            ShapeRecord::new(square(0.0, 0.0), BTreeMap::new()),
            ShapeRecord::new(Geometry::Null, BTreeMap::new()),
            ShapeRecord::new(square(2.0, -1.0), BTreeMap::new()),
        ]);

        assert_eq!(table.len(), 3);
        let min_x = table.min_x();
        assert_eq!(min_x[0], 0.0);
        assert!(min_x[1].is_nan());
        assert_eq!(min_x[2], 2.0);
        assert_eq!(table.max_y()[2], 0.0);
        assert_eq!(
            table.total_bounds(),
            Some(BoundingBox::new(0.0, -1.0, 3.0, 1.0))
        );
    }

    #[test]
    fn test_json_preserves_values() {
        let mut attributes = BTreeMap::new();
        attributes.insert("name".to_string(), AttributeValue::Text("Polygon".into()));
        attributes.insert("area".to_string(), AttributeValue::Number(0.1 + 0.2));
        attributes.insert("count".to_string(), AttributeValue::Integer(3));
        attributes.insert("flag".to_string(), AttributeValue::Null);
        let table = ShapeTable::new(vec![
            ShapeRecord::new(square(1.0 / 3.0, 2.0 / 7.0), attributes),
            ShapeRecord::new(Geometry::Point(Coord::new(0.5, 0.5)), BTreeMap::new()),
        ]);

        let json = serde_json::to_string(&table).unwrap();
        let decoded: ShapeTable = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, table);
    }

    #[test]
    fn test_column() {
        let mut attributes = BTreeMap::new();
        attributes.insert("name".to_string(), AttributeValue::Text("a".into()));
        let table = ShapeTable::new(vec![
            ShapeRecord::new(Geometry::Null, attributes),
            ShapeRecord::new(Geometry::Null, BTreeMap::new()),
        ]);
        let names = table.column("name");
        assert_eq!(names[0].and_then(|v| v.as_str()), Some("a"));
        assert!(names[1].is_none());
    }
}
