//! Converted placemarks and their GeoJSON representation.

use geojson::{Geometry, JsonObject, Value};
use serde_json::Value as JsonValue;

use crate::style::Style;

/// A GeoJSON position, `[lon, lat]` or `[lon, lat, alt]`.
pub type Position = Vec<f64>;

/// Geometry of a converted placemark.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// A path, from a KML `LineString`.
    Line(Vec<Position>),
    /// The outer ring of a KML `Polygon`. Holes are not carried.
    Polygon(Vec<Position>),
}

impl Shape {
    /// Every position of the shape, the ring for polygons.
    pub fn positions(&self) -> &[Position] {
        match self {
            Shape::Line(points) => points,
            Shape::Polygon(ring) => ring,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Line(_) => "LineString",
            Shape::Polygon(_) => "Polygon",
        }
    }
}

impl From<Shape> for Value {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Line(points) => Value::LineString(points),
            Shape::Polygon(ring) => Value::Polygon(vec![ring]),
        }
    }
}

/// A named, styled placemark ready to be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub name: String,
    /// `None` when the placemark referenced no style, or an unknown one.
    pub style: Option<Style>,
    pub shape: Shape,
}

impl Feature {
    /// Reads back a feature written by [`From<Feature> for geojson::Feature`].
    ///
    /// Geometries other than a line string or a polygon yield `None`.
    pub fn from_geojson(feature: &geojson::Feature) -> Option<Feature> {
        let shape = match &feature.geometry.as_ref()?.value {
            Value::LineString(points) => Shape::Line(points.clone()),
            Value::Polygon(rings) => Shape::Polygon(rings.first().cloned().unwrap_or_default()),
            _ => return None,
        };
        let properties = feature.properties.as_ref();
        let name = properties
            .and_then(|p| p.get("name"))
            .and_then(|v| v.as_str())
            .unwrap_or("Unnamed")
            .to_string();
        let style = properties
            .and_then(|p| p.get("style"))
            .and_then(|v| serde_json::from_value::<Style>(v.clone()).ok());
        Some(Feature { name, style, shape })
    }
}

impl From<Feature> for geojson::Feature {
    fn from(feature: Feature) -> Self {
        let mut properties = JsonObject::new();
        properties.insert("name".to_string(), JsonValue::String(feature.name));
        let style = match feature.style {
            Some(style) => serde_json::to_value(style).unwrap_or_default(),
            None => JsonValue::Object(JsonObject::new()),
        };
        properties.insert("style".to_string(), style);

        geojson::Feature {
            bbox: None,
            geometry: Some(Geometry::new(feature.shape.into())),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> Feature {
        Feature {
            name: "Zone A".to_string(),
            style: Some(Style {
                line_color: "ff0000ff".to_string(),
                poly_color: "4d0000ff".to_string(),
            }),
            shape: Shape::Polygon(vec![
                vec![150.0, -25.0],
                vec![150.1, -25.0],
                vec![150.1, -25.1],
                vec![150.0, -25.0],
            ]),
        }
    }

    #[test]
    fn test_polygon_is_wrapped_in_one_ring() {
        let feature: geojson::Feature = zone().into();
        match feature.geometry.unwrap().value {
            Value::Polygon(rings) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0].len(), 4);
            }
            other => panic!("unexpected geometry {:?}", other),
        }
    }

    #[test]
    fn test_missing_style_is_an_empty_object() {
        let mut path = zone();
        path.style = None;
        path.shape = Shape::Line(vec![vec![150.0, -25.0], vec![150.2, -25.2]]);
        let feature: geojson::Feature = path.clone().into();
        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties["style"], serde_json::json!({}));
        assert_eq!(properties["name"], "Zone A");
        assert_eq!(Feature::from_geojson(&feature), Some(path));
    }

    #[test]
    fn test_read_back() {
        let feature: geojson::Feature = zone().into();
        assert_eq!(Feature::from_geojson(&feature), Some(zone()));
    }

    #[test]
    fn test_point_is_ignored() {
        let feature = geojson::Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![150.0, -25.0]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        assert_eq!(Feature::from_geojson(&feature), None);
    }
}
