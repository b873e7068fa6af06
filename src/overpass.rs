//! Named places from the Overpass API, used to make the map searchable.

use std::collections::HashMap;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::config::OverpassSettings;
use crate::error::Result;
use crate::point::{WGS84BoundingBox, WGS84Point};

/// A named place returned by the lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct Place {
    pub name: String,
    pub point: WGS84Point,
}

/// Something that can list the named places inside a bounding box.
pub trait PlaceSource {
    fn places(&self, bbox: &WGS84BoundingBox) -> Result<Vec<Place>>;
}

/// Builds the Overpass QL query for nodes tagged with one of the place `kinds`.
pub fn query(bbox: &WGS84BoundingBox, kinds: &[String]) -> String {
    format!(
        "[out:json];\nnode[\"place\"~\"{}\"]({});\nout body;\n>;\nout skel qt;\n",
        kinds.join("|"),
        bbox.overpass_filter()
    )
}

#[derive(Debug, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Keeps the nodes of a response; unnamed ones are called `unknown`.
pub fn parse_places(response: Response) -> Vec<Place> {
    response
        .elements
        .into_iter()
        .filter(|e| e.kind == "node")
        .filter_map(|e| {
            let (lat, lon) = (e.lat?, e.lon?);
            let name = e
                .tags
                .get("name")
                .cloned()
                .unwrap_or_else(|| "unknown".to_string());
            Some(Place {
                name,
                point: WGS84Point { lon, lat },
            })
        })
        .collect()
}

/// Point features with `name`, `lat` and `lon` properties.
pub fn places_to_collection(places: &[Place]) -> FeatureCollection {
    let features = places
        .iter()
        .map(|place| {
            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), JsonValue::from(place.name.clone()));
            properties.insert("lat".to_string(), JsonValue::from(place.point.lat));
            properties.insert("lon".to_string(), JsonValue::from(place.point.lon));
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![
                    place.point.lon,
                    place.point.lat,
                ]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Blocking Overpass API client.
pub struct Overpass {
    client: reqwest::blocking::Client,
    endpoint: String,
    kinds: Vec<String>,
}

impl Overpass {
    pub fn new(settings: &OverpassSettings) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            kinds: settings.place_kinds.clone(),
        })
    }
}

impl PlaceSource for Overpass {
    fn places(&self, bbox: &WGS84BoundingBox) -> Result<Vec<Place>> {
        let q = query(bbox, &self.kinds);
        log::info!("places in {}", bbox);
        log::trace!("overpass query: {}", q);
        let response: Response = self
            .client
            .get(&self.endpoint)
            .query(&[("data", q.as_str())])
            .send()?
            .error_for_status()?
            .json()?;
        let places = parse_places(response);
        log::info!("places: {}", places.len());
        Ok(places)
    }
}
