use core::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WGS84Point {
    pub lon: f64,
    pub lat: f64,
}

impl WGS84Point {
    /// Arithmetic mean of the points, `None` when there are none.
    pub fn mean(points: &[WGS84Point]) -> Option<WGS84Point> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let (lon, lat) = points
            .iter()
            .fold((0f64, 0f64), |(lon, lat), p| (lon + p.lon, lat + p.lat));
        Some(WGS84Point {
            lon: lon / n,
            lat: lat / n,
        })
    }

    /// Reads a GeoJSON position (`[lon, lat, ...]`).
    pub fn from_position(position: &[f64]) -> Option<WGS84Point> {
        match position {
            [lon, lat, ..] => Some(WGS84Point {
                lon: *lon,
                lat: *lat,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for WGS84Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wgs(lat: {:.5}, lon: {:.5})", self.lat, self.lon)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WGS84BoundingBox {
    pub min: WGS84Point,
    pub max: WGS84Point,
}

impl WGS84BoundingBox {
    /// Overpass QL bbox order: south, west, north, east.
    pub fn overpass_filter(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min.lat, self.min.lon, self.max.lat, self.max.lon
        )
    }
}

impl fmt::Display for WGS84BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wgsbbox(min: {}, max: {})", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wgs(lon: f64, lat: f64) -> WGS84Point {
        WGS84Point { lon, lat }
    }

    #[test]
    fn test_mean() {
        let m = WGS84Point::mean(&[wgs(150.0, -25.0), wgs(152.0, -27.0)]).unwrap();
        assert_eq!(m, wgs(151.0, -26.0));
        assert_eq!(WGS84Point::mean(&[]), None);
    }

    #[test]
    fn test_from_position() {
        assert_eq!(
            WGS84Point::from_position(&[150.5, -24.2, 120.0]),
            Some(wgs(150.5, -24.2))
        );
        assert_eq!(WGS84Point::from_position(&[150.5]), None);
    }

    #[test]
    fn test_bbox() {
        let b = WGS84BoundingBox {
            min: wgs(149.0, -27.4),
            max: wgs(151.25, -23.7),
        };
        assert_eq!(b.overpass_filter(), "-27.4,149,-23.7,151.25");
        assert_eq!(
            b.to_string(),
            "wgsbbox(min: wgs(lat: -27.40000, lon: 149.00000), max: wgs(lat: -23.70000, lon: 151.25000))"
        );
    }
}
