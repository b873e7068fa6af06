//! Settings for the map and the place lookup.
//!
//! Every field has a default, so a settings file only needs to name what it
//! changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::point::{WGS84BoundingBox, WGS84Point};

/// Tolerance used when the user gives none, or an unusable one.
pub const DEFAULT_TOLERANCE: f64 = 0.0001;

/// A slippy-map tile source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileSource {
    /// Name shown in the layer control.
    pub name: String,
    /// URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub url: String,
    pub attribution: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverpassSettings {
    pub endpoint: String,
    pub bbox: WGS84BoundingBox,
    /// Values of the `place` tag to look up.
    pub place_kinds: Vec<String>,
}

impl Default for OverpassSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://overpass-api.de/api/interpreter".to_string(),
            bbox: WGS84BoundingBox {
                min: WGS84Point {
                    lon: 149.0,
                    lat: -27.4,
                },
                max: WGS84Point {
                    lon: 151.25,
                    lat: -23.7,
                },
            },
            place_kinds: ["city", "town", "locality"].map(String::from).to_vec(),
        }
    }
}

/// Image files embedded into the page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub logo: PathBuf,
    pub favicon: PathBuf,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            logo: PathBuf::from("Xplorate_Logo.png"),
            favicon: PathBuf::from("Xplorate_Logo_tab.ico"),
        }
    }
}

/// One row of the legend: a swatch and its meaning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    /// CSS color of the swatch.
    pub fill: String,
    /// CSS color of the swatch outline.
    pub outline: String,
}

impl LegendEntry {
    fn new(label: &str, fill: &str, outline: &str) -> Self {
        Self {
            label: label.to_string(),
            fill: fill.to_string(),
            outline: outline.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub zoom: u8,
    pub base_layer: TileSource,
    pub reference_layer: TileSource,
    pub stroke_weight: f64,
    pub fill_opacity: f64,
    pub default_tolerance: f64,
    pub overpass: OverpassSettings,
    pub branding: Branding,
    pub legend: Vec<LegendEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            zoom: 8,
            base_layer: TileSource {
                name: "Satellite".to_string(),
                url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".to_string(),
                attribution: "Tiles &copy; Esri &mdash; Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, Getmapping, Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community".to_string(),
            },
            reference_layer: TileSource {
                name: "Cities, Towns, Localities".to_string(),
                url: "https://services.arcgisonline.com/arcgis/rest/services/Reference/World_Boundaries_and_Places/MapServer/tile/{z}/{y}/{x}".to_string(),
                attribution: "Esri".to_string(),
            },
            stroke_weight: 2.0,
            fill_opacity: 0.6,
            default_tolerance: DEFAULT_TOLERANCE,
            overpass: OverpassSettings::default(),
            branding: Branding::default(),
            legend: vec![
                LegendEntry::new("Survey area", "rgba(128, 0, 128, 0.5)", "rgba(128, 0, 128, 1.0)"),
                LegendEntry::new("Data captured successfully", "rgba(0, 255, 0, 0.4)", "rgba(0, 255, 0, 1.0)"),
                LegendEntry::new("Data NOT captured", "rgba(255, 0, 0, 0.4)", "rgba(255, 0, 0, 1.0)"),
                LegendEntry::new(
                    "Cities, Towns & Localities (layer control, top right)",
                    "rgba(0, 0, 0, 0.2)",
                    "rgba(0, 0, 0, 0.4)",
                ),
            ],
        }
    }
}

impl Settings {
    /// Reads settings from a JSON file; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"zoom": 10, "overpass": {"place_kinds": ["village"]}, "branding": {"logo": "logo.png"}}"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        let defaults = Settings::default();
        assert_eq!(settings.zoom, 10);
        assert_eq!(settings.overpass.place_kinds, vec!["village".to_string()]);
        assert_eq!(settings.overpass.endpoint, defaults.overpass.endpoint);
        assert_eq!(settings.branding.logo, PathBuf::from("logo.png"));
        assert_eq!(settings.branding.favicon, defaults.branding.favicon);
        assert_eq!(settings.legend.len(), 4);
    }

    #[test]
    fn test_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ zoom: ").unwrap();
        assert!(matches!(Settings::load(&path), Err(Error::Json(_))));
    }
}
