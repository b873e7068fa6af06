//! Assembles the progress map from converted KML files.

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::color::abgr_to_rgba;
use crate::config::{Settings, TileSource};
use crate::convert;
use crate::error::{Error, Result};
use crate::feature::Feature;
use crate::html::{self, LeafletDocument, js};
use crate::overpass::{PlaceSource, places_to_collection};
use crate::point::WGS84Point;

/// Why a run ended without writing a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Abort {
    NoFiles,
    NoCompletedLabel,
    NoOutput,
    NoCoordinates,
}

impl fmt::Display for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Abort::NoFiles => "No KML files selected.",
            Abort::NoCompletedLabel => "No input for kilometers completed.",
            Abort::NoOutput => "No output HTML file selected.",
            Abort::NoCoordinates => "No coordinates found in GeoJSON data.",
        };
        f.write_str(message)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Saved(PathBuf),
    Aborted(Abort),
}

/// One overlay: the features converted from one KML file.
struct Layer {
    name: String,
    features: Vec<Feature>,
}

fn layer_name(kml_path: &Path) -> String {
    kml_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| kml_path.display().to_string())
}

fn mean_center(layers: &[Layer]) -> Option<WGS84Point> {
    let points: Vec<WGS84Point> = layers
        .iter()
        .flat_map(|l| &l.features)
        .flat_map(|f| f.shape.positions())
        .filter_map(|p| WGS84Point::from_position(p))
        .collect();
    WGS84Point::mean(&points)
}

/// GeoJSON of a layer, each feature carrying its Leaflet path style.
fn layer_data(layer: &Layer, settings: &Settings) -> geojson::FeatureCollection {
    let features = layer
        .features
        .iter()
        .map(|feature| {
            let style = feature.style.clone().unwrap_or_default();
            let path_style = json!({
                "color": abgr_to_rgba(&style.line_color),
                "fillColor": abgr_to_rgba(&style.poly_color),
                "weight": settings.stroke_weight,
                "fillOpacity": settings.fill_opacity,
            });
            let mut out = geojson::Feature::from(feature.clone());
            if let Some(properties) = out.properties.as_mut() {
                properties.insert("map_style".to_string(), path_style);
            }
            out
        })
        .collect();
    geojson::FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn tile_layer(var: &str, source: &TileSource) -> Result<String> {
    Ok(format!(
        "var {} = L.tileLayer({}, {{attribution: {}, maxZoom: 19}}).addTo(map);",
        var,
        js(&source.url)?,
        js(&source.attribution)?
    ))
}

const HELPERS: &str = r#"function feature_style(feature) { return feature.properties.map_style; }
function tooltip(fields) {
    return function (feature, layer) {
        var rows = fields.map(function (f) { return "<b>" + f + "</b>: " + feature.properties[f]; });
        layer.bindTooltip(rows.join("<br>"), {sticky: true});
    };
}
function degrees(num) { return L.Util.formatNum(num, 3) + " &deg; "; }"#;

fn build(
    layers: &[Layer],
    center: &WGS84Point,
    completed: &str,
    settings: &Settings,
    places: &dyn PlaceSource,
) -> Result<String> {
    let mut doc = LeafletDocument::init("Survey progress");
    doc.add_script(HELPERS.to_string());
    doc.add_script(format!(
        "var map = L.map(\"map\", {{center: [{}, {}], zoom: {}, keyboard: false}});",
        center.lat, center.lon, settings.zoom
    ));
    doc.add_script(tile_layer("base_layer", &settings.base_layer)?);
    doc.add_script(tile_layer("reference_layer", &settings.reference_layer)?);

    let mut overlays = vec![format!(
        "{}: reference_layer",
        js(&settings.reference_layer.name)?
    )];
    for (i, layer) in layers.iter().enumerate() {
        doc.add_script(format!(
            "var overlay_{} = L.geoJson({}, {{style: feature_style, onEachFeature: tooltip({})}}).addTo(map);",
            i,
            js(&layer_data(layer, settings))?,
            js(&["name"])?
        ));
        overlays.push(format!("{}: overlay_{}", js(&layer.name)?, i));
    }

    // Searchable only: invisible and kept out of the layer control.
    let found = places.places(&settings.overpass.bbox)?;
    doc.add_script(format!(
        "var places = L.geoJson({}, {{pointToLayer: function (feature, latlng) {{ return L.circleMarker(latlng, {{radius: 2.5, fillColor: \"#000\", color: \"#000\", weight: 1, opacity: 0, fillOpacity: 0}}); }}}});",
        js(&places_to_collection(&found))?
    ));
    doc.add_script(
        "new L.Control.Search({layer: places, propertyName: \"name\", initial: false, collapsed: false, marker: false, zoom: 12, textPlaceholder: \"Search for locations...\"}).addTo(map);"
            .to_string(),
    );
    doc.add_script(format!(
        "L.control.layers({{{}: base_layer}}, {{{}}}).addTo(map);",
        js(&settings.base_layer.name)?,
        overlays.join(", ")
    ));
    doc.add_script(
        "L.control.mousePosition({position: \"bottomright\", separator: \" | \", emptyString: \"NaN\", lngFirst: true, numDigits: 20, prefix: \"Coordinates:\", latFormatter: degrees, lngFormatter: degrees}).addTo(map);"
            .to_string(),
    );
    doc.add_script("L.control.measure().addTo(map);".to_string());

    let logo = html::data_url(&settings.branding.logo, "image/png")?;
    let icon = html::data_url(&settings.branding.favicon, "image/x-icon")?;
    doc.add_head(html::favicon(&icon));
    doc.add_html(html::logo(&logo));
    doc.add_html(html::legend(&settings.legend));
    doc.add_html(html::banner(completed));
    Ok(doc.render())
}

/// Converts every KML file and writes one HTML map with a layer per file.
///
/// Nothing is written when the files hold no coordinates at all.
pub fn create_map_with_overlay(
    kml_paths: &[PathBuf],
    output_html_path: &Path,
    tolerance: f64,
    completed: &str,
    settings: &Settings,
    places: &dyn PlaceSource,
) -> Result<Outcome> {
    let mut layers = Vec::new();
    for kml_path in kml_paths {
        let geojson_path = convert::kml_to_geojson(kml_path, None, tolerance)?;
        layers.push(Layer {
            name: layer_name(kml_path),
            features: convert::read_collection(&geojson_path)?,
        });
    }
    let Some(center) = mean_center(&layers) else {
        log::warn!("{}", Abort::NoCoordinates);
        return Ok(Outcome::Aborted(Abort::NoCoordinates));
    };
    log::info!("center: {}", center);

    let html = build(&layers, &center, completed, settings, places)?;
    std::fs::write(output_html_path, html).map_err(|e| Error::io(output_html_path, e))?;
    log::info!("map: {}", output_html_path.display());
    Ok(Outcome::Saved(output_html_path.to_path_buf()))
}
