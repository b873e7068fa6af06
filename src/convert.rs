use std::path::{Path, PathBuf};

use geojson::{FeatureCollection, GeoJson};

use crate::error::{Error, Result};
use crate::feature::Feature;
use crate::placemark::{convert_placemark, extract_placemarks};
use crate::simplify::simplify;
use crate::read_kml::{self, Source};
use crate::style::extract_styles;

/// Converts the placemarks of a parsed KML document into simplified features.
///
/// Returns `None` when the document has no `Document` or `Folder` container.
pub fn convert_document(source: &Source, tolerance: f64) -> Option<Vec<Feature>> {
    let container = read_kml::root_container(&source.kml)?;
    let styles = extract_styles(container, &source.colors);
    let placemarks = extract_placemarks(container);
    log::trace!("styles: {}", styles.len());
    let features = placemarks
        .iter()
        .filter_map(|p| {
            let feature = convert_placemark(p, &styles);
            if feature.is_none() {
                log::trace!("skip placemark {:?}: no line string or polygon", p.name);
            }
            feature
        })
        .map(|mut f| {
            let before = f.shape.positions().len();
            f.shape = simplify(&f.shape, tolerance);
            log::trace!(
                "{} {:?}: {} -> {} positions",
                f.shape.kind(),
                f.name,
                before,
                f.shape.positions().len()
            );
            f
        })
        .collect();
    Some(features)
}

pub fn to_collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: features.into_iter().map(geojson::Feature::from).collect(),
        foreign_members: None,
    }
}

/// Converts a KML file into a GeoJSON FeatureCollection file.
///
/// Without an explicit `geojson_path` the output lands next to the input,
/// with a `.geojson` extension. Returns the path written.
pub fn kml_to_geojson(
    kml_path: &Path,
    geojson_path: Option<&Path>,
    tolerance: f64,
) -> Result<PathBuf> {
    let geojson_path = match geojson_path {
        Some(p) => p.to_path_buf(),
        None => kml_path.with_extension("geojson"),
    };
    let source = read_kml::read(kml_path)?;
    if let Some(container) = read_kml::root_container(&source.kml) {
        log::info!(
            "Total placemarks found in {}: {}",
            kml_path.display(),
            extract_placemarks(container).len()
        );
    }
    let features = convert_document(&source, tolerance)
        .ok_or_else(|| Error::UnsupportedStructure(kml_path.to_path_buf()))?;
    let collection = to_collection(features);
    let json = serde_json::to_string(&collection)?;
    std::fs::write(&geojson_path, json).map_err(|e| Error::io(&geojson_path, e))?;
    log::info!("geojson: {}", geojson_path.display());
    Ok(geojson_path)
}

/// Loads the line and polygon features of a GeoJSON FeatureCollection file.
pub fn read_collection(path: &Path) -> Result<Vec<Feature>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    match content.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection
            .features
            .iter()
            .filter_map(Feature::from_geojson)
            .collect()),
        _ => Err(Error::NotACollection(path.to_path_buf())),
    }
}
