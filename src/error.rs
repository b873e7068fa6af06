use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while converting KML files or assembling the map.
#[derive(Error, Debug)]
pub enum Error {
    /// A file could not be read or written.
    #[error("unable to access `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The KML markup could not be parsed.
    #[error("unable to parse KML")]
    Kml(#[from] kml::Error),

    /// The raw KML markup could not be scanned for style colors.
    #[error("unable to read KML markup")]
    Xml(#[from] quick_xml::Error),

    /// The KML holds neither a `Document` nor a `Folder` container.
    #[error(
        "Unsupported KML structure in `{}`. Could not find 'kml', 'Document' or 'Folder' key.",
        .0.display()
    )]
    UnsupportedStructure(PathBuf),

    /// A GeoJSON file could not be parsed.
    #[error("unable to parse GeoJSON")]
    GeoJson(#[from] geojson::Error),

    /// A GeoJSON file parsed, but is not a FeatureCollection.
    #[error("`{}` does not hold a FeatureCollection", .0.display())]
    NotACollection(PathBuf),

    #[error("unable to serialize JSON")]
    Json(#[from] serde_json::Error),

    /// The place lookup request failed or returned a non-success status.
    #[error("place lookup failed")]
    Transport(#[from] reqwest::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
