pub mod color;
pub mod config;
pub mod convert;
pub mod error;
pub mod feature;
pub mod html;
pub mod map;
pub mod overpass;
pub mod placemark;
pub mod point;
pub mod prompt;
pub mod read_kml;
pub mod session;
pub mod simplify;
pub mod style;
