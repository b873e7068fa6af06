use std::collections::HashMap;

use kml::Kml;
use kml::types::{Element, Style as KmlStyle, StyleMap};
use serde::{Deserialize, Serialize};

use crate::read_kml::{self, ColorMarks, StyleColors};

pub const DEFAULT_LINE_COLOR: &str = "ff0000ff";
pub const DEFAULT_POLY_COLOR: &str = "4d0000ff";

/// Line and fill colors of a KML style, both in KML `aabbggrr` order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub line_color: String,
    pub poly_color: String,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            line_color: DEFAULT_LINE_COLOR.to_string(),
            poly_color: DEFAULT_POLY_COLOR.to_string(),
        }
    }
}

impl Style {
    /// Reads a parsed style. With `marks`, a sub-style whose markup has no
    /// `<color>` takes the default color instead of the parser's.
    pub fn resolve(style: &KmlStyle, marks: Option<ColorMarks>) -> Self {
        let fallback = Style::default();
        let line = style.line.as_ref().filter(|_| marks.is_none_or(|m| m.line));
        let poly = style.poly.as_ref().filter(|_| marks.is_none_or(|m| m.poly));
        Style {
            line_color: line
                .map(|l| l.color.clone())
                .unwrap_or(fallback.line_color),
            poly_color: poly
                .map(|p| p.color.clone())
                .unwrap_or(fallback.poly_color),
        }
    }
}

fn child<'a>(element: &'a Element, name: &str) -> Option<&'a Element> {
    element.children.iter().rev().find(|c| c.name == name)
}

fn element_color(style: &Element, sub_style: &str) -> Option<String> {
    child(child(style, sub_style)?, "color")?.content.clone()
}

/// A `<Style>` written inside a placemark, kept by the parser as a plain element.
impl From<&Element> for Style {
    fn from(style: &Element) -> Self {
        let fallback = Style::default();
        Style {
            line_color: element_color(style, "LineStyle").unwrap_or(fallback.line_color),
            poly_color: element_color(style, "PolyStyle").unwrap_or(fallback.poly_color),
        }
    }
}

/// Styles of one document, keyed by style id.
pub type StyleTable = HashMap<String, Style>;

/// Strips the `#` marker of a local style reference (`#zone` -> `zone`).
pub fn style_key(url: &str) -> &str {
    url.trim_start_matches('#')
}

fn style_id(style: &KmlStyle) -> String {
    let id: Option<String> = style.id.clone().into();
    id.unwrap_or_default()
}

fn style_map_id(map: &StyleMap) -> String {
    let id: Option<String> = map.id.clone().into();
    id.unwrap_or_default()
}

fn inline_styles(level: &[Kml]) -> impl Iterator<Item = &Element> {
    level
        .iter()
        .filter_map(|k| match k {
            Kml::Placemark(p) => Some(&p.children),
            _ => None,
        })
        .flatten()
        .filter(|e| e.name == "Style")
}

/// Collects every `Style` below `container`, resolving `StyleMap` aliases.
///
/// At each level the plain styles are registered before the style maps are
/// resolved, and the styles written inside the level's placemarks after
/// them. A style map only takes the `normal` style if that style has
/// already been registered at this level or an enclosing one; otherwise the
/// map id stays absent.
pub fn extract_styles(container: &Kml, colors: &StyleColors) -> StyleTable {
    read_kml::fold(container, StyleTable::new(), |mut styles, level| {
        for kml in level {
            if let Kml::Style(style) = kml {
                let id = style_id(style);
                let marks = colors.get(&id).copied();
                styles.insert(id, Style::resolve(style, marks));
            }
        }
        for kml in level {
            let Kml::StyleMap(map) = kml else {
                continue;
            };
            for pair in map.pairs.iter().filter(|p| p.key == "normal") {
                if let Some(style) = styles.get(style_key(&pair.style_url)).cloned() {
                    styles.insert(style_map_id(map), style);
                }
            }
        }
        for element in inline_styles(level) {
            let id = element.attrs.get("id").cloned().unwrap_or_default();
            styles.insert(id, Style::from(element));
        }
        styles
    })
}
