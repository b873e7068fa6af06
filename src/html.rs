use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use crate::config::LegendEntry;
use crate::error::{Error, Result};

const STYLESHEETS: [&str; 4] = [
    "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css",
    "https://cdn.jsdelivr.net/npm/leaflet-search@2.9.7/dist/leaflet-search.min.css",
    "https://cdn.jsdelivr.net/gh/ljagis/leaflet-measure@2.1.7/dist/leaflet-measure.min.css",
    "https://cdn.jsdelivr.net/gh/ardhi/Leaflet.MousePosition/src/L.Control.MousePosition.min.css",
];

const SCRIPTS: [&str; 4] = [
    "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js",
    "https://cdn.jsdelivr.net/npm/leaflet-search@2.9.7/dist/leaflet-search.min.js",
    "https://cdn.jsdelivr.net/gh/ljagis/leaflet-measure@2.1.7/dist/leaflet-measure.min.js",
    "https://cdn.jsdelivr.net/gh/ardhi/Leaflet.MousePosition/src/L.Control.MousePosition.min.js",
];

/// A single Leaflet page: head elements, fixed overlays and the map script.
pub struct LeafletDocument {
    title: String,
    head: Vec<String>,
    body: Vec<String>,
    script: Vec<String>,
}

impl LeafletDocument {
    pub fn init(title: &str) -> Self {
        let mut head = Vec::new();
        for href in STYLESHEETS {
            head.push(format!(r#"<link rel="stylesheet" href="{}"/>"#, href));
        }
        for src in SCRIPTS {
            head.push(format!(r#"<script src="{}"></script>"#, src));
        }
        head.push(
            "<style>html, body {width: 100%; height: 100%; margin: 0; padding: 0;} #map {position: absolute; top: 0; bottom: 0; right: 0; left: 0;}</style>"
                .to_string(),
        );
        Self {
            title: title.to_string(),
            head,
            body: Vec::new(),
            script: Vec::new(),
        }
    }
    pub fn add_head(&mut self, element: String) {
        self.head.push(element);
    }
    pub fn add_html(&mut self, element: String) {
        self.body.push(element);
    }
    pub fn add_script(&mut self, statement: String) {
        self.script.push(statement);
    }
    pub fn render(&self) -> String {
        let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str("<meta charset=\"utf-8\"/>\n");
        html.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\"/>\n",
        );
        html.push_str(&format!("<title>{}</title>\n", escape(&self.title)));
        for h in &self.head {
            html.push_str(h);
            html.push('\n');
        }
        html.push_str("</head>\n<body>\n<div id=\"map\"></div>\n");
        for b in &self.body {
            html.push_str(b);
            html.push('\n');
        }
        html.push_str("<script>\n");
        for s in &self.script {
            html.push_str(s);
            html.push('\n');
        }
        html.push_str("</script>\n</body>\n</html>\n");
        html
    }
}

/// Escapes text for use inside HTML markup.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Serializes a value as a JavaScript literal that is safe inside `<script>`.
pub fn js<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Reads a file into a base64 `data:` URL.
pub fn data_url(path: &Path, mime: &str) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

pub fn logo(data_url: &str) -> String {
    format!(
        r#"<div style="position: fixed; bottom: 10px; left: 10px; width: 270px; height: 65px; z-index: 9999; box-shadow: 0px 0px 10px 0px black;">
    <img src="{}" style="width: 100%; height: 100%;">
</div>"#,
        data_url
    )
}

pub fn favicon(data_url: &str) -> String {
    format!(
        r#"<link rel="shortcut icon" href="{0}">
<link rel="icon" href="{0}" type="image/x-icon">"#,
        data_url
    )
}

pub fn legend(entries: &[LegendEntry]) -> String {
    let mut html = String::from(
        r#"<div style="position: fixed; bottom: 90px; left: 10px; width: 270px; background-color: white; border: 2px solid grey; z-index: 9999; font-size: 10px; box-shadow: 0px 0px 10px 0px black; padding: 10px;">"#,
    );
    html.push('\n');
    for entry in entries {
        html.push_str(&format!(
            r#"    <div style="margin-bottom: 5px;">&nbsp; <span style="display: inline-block; vertical-align: middle;"><div style="display: inline-block; height: 15px; width: 15px; background-color: {}; border-radius: 50%; box-shadow: 0 0 0 2px {};"></div></span>&nbsp; <span style="font-size: 10px;">{}</span></div>"#,
            escape(&entry.fill),
            escape(&entry.outline),
            escape(&entry.label)
        ));
        html.push('\n');
    }
    html.push_str("</div>");
    html
}

/// The label goes into the markup as given.
pub fn banner(completed: &str) -> String {
    format!(
        r#"<div style="position: fixed; top: 10px; left: 50%; transform: translateX(-50%); font-size: 20px; font-weight: bold; color: red; background-color: white; border: 2px solid red; box-shadow: 0 0 10px rgba(255, 0, 0, 0.5); padding: 10px 10px; z-index: 9999;">
    Kilometers completed: {}
</div>"#,
        completed
    )
}
