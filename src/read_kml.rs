use crate::error::{Error, Result};
use kml::Kml;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Which sub-styles of a container level `<Style>` hold a `<color>` of their own.
///
/// The parser gives a `LineStyle` or `PolyStyle` without one a white color,
/// so only the markup tells an explicit color from a missing one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorMarks {
    pub line: bool,
    pub poly: bool,
}

/// Color marks keyed by style id.
pub type StyleColors = HashMap<String, ColorMarks>;

/// A parsed KML document along with what the parser leaves out of it.
#[derive(Debug)]
pub struct Source {
    pub kml: Kml,
    pub colors: StyleColors,
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Ok(Source {
            kml: text.parse()?,
            colors: scan_style_colors(text)?,
        })
    }
}

pub fn read(path: &Path) -> Result<Source> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    content.parse()
}

fn is_container(name: &[u8]) -> bool {
    matches!(name, b"kml" | b"Document" | b"Folder")
}

fn id_attr(start: &BytesStart) -> String {
    start
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"id")
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
        .unwrap_or_default()
}

/// Walks the raw markup for the `<Style>` elements the parser turns into
/// [`Kml::Style`], noting which of their sub-styles carry a `<color>`.
pub fn scan_style_colors(text: &str) -> Result<StyleColors> {
    let mut reader = Reader::from_str(text);
    let mut colors = StyleColors::new();
    let mut path: Vec<Vec<u8>> = Vec::new();
    // depth, id and marks of the style being read
    let mut open: Option<(usize, String, ColorMarks)> = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                let parent = path.last().map(Vec::as_slice);
                if name == b"Style" && parent.is_some_and(is_container) {
                    open = Some((path.len(), id_attr(&e), ColorMarks::default()));
                } else if let Some((_, _, marks)) = open.as_mut() {
                    if name == b"color" {
                        match parent {
                            Some(b"LineStyle") => marks.line = true,
                            Some(b"PolyStyle") => marks.poly = true,
                            _ => {}
                        }
                    }
                }
                path.push(name);
            }
            Event::Empty(e) => {
                let parent = path.last().map(Vec::as_slice);
                if e.local_name().as_ref() == b"Style" && parent.is_some_and(is_container) {
                    colors.insert(id_attr(&e), ColorMarks::default());
                }
            }
            Event::End(_) => {
                path.pop();
                if let Some((depth, id, marks)) = open.take() {
                    if depth == path.len() {
                        colors.insert(id, marks);
                    } else {
                        open = Some((depth, id, marks));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(colors)
}

/// Finds the container the placemarks and styles hang off.
///
/// Inside the `<kml>` root a `Document` wins over a `Folder`, whatever their
/// order in the file.
pub fn root_container(kml: &Kml) -> Option<&Kml> {
    let top: &[Kml] = match kml {
        Kml::KmlDocument(doc) => &doc.elements,
        other => std::slice::from_ref(other),
    };
    top.iter()
        .find(|k| matches!(k, Kml::Document { .. }))
        .or_else(|| top.iter().find(|k| matches!(k, Kml::Folder(_))))
}

fn children(kml: &Kml) -> Option<&[Kml]> {
    match kml {
        Kml::KmlDocument(doc) => Some(&doc.elements),
        Kml::Document { elements, .. } => Some(elements),
        Kml::Folder(folder) => Some(&folder.elements),
        _ => None,
    }
}

/// Depth-first fold over every container level below (and including) `container`.
///
/// `f` sees the direct children of one container at a time. Levels are
/// visited in document order, parents before their nested containers. The
/// traversal keeps its own stack, so deeply nested folders cannot overflow.
pub fn fold<'a, A>(container: &'a Kml, init: A, mut f: impl FnMut(A, &'a [Kml]) -> A) -> A {
    let mut acc = init;
    let mut stack = vec![container];
    while let Some(node) = stack.pop() {
        let Some(level) = children(node) else {
            continue;
        };
        acc = f(acc, level);
        for child in level.iter().rev() {
            if children(child).is_some() {
                stack.push(child);
            }
        }
    }
    acc
}
