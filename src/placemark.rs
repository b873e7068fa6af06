use kml::Kml;
use kml::types::{Coord, Geometry, Placemark};

use crate::feature::{Feature, Position, Shape};
use crate::read_kml;
use crate::style::{StyleTable, style_key};

/// Every placemark below `container`, at any depth.
///
/// The placemarks of a level come before those of its nested folders.
pub fn extract_placemarks(container: &Kml) -> Vec<&Placemark> {
    read_kml::fold(container, Vec::new(), |mut placemarks, level| {
        placemarks.extend(level.iter().filter_map(|k| match k {
            Kml::Placemark(p) => Some(p),
            _ => None,
        }));
        placemarks
    })
}

/// `[lon, lat]`, plus the altitude when present. The KML parser reads at
/// most three values per coordinate tuple, so anything after the altitude is
/// already gone here.
fn positions(coords: &[Coord]) -> Vec<Position> {
    coords
        .iter()
        .map(|c| {
            let mut position = vec![c.x, c.y];
            if let Some(z) = c.z {
                position.push(z);
            }
            position
        })
        .collect()
}

/// Converts a line string or polygon placemark; anything else yields `None`.
pub fn convert_placemark(placemark: &Placemark, styles: &StyleTable) -> Option<Feature> {
    let shape = match placemark.geometry.as_ref()? {
        Geometry::LineString(line) => Shape::Line(positions(&line.coords)),
        Geometry::Polygon(polygon) => Shape::Polygon(positions(&polygon.outer.coords)),
        _ => return None,
    };
    let style_url: Option<String> = placemark.style_url.clone().into();
    let style = style_url.and_then(|url| styles.get(style_key(&url)).cloned());
    Some(Feature {
        name: placemark
            .name
            .clone()
            .unwrap_or_else(|| "Unnamed".to_string()),
        style,
        shape,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_kml::Source;
    use crate::style::{Style, extract_styles};

    const SURVEY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Style id="red">
      <LineStyle><color>ff0000ff</color></LineStyle>
      <PolyStyle><color>660000ff</color></PolyStyle>
    </Style>
    <Placemark>
      <name>Zone A</name>
      <styleUrl>#red</styleUrl>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>150.0,-25.0,0 150.1,-25.0,0 150.1,-25.1,0 150.0,-25.0,0</coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
    <Folder>
      <name>runs</name>
      <Placemark>
        <name>Path B</name>
        <styleUrl>#unknown</styleUrl>
        <LineString>
          <coordinates>
            150.0,-25.0 150.05,-25.02 150.1,-25.04
          </coordinates>
        </LineString>
      </Placemark>
      <Placemark>
        <name>Camp</name>
        <Point><coordinates>150.0,-25.0</coordinates></Point>
      </Placemark>
    </Folder>
    <Placemark>
      <LineString><coordinates>149.0,-24.0 149.1,-24.1</coordinates></LineString>
    </Placemark>
  </Document>
</kml>"#;

    fn survey() -> Kml {
        SURVEY.parse().unwrap()
    }

    fn survey_source() -> Source {
        SURVEY.parse().unwrap()
    }

    #[test]
    fn test_placemarks_at_any_depth() {
        let kml = survey();
        let root = read_kml::root_container(&kml).unwrap();
        let names: Vec<Option<String>> = extract_placemarks(root)
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(
            names,
            vec![
                Some("Zone A".to_string()),
                None,
                Some("Path B".to_string()),
                Some("Camp".to_string()),
            ]
        );
    }

    #[test]
    fn test_convert() {
        let source = survey_source();
        let root = read_kml::root_container(&source.kml).unwrap();
        let styles = extract_styles(root, &source.colors);
        let features: Vec<Feature> = extract_placemarks(root)
            .into_iter()
            .filter_map(|p| convert_placemark(p, &styles))
            .collect();
        assert_eq!(features.len(), 3);

        let zone = &features[0];
        assert_eq!(zone.name, "Zone A");
        assert_eq!(
            zone.style,
            Some(Style {
                line_color: "ff0000ff".to_string(),
                poly_color: "660000ff".to_string(),
            })
        );
        assert_eq!(zone.shape.kind(), "Polygon");
        assert_eq!(zone.shape.positions()[1], vec![150.1, -25.0, 0.0]);

        let unnamed = &features[1];
        assert_eq!(unnamed.name, "Unnamed");
        assert_eq!(unnamed.style, None);

        let path = &features[2];
        assert_eq!(path.name, "Path B");
        assert_eq!(path.style, None);
        assert_eq!(
            path.shape,
            Shape::Line(vec![
                vec![150.0, -25.0],
                vec![150.05, -25.02],
                vec![150.1, -25.04],
            ])
        );
    }

    #[test]
    fn test_altitude_is_kept_and_extra_values_dropped() {
        let source: Source = r#"<kml xmlns="http://www.opengis.net/kml/2.2"><Document><Placemark>
  <LineString><coordinates>150.0,-25.0,12.5 150.1,-25.1,13.0,7.0</coordinates></LineString>
</Placemark></Document></kml>"#
            .parse()
            .unwrap();
        let root = read_kml::root_container(&source.kml).unwrap();
        let feature = convert_placemark(extract_placemarks(root)[0], &StyleTable::new()).unwrap();
        assert_eq!(
            feature.shape,
            Shape::Line(vec![vec![150.0, -25.0, 12.5], vec![150.1, -25.1, 13.0]])
        );
    }

    #[test]
    fn test_point_yields_nothing() {
        let kml = survey();
        let root = read_kml::root_container(&kml).unwrap();
        let camp = extract_placemarks(root)
            .into_iter()
            .find(|p| p.name.as_deref() == Some("Camp"))
            .unwrap();
        assert_eq!(convert_placemark(camp, &StyleTable::new()), None);
    }
}
