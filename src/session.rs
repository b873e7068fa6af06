use crate::config::Settings;
use crate::error::Result;
use crate::map::{Abort, Outcome, create_map_with_overlay};
use crate::overpass::PlaceSource;
use crate::prompt::{Prompter, Question};

/// Parses the tolerance answer, falling back to `default` for anything unusable.
pub fn parse_tolerance(answer: Option<&str>, default: f64) -> f64 {
    match answer.map(|a| a.trim().parse::<f64>()) {
        Some(Ok(t)) if t.is_finite() && t >= 0.0 => t,
        _ => {
            log::warn!(
                "Invalid input for simplify tolerance. Using default value: {}",
                default
            );
            default
        }
    }
}

/// Asks for the inputs of one map, in order, then builds it.
///
/// Any question left unanswered ends the run without output.
pub fn run(
    prompter: &mut dyn Prompter,
    settings: &Settings,
    places: &dyn PlaceSource,
) -> Result<Outcome> {
    let Some(kml_paths) = prompter.pick_input_files().filter(|f| !f.is_empty()) else {
        return Ok(Outcome::Aborted(Abort::NoFiles));
    };
    let Some(completed) = prompter.prompt_text(Question::Completed) else {
        return Ok(Outcome::Aborted(Abort::NoCompletedLabel));
    };
    let tolerance = parse_tolerance(
        prompter.prompt_text(Question::Tolerance).as_deref(),
        settings.default_tolerance,
    );
    let Some(output) = prompter.pick_output_path() else {
        return Ok(Outcome::Aborted(Abort::NoOutput));
    };
    log::info!(
        "files: {}, tolerance: {}, output: {}",
        kml_paths.len(),
        tolerance,
        output.display()
    );
    create_map_with_overlay(
        &kml_paths,
        &output,
        tolerance,
        &completed,
        settings,
        places,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TOLERANCE;
    use crate::overpass::Place;
    use crate::point::WGS84BoundingBox;
    use crate::prompt::Console;
    use std::io::Cursor;
    use std::path::Path;

    struct NoPlaces;

    impl PlaceSource for NoPlaces {
        fn places(&self, _: &WGS84BoundingBox) -> Result<Vec<Place>> {
            Ok(Vec::new())
        }
    }

    fn run_script(script: &str, settings: &Settings) -> Outcome {
        let mut console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        run(&mut console, settings, &NoPlaces).unwrap()
    }

    #[test]
    fn test_parse_tolerance() {
        assert_eq!(parse_tolerance(Some("0.01"), DEFAULT_TOLERANCE), 0.01);
        assert_eq!(parse_tolerance(Some(" 0 "), DEFAULT_TOLERANCE), 0.0);
        assert_eq!(parse_tolerance(Some("abc"), DEFAULT_TOLERANCE), DEFAULT_TOLERANCE);
        assert_eq!(parse_tolerance(Some("-1"), DEFAULT_TOLERANCE), DEFAULT_TOLERANCE);
        assert_eq!(parse_tolerance(Some("NaN"), DEFAULT_TOLERANCE), DEFAULT_TOLERANCE);
        assert_eq!(parse_tolerance(None, DEFAULT_TOLERANCE), DEFAULT_TOLERANCE);
    }

    #[test]
    fn test_aborts() {
        let settings = Settings::default();
        assert_eq!(run_script("", &settings), Outcome::Aborted(Abort::NoFiles));
        assert_eq!(
            run_script("a.kml\n\n", &settings),
            Outcome::Aborted(Abort::NoCompletedLabel)
        );
        assert_eq!(
            run_script("a.kml\n12 km\n0.1\n\n", &settings),
            Outcome::Aborted(Abort::NoOutput)
        );
    }

    fn write_branding(dir: &Path, settings: &mut Settings) {
        settings.branding.logo = dir.join("logo.png");
        settings.branding.favicon = dir.join("tab.ico");
        std::fs::write(&settings.branding.logo, b"logo").unwrap();
        std::fs::write(&settings.branding.favicon, b"icon").unwrap();
    }

    #[test]
    fn test_full_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        write_branding(dir.path(), &mut settings);
        let kml = dir.path().join("run.kml");
        std::fs::write(
            &kml,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2"><Document><Placemark><name>Run</name>
<LineString><coordinates>150.0,-25.0 150.5,-25.5</coordinates></LineString>
</Placemark></Document></kml>"#,
        )
        .unwrap();
        let output = dir.path().join("map");

        // An unusable tolerance falls back to the default and the run goes on.
        let script = format!("{}\n57 km\nfast\n{}\n", kml.display(), output.display());
        let outcome = run_script(&script, &settings);
        let written = dir.path().join("map.html");
        assert_eq!(outcome, Outcome::Saved(written.clone()));
        let html = std::fs::read_to_string(written).unwrap();
        assert!(html.contains("Kilometers completed: 57 km"));
    }
}
