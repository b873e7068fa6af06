use clap::{Args, Parser, Subcommand};
use kml_progress_map::config::{DEFAULT_TOLERANCE, Settings};
use kml_progress_map::map::Outcome;
use kml_progress_map::overpass::Overpass;
use kml_progress_map::prompt::{Console, Preset, Prompter};
use kml_progress_map::{convert, session};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Survey progress maps from KML files")]
struct Cli {
    /// JSON file overriding the built-in map settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Convert one KML file into a GeoJSON FeatureCollection
    Convert {
        path: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
        tolerance: f64,
    },
    /// Build the progress map, asking for anything not given here
    Map(MapArgs),
}

#[derive(Args, Default)]
struct MapArgs {
    files: Vec<PathBuf>,
    /// Text shown in the "Kilometers completed" banner
    #[arg(long)]
    label: Option<String>,
    #[arg(short, long)]
    tolerance: Option<String>,
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Ask on the terminal instead of opening file dialogs
    #[arg(long)]
    no_dialogs: bool,
}

#[cfg(feature = "dialogs")]
fn fallback(no_dialogs: bool) -> Box<dyn Prompter> {
    if no_dialogs {
        Box::new(Console::stdio())
    } else {
        Box::new(kml_progress_map::prompt::Dialogs {
            text: Console::stdio(),
        })
    }
}

#[cfg(not(feature = "dialogs"))]
fn fallback(_no_dialogs: bool) -> Box<dyn Prompter> {
    Box::new(Console::stdio())
}

/// Warnings reach the user unless `RUST_LOG` says otherwise.
fn logger() -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
}

fn main() -> eyre::Result<()> {
    logger().init();
    let args = Cli::parse();
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match args.command.unwrap_or(Command::Map(MapArgs::default())) {
        Command::Convert {
            path,
            output,
            tolerance,
        } => {
            let written = convert::kml_to_geojson(&path, output.as_deref(), tolerance)?;
            println!("GeoJSON saved at: {}", written.display());
        }
        Command::Map(map) => {
            let places = Overpass::new(&settings.overpass)?;
            let mut prompter = Preset {
                files: map.files,
                completed: map.label,
                tolerance: map.tolerance,
                output: map.output,
                fallback: fallback(map.no_dialogs),
            };
            match session::run(&mut prompter, &settings, &places)? {
                Outcome::Saved(path) => println!("Map saved as HTML at: {}", path.display()),
                Outcome::Aborted(reason) => println!("{}", reason),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_shown_by_default() {
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(logger().build().filter(), log::LevelFilter::Warn);
        }
    }

    #[test]
    fn test_map_arguments() {
        let cli = Cli::parse_from(["kml-progress-map", "map", "a.kml", "--label", "12 km"]);
        let Some(Command::Map(map)) = cli.command else {
            panic!("expected the map command");
        };
        assert_eq!(map.files, vec![PathBuf::from("a.kml")]);
        assert_eq!(map.label.as_deref(), Some("12 km"));
    }
}
