mod demo;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{debug, info};

use maskview_core::{CoreError, Device, GeomGroup, Library};
use maskview_plot::{geometry_figure, show_geometry, Inspector, PlotError, ViewerConfig};

use crate::demo::RingResonator;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode figure: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "maskview", version, about = "Inspect mask geometry and parametric devices in the browser")]
struct Cli {
    /// Viewer configuration file (JSON).
    #[arg(long, env = "MASKVIEW_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Directory for generated pages.
    #[arg(long, env = "MASKVIEW_OUTPUT_DIR", global = true)]
    output_dir: Option<PathBuf>,

    /// Write pages without opening a browser.
    #[arg(long, global = true)]
    no_open: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a geometry group stored as JSON.
    View {
        geometry: PathBuf,
        /// Structure library used to resolve references. Implies `--flatten`.
        #[arg(long)]
        library: Option<PathBuf>,
        /// Inline structure references before drawing. References are not
        /// drawn otherwise.
        #[arg(long)]
        flatten: bool,
        /// Print the figure JSON instead of opening a page.
        #[arg(long)]
        json: bool,
    },
    /// Inspect the built-in ring resonator with one slider per parameter.
    ///
    /// Each slider in the page previews its own parameter with the others at
    /// their starting values; moving one slider puts the others back. Use
    /// `--set` to change the starting values.
    Demo {
        /// Parameter override, e.g. `--set radius=15`.
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, f64)>,
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration.
    Config,
}

fn parse_assignment(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{s}`"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for `{}`: {e}", name.trim()))?;
    Ok((name.trim().to_string(), value))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Geometry drawn by `view`. A library is only useful for resolving
/// references, so passing one flattens the group.
fn view_geometry(
    group: GeomGroup,
    library: Option<Library>,
    flatten: bool,
) -> Result<GeomGroup, CliError> {
    match library {
        Some(library) => {
            if !flatten {
                debug!("library given; flattening references");
            }
            Ok(group.flatten(&library)?)
        }
        None if flatten => Ok(group.flatten(Library::empty())?),
        None => Ok(group),
    }
}

fn load_config(cli: &Cli) -> Result<ViewerConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => {
            debug!("loading config from {}", path.display());
            ViewerConfig::from_json_file(path)?
        }
        None => ViewerConfig::default(),
    };
    if let Some(dir) = &cli.output_dir {
        config.output_dir = Some(dir.clone());
    }
    if cli.no_open {
        config.auto_open = false;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;

    match cli.command {
        Command::View {
            geometry,
            library,
            flatten,
            json,
        } => {
            let group: GeomGroup = read_json(&geometry)?;
            let library: Option<Library> = match library {
                Some(path) => Some(read_json(&path)?),
                None => None,
            };
            let group = view_geometry(group, library, flatten)?;
            info!("{}: {} shapes", geometry.display(), group.len());

            if json {
                println!("{}", geometry_figure(&group, &config).to_json_pretty()?);
            } else {
                let path = show_geometry(&group, &config)?;
                println!("{}", path.display());
            }
        }
        Command::Demo { set, json } => {
            let mut device = RingResonator::new();
            for (name, value) in &set {
                device.set_param(name, *value)?;
            }
            let mut inspector = Inspector::new(Box::new(device), config)?;

            if json {
                println!("{}", inspector.figure().to_json_pretty()?);
            } else {
                let path = inspector.show()?;
                println!("{}", path.display());
            }
        }
        Command::Config => {
            println!("{}", config.to_json()?);
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
