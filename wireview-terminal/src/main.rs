//! Wireview Terminal - interactive wireframe viewer
//!
//! Controls:
//!   - Left drag: Rotate (mode selected with R)
//!   - Ctrl + left drag / Middle drag: Pan
//!   - P: Toggle orthographic / perspective projection
//!   - R: Cycle rotation mode
//!   - C: Re-center the camera
//!   - Q/ESC: Quit

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use simplelog::{Config, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use wireview_core::{ProjectionMode, RotationMode};
use wireview_terminal::{load_object, load_settings, TerminalApp};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProjectionArg {
    Orthographic,
    Perspective,
}

impl From<ProjectionArg> for ProjectionMode {
    fn from(arg: ProjectionArg) -> Self {
        match arg {
            ProjectionArg::Orthographic => ProjectionMode::Orthographic,
            ProjectionArg::Perspective => ProjectionMode::Perspective,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RotationArg {
    #[value(name = "2d")]
    Rotate2d,
    #[value(name = "2d-centered")]
    Rotate2dCentered,
    #[value(name = "3d")]
    Rotate3d,
}

impl From<RotationArg> for RotationMode {
    fn from(arg: RotationArg) -> Self {
        match arg {
            RotationArg::Rotate2d => RotationMode::Rotate2d,
            RotationArg::Rotate2dCentered => RotationMode::Rotate2dCentered,
            RotationArg::Rotate3d => RotationMode::Rotate3d,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about = "Rotate and project a wireframe model in the terminal")]
struct Args {
    /// STL model to view (ASCII or binary). Shows a cube when omitted.
    #[arg(long)]
    model: Option<PathBuf>,

    /// JSON file with view settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial projection, overriding the settings file.
    #[arg(long, value_enum)]
    projection: Option<ProjectionArg>,

    /// Initial rotation mode, overriding the settings file.
    #[arg(long, value_enum)]
    rotation: Option<RotationArg>,

    /// World units covered by one terminal column.
    #[arg(long, default_value_t = 4.0)]
    cell_size: f64,

    /// Write logs to this file. The terminal itself is used for drawing.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    anyhow::ensure!(
        args.cell_size.is_finite() && args.cell_size > 0.0,
        "--cell-size must be a positive number, got {}",
        args.cell_size
    );

    if let Some(path) = &args.log_file {
        let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
        WriteLogger::init(args.log_level, Config::default(), file)?;
    }

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(projection) = args.projection {
        settings.projection = projection.into();
    }
    if let Some(rotation) = args.rotation {
        settings.rotation = rotation.into();
    }

    println!("Wireview Terminal - Loading...");
    let object = load_object(args.model.as_deref())?;
    println!("Loaded {} polygons", object.polygons().len());

    println!("Starting viewer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(object, settings, args.cell_size)?;
    app.run()?;

    Ok(())
}
