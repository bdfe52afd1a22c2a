//! Render a single frame of an STL model to stdout, without entering raw mode.
//!
//! Usage: snapshot [model.stl] [perspective]

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use wireview_core::{ProjectionMode, Scene, ViewSettings};
use wireview_terminal::{load_object, AsciiRenderer};

fn main() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);
    let model = args.next().map(PathBuf::from);
    let mut settings = ViewSettings::default();
    if args.next().as_deref() == Some("perspective") {
        settings.projection = ProjectionMode::Perspective;
    }

    let object = load_object(model.as_deref())?;
    println!("{} polygons", object.polygons().len());

    let scene = Scene::new(object, settings);
    let mut renderer = AsciiRenderer::new(80, 40, 4.0);
    scene.on_frame(&mut renderer);

    let mut stdout = io::stdout().lock();
    for row in renderer.rows() {
        writeln!(stdout, "{}", row.trim_end())?;
    }
    Ok(())
}
