//! Terminal front end for the wireframe viewer

use anyhow::Context as _;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::fs::{self, File};
use std::io::{self, stdout, BufReader, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use wireview_core::{stl, Object, PointerButton, PointerController, PointerEvent, Scene, ViewSettings};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Edge length of the cube shown when no model is given.
pub const DEFAULT_CUBE_SIZE: f64 = 100.0;

/// Read view settings from a JSON file, or use the defaults.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<ViewSettings> {
    let Some(path) = path else {
        return Ok(ViewSettings::default());
    };
    let file = File::open(path).with_context(|| format!("opening settings {}", path.display()))?;
    let settings: ViewSettings = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing settings {}", path.display()))?;
    settings
        .validate()
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    log::info!("loaded settings from {}", path.display());
    Ok(settings)
}

/// Read an STL model, or build the default cube.
pub fn load_object(path: Option<&Path>) -> anyhow::Result<Object> {
    let Some(path) = path else {
        return Ok(Object::cube(DEFAULT_CUBE_SIZE));
    };
    let data = fs::read(path).with_context(|| format!("reading model {}", path.display()))?;
    let object = stl::parse_stl(&data).with_context(|| format!("parsing model {}", path.display()))?;
    Ok(object)
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Middle => PointerButton::Auxiliary,
        MouseButton::Right => PointerButton::Secondary,
    }
}

/// Interactive viewer session on the terminal.
pub struct TerminalApp {
    scene: Scene,
    controller: PointerController,
    renderer: AsciiRenderer,
    running: bool,
    status_dirty: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(object: Object, settings: ViewSettings, cell_size: f64) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(object, settings, cell_size, width, height))
    }

    pub fn with_size(object: Object, settings: ViewSettings, cell_size: f64, width: u16, height: u16) -> Self {
        Self {
            scene: Scene::new(object, settings),
            controller: PointerController::new(),
            renderer: AsciiRenderer::new(width as usize, height as usize, cell_size),
            running: true,
            status_dirty: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let deadline = Instant::now() + target_frame_time;

            // Drain input until the next frame boundary
            while self.running {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if !event::poll(remaining)? {
                    break;
                }
                self.handle_event(event::read()?);
            }

            let rendered = self.scene.on_frame(&mut self.renderer);
            if rendered {
                self.frame_count += 1;
            }
            if rendered || self.status_dirty {
                self.present()?;
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
                self.status_dirty = true;
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                log::debug!("terminal resized to {width}x{height}");
                self.renderer.resize(width as usize, height as usize);
                self.scene.request_redraw();
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('p') => {
                self.scene.cycle_projection();
                self.status_dirty = true;
            }
            KeyCode::Char('r') => {
                self.scene.cycle_rotation();
                self.status_dirty = true;
            }
            KeyCode::Char('c') => {
                self.scene.reset_camera();
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(button) => {
                self.controller.pointer_down(pointer_button(button));
            }
            MouseEventKind::Drag(_) => {
                let position = self.renderer.to_centered(mouse.column, mouse.row);
                let ctrl = mouse.modifiers.contains(KeyModifiers::CONTROL);
                self.controller
                    .pointer_move(PointerEvent::new(position).with_ctrl(ctrl), &self.scene);
            }
            MouseEventKind::Up(_) => {
                self.controller.pointer_up();
            }
            _ => {}
        }
    }

    pub fn status_line(&self) -> String {
        let state = self.scene.state();
        format!(
            "Wireview | {} | {} | FPS: {:.1} | drag=rotate ctrl/middle-drag=pan P=projection R=rotation C=center Q=quit",
            state.projection.get().name(),
            state.rotation.get().name(),
            self.fps
        )
    }

    fn present(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let mut status = self.status_line();
        status.truncate(self.renderer.width());
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        stdout.flush()?;
        self.status_dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wireview_core::{ProjectionMode, RotationMode, Vec3};

    fn app() -> TerminalApp {
        TerminalApp::with_size(Object::cube(DEFAULT_CUBE_SIZE), ViewSettings::default(), 4.0, 80, 40)
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16, modifiers: KeyModifiers) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers,
        })
    }

    #[test]
    fn test_mode_keys() {
        let mut app = app();
        app.handle_event(key('p'));
        app.handle_event(key('r'));
        let state = app.scene().state();
        assert_eq!(state.projection.get(), ProjectionMode::Perspective);
        assert_eq!(state.rotation.get(), RotationMode::Rotate2d);
        assert!(app.status_line().contains("perspective"));
        assert!(app.is_running());
        app.handle_event(key('q'));
        assert!(!app.is_running());
    }

    #[test]
    fn test_left_drag_rotates_camera() {
        let mut app = app();
        let before = app.scene().camera();
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 40, 20, KeyModifiers::NONE));
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 40, 20, KeyModifiers::NONE));
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 46, 20, KeyModifiers::NONE));
        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 46, 20, KeyModifiers::NONE));

        let after = app.scene().camera();
        assert!((after.eye - before.eye).norm() > 1.0);
        assert_eq!(after.look, before.look);
        assert!(app.scene().needs_redraw());
    }

    #[test]
    fn test_ctrl_drag_pans_and_reset_recenters() {
        let mut app = app();
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 40, 20, KeyModifiers::CONTROL));
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 40, 20, KeyModifiers::CONTROL));
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 45, 20, KeyModifiers::CONTROL));
        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 45, 20, KeyModifiers::CONTROL));
        assert!(app.scene().camera().look.norm() > 1.0);

        app.handle_event(key('c'));
        assert_eq!(app.scene().camera().look, Vec3::zeros());
    }

    #[test]
    fn test_resize_requests_redraw() {
        let mut app = app();
        let mut sink = |_: &wireview_core::RenderFrame| {};
        assert!(app.scene().on_frame(&mut sink));
        app.handle_event(Event::Resize(100, 30));
        assert!(app.scene().needs_redraw());
        assert_eq!(app.renderer.width(), 100);
    }

    #[test]
    fn test_settings_file_is_validated() {
        let dir = std::env::temp_dir();
        let good = dir.join(format!("wireview-settings-good-{}.json", std::process::id()));
        let bad = dir.join(format!("wireview-settings-bad-{}.json", std::process::id()));
        fs::write(&good, r#"{ "trackball_radius": 70.0 }"#).unwrap();
        fs::write(&bad, r#"{ "roll_sensitivity": 0.0 }"#).unwrap();

        assert_eq!(load_settings(Some(&good)).unwrap().trackball_radius, 70.0);
        let err = load_settings(Some(&bad)).unwrap_err();
        assert!(format!("{err:#}").contains("roll_sensitivity"));

        fs::remove_file(good).unwrap();
        fs::remove_file(bad).unwrap();
    }

    #[test]
    fn test_default_object_is_cube() {
        let object = load_object(None).unwrap();
        assert_eq!(object.polygons().len(), 6);
        assert_eq!(load_settings(None).unwrap(), ViewSettings::default());
    }
}
