//! Pointer gestures: trackball rotation, roll about the viewing axis, and pan.
//!
//! Each gesture remembers where the pointer was on the previous move in a
//! [`GestureState`]. The first move of a drag only records that anchor;
//! later moves turn the difference into a camera update. Releasing the
//! button clears the state, which is all it takes to cancel a gesture.

use crate::algebra::{same_point, Vec2, Vec3};
use crate::camera::CameraFrame;
use crate::config::ViewSettings;
use crate::error::GeometryError;
use crate::scene::{RotationMode, Scene};
use crate::trackball::{compute_rotation, trackball};
use crate::transform::{rotate, rotate_direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    /// Usually the middle button.
    Auxiliary,
    Secondary,
}

/// A pointer position in centered coordinates (origin in the middle of the
/// surface, Y up) plus the modifier state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Vec2,
    pub ctrl: bool,
}

impl PointerEvent {
    pub fn new(position: Vec2) -> Self {
        Self { position, ctrl: false }
    }

    pub fn with_ctrl(self, ctrl: bool) -> Self {
        Self { ctrl, ..self }
    }
}

/// Size of the drawing surface, for converting between surface coordinates
/// (origin top left, Y down) and centered ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn to_centered(&self, x: f64, y: f64) -> Vec2 {
        Vec2::new(x - self.width / 2.0, self.height / 2.0 - y)
    }

    pub fn to_surface(&self, point: &Vec2) -> (f64, f64) {
        (self.width / 2.0 + point.x, self.height / 2.0 - point.y)
    }
}

/// Per-drag anchors for each gesture kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureState {
    trackball: Option<Vec3>,
    roll: Option<f64>,
    pan: Option<Vec2>,
}

impl GestureState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Trackball rotation of the camera about the world origin.
pub fn rotation_3d(
    gesture: &mut GestureState,
    pointer: Vec2,
    camera: &CameraFrame,
    settings: &ViewSettings,
) -> Result<CameraFrame, GeometryError> {
    let current = trackball(Vec2::zeros(), settings.trackball_radius, pointer);
    let Some(previous) = gesture.trackball.replace(current) else {
        return Ok(*camera);
    };
    if same_point(&previous, &current) {
        return Ok(*camera);
    }

    let rotation = compute_rotation(&previous, &current, Some(&camera.basis()))?;
    let moved = rotate(&Vec3::zeros(), &rotation.axis, rotation.angle, &[camera.eye, camera.look])?;
    let up = rotate_direction(&rotation.axis, rotation.angle, &camera.up)?;
    Ok(CameraFrame::new(moved[0], moved[1], up))
}

/// Roll the camera about its viewing axis, pivoting on `center`.
///
/// Vertical pointer travel sets the angle: `roll_sensitivity` units per radian.
pub fn rotation_2d(
    gesture: &mut GestureState,
    pointer: Vec2,
    center: &Vec3,
    camera: &CameraFrame,
    settings: &ViewSettings,
) -> Result<CameraFrame, GeometryError> {
    let current = pointer.y;
    let Some(previous) = gesture.roll.replace(current) else {
        return Ok(*camera);
    };
    if previous == current {
        return Ok(*camera);
    }

    let axis = camera.forward();
    let angle = (current - previous) / settings.roll_sensitivity;
    if !angle.is_finite() {
        return Err(GeometryError::NonFinite("roll angle"));
    }
    let moved = rotate(center, &axis, angle, &[camera.eye, camera.look])?;
    let up = rotate_direction(&axis, angle, &camera.up)?;
    Ok(CameraFrame::new(moved[0], moved[1], up))
}

/// Slide eye and look together in the image plane so the scene follows the
/// pointer.
pub fn translate(gesture: &mut GestureState, pointer: Vec2, camera: &CameraFrame) -> Result<CameraFrame, GeometryError> {
    let Some(previous) = gesture.pan.replace(pointer) else {
        return Ok(*camera);
    };
    if previous == pointer {
        return Ok(*camera);
    }

    let delta = pointer - previous;
    let offset = camera.orthonormal_basis()? * Vec3::new(delta.x, delta.y, 0.0);
    Ok(CameraFrame::new(camera.eye - offset, camera.look - offset, camera.up))
}

/// Turns pointer down/move/up into camera updates on a [`Scene`].
#[derive(Debug, Default)]
pub struct PointerController {
    gesture: GestureState,
    held: Option<PointerButton>,
}

impl PointerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn held(&self) -> Option<PointerButton> {
        self.held
    }

    pub fn pointer_down(&mut self, button: PointerButton) {
        self.held = Some(button);
        self.gesture.clear();
    }

    /// Apply a pointer move. Ignored unless a button is held.
    ///
    /// Primary drags rotate according to the scene's rotation mode; primary
    /// with ctrl, or an auxiliary drag, pans.
    pub fn pointer_move(&mut self, event: PointerEvent, scene: &Scene) {
        let Some(button) = self.held else {
            return;
        };
        let camera = scene.camera();
        let settings = scene.settings();

        let result = match (button, event.ctrl) {
            (PointerButton::Primary, false) => match scene.state().rotation.get() {
                RotationMode::Rotate3d => rotation_3d(&mut self.gesture, event.position, &camera, settings),
                RotationMode::Rotate2d => {
                    rotation_2d(&mut self.gesture, event.position, &camera.look, &camera, settings)
                }
                RotationMode::Rotate2dCentered => {
                    rotation_2d(&mut self.gesture, event.position, &Vec3::zeros(), &camera, settings)
                }
            },
            (PointerButton::Primary, true) | (PointerButton::Auxiliary, _) => {
                translate(&mut self.gesture, event.position, &camera)
            }
            (PointerButton::Secondary, _) => return,
        };

        match result.and_then(|updated| updated.checked()) {
            Ok(updated) => scene.state().set_camera(&updated),
            Err(err) => log::debug!("skipping pointer update: {err}"),
        }
    }

    pub fn pointer_up(&mut self) {
        self.held = None;
        self.gesture.clear();
    }
}
