//! View state and the redraw coordinator.
//!
//! Every field of [`ViewState`] is an independent [`Store`]. Changing the
//! camera, the projection or the object marks the scene dirty; the host
//! calls [`Scene::on_frame`] once per display frame and at most one render
//! happens per call, built from whatever the state holds at that moment.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::algebra::{Vec2, Vec3};
use crate::camera::CameraFrame;
use crate::config::ViewSettings;
use crate::error::GeometryError;
use crate::geometry::{cull, to_edges, Object};
use crate::observable::{Store, Subscription};
use crate::projection::{ProjectionMode, Projector};

/// How a primary-button drag rotates the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Roll about the viewing axis, pivoting on `look`.
    Rotate2d,
    /// Roll about the viewing axis, pivoting on the world origin.
    Rotate2dCentered,
    /// Free trackball rotation about the world origin.
    #[default]
    Rotate3d,
}

impl RotationMode {
    pub fn next(self) -> Self {
        match self {
            Self::Rotate2d => Self::Rotate2dCentered,
            Self::Rotate2dCentered => Self::Rotate3d,
            Self::Rotate3d => Self::Rotate2d,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Rotate2d => "2D rotation",
            Self::Rotate2dCentered => "2D rotation (centered)",
            Self::Rotate3d => "3D rotation",
        }
    }
}

/// The mutable state of a viewing session.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub eye: Store<Vec3>,
    pub look: Store<Vec3>,
    pub up: Store<Vec3>,
    pub projection: Store<ProjectionMode>,
    pub rotation: Store<RotationMode>,
    pub object: Store<Rc<Object>>,
}

impl ViewState {
    pub fn new(object: Object, settings: &ViewSettings) -> Self {
        let camera = CameraFrame::centered(settings.camera_distance);
        Self {
            eye: Store::new(camera.eye),
            look: Store::new(camera.look),
            up: Store::new(camera.up),
            projection: Store::new(settings.projection),
            rotation: Store::new(settings.rotation),
            object: Store::new(Rc::new(object)),
        }
    }

    pub fn camera(&self) -> CameraFrame {
        CameraFrame::new(self.eye.get(), self.look.get(), self.up.get())
    }

    /// Write the fields of `camera` that differ from the current state.
    pub fn set_camera(&self, camera: &CameraFrame) {
        for (store, value) in [(&self.eye, camera.eye), (&self.look, camera.look), (&self.up, camera.up)] {
            if store.get() != value {
                store.set(value);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedrawState {
    #[default]
    Idle,
    Dirty,
    /// A render is running; `requested` records a change made meanwhile.
    Rendering { requested: bool },
}

/// Coalesces redraw requests into at most one render per frame.
#[derive(Debug, Clone, Default)]
pub struct RedrawScheduler {
    state: Rc<Cell<RedrawState>>,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RedrawState {
        self.state.get()
    }

    pub fn request(&self) {
        let next = match self.state.get() {
            RedrawState::Idle => {
                log::trace!("redraw requested");
                RedrawState::Dirty
            }
            RedrawState::Dirty => RedrawState::Dirty,
            RedrawState::Rendering { .. } => RedrawState::Rendering { requested: true },
        };
        self.state.set(next);
    }

    /// Enter `Rendering` if a redraw is pending.
    fn begin(&self) -> bool {
        if self.state.get() == RedrawState::Dirty {
            self.state.set(RedrawState::Rendering { requested: false });
            true
        } else {
            false
        }
    }

    fn finish(&self) {
        let next = match self.state.get() {
            RedrawState::Rendering { requested: true } => RedrawState::Dirty,
            _ => RedrawState::Idle,
        };
        self.state.set(next);
    }
}

/// How the drawing collaborator should style a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    /// World coordinate axes.
    Axis,
    /// Object edges.
    Edge,
}

/// A projected line segment in centered screen coordinates (Y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
    pub stroke: Stroke,
}

/// Everything the drawing collaborator needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub projection: ProjectionMode,
    pub camera: CameraFrame,
    pub segments: Vec<Segment>,
    /// Projected world origin, if it is in front of the eye.
    pub origin: Option<Vec2>,
}

impl RenderFrame {
    pub fn strokes(&self, stroke: Stroke) -> impl Iterator<Item = &Segment> + '_ {
        self.segments.iter().filter(move |s| s.stroke == stroke)
    }
}

/// Receives rendered frames.
pub trait RenderSink {
    fn render(&mut self, frame: &RenderFrame);
}

impl<F: FnMut(&RenderFrame)> RenderSink for F {
    fn render(&mut self, frame: &RenderFrame) {
        self(frame)
    }
}

/// View state plus redraw scheduling for one viewing session.
pub struct Scene {
    state: ViewState,
    settings: ViewSettings,
    redraw: RedrawScheduler,
    subscriptions: Vec<Subscription>,
}

impl Scene {
    pub fn new(object: Object, settings: ViewSettings) -> Self {
        let state = ViewState::new(object, &settings);
        let redraw = RedrawScheduler::new();

        // Rotation mode changes no pixels.
        let subscriptions = vec![
            state.eye.subscribe(request_on_change(&redraw)),
            state.look.subscribe(request_on_change(&redraw)),
            state.up.subscribe(request_on_change(&redraw)),
            state.projection.subscribe(request_on_change(&redraw)),
            state.object.subscribe(request_on_change(&redraw)),
        ];

        Self {
            state,
            settings,
            redraw,
            subscriptions,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn camera(&self) -> CameraFrame {
        self.state.camera()
    }

    pub fn redraw_state(&self) -> RedrawState {
        self.redraw.state()
    }

    /// Ask for a redraw without changing state, e.g. after the surface was resized.
    pub fn request_redraw(&self) {
        self.redraw.request();
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw.state() == RedrawState::Dirty
    }

    pub fn cycle_projection(&self) {
        self.state.projection.update(|mode| mode.next());
    }

    pub fn cycle_rotation(&self) {
        self.state.rotation.update(|mode| mode.next());
    }

    /// Put the camera back on negative Z looking at the origin.
    pub fn reset_camera(&self) {
        self.state
            .set_camera(&CameraFrame::centered(self.settings.camera_distance));
    }

    pub fn set_object(&self, object: Object) {
        self.state.object.set(Rc::new(object));
    }

    /// Cull, extract edges and project the current state.
    pub fn build_frame(&self) -> Result<RenderFrame, GeometryError> {
        let camera = self.state.camera();
        let projection = self.state.projection.get();
        let projector = Projector::new(projection, &camera, self.settings.projection_plane)?;

        let object = self.state.object.get();
        let visible = cull(object.polygons(), &camera.basis());
        let visible_count = visible.len();
        let edges = to_edges(visible);

        let axis_length = self.settings.axis_length;
        let axes = [Vec3::x(), Vec3::y(), Vec3::z()].map(|axis| (Vec3::zeros(), axis * axis_length, Stroke::Axis));
        let segments: Vec<Segment> = axes
            .into_iter()
            .chain(edges.iter().map(|edge| (edge.a, edge.b, Stroke::Edge)))
            .filter_map(|(from, to, stroke)| {
                let (from, to) = projector.project_segment(&from, &to)?;
                Some(Segment { from, to, stroke })
            })
            .collect();

        log::trace!(
            "{} frame: {visible_count}/{} polygons visible, {} edges, {} segments",
            projection.name(),
            object.polygons().len(),
            edges.len(),
            segments.len()
        );

        Ok(RenderFrame {
            projection,
            camera,
            segments,
            origin: projector.project(&Vec3::zeros()),
        })
    }

    /// Display-frame boundary. Renders into `sink` if anything changed since
    /// the last render and reports whether the sink was called.
    pub fn on_frame(&self, sink: &mut dyn RenderSink) -> bool {
        if !self.redraw.begin() {
            return false;
        }
        let rendered = match self.build_frame() {
            Ok(frame) => {
                sink.render(&frame);
                true
            }
            Err(err) => {
                log::warn!("skipping frame: {err}");
                false
            }
        };
        self.redraw.finish();
        rendered
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
    }
}

fn request_on_change<T: 'static>(redraw: &RedrawScheduler) -> impl FnMut(&T) + 'static {
    let redraw = redraw.clone();
    move |_: &T| redraw.request()
}
