//! Wireview Web - wireframe viewer on an HTML canvas
//!
//! The host page forwards pointer and key input and calls `frame` from
//! `requestAnimationFrame`; the canvas is only repainted when the view changed.

use std::f64::consts::TAU;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use wireview_core::{
    stl, Object, PointerButton, PointerController, PointerEvent, RenderFrame, RenderSink, Scene, Segment, Stroke,
    Vec2, ViewSettings, Viewport,
};

const BACKGROUND: &str = "#ffffff";
const AXIS_COLOR: &str = "#3060d0";
const EDGE_COLOR: &str = "#20a040";
const ORIGIN_COLOR: &str = "#d03030";
const ORIGIN_RADIUS: f64 = 3.0;
const DEFAULT_CUBE_SIZE: f64 = 100.0;

/// Map a DOM `MouseEvent.button` value.
fn pointer_button(button: i16) -> Option<PointerButton> {
    match button {
        0 => Some(PointerButton::Primary),
        1 => Some(PointerButton::Auxiliary),
        2 => Some(PointerButton::Secondary),
        _ => None,
    }
}

struct CanvasSink<'a> {
    context: &'a CanvasRenderingContext2d,
    viewport: Viewport,
}

impl CanvasSink<'_> {
    #[allow(deprecated)]
    fn set_color(&self, color: &str) {
        let color = JsValue::from_str(color);
        self.context.set_stroke_style(&color);
        self.context.set_fill_style(&color);
    }

    fn stroke_segments<'s>(&self, segments: impl Iterator<Item = &'s Segment>, color: &str) {
        self.set_color(color);
        self.context.begin_path();
        for segment in segments {
            let (x0, y0) = self.viewport.to_surface(&segment.from);
            let (x1, y1) = self.viewport.to_surface(&segment.to);
            self.context.move_to(x0, y0);
            self.context.line_to(x1, y1);
        }
        self.context.stroke();
    }

    fn dot(&self, point: &Vec2, color: &str) {
        let (x, y) = self.viewport.to_surface(point);
        self.set_color(color);
        self.context.begin_path();
        if self.context.arc(x, y, ORIGIN_RADIUS, 0.0, TAU).is_ok() {
            self.context.fill();
        }
    }
}

impl RenderSink for CanvasSink<'_> {
    fn render(&mut self, frame: &RenderFrame) {
        self.set_color(BACKGROUND);
        self.context
            .fill_rect(0.0, 0.0, self.viewport.width, self.viewport.height);
        self.stroke_segments(frame.strokes(Stroke::Axis), AXIS_COLOR);
        self.stroke_segments(frame.strokes(Stroke::Edge), EDGE_COLOR);
        if let Some(origin) = &frame.origin {
            self.dot(origin, ORIGIN_COLOR);
        }
    }
}

#[wasm_bindgen]
pub struct WebViewer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    scene: Scene,
    controller: PointerController,
}

#[wasm_bindgen]
impl WebViewer {
    /// Attach a viewer showing a cube to the canvas with the given id.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebViewer, JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str(&format!("{canvas_id} is not a canvas")))?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(WebViewer {
            canvas,
            context,
            scene: Scene::new(Object::cube(DEFAULT_CUBE_SIZE), ViewSettings::default()),
            controller: PointerController::new(),
        })
    }

    pub fn pointer_down(&mut self, button: i16) {
        if let Some(button) = pointer_button(button) {
            self.controller.pointer_down(button);
        }
    }

    /// Pointer position in canvas pixels, origin top left.
    pub fn pointer_move(&mut self, x: f64, y: f64, ctrl: bool) {
        let position = self.viewport().to_centered(x, y);
        self.controller
            .pointer_move(PointerEvent::new(position).with_ctrl(ctrl), &self.scene);
    }

    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
    }

    pub fn cycle_projection(&self) {
        self.scene.cycle_projection();
    }

    pub fn cycle_rotation(&self) {
        self.scene.cycle_rotation();
    }

    pub fn reset_camera(&self) {
        self.scene.reset_camera();
    }

    /// Repaint after the canvas was resized.
    pub fn resized(&self) {
        self.scene.request_redraw();
    }

    #[wasm_bindgen(getter)]
    pub fn projection(&self) -> String {
        self.scene.state().projection.get().name().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> String {
        self.scene.state().rotation.get().name().to_string()
    }

    /// Replace the shown object with an STL model (ASCII or binary).
    pub fn load_stl(&self, data: &[u8]) -> Result<usize, JsValue> {
        let object = stl::parse_stl(data).map_err(|err| JsValue::from_str(&err.to_string()))?;
        let count = object.polygons().len();
        self.scene.set_object(object);
        Ok(count)
    }

    /// Call once per animation frame. Returns whether the canvas was repainted.
    pub fn frame(&self) -> bool {
        let mut sink = CanvasSink {
            context: &self.context,
            viewport: self.viewport(),
        };
        self.scene.on_frame(&mut sink)
    }
}

impl WebViewer {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }
}
