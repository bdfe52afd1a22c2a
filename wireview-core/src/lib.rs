//! Wireview core library: the camera and projection engine.
//!
//! Pointer drags become trackball rotations of a camera frame; each frame the
//! object is culled, reduced to wireframe edges and projected either
//! orthographically or in perspective. Drawing the resulting 2D segments is
//! left to the front end through [`RenderSink`].

pub mod algebra;
pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod observable;
pub mod projection;
pub mod scene;
pub mod stl;
pub mod trackball;
pub mod transform;

// Re-export commonly used types
pub use algebra::{Vec2, Vec3};
pub use camera::CameraFrame;
pub use config::ViewSettings;
pub use error::{GeometryError, SettingsError, StlError};
pub use geometry::{cull, to_edges, Edge, Object, Polygon};
pub use gesture::{GestureState, PointerButton, PointerController, PointerEvent, Viewport};
pub use observable::{Store, Subscription};
pub use projection::{ProjectionMode, ProjectionPlane, Projector};
pub use scene::{RenderFrame, RenderSink, RotationMode, Scene, Segment, Stroke, ViewState};
pub use trackball::{compute_rotation, trackball, Rotation};
pub use transform::rotate;
