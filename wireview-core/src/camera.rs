//! Camera reference frame built from eye, look and up.

use crate::algebra::{is_finite, normalize_columns, Mat3, Vec3};
use crate::error::GeometryError;

/// Camera placement: where it is, what it looks at and which way is up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub eye: Vec3,
    pub look: Vec3,
    pub up: Vec3,
}

impl CameraFrame {
    pub fn new(eye: Vec3, look: Vec3, up: Vec3) -> Self {
        Self { eye, look, up }
    }

    /// The default camera: `distance` units down negative Z, looking at the
    /// origin with Y up.
    pub fn centered(distance: f64) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, -distance),
            look: Vec3::zeros(),
            up: Vec3::y(),
        }
    }

    /// `self`, or [`GeometryError::NonFinite`] if any coordinate is NaN or
    /// infinite.
    pub fn checked(self) -> Result<Self, GeometryError> {
        if [self.eye, self.look, self.up].iter().all(is_finite) {
            Ok(self)
        } else {
            Err(GeometryError::NonFinite("camera"))
        }
    }

    /// Viewing direction, `look - eye`. Not normalized.
    pub fn forward(&self) -> Vec3 {
        self.look - self.eye
    }

    /// Basis matrix with columns `[up × forward, up, forward]`.
    ///
    /// The columns are not normalized and nothing is validated here: when `up`
    /// is parallel to `forward` the first column vanishes and the matrix is
    /// singular. Use [`CameraFrame::orthonormal_basis`] or
    /// [`normalize_columns`] before inverting it.
    pub fn basis(&self) -> Mat3 {
        let forward = self.forward();
        Mat3::from_columns(&[self.up.cross(&forward), self.up, forward])
    }

    /// [`CameraFrame::basis`] with every column normalized.
    pub fn orthonormal_basis(&self) -> Result<Mat3, GeometryError> {
        normalize_columns(&self.basis())
    }
}
