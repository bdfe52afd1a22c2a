//! Vector and matrix helpers on top of `nalgebra`.
//!
//! Points and directions are `f64` column vectors. Matrices hold basis
//! vectors as columns.

use nalgebra::{Matrix3, Matrix3x2, Vector2, Vector3};

use crate::error::GeometryError;

pub type Vec2 = Vector2<f64>;
pub type Vec3 = Vector3<f64>;
pub type Mat3 = Matrix3<f64>;

/// Lengths and differences below this are treated as zero.
pub const EPSILON: f64 = 1e-9;

pub fn is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Normalize `v`, failing when it has no direction.
pub fn normalize(v: &Vec3, what: &'static str) -> Result<Vec3, GeometryError> {
    if !is_finite(v) {
        return Err(GeometryError::NonFinite(what));
    }
    v.try_normalize(EPSILON).ok_or(GeometryError::ZeroLength(what))
}

/// Normalize every column of `m` independently.
pub fn normalize_columns(m: &Mat3) -> Result<Mat3, GeometryError> {
    let mut normalized = *m;
    for mut column in normalized.column_iter_mut() {
        let norm = column.norm();
        if !norm.is_finite() {
            return Err(GeometryError::NonFinite("basis column"));
        }
        if norm < EPSILON {
            return Err(GeometryError::ZeroLength("basis column"));
        }
        column /= norm;
    }
    Ok(normalized)
}

/// The two columns spanning the image plane (right and up) of a camera basis.
pub fn image_plane(basis: &Mat3) -> Matrix3x2<f64> {
    basis.fixed_columns::<2>(0).into_owned()
}

/// Numeric "same point" check used to detect a pointer that did not move.
pub fn same_point(a: &Vec3, b: &Vec3) -> bool {
    (a - b).amax() <= EPSILON
}

/// Cosine-safe angle between two unit vectors.
pub fn angle_between_units(a: &Vec3, b: &Vec3) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos()
}
