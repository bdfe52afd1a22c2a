//! Rigid rotation of points about an arbitrary axis through an arbitrary center.
//!
//! The rotation is built as a change of basis: a homogeneous matrix `B` whose
//! columns are two vectors spanning the plane normal to the axis, the axis
//! itself and the center. In that frame the rotation is an ordinary rotation
//! about Z, so the full transform is `B · R · B⁻¹`.

use nalgebra::{Matrix4, Point3, Vector3};

use crate::algebra::{normalize, Vec3, EPSILON};
use crate::error::GeometryError;

/// Two unit vectors spanning the plane normal to the unit vector `axis`.
///
/// The returned `(v1, v2)` always satisfy `v1 × v2 = axis`, so `[v1, v2, axis]`
/// is a right-handed frame. Axis-aligned axes get canonical vectors.
pub fn find_plane_basis(axis: &Vec3) -> (Vec3, Vec3) {
    let v1 = if axis.y == 0.0 && axis.z == 0.0 {
        Vec3::y()
    } else if axis.x == 0.0 && axis.z == 0.0 {
        Vec3::z()
    } else if axis.x == 0.0 && axis.y == 0.0 {
        Vec3::x()
    } else if axis.z.abs() > EPSILON {
        // Solve v1 · axis = 0 with v1 = (1, 0, z).
        Vec3::new(1.0, 0.0, -axis.x / axis.z).normalize()
    } else {
        Vec3::z()
    };
    (v1, axis.cross(&v1))
}

/// Homogeneous matrix rotating by `angle` radians (right-handed) about `axis`
/// through `center`.
pub fn rotation_matrix(center: &Vec3, axis: &Vec3, angle: f64) -> Result<Matrix4<f64>, GeometryError> {
    if !angle.is_finite() {
        return Err(GeometryError::NonFinite("rotation angle"));
    }
    let axis = normalize(axis, "rotation axis")?;
    let (v1, v2) = find_plane_basis(&axis);

    let new_basis = Matrix4::new(
        v1.x, v2.x, axis.x, center.x,
        v1.y, v2.y, axis.y, center.y,
        v1.z, v2.z, axis.z, center.z,
        0.0, 0.0, 0.0, 1.0,
    );
    let to_basis = new_basis
        .try_inverse()
        .ok_or(GeometryError::Singular("rotation change of basis"))?;
    let about_z = Matrix4::new_rotation(Vector3::new(0.0, 0.0, angle));

    Ok(new_basis * about_z * to_basis)
}

/// Rotate every point by `angle` radians about `axis` through `center`.
pub fn rotate(center: &Vec3, axis: &Vec3, angle: f64, points: &[Vec3]) -> Result<Vec<Vec3>, GeometryError> {
    let transform = rotation_matrix(center, axis, angle)?;
    Ok(points
        .iter()
        .map(|p| transform.transform_point(&Point3::from(*p)).coords)
        .collect())
}

/// Rotate directions (no center) by `angle` radians about `axis`.
pub fn rotate_direction(axis: &Vec3, angle: f64, direction: &Vec3) -> Result<Vec3, GeometryError> {
    let transform = rotation_matrix(&Vec3::zeros(), axis, angle)?;
    Ok(transform.transform_vector(direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn rotate_one(center: [f64; 3], axis: [f64; 3], angle: f64, point: [f64; 3]) -> Vec3 {
        rotate(&Vec3::from(center), &Vec3::from(axis), angle, &[Vec3::from(point)]).unwrap()[0]
    }

    #[test]
    fn test_quarter_turns_about_world_axes() {
        let cases = [
            ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        for (axis, point, expected) in cases {
            let rotated = rotate_one([0.0; 3], axis, FRAC_PI_2, point);
            assert_relative_eq!(rotated, Vec3::from(expected), epsilon = 1e-4);
        }
    }

    #[test]
    fn test_negative_axis_turns_the_other_way() {
        let rotated = rotate_one([0.0; 3], [-1.0, 0.0, 0.0], FRAC_PI_2, [0.0, 1.0, 0.0]);
        assert_relative_eq!(rotated, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-9);
    }

    #[test]
    fn test_half_turn_about_offset_center() {
        let rotated = rotate_one([0.0, 0.0, 0.5], [0.0, 1.0, 0.0], PI, [0.0, 0.0, 1.0]);
        assert_relative_eq!(rotated, Vec3::zeros(), epsilon = 1e-4);
    }

    #[test]
    fn test_diagonal_axis_cycles_coordinate_axes() {
        let third = 2.0 * PI / 3.0;
        let rotated = rotate_one([0.0; 3], [1.0, 1.0, 1.0], third, [1.0, 0.0, 0.0]);
        assert_relative_eq!(rotated, Vec3::y(), epsilon = 1e-9);
    }

    #[test]
    fn test_plane_basis_is_right_handed() {
        let axes = [
            Vec3::x(),
            Vec3::y(),
            Vec3::z(),
            -Vec3::x(),
            -Vec3::z(),
            Vec3::new(1.0, 2.0, 3.0).normalize(),
            Vec3::new(1.0, -1.0, 0.0).normalize(),
        ];
        for axis in axes {
            let (v1, v2) = find_plane_basis(&axis);
            assert_relative_eq!(v1.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(v2.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(v1.dot(&axis), 0.0, epsilon = 1e-12);
            assert_relative_eq!(v1.cross(&v2), axis, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_plane_basis_for_y_axis() {
        assert_eq!(find_plane_basis(&Vec3::y()), (Vec3::z(), Vec3::x()));
    }

    #[test]
    fn test_zero_axis_is_degenerate() {
        let result = rotate(&Vec3::zeros(), &Vec3::zeros(), 1.0, &[Vec3::x()]);
        assert_eq!(result, Err(GeometryError::ZeroLength("rotation axis")));
    }

    #[test]
    fn test_infinite_angle_is_rejected() {
        assert_eq!(
            rotate(&Vec3::zeros(), &Vec3::z(), f64::INFINITY, &[Vec3::x()]),
            Err(GeometryError::NonFinite("rotation angle"))
        );
        assert_eq!(
            rotate_direction(&Vec3::new(f64::NAN, 0.0, 1.0), 0.5, &Vec3::x()),
            Err(GeometryError::NonFinite("rotation axis"))
        );
    }

    #[test]
    fn test_rotate_direction_ignores_translation() {
        let up = rotate_direction(&Vec3::z(), FRAC_PI_2, &Vec3::y()).unwrap();
        assert_relative_eq!(up, -Vec3::x(), epsilon = 1e-12);
    }
}
