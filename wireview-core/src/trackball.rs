//! Virtual trackball: pointer positions to points on a sphere, and pairs of
//! those points to rotations.
//!
//! Inside the circle `x² + y² = r²/2` the pointer drags a point over the
//! sphere `z = √(r² − x² − y²)`. Outside it the hyperbolic sheet
//! `z = (r²/2) / √(x² + y²)` takes over, which meets the sphere exactly on that
//! circle, so the mapping stays continuous when the pointer leaves the ball.
//!
//! Points are in camera-local coordinates (x right, y up, z forward). The
//! visible hemisphere faces the eye, so the returned depth is negative.

use crate::algebra::{angle_between_units, normalize, normalize_columns, Mat3, Vec2, Vec3, EPSILON};
use crate::error::GeometryError;

/// A rotation about a unit `axis`, right-handed, by `angle` radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub axis: Vec3,
    pub angle: f64,
}

/// Map a pointer position onto the trackball centered at `center`.
pub fn trackball(center: Vec2, radius: f64, pointer: Vec2) -> Vec3 {
    let radius_squared = radius * radius;
    let from_center = pointer - center;
    let norm_squared = from_center.norm_squared();
    let z = if norm_squared < radius_squared / 2.0 {
        (radius_squared - norm_squared).sqrt()
    } else {
        (radius_squared / 2.0) / norm_squared.sqrt()
    };
    Vec3::new(pointer.x, pointer.y, -z)
}

/// Rotation that takes the camera from `previous` to `current`.
///
/// When `camera_basis` is given both points are taken as camera-local and
/// mapped into world space through the normalized basis first. The axis is
/// `current × previous`: applied to the camera it turns the view against the
/// drag, so the object under the pointer follows it.
///
/// Callers skip identical points beforehand; if they get here anyway the
/// zero-length axis is reported as [`GeometryError::ZeroLength`].
pub fn compute_rotation(
    previous: &Vec3,
    current: &Vec3,
    camera_basis: Option<&Mat3>,
) -> Result<Rotation, GeometryError> {
    let mut previous = normalize(previous, "trackball point")?;
    let mut current = normalize(current, "trackball point")?;
    if let Some(basis) = camera_basis {
        let to_world = normalize_columns(basis)?;
        previous = to_world * previous;
        current = to_world * current;
    }

    let axis = current.cross(&previous);
    if axis.norm() < EPSILON {
        return Err(GeometryError::ZeroLength("rotation axis"));
    }

    Ok(Rotation {
        axis: axis.normalize(),
        angle: angle_between_units(&previous, &current),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_trackball_boundary() {
        // r² / 2 = 100 and the pointer is 10 away: exactly on the switchover.
        let point = trackball(Vec2::new(10.0, 10.0), 200.0_f64.sqrt(), Vec2::new(10.0, 0.0));
        assert_relative_eq!(point.z.abs(), 10.0, epsilon = 1e-3);
    }

    #[test]
    fn test_trackball_branches_agree_on_circle() {
        let radius = 140.0_f64;
        let r2 = radius * radius / 2.0;
        let sphere = (radius * radius - r2).sqrt();
        let sheet = (radius * radius / 2.0) / r2.sqrt();
        assert_relative_eq!(sphere, sheet, epsilon = 1e-9);

        // Just inside and just outside the circle land on nearly the same depth.
        let edge = r2.sqrt();
        let inside = trackball(Vec2::zeros(), radius, Vec2::new(edge - 1e-7, 0.0));
        let outside = trackball(Vec2::zeros(), radius, Vec2::new(edge + 1e-7, 0.0));
        assert_relative_eq!(inside.z, outside.z, epsilon = 1e-4);
    }

    #[test]
    fn test_trackball_center_is_top_of_sphere() {
        let point = trackball(Vec2::zeros(), 70.0, Vec2::zeros());
        assert_eq!(point, Vec3::new(0.0, 0.0, -70.0));
    }

    #[test]
    fn test_trackball_far_pointer_flattens() {
        let point = trackball(Vec2::zeros(), 10.0, Vec2::new(1000.0, 0.0));
        assert_relative_eq!(point.z, -0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_compute_rotation_axis_and_angle() {
        let previous = Vec3::new(0.0, 0.0, -1.0);
        let current = Vec3::new(1.0, 0.0, -1.0);
        let rotation = compute_rotation(&previous, &current, None).unwrap();
        assert_relative_eq!(rotation.angle, std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
        assert_relative_eq!(rotation.axis, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_compute_rotation_in_camera_space() {
        // Camera looking down -X with Y up, so camera right is +Z.
        let basis = Mat3::from_columns(&[
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::new(-4.0, 0.0, 0.0),
        ]);
        let previous = Vec3::new(0.0, 0.0, -1.0);
        let current = Vec3::new(0.0, 1.0, -1.0);
        let rotation = compute_rotation(&previous, &current, Some(&basis)).unwrap();

        let world_previous = Vec3::new(1.0, 0.0, 0.0);
        let world_current = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert_relative_eq!(
            rotation.axis,
            world_current.cross(&world_previous).normalize(),
            epsilon = 1e-12
        );
        assert_relative_eq!(rotation.angle, std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
    }

    #[test]
    fn test_compute_rotation_identical_points() {
        let p = Vec3::new(3.0, 4.0, -5.0);
        assert_eq!(
            compute_rotation(&p, &p, None),
            Err(GeometryError::ZeroLength("rotation axis"))
        );
    }

    #[test]
    fn test_compute_rotation_never_nan() {
        let previous = Vec3::new(0.1, 0.2, -0.3);
        let current = Vec3::new(0.1 + 1e-8, 0.2, -0.3);
        let rotation = compute_rotation(&previous, &current, None).unwrap();
        assert!(rotation.angle.is_finite());
        assert!(rotation.axis.iter().all(|c| c.is_finite()));
    }
}
