//! Orthographic and perspective projection onto the camera's image plane.

use nalgebra::{Matrix2, Matrix2x3};
use serde::{Deserialize, Serialize};

use crate::algebra::{image_plane, normalize_columns, Mat3, Vec2, Vec3};
use crate::camera::CameraFrame;
use crate::error::GeometryError;

/// Camera-space depth at or below which a point counts as behind the eye.
pub const MIN_DEPTH: f64 = 1e-6;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    #[default]
    Orthographic,
    Perspective,
}

impl ProjectionMode {
    /// The mode a "cycle projection" command switches to.
    pub fn next(self) -> Self {
        match self {
            Self::Orthographic => Self::Perspective,
            Self::Perspective => Self::Orthographic,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Orthographic => "orthographic",
            Self::Perspective => "perspective",
        }
    }
}

/// Distance from the eye to the perspective projection plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionPlane {
    /// Distance of the eye from the world origin, so the origin keeps its
    /// scale while the camera orbits it.
    #[default]
    EyeDistance,
    /// A fixed focal length.
    Fixed(f64),
}

impl ProjectionPlane {
    pub fn distance(self, eye: &Vec3) -> f64 {
        match self {
            Self::EyeDistance => eye.norm(),
            Self::Fixed(distance) => distance,
        }
    }
}

/// Project `b` onto the image plane spanned by the first two columns of
/// `camera_basis` by least squares: `x̂ = (AᵗA)⁻¹ Aᵗ b`.
///
/// The basis is normalized here; pass it as [`CameraFrame::basis`] returns it.
pub fn orthographic_projection(b: &Vec3, camera_basis: &Mat3) -> Result<Vec2, GeometryError> {
    Ok(least_squares(camera_basis)? * b)
}

/// Perspective-project `p` as seen from `eye` onto a plane `plane_distance`
/// in front of it. Returns `None` when `p` is not in front of the eye.
///
/// The basis is normalized here; pass it as [`CameraFrame::basis`] returns it.
pub fn perspective_projection(
    p: &Vec3,
    camera_basis: &Mat3,
    eye: &Vec3,
    plane_distance: f64,
) -> Result<Option<Vec2>, GeometryError> {
    let to_camera = camera_inverse(camera_basis)?;
    let to_p = to_camera * p - to_camera * eye;
    Ok(divide_depth(&to_p, plane_distance))
}

fn least_squares(camera_basis: &Mat3) -> Result<Matrix2x3<f64>, GeometryError> {
    let a = image_plane(&normalize_columns(camera_basis)?);
    let at = a.transpose();
    let ata: Matrix2<f64> = at * a;
    let inverse = ata
        .try_inverse()
        .ok_or(GeometryError::Singular("image plane basis"))?;
    Ok(inverse * at)
}

fn camera_inverse(camera_basis: &Mat3) -> Result<Mat3, GeometryError> {
    normalize_columns(camera_basis)?
        .try_inverse()
        .ok_or(GeometryError::Singular("camera basis"))
}

fn divide_depth(to_p: &Vec3, plane_distance: f64) -> Option<Vec2> {
    if to_p.z.is_nan() || to_p.z <= MIN_DEPTH {
        return None;
    }
    let scale = plane_distance / to_p.z;
    finite(Vec2::new(to_p.x * scale, to_p.y * scale))
}

fn finite(p: Vec2) -> Option<Vec2> {
    (p.x.is_finite() && p.y.is_finite()).then_some(p)
}

/// A projection prepared for one camera, reused for every point of a frame.
#[derive(Debug, Clone)]
pub struct Projector {
    kind: ProjectorKind,
}

#[derive(Debug, Clone)]
enum ProjectorKind {
    Orthographic {
        pseudo_inverse: Matrix2x3<f64>,
        look: Vec3,
    },
    Perspective {
        to_camera: Mat3,
        eye: Vec3,
        plane_distance: f64,
    },
}

impl Projector {
    /// Prepare `mode` for `camera`.
    ///
    /// Orthographic projection is taken relative to `camera.look`, so a
    /// panned camera (which moves `look`) sees the scene shift.
    pub fn new(mode: ProjectionMode, camera: &CameraFrame, plane: ProjectionPlane) -> Result<Self, GeometryError> {
        let basis = camera.basis();
        let kind = match mode {
            ProjectionMode::Orthographic => ProjectorKind::Orthographic {
                pseudo_inverse: least_squares(&basis)?,
                look: camera.look,
            },
            ProjectionMode::Perspective => {
                let to_camera = camera_inverse(&basis)?;
                ProjectorKind::Perspective {
                    to_camera,
                    eye: to_camera * camera.eye,
                    plane_distance: plane.distance(&camera.eye),
                }
            }
        };
        Ok(Self { kind })
    }

    /// Project a single point, `None` if it is at or behind the eye or does
    /// not land on a finite position.
    pub fn project(&self, point: &Vec3) -> Option<Vec2> {
        match &self.kind {
            ProjectorKind::Orthographic { pseudo_inverse, look } => finite(pseudo_inverse * (point - look)),
            ProjectorKind::Perspective { to_camera, eye, plane_distance } => {
                divide_depth(&(to_camera * point - eye), *plane_distance)
            }
        }
    }

    /// Project a segment, clipping it against the eye plane first.
    ///
    /// Returns `None` when the whole segment is behind the eye.
    pub fn project_segment(&self, from: &Vec3, to: &Vec3) -> Option<(Vec2, Vec2)> {
        match &self.kind {
            ProjectorKind::Orthographic { .. } => Some((self.project(from)?, self.project(to)?)),
            ProjectorKind::Perspective { to_camera, eye, plane_distance } => {
                let mut a = to_camera * from - eye;
                let mut b = to_camera * to - eye;
                // Clip slightly past MIN_DEPTH so the clipped end stays projectable.
                let near = MIN_DEPTH * 2.0;
                match (a.z > near, b.z > near) {
                    (false, false) => return None,
                    (true, false) => b = a + (b - a) * ((a.z - near) / (a.z - b.z)),
                    (false, true) => a = b + (a - b) * ((b.z - near) / (b.z - a.z)),
                    (true, true) => {}
                }
                Some((divide_depth(&a, *plane_distance)?, divide_depth(&b, *plane_distance)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn basis(c0: [f64; 3], c1: [f64; 3], c2: [f64; 3]) -> Mat3 {
        Mat3::from_columns(&[Vec3::from(c0), Vec3::from(c1), Vec3::from(c2)])
    }

    #[test]
    fn test_orthographic_projection() {
        let skewed = basis([1.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [0.0, -1.0, 1.0]);
        let origin = orthographic_projection(&Vec3::zeros(), &skewed).unwrap();
        assert_relative_eq!(origin, Vec2::zeros(), epsilon = 1e-12);
        // Orthogonal to both plane vectors.
        let normal = orthographic_projection(&Vec3::new(0.0, -1.0, 1.0), &skewed).unwrap();
        assert_relative_eq!(normal, Vec2::zeros(), epsilon = 1e-12);

        let xz = basis([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]);
        let projected = orthographic_projection(&Vec3::new(10.0, 0.0, -10.0), &xz).unwrap();
        assert_relative_eq!(projected, Vec2::new(10.0, -10.0), epsilon = 1e-12);
    }

    #[test]
    fn test_orthographic_normalizes_once() {
        let scaled = basis([5.0, 0.0, 0.0], [0.0, 7.0, 0.0], [0.0, 0.0, 9.0]);
        let projected = orthographic_projection(&Vec3::new(3.0, 4.0, 5.0), &scaled).unwrap();
        assert_relative_eq!(projected, Vec2::new(3.0, 4.0), epsilon = 1e-12);
    }

    #[test]
    fn test_perspective_projection() {
        let identity = Mat3::identity();
        let eye = Vec3::new(0.0, 0.0, -1.0);

        let origin = perspective_projection(&Vec3::zeros(), &identity, &eye, eye.norm()).unwrap();
        assert_eq!(origin, Some(Vec2::zeros()));

        let corner = perspective_projection(&Vec3::new(1.0, 1.0, 1.0), &identity, &eye, eye.norm()).unwrap();
        assert_relative_eq!(corner.unwrap(), Vec2::new(0.5, 0.5), epsilon = 1e-12);

        let far = perspective_projection(&Vec3::new(50.0, 50.0, 0.0), &identity, &eye, 0.5).unwrap();
        assert_relative_eq!(far.unwrap(), Vec2::new(25.0, 25.0), epsilon = 1e-12);
    }

    #[test]
    fn test_perspective_rejects_points_in_eye_plane() {
        let eye = Vec3::new(0.0, 0.0, -1.0);
        let beside = perspective_projection(&Vec3::new(3.0, 0.0, -1.0), &Mat3::identity(), &eye, 1.0).unwrap();
        assert_eq!(beside, None);
        let behind = perspective_projection(&Vec3::new(0.0, 0.0, -2.0), &Mat3::identity(), &eye, 1.0).unwrap();
        assert_eq!(behind, None);
    }

    #[test]
    fn test_non_finite_points_are_not_projected() {
        let eye = Vec3::new(0.0, 0.0, -1.0);
        let nan = Vec3::new(0.0, 0.0, f64::NAN);
        assert_eq!(perspective_projection(&nan, &Mat3::identity(), &eye, 1.0).unwrap(), None);
        let far_off = Vec3::new(f64::INFINITY, 0.0, 1.0);
        assert_eq!(perspective_projection(&far_off, &Mat3::identity(), &eye, 1.0).unwrap(), None);

        let camera = CameraFrame::centered(500.0);
        for mode in [ProjectionMode::Orthographic, ProjectionMode::Perspective] {
            let projector = Projector::new(mode, &camera, ProjectionPlane::EyeDistance).unwrap();
            assert_eq!(projector.project(&Vec3::new(f64::NAN, 1.0, 1.0)), None);
            assert_eq!(projector.project_segment(&Vec3::zeros(), &Vec3::new(1.0, f64::NAN, 0.0)), None);
        }
    }

    #[test]
    fn test_singular_basis_is_reported() {
        let flat = basis([1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        assert_eq!(
            orthographic_projection(&Vec3::x(), &flat),
            Err(GeometryError::Singular("image plane basis"))
        );
        assert_eq!(
            perspective_projection(&Vec3::x(), &flat, &Vec3::zeros(), 1.0),
            Err(GeometryError::Singular("camera basis"))
        );
    }

    #[test]
    fn test_look_projects_to_center() {
        let camera = CameraFrame::new(Vec3::new(30.0, -40.0, 120.0), Vec3::new(5.0, 5.0, 5.0), Vec3::y());
        for mode in [ProjectionMode::Orthographic, ProjectionMode::Perspective] {
            let projector = Projector::new(mode, &camera, ProjectionPlane::EyeDistance).unwrap();
            let center = projector.project(&camera.look).unwrap();
            assert_relative_eq!(center, Vec2::zeros(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_orthographic_forward_axis_projects_to_center() {
        let camera = CameraFrame::centered(500.0);
        let projector = Projector::new(ProjectionMode::Orthographic, &camera, ProjectionPlane::EyeDistance).unwrap();
        for z in [-300.0, 0.0, 42.0, 1000.0] {
            assert_relative_eq!(projector.project(&Vec3::new(0.0, 0.0, z)).unwrap(), Vec2::zeros(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_fixed_plane_distance() {
        let camera = CameraFrame::centered(10.0);
        let projector = Projector::new(ProjectionMode::Perspective, &camera, ProjectionPlane::Fixed(20.0)).unwrap();
        let projected = projector.project(&Vec3::new(1.0, 2.0, 0.0)).unwrap();
        assert_relative_eq!(projected, Vec2::new(2.0, 4.0), epsilon = 1e-12);
    }

    #[test]
    fn test_segment_crossing_eye_plane_is_clipped() {
        let camera = CameraFrame::centered(10.0);
        let projector = Projector::new(ProjectionMode::Perspective, &camera, ProjectionPlane::EyeDistance).unwrap();

        let (a, b) = projector
            .project_segment(&Vec3::new(1.0, 0.0, 0.0), &Vec3::new(1.0, 0.0, -20.0))
            .unwrap();
        assert_relative_eq!(a, Vec2::new(1.0, 0.0), epsilon = 1e-12);
        assert!(b.x.is_finite() && b.x > 1.0);

        let behind = projector.project_segment(&Vec3::new(0.0, 0.0, -11.0), &Vec3::new(1.0, 0.0, -30.0));
        assert_eq!(behind, None);
    }

    #[test]
    fn test_mode_cycles() {
        assert_eq!(ProjectionMode::Orthographic.next(), ProjectionMode::Perspective);
        assert_eq!(ProjectionMode::Perspective.next().name(), "orthographic");
    }
}
