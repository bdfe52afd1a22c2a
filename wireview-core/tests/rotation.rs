//! Rigidity of the axis-angle rotation over many axes, angles and centers.

use approx::assert_relative_eq;
use wireview_core::{rotate, Vec3};

/// Small deterministic generator so failures reproduce.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
    }

    fn vector(&mut self, scale: f64) -> Vec3 {
        Vec3::new(self.next() * scale, self.next() * scale, self.next() * scale)
    }
}

fn cases() -> Vec<(Vec3, Vec3, f64, Vec<Vec3>)> {
    let mut rng = Lcg(0x5eed);
    let mut cases = Vec::new();
    let fixed_axes = [Vec3::x(), Vec3::y(), Vec3::z(), -Vec3::y(), Vec3::new(1.0, 1.0, 0.0)];
    for i in 0..60 {
        let axis = if i < fixed_axes.len() { fixed_axes[i] } else { rng.vector(1.0) };
        let center = if i % 3 == 0 { Vec3::zeros() } else { rng.vector(200.0) };
        let angle = rng.next() * std::f64::consts::PI * 2.0;
        let points = (0..5).map(|_| rng.vector(300.0)).collect();
        cases.push((center, axis, angle, points));
    }
    cases
}

#[test]
fn rotation_preserves_distances() {
    for (center, axis, angle, points) in cases() {
        let rotated = rotate(&center, &axis, angle, &points).unwrap();
        for (i, (before, after)) in points.iter().zip(&rotated).enumerate() {
            assert_relative_eq!((before - center).norm(), (after - center).norm(), epsilon = 1e-4);
            for j in i + 1..points.len() {
                assert_relative_eq!(
                    (before - points[j]).norm(),
                    (after - rotated[j]).norm(),
                    epsilon = 1e-4
                );
            }
        }
    }
}

#[test]
fn rotation_by_negative_angle_undoes_it() {
    for (center, axis, angle, points) in cases() {
        let there = rotate(&center, &axis, angle, &points).unwrap();
        let back = rotate(&center, &axis, -angle, &there).unwrap();
        for (original, restored) in points.iter().zip(&back) {
            assert_relative_eq!(*original, *restored, epsilon = 1e-4);
        }
    }
}

#[test]
fn points_on_axis_stay_put() {
    let center = Vec3::new(10.0, -20.0, 5.0);
    let axis = Vec3::new(2.0, -1.0, 3.0);
    let on_axis = [center, center + axis * 7.5];
    let rotated = rotate(&center, &axis, 1.234, &on_axis).unwrap();
    for (before, after) in on_axis.iter().zip(&rotated) {
        assert_relative_eq!(*before, *after, epsilon = 1e-9);
    }
}

#[test]
fn quarter_turn_about_x() {
    let rotated = rotate(&Vec3::zeros(), &Vec3::x(), std::f64::consts::FRAC_PI_2, &[Vec3::y()]).unwrap();
    assert_relative_eq!(rotated[0], Vec3::z(), epsilon = 1e-4);
}
