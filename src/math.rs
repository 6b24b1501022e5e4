use glam::{Affine3A, EulerRot, Mat3A, Vec3A};
use std::f32::consts::{PI, TAU};

/// Wraps an angle into `[-PI, PI]`
#[must_use]
pub fn norm_pi_pi(angle: f32) -> f32 {
    if (-PI..=PI).contains(&angle) {
        return angle;
    }

    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can land exactly on TAU for inputs just below a multiple of it
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Builds the world transform of a car body.
///
/// `ang` holds roll, pitch and yaw (about X, Y and Z).
/// Heading is applied first, then roll, then pitch.
#[must_use]
pub fn coord_mat(pos: Vec3A, ang: Vec3A) -> Affine3A {
    Affine3A {
        matrix3: Mat3A::from_euler(EulerRot::ZXY, ang.z, ang.x, ang.y),
        translation: pos,
    }
}

/// Rotates a planar vector by `-yaw`, moving it from the world frame into the car frame
#[must_use]
pub fn world_to_car_2d(v: Vec3A, yaw: f32) -> Vec3A {
    let (sin, cos) = yaw.sin_cos();
    Vec3A::new(v.x * cos + v.y * sin, -v.x * sin + v.y * cos, v.z)
}

/// Rotates a planar vector by `yaw`, moving it from the car frame into the world frame
#[must_use]
pub fn car_to_world_2d(v: Vec3A, yaw: f32) -> Vec3A {
    let (sin, cos) = yaw.sin_cos();
    Vec3A::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn norm_pi_pi_wraps_into_range() {
        assert_abs_diff_eq!(norm_pi_pi(0.5), 0.5);
        assert_abs_diff_eq!(norm_pi_pi(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(norm_pi_pi(-3.0 * PI / 2.0), PI / 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(norm_pi_pi(7.0 * TAU + 0.25), 0.25, epsilon = 1e-4);

        for i in -200..200 {
            let a = norm_pi_pi(i as f32 * 0.37);
            assert!((-PI..=PI).contains(&a), "{a} out of range");
        }
    }

    #[test]
    fn frame_rotations_are_inverse() {
        let v = Vec3A::new(3.0, -1.5, 2.0);
        let back = car_to_world_2d(world_to_car_2d(v, 0.8), 0.8);
        assert_abs_diff_eq!(back.x, v.x, epsilon = 1e-5);
        assert_abs_diff_eq!(back.y, v.y, epsilon = 1e-5);
        assert_abs_diff_eq!(back.z, v.z);
    }

    #[test]
    fn coord_mat_yaw_turns_forward_axis() {
        let m = coord_mat(Vec3A::new(1.0, 2.0, 3.0), Vec3A::new(0.0, 0.0, PI / 2.0));
        let fwd = m.transform_vector3a(Vec3A::X);
        assert_abs_diff_eq!(fwd.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(fwd.y, 1.0, epsilon = 1e-6);
        assert_eq!(m.translation, Vec3A::new(1.0, 2.0, 3.0));
    }
}
