//! This module handles the limits on the orbit camera and its idle auto-rotation.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// The constraints on where the orbit camera may go.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitLimits {
    /// The smallest angle from straight up, in radians.
    pub min_polar_angle: f32,

    /// The largest angle from straight up, in radians.
    pub max_polar_angle: f32,

    /// The closest the camera may get to its target.
    pub min_distance: f32,

    /// The furthest the camera may get from its target.
    pub max_distance: f32,

    /// Whether the camera may move its target.
    pub enable_pan: bool,

    /// Whether the camera drifts around its target on its own.
    pub auto_rotate: bool,

    /// How fast the camera drifts. A speed of 1 is one full orbit per minute.
    pub auto_rotate_speed: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_polar_angle: PI / 4.,
            max_polar_angle: PI / 1.7,
            min_distance: 7.,
            max_distance: 18.,
            enable_pan: false,
            auto_rotate: true,
            auto_rotate_speed: 0.25,
        }
    }
}

impl OrbitLimits {
    /// Move the eye as little as possible so that it's within the limits around the target.
    pub fn constrain(&self, eye: Vec3, target: Vec3) -> Vec3 {
        let offset = eye - target;
        let distance = offset
            .length()
            .clamp(self.min_distance, self.max_distance);

        let direction = offset.try_normalize().unwrap_or(Vec3::Z);
        let polar = direction
            .y
            .clamp(-1., 1.)
            .acos()
            .clamp(self.min_polar_angle, self.max_polar_angle);
        let azimuth = direction.x.atan2(direction.z);

        let (sin_polar, cos_polar) = polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();

        target
            + distance * Vec3::new(sin_polar * sin_azimuth, cos_polar, sin_polar * cos_azimuth)
    }

    /// The position of the eye after auto-rotating for `delta_seconds` around the target, or the
    /// same eye if auto-rotation is off.
    pub fn auto_rotated(&self, eye: Vec3, target: Vec3, delta_seconds: f32) -> Vec3 {
        if !self.auto_rotate {
            return eye;
        }

        let angle = TAU / 60. * self.auto_rotate_speed * delta_seconds;
        target + Quat::from_rotation_y(angle) * (eye - target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn polar_angle(eye: Vec3, target: Vec3) -> f32 {
        (eye - target).normalize().y.acos()
    }

    #[test]
    fn constrain_inside_limits_test() {
        let limits = OrbitLimits::default();
        let eye = Vec3::new(0., 3., 11.);

        assert!(limits.constrain(eye, Vec3::ZERO).abs_diff_eq(eye, 1e-4));
    }

    #[test]
    fn constrain_distance_test() {
        let limits = OrbitLimits::default();

        let too_close = limits.constrain(Vec3::new(0., 1., 2.), Vec3::ZERO);
        assert!(approx_eq!(f32, too_close.length(), 7., epsilon = 1e-4));

        let too_far = limits.constrain(Vec3::new(30., 5., 30.), Vec3::ZERO);
        assert!(approx_eq!(f32, too_far.length(), 18., epsilon = 1e-4));

        let degenerate = limits.constrain(Vec3::ZERO, Vec3::ZERO);
        assert!(approx_eq!(f32, degenerate.length(), 7., epsilon = 1e-4));
    }

    #[test]
    fn constrain_polar_angle_test() {
        let limits = OrbitLimits::default();
        let target = Vec3::new(0., 1., 0.);

        let from_above = limits.constrain(Vec3::new(0.1, 11., 0.), target);
        assert!(approx_eq!(
            f32,
            polar_angle(from_above, target),
            PI / 4.,
            epsilon = 1e-4
        ));

        let from_below = limits.constrain(Vec3::new(0., -9., 0.), target);
        assert!(approx_eq!(
            f32,
            polar_angle(from_below, target),
            PI / 1.7,
            epsilon = 1e-4
        ));
        assert!(approx_eq!(f32, from_below.distance(target), 10., epsilon = 1e-3));
    }

    #[test]
    fn auto_rotated_test() {
        let limits = OrbitLimits::default();
        let eye = Vec3::new(0., 3., 11.);

        let rotated = limits.auto_rotated(eye, Vec3::ZERO, 1.);
        assert!(!rotated.abs_diff_eq(eye, 1e-6));
        assert!(approx_eq!(f32, rotated.y, 3., epsilon = 1e-5));
        assert!(approx_eq!(f32, rotated.length(), eye.length(), epsilon = 1e-4));

        // A speed of 1 goes all the way round in a minute, so 0.25 takes four
        let full_turn = limits.auto_rotated(eye, Vec3::ZERO, 240.);
        assert!(full_turn.abs_diff_eq(eye, 1e-3));

        let still = OrbitLimits {
            auto_rotate: false,
            ..Default::default()
        };
        assert_eq!(still.auto_rotated(eye, Vec3::ZERO, 1.), eye);
    }
}
