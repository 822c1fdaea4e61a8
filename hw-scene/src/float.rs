//! This module handles the gentle bobbing of floating objects like the gift boxes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How an object floats.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloatMotion {
    /// How fast the object bobs.
    pub speed: f32,

    /// How much the object tilts while it bobs.
    pub rotation_intensity: f32,

    /// How far the object bobs up and down.
    pub float_intensity: f32,
}

impl Default for FloatMotion {
    fn default() -> Self {
        Self {
            speed: 1.5,
            rotation_intensity: 0.2,
            float_intensity: 0.2,
        }
    }
}

/// The offset of a floating object from its rest pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatPose {
    /// The vertical offset.
    pub lift: f32,

    /// The tilt as XYZ Euler angles in radians.
    pub tilt: Vec3,
}

impl FloatMotion {
    /// The pose after `elapsed_seconds`, with `phase` to keep different objects out of step.
    pub fn pose(&self, elapsed_seconds: f32, phase: f32) -> FloatPose {
        let t = (elapsed_seconds + phase) * self.speed / 4.;
        let (sin, cos) = t.sin_cos();

        FloatPose {
            lift: sin / 10. * self.float_intensity,
            tilt: Vec3::new(cos / 8., sin / 8., sin / 20.) * self.rotation_intensity,
        }
    }
}
