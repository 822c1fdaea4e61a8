//! This module handles the layout of the Christmas tree: a trunk, rings of branches that get
//! shorter towards the top, ornaments hanging from some of the branch tips, and a topper.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use tracing::{debug, instrument, warn};

/// The config for the shape of the tree.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// The height of the tree, not including the topper.
    pub height: f32,

    /// The length of the longest branches at the bottom of the tree.
    pub base_radius: f32,

    /// The height of the lowest ring of branches.
    pub first_ring_height: f32,

    /// The vertical gap between rings of branches.
    pub ring_spacing: f32,

    /// How far the branch tips droop below the branch root.
    pub droop: f32,

    /// The chance that a branch tip gets an ornament.
    pub ornament_chance: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            height: 5.5,
            base_radius: 2.,
            first_ring_height: 0.5,
            ring_spacing: 0.22,
            droop: 0.25,
            ornament_chance: 0.18,
        }
    }
}

/// The smallest gap between rings of branches.
const MIN_RING_SPACING: f32 = 0.01;

impl TreeConfig {
    /// Replace any values that can't describe a tree with their defaults, so that a hand-edited
    /// config can't produce NaN branches or an endless ring loop.
    pub fn validated(self) -> Self {
        let default = Self::default();

        let positive = |name: &str, value: f32, fallback: f32| {
            if value.is_finite() && value > 0. {
                value
            } else {
                warn!(name, value, "Invalid tree config value, using default");
                fallback
            }
        };
        let finite = |name: &str, value: f32, fallback: f32| {
            if value.is_finite() {
                value
            } else {
                warn!(name, value, "Invalid tree config value, using default");
                fallback
            }
        };

        let ornament_chance = if self.ornament_chance.is_finite() {
            self.ornament_chance.clamp(0., 1.)
        } else {
            warn!(
                value = self.ornament_chance,
                "Invalid ornament chance, using default"
            );
            default.ornament_chance
        };

        Self {
            height: positive("height", self.height, default.height),
            base_radius: positive("base_radius", self.base_radius, default.base_radius),
            first_ring_height: finite(
                "first_ring_height",
                self.first_ring_height,
                default.first_ring_height,
            ),
            ring_spacing: positive("ring_spacing", self.ring_spacing, default.ring_spacing)
                .max(MIN_RING_SPACING),
            droop: finite("droop", self.droop, default.droop),
            ornament_chance,
        }
    }
}

/// A single branch, running from the trunk out to its tip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Branch {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
}

impl Branch {
    /// The distance from the root of the branch to its tip.
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// The point halfway along the branch.
    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) / 2.
    }

    /// The unit vector pointing from the root of the branch to its tip.
    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }
}

/// The full layout of the tree, relative to the base of its trunk.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeLayout {
    /// The height of the trunk.
    pub height: f32,

    /// The radius of the trunk.
    pub trunk_radius: f32,

    /// All the branches.
    pub branches: Vec<Branch>,

    /// Where each ornament hangs.
    pub ornaments: Vec<Vec3>,

    /// Where the topper sits.
    pub topper: Vec3,
}

impl TreeLayout {
    /// Lay out a tree, using the RNG to vary the branches. Invalid config values are replaced
    /// by [`TreeConfig::validated`].
    #[instrument(skip(rng))]
    pub fn generate<R: Rng + ?Sized>(config: TreeConfig, rng: &mut R) -> Self {
        let config = config.validated();
        let initial_y = config.first_ring_height;
        let max_y = config.height - 0.3;

        let mut branches = vec![];
        let mut ornaments = vec![];
        let mut y = initial_y;

        while y < max_y {
            let scale =
                (1. - (y - initial_y) / (max_y - initial_y)).clamp(0.1, 1.) * config.base_radius;

            // A random number of branches equally spaced around the trunk, with a random starting
            // offset so the rings don't line up
            let step = 360 / rng.gen_range(10..=16);
            for theta in (0..360).skip(rng.gen_range(0..=step)).step_by(step) {
                let theta_rad = theta as f32 / 180. * PI;
                let tip = Vec3::new(
                    theta_rad.sin() * scale + rng.gen_range(-0.1..=0.1),
                    y - config.droop * scale / config.base_radius + rng.gen_range(-0.05..=0.05),
                    theta_rad.cos() * scale + rng.gen_range(-0.1..=0.1),
                );

                branches.push(Branch {
                    start: Vec3::new(0., y, 0.),
                    end: tip,
                    radius: (scale * 0.04).max(0.015),
                });

                if rng.gen_bool(config.ornament_chance) {
                    ornaments.push(tip - Vec3::Y * 0.12);
                }
            }

            y += config.ring_spacing;
        }

        debug!(
            branches = branches.len(),
            ornaments = ornaments.len(),
            "Generated tree layout"
        );

        Self {
            height: config.height,
            trunk_radius: 0.12,
            branches,
            ornaments,
            topper: Vec3::new(0., config.height + 0.25, 0.),
        }
    }
}
