//! This crate provides the [`Snowfall`] particle animator.
//!
//! The snow is a fixed set of particles allocated once. Every frame, [`Snowfall::step`] moves
//! each one down by its own speed, wraps it back up to the ceiling when it falls through the
//! floor, and nudges it sideways with a gentle sinusoidal drift. The renderer then reads
//! [`Snowfall::positions`] back out in the same frame.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// The config for the falling snow.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowConfig {
    /// The number of snowflakes.
    pub count: usize,

    /// Any flake that falls below this height gets wrapped back to [`Self::ceiling`].
    pub floor: f32,

    /// The height that flakes get wrapped to.
    pub ceiling: f32,

    /// The width of the square area (in x and z) that flakes start in, centred on the origin.
    pub spread: f32,

    /// Flakes start at a random height between 0 and this.
    pub spawn_height: f32,

    /// The slowest fall speed, in units per frame.
    pub min_velocity: f32,

    /// The fastest fall speed (exclusive), in units per frame.
    pub max_velocity: f32,

    /// The maximum sideways drift per frame.
    pub drift_amplitude: f32,

    /// The rendered size of each flake.
    pub flake_size: f32,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            floor: -5.,
            ceiling: 15.,
            spread: 20.,
            spawn_height: 20.,
            min_velocity: 0.02,
            max_velocity: 0.08,
            drift_amplitude: 0.008,
            flake_size: 0.06,
        }
    }
}

/// The sideways drift of the flake at `index` after `elapsed_seconds`, before scaling by the
/// drift amplitude.
///
/// This is a pure function of its inputs, so the drift is reproducible.
pub fn drift(elapsed_seconds: f64, index: usize) -> f32 {
    (elapsed_seconds + index as f64).sin() as f32
}

/// Sample uniformly from `[low, high)`, or just return `low` if the range is empty.
fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if low < high {
        rng.gen_range(low..high)
    } else {
        low
    }
}

/// A fixed-size set of falling snowflakes.
#[derive(Clone, Debug, PartialEq)]
pub struct Snowfall {
    /// The config used to create and step the snow.
    config: SnowConfig,

    /// The position of each flake.
    positions: Vec<Vec3>,

    /// The fall speed of each flake, in units per frame.
    velocities: Vec<f32>,
}

impl Snowfall {
    /// Scatter [`SnowConfig::count`] flakes randomly using the given RNG.
    #[instrument(skip(rng))]
    pub fn new<R: Rng + ?Sized>(config: SnowConfig, rng: &mut R) -> Self {
        let half_spread = config.spread / 2.;

        let mut positions = Vec::with_capacity(config.count);
        let mut velocities = Vec::with_capacity(config.count);

        for _ in 0..config.count {
            positions.push(Vec3::new(
                uniform(rng, -half_spread, half_spread),
                uniform(rng, 0., config.spawn_height),
                uniform(rng, -half_spread, half_spread),
            ));
            velocities.push(uniform(rng, config.min_velocity, config.max_velocity));
        }

        debug!(count = config.count, "Created snowfall");

        Self {
            config,
            positions,
            velocities,
        }
    }

    /// Advance every flake by one frame.
    ///
    /// This never allocates or changes the number of flakes.
    pub fn step(&mut self, elapsed_seconds: f64) {
        let SnowConfig {
            floor,
            ceiling,
            drift_amplitude,
            ..
        } = self.config;

        for (index, (position, &velocity)) in self
            .positions
            .iter_mut()
            .zip(&self.velocities)
            .enumerate()
        {
            position.y -= velocity;
            if position.y < floor {
                position.y = ceiling;
            }

            position.x += drift(elapsed_seconds, index) * drift_amplitude;
        }
    }

    /// The current position of every flake, indexed the same as when they were created.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// The fall speed of every flake.
    pub fn velocities(&self) -> &[f32] {
        &self.velocities
    }

    /// The number of flakes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether there are no flakes at all.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The config that this snow was created with.
    pub fn config(&self) -> &SnowConfig {
        &self.config
    }
}
