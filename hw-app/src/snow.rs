//! This module handles drawing the falling snow.
//!
//! The [`Snowfall`] buffer is the only source of truth for where the flakes are. Each frame it
//! gets stepped once, then every flake entity copies its position out of it.

use crate::{config::AppConfig, decorations::CurrentScene, setup::colour};
use bevy::{pbr::NotShadowCaster, prelude::*};
use hw_snow::Snowfall;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, instrument};

/// The particle buffer behind all the flakes.
#[derive(Debug, Resource)]
pub struct Snow(pub Snowfall);

/// A single snowflake, holding its index into the [`Snow`] buffer.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct Flake(usize);

/// Create the snow buffer and spawn an entity for every flake.
#[instrument(skip_all)]
pub(super) fn spawn_snow(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<AppConfig>,
    scene: Res<CurrentScene>,
) {
    let snowfall = Snowfall::new(config.snow, &mut StdRng::from_entropy());
    debug!(flakes = snowfall.len(), "Spawning snow");

    let look = scene.0.snow;
    let mesh = meshes.add(Mesh::from(shape::Icosphere {
        radius: snowfall.config().flake_size / 2.,
        subdivisions: 1,
    }));
    let material = materials.add(StandardMaterial {
        base_color: *colour(look.colour).set_a(look.opacity),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    for (index, &position) in snowfall.positions().iter().enumerate() {
        commands.spawn((
            PbrBundle {
                mesh: mesh.clone(),
                material: material.clone(),
                transform: Transform::from_translation(position),
                ..default()
            },
            NotShadowCaster,
            Flake(index),
        ));
    }

    commands.insert_resource(Snow(snowfall));
}

/// Advance the snow by one frame.
pub(super) fn step_snow(time: Res<Time>, mut snow: ResMut<Snow>) {
    snow.0.step(time.elapsed_seconds_f64());
}

/// Move every flake to its place in the buffer.
pub(super) fn draw_snow(snow: Res<Snow>, mut flakes: Query<(&Flake, &mut Transform)>) {
    let positions = snow.0.positions();

    for (&Flake(index), mut transform) in flakes.iter_mut() {
        if let Some(&position) = positions.get(index) {
            transform.translation = position;
        }
    }
}
