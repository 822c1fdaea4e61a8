//! This module handles the parts of the scene that follow the theme of the current wish: the
//! accent light, the ornaments on the tree, and the topper.

use crate::{
    setup::{colour, emissive, ornament_mesh, AccentLight, OrnamentAnchor},
    ui::WishState,
};
use bevy::prelude::*;
use hw_scene::{compose, SceneSpec};
use hw_wish::{OrnamentType, DEFAULT_GLOW_COLOUR};
use tracing::{info, instrument};

/// The size of an ornament relative to its unit outline.
const ORNAMENT_SCALE: f32 = 0.12;

/// The scene as it should currently look.
#[derive(Clone, Debug, PartialEq, Resource)]
pub struct CurrentScene(pub SceneSpec);

impl Default for CurrentScene {
    fn default() -> Self {
        Self(compose(DEFAULT_GLOW_COLOUR, OrnamentType::default(), false))
    }
}

/// The ornament on top of the tree.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct Topper;

/// Everything that decides the theme of the scene.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct ThemeKey {
    glow_colour: String,
    ornament_type: OrnamentType,
    celebrating: bool,
}

/// Re-compose the scene and redecorate the tree when the wish flow changes the theme.
///
/// The theme is compared against the last applied one rather than using change detection, since
/// the overlay borrows the [`WishState`] mutably every frame.
#[allow(clippy::too_many_arguments)]
#[instrument(skip_all)]
pub(super) fn apply_theme(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    state: Res<WishState>,
    mut scene: ResMut<CurrentScene>,
    mut last_applied: Local<Option<ThemeKey>>,
    mut accent_lights: Query<&mut PointLight, With<AccentLight>>,
    anchors: Query<Entity, With<OrnamentAnchor>>,
    toppers: Query<&Handle<StandardMaterial>, With<Topper>>,
) {
    let key = ThemeKey {
        glow_colour: state.flow.glow_colour().to_string(),
        ornament_type: state.flow.ornament_type(),
        celebrating: state.flow.is_celebrating(),
    };

    if last_applied.as_ref() == Some(&key) {
        return;
    }

    info!(?key, "Applying theme");
    let new_scene = compose(&key.glow_colour, key.ornament_type, key.celebrating);
    let decorations = new_scene.decorations;

    for mut light in accent_lights.iter_mut() {
        light.color = colour(new_scene.accent.colour);
    }

    for handle in toppers.iter() {
        if let Some(material) = materials.get_mut(handle) {
            material.base_color = colour(decorations.glow);
            material.emissive = emissive(decorations.glow, decorations.emissive_strength);
        }
    }

    let mesh = meshes.add(ornament_mesh(decorations.ornament_type));
    let material = materials.add(StandardMaterial {
        base_color: colour(decorations.glow),
        emissive: emissive(decorations.glow, decorations.emissive_strength),
        metallic: 0.6,
        perceptual_roughness: 0.25,
        ..default()
    });

    for anchor in anchors.iter() {
        commands.entity(anchor).despawn_descendants();
        commands.entity(anchor).with_children(|parent| {
            parent.spawn(PbrBundle {
                mesh: mesh.clone(),
                material: material.clone(),
                transform: Transform::from_scale(Vec3::splat(ORNAMENT_SCALE)),
                ..default()
            });
        });
    }

    scene.0 = new_scene;
    *last_applied = Some(key);
}

/// Spin the topper at the speed of the current theme.
pub(super) fn spin_topper(
    time: Res<Time>,
    scene: Res<CurrentScene>,
    mut toppers: Query<&mut Transform, With<Topper>>,
) {
    let speed = scene.0.decorations.topper_spin_speed;
    if speed == 0. {
        return;
    }

    for mut transform in toppers.iter_mut() {
        transform.rotate_y(speed * time.delta_seconds());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hw_wish::WishResponse;

    /// A world with just enough in it to run [`apply_theme`].
    fn app_with_tree(anchors: usize) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugin(bevy::asset::AssetPlugin::default())
            .add_asset::<Mesh>()
            .add_asset::<StandardMaterial>()
            .insert_resource(WishState::default())
            .insert_resource(CurrentScene::default())
            .add_system(apply_theme);

        app.world.spawn((PointLight::default(), AccentLight));
        for _ in 0..anchors {
            app.world.spawn((Transform::default(), OrnamentAnchor));
        }

        app
    }

    fn ornament_count(app: &mut App) -> usize {
        app.world
            .query_filtered::<&Parent, With<Handle<Mesh>>>()
            .iter(&app.world)
            .count()
    }

    #[test]
    fn idle_theme_is_applied_on_first_frame_test() {
        let mut app = app_with_tree(3);
        app.update();

        assert_eq!(ornament_count(&mut app), 3);
        assert!(app.world.resource::<CurrentScene>().0.orbit.auto_rotate);
    }

    #[test]
    fn wish_redecorates_the_tree_test() {
        let mut app = app_with_tree(4);
        app.update();

        {
            let mut state = app.world.resource_mut::<WishState>();
            assert!(state.flow.begin_submission());
            state.flow.finish_submission(WishResponse::fallback());
        }
        app.update();

        let scene = app.world.resource::<CurrentScene>().0.clone();
        assert!(!scene.orbit.auto_rotate);
        assert_eq!(scene.decorations.ornament_type, OrnamentType::Crystal);
        assert!(scene.decorations.topper_spin_speed > 0.);

        let expected = colour(scene.accent.colour);
        let light = app
            .world
            .query_filtered::<&PointLight, With<AccentLight>>()
            .single(&app.world);
        assert_eq!(light.color, expected);

        // The old ornaments are replaced, not added to
        assert_eq!(ornament_count(&mut app), 4);
    }
}
