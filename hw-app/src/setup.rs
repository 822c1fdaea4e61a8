//! This module handles spawning the static parts of the scene: the camera, the lights, the floor,
//! the gift boxes, and the tree.

use crate::{
    config::AppConfig,
    decorations::{CurrentScene, Topper},
};
use bevy::{
    core_pipeline::bloom::BloomSettings,
    prelude::*,
    render::{mesh::Indices, render_resource::PrimitiveTopology},
};
use hw_scene::{
    ornament_geometry, palette, FloatMotion, GiftBoxSpec, OrnamentGeometry, PrismMesh, Rgb,
    TreeLayout,
};
use hw_wish::OrnamentType;
use rand::{rngs::StdRng, SeedableRng};
use smooth_bevy_cameras::controllers::orbit::{OrbitCameraBundle, OrbitCameraController};
use tracing::{debug, instrument};

/// Bevy measures lights in lumens, so point light intensities get scaled by this.
const POINT_LUMENS_PER_UNIT: f32 = 400.;

/// Spot lights are far away from the tree, so they need more lumens than point lights.
const SPOT_LUMENS_PER_UNIT: f32 = 8000.;

/// The light above the tree that takes the colour of the wish.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct AccentLight;

/// A point on the tree where an ornament hangs. The ornament itself is a child of this entity.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct OrnamentAnchor;

/// Something that bobs gently around its rest position.
#[derive(Component, Clone, Copy, Debug)]
pub(super) struct Floating {
    motion: FloatMotion,

    /// The position when the pose is neutral.
    rest: Vec3,

    /// Keeps different objects out of step with each other.
    phase: f32,
}

/// Convert a palette colour into a Bevy colour.
pub(super) fn colour(rgb: Rgb) -> Color {
    let [r, g, b] = rgb.0;
    Color::rgb_u8(r, g, b)
}

/// A colour bright enough to glow under bloom.
pub(super) fn emissive(rgb: Rgb, strength: f32) -> Color {
    let [r, g, b, _] = colour(rgb).as_linear_rgba_f32();
    Color::rgb_linear(r * strength, g * strength, b * strength)
}

/// Build a Bevy mesh from an extruded ornament outline.
pub(super) fn prism_to_mesh(prism: &PrismMesh) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, prism.positions.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, prism.normals.clone());
    mesh.set_indices(Some(Indices::U32(prism.indices.clone())));
    mesh
}

/// Build a Bevy mesh for the given type of ornament.
pub(super) fn ornament_mesh(ornament: OrnamentType) -> Mesh {
    match ornament_geometry(ornament) {
        OrnamentGeometry::Ball { radius } => Mesh::from(shape::UVSphere {
            radius,
            sectors: 32,
            stacks: 16,
        }),
        OrnamentGeometry::Prism(prism) => prism_to_mesh(&prism),
    }
}

/// Setup the Bevy world with a camera, lights, and everything in the scene group.
#[instrument(skip_all)]
pub(super) fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<AppConfig>,
    scene: Res<CurrentScene>,
) {
    let scene = &scene.0;

    commands.insert_resource(ClearColor(colour(scene.background)));
    commands.insert_resource(AmbientLight {
        color: colour(scene.ambient.colour),
        brightness: scene.ambient.intensity,
    });

    // Drag with the left mouse button to orbit the camera
    commands
        .spawn((
            Camera3dBundle {
                camera: Camera {
                    hdr: true,
                    ..default()
                },
                projection: Projection::Perspective(PerspectiveProjection {
                    fov: scene.camera.fov_degrees.to_radians(),
                    ..default()
                }),
                ..default()
            },
            BloomSettings {
                intensity: scene.bloom.intensity,
                threshold: scene.bloom.threshold,
                ..default()
            },
        ))
        .insert(OrbitCameraBundle::new(
            OrbitCameraController {
                mouse_rotate_sensitivity: Vec2::splat(0.25),
                mouse_translate_sensitivity: Vec2::ZERO,
                smoothing_weight: 0.1,
                ..default()
            },
            scene.camera.position,
            scene.camera.target,
            Vec3::Y,
        ));

    commands.spawn(SpotLightBundle {
        spot_light: SpotLight {
            color: colour(scene.spot.colour),
            intensity: scene.spot.intensity * SPOT_LUMENS_PER_UNIT,
            range: 80.,
            shadows_enabled: scene.spot.casts_shadows,
            outer_angle: scene.spot.angle,
            inner_angle: scene.spot.angle * (1. - scene.spot.penumbra.clamp(0., 1.)),
            ..default()
        },
        transform: Transform::from_translation(scene.spot.position)
            .looking_at(scene.camera.target, Vec3::Y),
        ..default()
    });

    commands.spawn((
        PointLightBundle {
            point_light: PointLight {
                color: colour(scene.accent.colour),
                intensity: scene.accent.intensity * POINT_LUMENS_PER_UNIT,
                range: 20.,
                shadows_enabled: false,
                ..default()
            },
            transform: Transform::from_translation(scene.accent.position),
            ..default()
        },
        AccentLight,
    ));

    let floor = PbrBundle {
        mesh: meshes.add(Mesh::from(shape::Plane {
            size: scene.floor.size,
        })),
        material: materials.add(StandardMaterial {
            base_color: colour(scene.floor.colour),
            perceptual_roughness: scene.floor.roughness,
            metallic: scene.floor.metalness,
            ..default()
        }),
        transform: Transform::from_xyz(0., scene.floor.height, 0.),
        ..default()
    };

    let tree = TreeLayout::generate(config.tree, &mut StdRng::from_entropy());

    commands
        .spawn(SpatialBundle {
            transform: Transform::from_translation(scene.group_offset),
            ..default()
        })
        .with_children(|group| {
            group.spawn(floor);

            for (index, gift) in scene.gifts.iter().enumerate() {
                spawn_gift(group, &mut meshes, &mut materials, gift, index as f32 * 1.7);
            }

            spawn_tree(group, &mut meshes, &mut materials, &tree);
        });
}

/// Spawn a gift box with a ribbon tied around it.
fn spawn_gift(
    group: &mut ChildBuilder,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    gift: &GiftBoxSpec,
    phase: f32,
) {
    let cube = meshes.add(Mesh::from(shape::Cube { size: 1. }));
    let ribbon_material = materials.add(StandardMaterial {
        base_color: colour(gift.ribbon_colour),
        metallic: 1.,
        perceptual_roughness: 0.2,
        ..default()
    });

    group
        .spawn((
            SpatialBundle {
                transform: Transform::from_translation(gift.position),
                ..default()
            },
            Floating {
                motion: gift.motion,
                rest: gift.position,
                phase,
            },
        ))
        .with_children(|parent| {
            parent
                .spawn(PbrBundle {
                    mesh: cube.clone(),
                    material: materials.add(StandardMaterial {
                        base_color: colour(gift.colour),
                        metallic: 0.8,
                        perceptual_roughness: 0.1,
                        ..default()
                    }),
                    transform: Transform::from_scale(Vec3::splat(gift.scale)),
                    ..default()
                })
                .with_children(|gift_box| {
                    for scale in [Vec3::new(1.02, 0.08, 1.02), Vec3::new(0.08, 1.02, 1.02)] {
                        gift_box.spawn(PbrBundle {
                            mesh: cube.clone(),
                            material: ribbon_material.clone(),
                            transform: Transform::from_scale(scale),
                            ..default()
                        });
                    }
                });
        });
}

/// Spawn the trunk, branches, ornament anchors, and topper of the tree.
fn spawn_tree(
    group: &mut ChildBuilder,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    tree: &TreeLayout,
) {
    group.spawn(PbrBundle {
        mesh: meshes.add(Mesh::from(shape::Capsule {
            radius: tree.trunk_radius,
            depth: tree.height * 0.88,
            ..default()
        })),
        material: materials.add(StandardMaterial {
            base_color: colour(Rgb::palette(palette::BARK)),
            perceptual_roughness: 0.8,
            ..default()
        }),
        transform: Transform::from_xyz(0., tree.height / 2. - 0.2, 0.),
        ..default()
    });

    let leaf_material = materials.add(StandardMaterial {
        base_color: colour(Rgb::palette(palette::PINE_DEEP)),
        perceptual_roughness: 0.85,
        ..default()
    });

    debug!(branches = tree.branches.len(), "Adding branches to tree");
    for branch in &tree.branches {
        group.spawn(PbrBundle {
            mesh: meshes.add(Mesh::from(shape::Capsule {
                radius: branch.radius,
                rings: 4,
                depth: branch.length(),
                latitudes: 8,
                longitudes: 12,
                ..default()
            })),
            material: leaf_material.clone(),
            transform: Transform::from_translation(branch.midpoint())
                .with_rotation(Quat::from_rotation_arc(Vec3::Y, branch.direction())),
            ..default()
        });
    }

    // The ornaments themselves get spawned when the theme is first applied
    for &position in &tree.ornaments {
        group.spawn((
            SpatialBundle {
                transform: Transform::from_translation(position),
                ..default()
            },
            OrnamentAnchor,
        ));
    }

    group.spawn((
        PbrBundle {
            mesh: meshes.add(ornament_mesh(OrnamentType::Star)),
            material: materials.add(StandardMaterial {
                base_color: colour(Rgb::palette(palette::ICE_GLOW)),
                ..default()
            }),
            transform: Transform::from_translation(tree.topper).with_scale(Vec3::splat(0.35)),
            ..default()
        },
        Topper,
    ));
}

/// Bob every [`Floating`] entity around its rest position.
pub(super) fn float_gifts(time: Res<Time>, mut query: Query<(&Floating, &mut Transform)>) {
    let elapsed = time.elapsed_seconds();

    for (floating, mut transform) in query.iter_mut() {
        let pose = floating.motion.pose(elapsed, floating.phase);

        transform.translation = floating.rest + Vec3::Y * pose.lift;
        transform.rotation = Quat::from_euler(EulerRot::XYZ, pose.tilt.x, pose.tilt.y, pose.tilt.z);
    }
}
