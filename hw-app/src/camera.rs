//! This module handles the orbit camera's input and limits.

use crate::decorations::CurrentScene;
use bevy::{
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
};
use bevy_egui::EguiContext;
use smooth_bevy_cameras::{
    controllers::orbit::{ControlEvent, OrbitCameraController},
    LookTransform,
};

/// Turn mouse input into orbit camera events. Drag with the left button to orbit and scroll to
/// zoom. The camera ignores the mouse while it's over the overlay.
pub(super) fn orbit_input_map(
    mut events: EventWriter<ControlEvent>,
    mut mouse_wheel_reader: EventReader<MouseWheel>,
    mut mouse_motion_events: EventReader<MouseMotion>,
    mouse_buttons: Res<Input<MouseButton>>,
    mut egui_context: ResMut<EguiContext>,
    controllers: Query<&OrbitCameraController>,
) {
    let cursor_delta = mouse_motion_events
        .iter()
        .fold(Vec2::ZERO, |delta, event| delta + event.delta);
    let scrolls: Vec<&MouseWheel> = mouse_wheel_reader.iter().collect();

    let Some(controller) = controllers.iter().find(|controller| controller.enabled) else {
        return;
    };

    if egui_context.ctx_mut().wants_pointer_input() {
        return;
    }

    if mouse_buttons.pressed(MouseButton::Left) {
        events.send(ControlEvent::Orbit(
            controller.mouse_rotate_sensitivity * cursor_delta,
        ));
    }

    let scalar = scrolls.into_iter().fold(1., |scalar, event| {
        let scroll_amount = match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / controller.pixels_per_line,
        };
        scalar * (1. - scroll_amount * controller.mouse_wheel_zoom_sensitivity)
    });
    events.send(ControlEvent::Zoom(scalar));
}

/// Auto-rotate the camera while idle and keep it within the orbit limits of the current scene.
pub(super) fn constrain_orbit(
    time: Res<Time>,
    scene: Res<CurrentScene>,
    mut cameras: Query<&mut LookTransform, With<OrbitCameraController>>,
) {
    let limits = scene.0.orbit;

    for mut look in cameras.iter_mut() {
        if !limits.enable_pan && look.target != scene.0.camera.target {
            look.target = scene.0.camera.target;
        }

        let eye = limits.auto_rotated(look.eye, look.target, time.delta_seconds());
        let eye = limits.constrain(eye, look.target);

        if eye != look.eye {
            look.eye = eye;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constrain_orbit_test() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(CurrentScene::default())
            .add_system(constrain_orbit);

        let camera = app
            .world
            .spawn((
                LookTransform::new(Vec3::new(0., 30., 1.), Vec3::new(2., 0., 0.), Vec3::Y),
                OrbitCameraController::default(),
            ))
            .id();

        app.update();

        let limits = app.world.resource::<CurrentScene>().0.orbit;
        let look = app.world.get::<LookTransform>(camera).unwrap();
        let offset = look.eye - look.target;
        let polar = offset.normalize().y.acos();

        assert_eq!(look.target, Vec3::ZERO);
        assert!(offset.length() <= limits.max_distance + 1e-4);
        assert!(polar >= limits.min_polar_angle - 1e-4);
    }
}
