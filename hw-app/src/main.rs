//! This crate provides the Holiday Wishes binary: a snowy 3D scene with a Christmas tree that
//! gets redecorated whenever someone makes a wish.
//!
//! Wishes are interpreted by a remote text-generation service on a background thread (see
//! [`wish_worker`]), so the frame loop never waits on the network.

mod camera;
mod config;
mod decorations;
mod logging;
mod setup;
mod snow;
mod ui;
mod wish_worker;

use self::{
    camera::{constrain_orbit, orbit_input_map},
    config::AppConfig,
    decorations::{apply_theme, spin_topper, CurrentScene},
    setup::{float_gifts, setup_scene},
    snow::{draw_snow, spawn_snow, step_snow},
    ui::{poll_wish_responses, render_wish_ui, WishState},
    wish_worker::{spawn_wish_worker, WishChannels},
};
use bevy::{log::LogPlugin, prelude::*, winit::WinitSettings, DefaultPlugins};
use bevy_egui::EguiPlugin;
use smooth_bevy_cameras::{controllers::orbit::OrbitCameraPlugin, LookTransformPlugin};
use tracing::{debug, info, instrument};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let data_dir = config::data_dir();
    let _guard = logging::init_tracing(&data_dir.join("logs"));

    let config = AppConfig::from_file(&AppConfig::config_filename(&data_dir));
    debug!(?config, "Loaded config");

    let channels = spawn_wish_worker(config.wish_service.clone());
    run_app(config, channels);

    info!("Window closed, exiting");
    Ok(())
}

/// Run the scene with Bevy until the window is closed.
#[instrument(skip_all)]
fn run_app(config: AppConfig, channels: WishChannels) {
    // Logging is handled by our own subscriber, so Bevy's log plugin is disabled
    info!("Starting bevy app");
    App::new()
        .insert_resource(Msaa { samples: 4 })
        .insert_resource(WinitSettings {
            return_from_run: true,
            ..default()
        })
        .add_plugins(
            DefaultPlugins
                .build()
                .disable::<LogPlugin>()
                .set(WindowPlugin {
                    window: WindowDescriptor {
                        title: config.window_title.clone(),
                        ..default()
                    },
                    ..default()
                }),
        )
        .add_plugin(EguiPlugin)
        .add_plugin(LookTransformPlugin)
        .add_plugin(OrbitCameraPlugin::new(true))
        .insert_resource(config)
        .insert_resource(channels)
        .insert_resource(WishState::default())
        .insert_resource(CurrentScene::default())
        .add_startup_system(setup_scene)
        .add_startup_system(spawn_snow)
        .add_system(render_wish_ui)
        .add_system(poll_wish_responses.after(render_wish_ui))
        .add_system(apply_theme.after(poll_wish_responses))
        .add_system(orbit_input_map)
        .add_system(constrain_orbit.after(apply_theme))
        .add_system(spin_topper.after(apply_theme))
        .add_system(float_gifts)
        .add_system(step_snow)
        .add_system(draw_snow.after(step_snow))
        .run();
}
