//! Skyflap - desktop client
//!
//! Flap through the gaps. Space starts the run and flaps, Enter restarts
//! after a crash. Set `SKYFLAP_CONFIG` to a JSON file to override tunables.

mod game;
mod ui;

use bevy::prelude::*;
use bevy::window::WindowMode;

use skyflap::TICK_RATE;

use game::{GamePlugin, SKY_COLOR};
use ui::UiPlugin;

/// Run phase mirrored from the simulation
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Active,
    GameOver,
}

fn main() {
    App::new()
        // Bevy defaults with custom window
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Skyflap".into(),
                resolution: (800., 600.).into(),
                mode: WindowMode::Windowed,
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        // Sim tick rate
        .insert_resource(Time::<Fixed>::from_hz(TICK_RATE as f64))
        // Run phase
        .init_state::<Phase>()
        // Our plugins
        .add_plugins((
            GamePlugin,
            UiPlugin,
        ))
        // Startup
        .add_systems(Startup, setup_2d_camera)
        .run();
}

/// 2D camera showing exactly the 800x600 playfield
fn setup_2d_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Camera {
            clear_color: ClearColorConfig::Custom(SKY_COLOR),
            ..default()
        },
        OrthographicProjection {
            scaling_mode: bevy::render::camera::ScalingMode::Fixed { width: 800.0, height: 600.0 },
            ..OrthographicProjection::default_2d()
        },
    ));

    info!("Skyflap initialized!");
}
