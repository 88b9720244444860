//! Ridgerunner - a first-person movement sandbox.
//!
//! The deterministic controller lives in the `sim` crate; this binary
//! supplies the world, input, camera, audio, and the rapier physics
//! backing.

mod audio;
mod camera;
mod input;
mod player;
mod settings;
mod states;
mod world;

use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;

use states::GameState;

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Ridgerunner".to_string(),
            resolution: WindowResolution::new(1280, 720),
            ..default()
        }),
        ..default()
    }));

    // Physics steps on the fixed tick; the controller's force phase runs
    // just before it.
    app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule());

    app.init_state::<GameState>();
    app.add_message::<player::ControllerTransition>();

    app.init_resource::<input::InputState>();
    app.init_resource::<camera::LeanState>();

    app.add_plugins(audio::GameAudioPlugin);

    // Settings must exist before anything reads them.
    app.add_systems(PreStartup, settings::load_settings);

    app.add_systems(
        Startup,
        (world::spawn_world, player::spawn_player, camera::spawn_camera),
    );

    app.add_systems(
        Update,
        (
            input::handle_keyboard_input,
            input::handle_mouse_input,
            player::drive_controller,
            camera::update_camera,
        )
            .chain()
            .run_if(in_state(GameState::Playing)),
    );
    app.add_systems(Update, states::handle_pause_toggle);

    app.add_systems(
        OnEnter(GameState::Playing),
        (states::grab_cursor, player::enable_controller),
    );
    app.add_systems(
        OnEnter(GameState::Paused),
        (
            states::release_cursor,
            player::disable_controller,
            input::clear_input,
        ),
    );

    // FixedUpdate runs before the physics step in FixedPostUpdate, so the
    // force accumulator is always rebuilt ahead of integration.
    app.add_systems(
        FixedUpdate,
        player::apply_movement_forces.run_if(in_state(GameState::Playing)),
    );

    app.run();
}
