//! First-person camera with procedural lean.

use bevy::prelude::*;

use crate::input::InputState;
use crate::player::PlayerDriver;
use crate::settings::Settings;

/// Eye level as a fraction of player height above the body center.
const EYE_HEIGHT_FRACTION: f32 = 0.4;

/// Marker for the player's view camera.
#[derive(Component)]
pub struct PlayerCamera;

/// Smoothed lean offsets, in radians.
#[derive(Resource, Default)]
pub struct LeanState {
    /// Roll from strafing; opposes the strafe direction.
    roll: f32,
    /// Residual pitch lean; always decays back to zero.
    pitch: f32,
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        PlayerCamera,
        Camera3d::default(),
        Transform::from_translation(Vec3::new(0.0, 2.0, 0.0)),
    ));
}

/// Follow the player at eye level and compose look rotation with lean.
pub fn update_camera(
    time: Res<Time>,
    settings: Res<Settings>,
    input_state: Res<InputState>,
    mut lean: ResMut<LeanState>,
    player: Query<&Transform, (With<PlayerDriver>, Without<PlayerCamera>)>,
    mut camera: Query<&mut Transform, With<PlayerCamera>>,
) {
    let Ok(player_transform) = player.single() else {
        return;
    };
    let Ok(mut camera_transform) = camera.single_mut() else {
        return;
    };

    // Exponential smoothing toward the lean target; frame-rate independent.
    let t = 1.0 - (-settings.camera.lean_speed * time.delta_secs()).exp();
    let target_roll = -input_state.horizontal * settings.camera.lean_angle.to_radians();
    lean.roll += (target_roll - lean.roll) * t;
    lean.pitch += (0.0 - lean.pitch) * t;

    let eye_offset = settings.controller.player_height * EYE_HEIGHT_FRACTION
        * player_transform.scale.y;
    camera_transform.translation =
        player_transform.translation + Vec3::new(0.0, eye_offset, 0.0);
    camera_transform.rotation = Quat::from_euler(
        EulerRot::YXZ,
        input_state.yaw,
        input_state.pitch + lean.pitch,
        lean.roll,
    );
}
