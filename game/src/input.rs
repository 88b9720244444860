//! Player input handling.
//!
//! Keyboard and mouse are sampled once per frame into [`InputState`]; the
//! controller consumes an immutable snapshot of it per tick.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use sim::{MovementIntent, TickInput};
use std::f32::consts::FRAC_PI_2;

use crate::settings::Settings;

/// Frame-sampled input state.
#[derive(Resource, Default)]
pub struct InputState {
    /// Strafe axis in `[-1, 1]`, positive right.
    pub horizontal: f32,
    /// Drive axis in `[-1, 1]`, positive forward.
    pub vertical: f32,
    /// Mouse-controlled yaw in radians. This is the body's planar facing.
    pub yaw: f32,
    /// Mouse-controlled pitch; camera only, never movement.
    pub pitch: f32,
    pub jump_held: bool,
    pub sprint_held: bool,
    pub crouch_pressed: bool,
    pub crouch_released: bool,
}

impl InputState {
    /// Snapshot for the controller tick.
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            intent: MovementIntent {
                horizontal: self.horizontal,
                vertical: self.vertical,
            },
            yaw: self.yaw,
            jump_held: self.jump_held,
            sprint_held: self.sprint_held,
            crouch_pressed: self.crouch_pressed,
            crouch_released: self.crouch_released,
        }
    }
}

/// Handle keyboard input for movement.
pub fn handle_keyboard_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut input_state: ResMut<InputState>,
) {
    let mut horizontal = 0.0;
    let mut vertical = 0.0;
    if keyboard.pressed(KeyCode::KeyW) {
        vertical += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        vertical -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        horizontal += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        horizontal -= 1.0;
    }
    input_state.horizontal = horizontal;
    input_state.vertical = vertical;

    input_state.jump_held = keyboard.pressed(KeyCode::Space);
    input_state.sprint_held =
        keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    // Crouch is edge-triggered, not held-state polled.
    input_state.crouch_pressed = keyboard.just_pressed(KeyCode::ControlLeft);
    input_state.crouch_released = keyboard.just_released(KeyCode::ControlLeft);
}

/// Handle mouse input for looking around.
pub fn handle_mouse_input(
    mut mouse_motion: MessageReader<MouseMotion>,
    settings: Res<Settings>,
    mut input_state: ResMut<InputState>,
) {
    let mut delta = Vec2::ZERO;
    for motion in mouse_motion.read() {
        delta += motion.delta;
    }

    if delta != Vec2::ZERO {
        input_state.yaw -= delta.x * settings.camera.sens_x;
        input_state.pitch -= delta.y * settings.camera.sens_y;
        input_state.pitch = input_state.pitch.clamp(-FRAC_PI_2 + 0.01, FRAC_PI_2 - 0.01);
    }
}

/// Drop held/edge flags so nothing keeps driving while paused.
pub fn clear_input(mut input_state: ResMut<InputState>) {
    let yaw = input_state.yaw;
    let pitch = input_state.pitch;
    *input_state = InputState {
        yaw,
        pitch,
        ..InputState::default()
    };
}
