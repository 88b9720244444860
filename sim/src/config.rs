//! Controller tuning.
//!
//! All values are plain tunables supplied by the host; nothing here is
//! validated (a zero cooldown or negative speed behaves however the math
//! says it behaves).

use serde::{Deserialize, Serialize};

/// Extra ray length below the capsule's half height for ground probing.
/// Both the grounded check and the slope probe use this same margin so the
/// two cannot disagree at the exact threshold distance.
pub const GROUND_PROBE_MARGIN: f32 = 0.3;

/// Numeric tuning for the player controller.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Target speed while walking (units per second).
    pub walk_speed: f32,
    /// Target speed while sprinting.
    pub sprint_speed: f32,
    /// Target speed while crouched.
    pub crouch_speed: f32,
    /// Linear damping applied while grounded; zero while airborne.
    pub ground_drag: f32,
    /// Upward impulse applied on jump activation.
    pub jump_force: f32,
    /// Seconds until another jump may activate.
    pub jump_cooldown: f32,
    /// Fraction of the ground drive available while airborne. Below 1.
    pub air_multiplier: f32,
    /// Vertical body scale while crouched.
    pub crouch_scale: f32,
    /// Steepest walkable incline in degrees. At or past this the slope
    /// force path is skipped entirely.
    pub max_slope_angle: f32,
    /// Full standing height of the body's collider.
    pub player_height: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 7.0,
            sprint_speed: 10.0,
            crouch_speed: 3.5,
            ground_drag: 5.0,
            jump_force: 12.0,
            jump_cooldown: 0.25,
            air_multiplier: 0.4,
            crouch_scale: 0.5,
            max_slope_angle: 45.0,
            player_height: 2.0,
        }
    }
}

impl ControllerConfig {
    /// Downward probe length shared by the grounded check and the slope
    /// sample.
    pub fn probe_distance(&self) -> f32 {
        self.player_height * 0.5 + GROUND_PROBE_MARGIN
    }
}
