//! Per-tick input snapshot.

/// Raw movement axes, each in `[-1, 1]`. Sampled once per variable tick
/// and immutable for the rest of the tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MovementIntent {
    /// Strafe axis: positive is the body's right.
    pub horizontal: f32,
    /// Drive axis: positive is the body's forward.
    pub vertical: f32,
}

/// Everything the controller consumes from the input collaborator for one
/// tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickInput {
    pub intent: MovementIntent,
    /// Planar facing of the body in radians. Driven by mouse yaw only;
    /// camera pitch never leaks into the movement frame.
    pub yaw: f32,
    /// Jump key held this tick.
    pub jump_held: bool,
    /// Sprint key held this tick.
    pub sprint_held: bool,
    /// Crouch key went down this tick (edge, not held state).
    pub crouch_pressed: bool,
    /// Crouch key came up this tick.
    pub crouch_released: bool,
}
