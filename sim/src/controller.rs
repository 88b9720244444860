//! The player movement controller.
//!
//! One owned struct holds every piece of mutable controller state and is
//! stepped by two host-driven phases: `advance` on the variable tick
//! (ground probe, drag, input edges, speed clamp, state classification)
//! and `advance_fixed` on the fixed tick (force application). The fixed
//! tick may run zero or more times per variable tick; both phases read the
//! body through [`PhysicsBody`].

use bevy::prelude::*;

use crate::backend::PhysicsBody;
use crate::config::ControllerConfig;
use crate::events::{Dispatcher, Transition};
use crate::intent::TickInput;
use crate::jump::JumpGate;
use crate::sensor;
use crate::state::{classify, ControllerState, CoreState};

/// Ground and air drive scale applied to the speed profile.
const DRIVE_FORCE_SCALE: f32 = 10.0;

/// Slope-following drive scale.
const SLOPE_FORCE_SCALE: f32 = 20.0;

/// Downward correction while rising on a slope; keeps the body from
/// launching off crests.
const SLOPE_STICK_FORCE: f32 = 50.0;

/// Impulse paired with the crouch scale change, down on enter and up on
/// release, to keep ground contact through the resize.
const CROUCH_IMPULSE: f32 = 5.0;

/// Physics-driven first-person movement controller.
pub struct PlayerController {
    config: ControllerConfig,
    core: CoreState,
    gate: JumpGate,
    dispatcher: Dispatcher,
    active: bool,
}

impl PlayerController {
    /// Build a disabled controller. Call [`enable`](Self::enable) before
    /// stepping it.
    pub fn new(config: ControllerConfig) -> Self {
        let core = CoreState::new(config.walk_speed);
        Self {
            config,
            core,
            gate: JumpGate::new(),
            dispatcher: Dispatcher::new(),
            active: false,
        }
    }

    /// Subscribe the built-in transition handlers and start accepting
    /// ticks. Handler order matches subscription order. Enabling an
    /// already-active controller does nothing.
    pub fn enable(&mut self) {
        if self.active {
            return;
        }

        let sprint = self.config.sprint_speed;
        let walk = self.config.walk_speed;
        let crouch = self.config.crouch_speed;

        self.dispatcher
            .subscribe(Transition::Jump, |core| core.exiting_slope = true);
        self.dispatcher
            .subscribe(Transition::Crouch, move |core| core.set_crouching(crouch));
        self.dispatcher
            .subscribe(Transition::Sprint, move |core| core.set_sprinting(sprint));
        self.dispatcher
            .subscribe(Transition::Walk, move |core| core.set_walking(walk));
        self.dispatcher.subscribe(Transition::Air, CoreState::set_air);
        self.dispatcher.subscribe(Transition::Idle, CoreState::set_idle);

        self.active = true;
    }

    /// Drop every subscription and stop accepting ticks. A cooldown that
    /// would fire after this point never runs: both step phases are no-ops
    /// while inactive.
    pub fn disable(&mut self) {
        self.dispatcher.clear();
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> ControllerState {
        self.core.state
    }

    pub fn grounded(&self) -> bool {
        self.core.grounded
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Transition kinds emitted since the last drain, in emission order.
    pub fn take_transitions(&mut self) -> Vec<Transition> {
        self.dispatcher.take_emitted()
    }

    /// Variable-rate phase: probe the ground, apply drag, consume input
    /// edges, clamp speed, classify.
    pub fn advance(&mut self, dt: f32, input: &TickInput, body: &mut impl PhysicsBody) {
        if !self.active {
            return;
        }

        // The jump cooldown restores readiness and closes the jump-exit
        // window on the same tick boundary.
        if self.gate.tick(dt) {
            self.core.exiting_slope = false;
        }

        self.core.grounded = sensor::grounded(body, self.config.probe_distance());

        body.set_linear_damping(if self.core.grounded {
            self.config.ground_drag
        } else {
            0.0
        });

        self.handle_input(input, body);
        self.speed_control(body);

        if let Some(kind) = classify(self.core.grounded, self.core.crouching, input.sprint_held) {
            self.dispatcher.emit(kind, &mut self.core);
        }
    }

    /// Fixed-rate phase: drive forces for the current regime and hand
    /// gravity back to the engine unless a walkable incline holds it.
    pub fn advance_fixed(&mut self, input: &TickInput, body: &mut impl PhysicsBody) {
        if !self.active {
            return;
        }

        let move_dir = move_direction(input);

        if self.core.grounded {
            body.apply_force(move_dir * self.core.move_speed * DRIVE_FORCE_SCALE);
        } else {
            body.apply_force(
                move_dir * self.core.move_speed * DRIVE_FORCE_SCALE * self.config.air_multiplier,
            );
        }

        let slope = sensor::sample(body, self.config.probe_distance());
        let on_slope = slope.is_on_slope(self.config.max_slope_angle);

        if on_slope && !self.core.exiting_slope {
            let slope_dir = move_dir.reject_from_normalized(slope.normal).normalize_or_zero();
            body.apply_force(slope_dir * self.core.move_speed * SLOPE_FORCE_SCALE);

            // Rising along the incline launches the body off crests
            // without a counter-force.
            if body.velocity().y > 0.0 {
                body.apply_force(Vec3::NEG_Y * SLOPE_STICK_FORCE);
            }
        }

        // On a walkable incline the slope drive substitutes for gravity
        // decomposition; everywhere else the engine integrates gravity.
        body.set_gravity_enabled(!on_slope);
    }

    fn handle_input(&mut self, input: &TickInput, body: &mut impl PhysicsBody) {
        if input.jump_held
            && self
                .gate
                .try_activate(self.core.grounded, self.config.jump_cooldown)
        {
            self.dispatcher.emit(Transition::Jump, &mut self.core);

            // Vertical velocity resets so every jump reaches the same
            // height regardless of what the body was doing.
            let velocity = body.velocity();
            body.set_velocity(Vec3::new(velocity.x, 0.0, velocity.z));
            body.apply_impulse(Vec3::Y * self.config.jump_force);
        }

        if input.crouch_pressed {
            body.set_height_scale(self.config.crouch_scale);
            body.apply_impulse(Vec3::NEG_Y * CROUCH_IMPULSE);
            self.core.crouching = true;
        }

        if input.crouch_released {
            body.set_height_scale(1.0);
            body.apply_impulse(Vec3::Y * CROUCH_IMPULSE);
            self.core.crouching = false;
        }
    }

    /// Clamp to the speed profile: full 3D magnitude while slope-following
    /// is active, horizontal plane only otherwise (jump and fall speeds
    /// stay untouched).
    fn speed_control(&mut self, body: &mut impl PhysicsBody) {
        let slope = sensor::sample(body, self.config.probe_distance());
        let velocity = body.velocity();

        if slope.is_on_slope(self.config.max_slope_angle) && !self.core.exiting_slope {
            if velocity.length() > self.core.move_speed {
                body.set_velocity(velocity.normalize() * self.core.move_speed);
            }
        } else {
            let flat = Vec3::new(velocity.x, 0.0, velocity.z);
            if flat.length() > self.core.move_speed {
                let limited = flat.normalize() * self.core.move_speed;
                body.set_velocity(Vec3::new(limited.x, velocity.y, limited.z));
            }
        }
    }
}

/// Desired planar direction in the body's yaw frame. Zero intent yields
/// the zero vector, never NaN.
fn move_direction(input: &TickInput) -> Vec3 {
    let forward = Vec3::new(-input.yaw.sin(), 0.0, -input.yaw.cos());
    let right = Vec3::new(input.yaw.cos(), 0.0, -input.yaw.sin());
    (forward * input.intent.vertical + right * input.intent.horizontal).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBody;
    use crate::intent::MovementIntent;

    const DT: f32 = 1.0 / 60.0;

    fn controller() -> PlayerController {
        let mut controller = PlayerController::new(ControllerConfig::default());
        controller.enable();
        controller
    }

    fn forward_input() -> TickInput {
        TickInput {
            intent: MovementIntent {
                horizontal: 0.0,
                vertical: 1.0,
            },
            ..TickInput::default()
        }
    }

    fn assert_vec3_eq(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).length() < 1e-4,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_ground_drive_scales_speed_profile_by_ten() {
        let mut controller = controller();
        let mut body = MockBody::on_flat_ground();
        let input = forward_input();

        controller.advance(DT, &input, &mut body);
        body.forces.clear();
        controller.advance_fixed(&input, &mut body);

        // Walk profile 7 at yaw 0: forward is -Z, drive is 7 * 10.
        assert_vec3_eq(body.total_force(), Vec3::new(0.0, 0.0, -70.0));
    }

    #[test]
    fn test_drive_force_matches_profile_of_six() {
        let mut config = ControllerConfig::default();
        config.walk_speed = 6.0;
        let mut controller = PlayerController::new(config);
        controller.enable();
        let mut body = MockBody::on_flat_ground();
        let input = forward_input();

        controller.advance(DT, &input, &mut body);
        body.forces.clear();
        controller.advance_fixed(&input, &mut body);

        assert_vec3_eq(body.total_force(), Vec3::new(0.0, 0.0, -60.0));
    }

    #[test]
    fn test_air_drive_is_reduced_by_multiplier() {
        let mut controller = controller();
        let mut body = MockBody::default();
        let input = forward_input();

        controller.advance(DT, &input, &mut body);
        controller.advance_fixed(&input, &mut body);

        // Air keeps the walk profile: 7 * 10 * 0.4.
        assert_vec3_eq(body.total_force(), Vec3::new(0.0, 0.0, -28.0));
    }

    #[test]
    fn test_zero_intent_applies_zero_force() {
        let mut controller = controller();
        let mut body = MockBody::on_flat_ground();
        let input = TickInput::default();

        controller.advance(DT, &input, &mut body);
        body.forces.clear();
        controller.advance_fixed(&input, &mut body);

        let total = body.total_force();
        assert!(total.is_finite());
        assert_vec3_eq(total, Vec3::ZERO);
    }

    #[test]
    fn test_slope_adds_projected_drive_and_disables_gravity() {
        let mut controller = controller();
        let mut body = MockBody::on_slope(30.0);
        let input = forward_input();

        controller.advance(DT, &input, &mut body);
        body.forces.clear();
        controller.advance_fixed(&input, &mut body);

        assert!(!body.gravity_enabled);
        // Ground drive plus the 20x slope drive.
        assert!(body.forces.len() == 2);
        let slope_drive = body.forces[1];
        assert!((slope_drive.length() - 7.0 * 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_rising_on_slope_gets_downward_correction() {
        let mut controller = controller();
        let mut body = MockBody::on_slope(30.0);
        body.velocity = Vec3::new(0.0, 2.0, -3.0);
        let input = forward_input();

        controller.advance(DT, &input, &mut body);
        body.forces.clear();
        controller.advance_fixed(&input, &mut body);

        assert!(body
            .forces
            .iter()
            .any(|f| (*f - Vec3::new(0.0, -SLOPE_STICK_FORCE, 0.0)).length() < 1e-4));
    }

    #[test]
    fn test_flat_ground_keeps_gravity_enabled() {
        let mut controller = controller();
        let mut body = MockBody::on_flat_ground();
        let input = forward_input();

        controller.advance(DT, &input, &mut body);
        controller.advance_fixed(&input, &mut body);

        assert!(body.gravity_enabled);
    }

    #[test]
    fn test_horizontal_clamp_leaves_vertical_untouched() {
        let mut config = ControllerConfig::default();
        config.walk_speed = 5.0;
        let mut controller = PlayerController::new(config);
        controller.enable();

        let mut body = MockBody::on_flat_ground();
        body.velocity = Vec3::new(6.0, -4.0, 8.0);

        controller.advance(DT, &TickInput::default(), &mut body);

        let flat = Vec3::new(body.velocity.x, 0.0, body.velocity.z);
        assert!((flat.length() - 5.0).abs() < 1e-4);
        assert_eq!(body.velocity.y, -4.0);
    }

    #[test]
    fn test_clamp_at_exact_limit_is_a_no_op() {
        let mut config = ControllerConfig::default();
        config.walk_speed = 5.0;
        let mut controller = PlayerController::new(config);
        controller.enable();

        let mut body = MockBody::on_flat_ground();
        body.velocity = Vec3::new(3.0, 0.0, 4.0);

        controller.advance(DT, &TickInput::default(), &mut body);

        assert_vec3_eq(body.velocity, Vec3::new(3.0, 0.0, 4.0));
    }

    #[test]
    fn test_slope_clamp_limits_full_velocity() {
        let mut config = ControllerConfig::default();
        config.walk_speed = 5.0;
        let mut controller = PlayerController::new(config);
        controller.enable();

        let mut body = MockBody::on_slope(30.0);
        body.velocity = Vec3::new(0.0, 6.0, -8.0);

        controller.advance(DT, &TickInput::default(), &mut body);

        assert!((body.velocity.length() - 5.0).abs() < 1e-4);
        // Direction is preserved, only the magnitude shrinks.
        assert!(body.velocity.y > 0.0);
    }

    #[test]
    fn test_jump_zeroes_vertical_velocity_then_applies_impulse() {
        let mut controller = controller();
        let mut body = MockBody::on_flat_ground();
        body.velocity = Vec3::new(2.0, -3.0, 1.0);

        let input = TickInput {
            jump_held: true,
            ..TickInput::default()
        };
        controller.advance(DT, &input, &mut body);

        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.impulses.len(), 1);
        assert_vec3_eq(body.impulses[0], Vec3::Y * 12.0);
        assert!(controller.take_transitions().contains(&Transition::Jump));
    }

    #[test]
    fn test_second_jump_inside_cooldown_is_a_no_op() {
        let mut controller = controller();
        let mut body = MockBody::on_flat_ground();
        let input = TickInput {
            jump_held: true,
            ..TickInput::default()
        };

        controller.advance(DT, &input, &mut body);
        assert_eq!(body.impulses.len(), 1);

        // Held through the cooldown window: no second impulse.
        controller.advance(DT, &input, &mut body);
        controller.advance(DT, &input, &mut body);
        assert_eq!(body.impulses.len(), 1);
    }

    #[test]
    fn test_jump_gate_reopens_after_cooldown() {
        let mut controller = controller();
        let mut body = MockBody::on_flat_ground();
        let input = TickInput {
            jump_held: true,
            ..TickInput::default()
        };

        // Activate at t=0 with the default 0.25s cooldown.
        controller.advance(DT, &input, &mut body);
        assert_eq!(body.impulses.len(), 1);

        // t = 0.1s: ignored.
        controller.advance(0.1, &input, &mut body);
        assert_eq!(body.impulses.len(), 1);

        // t = 0.3s: cooldown elapsed, second jump fires.
        controller.advance(0.2, &input, &mut body);
        assert_eq!(body.impulses.len(), 2);
    }

    #[test]
    fn test_jump_suppresses_slope_following_until_cooldown_elapses() {
        let mut controller = controller();
        let mut body = MockBody::on_slope(30.0);
        let jump = TickInput {
            jump_held: true,
            ..TickInput::default()
        };

        controller.advance(DT, &jump, &mut body);
        body.forces.clear();
        controller.advance_fixed(&forward_input(), &mut body);

        // Exiting-slope: drive force only, no 20x slope follow.
        assert_eq!(body.forces.len(), 1);

        // After the cooldown the slope path resumes.
        controller.advance(0.3, &TickInput::default(), &mut body);
        body.forces.clear();
        controller.advance_fixed(&forward_input(), &mut body);
        assert_eq!(body.forces.len(), 2);
    }

    #[test]
    fn test_crouch_edges_scale_body_and_stack_impulses() {
        let mut controller = controller();
        let mut body = MockBody::on_flat_ground();

        let press = TickInput {
            crouch_pressed: true,
            ..TickInput::default()
        };
        controller.advance(DT, &press, &mut body);
        assert_eq!(body.height_scale, 0.5);
        assert_vec3_eq(body.impulses[0], Vec3::NEG_Y * 5.0);
        assert_eq!(controller.state(), ControllerState::Crouching);

        let release = TickInput {
            crouch_released: true,
            ..TickInput::default()
        };
        controller.advance(DT, &release, &mut body);
        assert_eq!(body.height_scale, 1.0);
        assert_vec3_eq(body.impulses[1], Vec3::Y * 5.0);

        // Re-trigger stacks another impulse; there is no debounce.
        controller.advance(DT, &press, &mut body);
        assert_eq!(body.impulses.len(), 3);
    }

    #[test]
    fn test_grounded_sets_drag_airborne_clears_it() {
        let mut controller = controller();

        let mut body = MockBody::on_flat_ground();
        controller.advance(DT, &TickInput::default(), &mut body);
        assert_eq!(body.damping, 5.0);

        let mut body = MockBody::default();
        controller.advance(DT, &TickInput::default(), &mut body);
        assert_eq!(body.damping, 0.0);
    }

    #[test]
    fn test_sprint_transition_sets_sprint_profile() {
        let mut controller = controller();
        let mut body = MockBody::on_flat_ground();
        let input = TickInput {
            sprint_held: true,
            ..TickInput::default()
        };

        controller.advance(DT, &input, &mut body);

        assert_eq!(controller.state(), ControllerState::Sprinting);
        assert_eq!(
            controller.take_transitions().last(),
            Some(&Transition::Sprint)
        );
    }

    #[test]
    fn test_disabled_controller_ignores_ticks() {
        let mut controller = controller();
        let mut body = MockBody::on_flat_ground();

        controller.disable();
        let input = TickInput {
            jump_held: true,
            sprint_held: true,
            ..TickInput::default()
        };
        controller.advance(DT, &input, &mut body);
        controller.advance_fixed(&input, &mut body);

        assert!(body.forces.is_empty());
        assert!(body.impulses.is_empty());
        assert!(controller.take_transitions().is_empty());
    }

    #[test]
    fn test_cooldown_never_fires_after_teardown() {
        let mut controller = controller();
        let mut body = MockBody::on_slope(30.0);
        let jump = TickInput {
            jump_held: true,
            ..TickInput::default()
        };

        controller.advance(DT, &jump, &mut body);
        controller.take_transitions();
        controller.disable();

        // Plenty of time for the cooldown, but the controller is inactive:
        // the timer must not run, let alone mutate state.
        controller.advance(10.0, &TickInput::default(), &mut body);
        assert!(controller.take_transitions().is_empty());
    }

    #[test]
    fn test_move_direction_normalizes_diagonals() {
        let input = TickInput {
            intent: MovementIntent {
                horizontal: 1.0,
                vertical: 1.0,
            },
            ..TickInput::default()
        };
        let dir = move_direction(&input);
        assert!((dir.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_move_direction_follows_yaw() {
        let input = TickInput {
            intent: MovementIntent {
                horizontal: 0.0,
                vertical: 1.0,
            },
            yaw: std::f32::consts::FRAC_PI_2,
            ..TickInput::default()
        };
        // Yaw of +90 degrees turns -Z forward into -X.
        assert_vec3_eq(move_direction(&input), Vec3::NEG_X);
    }
}
