//! Player body and the rapier-backed controller driver.
//!
//! The deterministic controller lives in `sim`; this module owns the
//! rapier rigid body, adapts it to the controller's physics interface,
//! and steps the controller from the `Update` and `FixedUpdate`
//! schedules.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use sim::{PhysicsBody, PlayerController, RayHit, Transition};

use crate::input::InputState;
use crate::settings::Settings;
use crate::world::{GROUND_GROUP, PLAYER_GROUP};

/// Capsule radius of the player collider.
const PLAYER_RADIUS: f32 = 0.4;

/// Where new players drop in.
const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 4.0, 0.0);

/// The controller plus the bookkeeping for bridging its transitions into
/// Bevy messages.
#[derive(Component)]
pub struct PlayerDriver {
    pub controller: PlayerController,
    /// Last state-kind forwarded; consecutive repeats are dropped so
    /// listeners see discrete transitions, not a 60 Hz stream.
    last_state: Option<Transition>,
}

/// Transition announcement for unrelated listeners (sound triggers, UI).
#[derive(Message, Clone, Copy, Debug)]
pub struct ControllerTransition(pub Transition);

/// Spawn the player body: a dynamic capsule with rotations locked, steered
/// entirely through forces.
pub fn spawn_player(
    mut commands: Commands,
    settings: Res<Settings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let height = settings.controller.player_height;
    let half_segment = (height - 2.0 * PLAYER_RADIUS) * 0.5;

    // The initial state transition fires before this spawn, so the
    // OnEnter(Playing) enable never sees the player. Enable here; the
    // pause/resume systems take over from there.
    let mut controller = PlayerController::new(settings.controller.clone());
    controller.enable();

    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.82, 0.82, 0.86),
        perceptual_roughness: 0.6,
        ..default()
    });

    commands.spawn((
        PlayerDriver {
            controller,
            last_state: None,
        },
        Mesh3d(meshes.add(Capsule3d::new(PLAYER_RADIUS, half_segment * 2.0))),
        MeshMaterial3d(material),
        Transform::from_translation(SPAWN_POSITION),
        // Rapier physics components, nested so the outer spawn tuple stays
        // within Bevy's 15-element Bundle limit. Nested tuples flatten, so
        // the entity receives exactly these components.
        (
            RigidBody::Dynamic,
            Collider::capsule_y(half_segment, PLAYER_RADIUS),
            CollisionGroups::new(PLAYER_GROUP, Group::ALL),
            // Drag-driven movement wants no surface friction; the controller
            // owns deceleration.
            Friction {
                coefficient: 0.0,
                combine_rule: CoefficientCombineRule::Min,
            },
            Restitution {
                coefficient: 0.0,
                combine_rule: CoefficientCombineRule::Min,
            },
            Velocity::zero(),
            ExternalForce::default(),
            ExternalImpulse::default(),
            Damping::default(),
            GravityScale(1.0),
            LockedAxes::ROTATION_LOCKED,
            Ccd::enabled(),
        ),
    ));
}

/// Rapier-backed view of the player body handed to the controller for one
/// tick.
struct RapierBody<'a> {
    entity: Entity,
    context: RapierContext<'a>,
    transform: &'a mut Transform,
    velocity: &'a mut Velocity,
    force: &'a mut ExternalForce,
    impulse: &'a mut ExternalImpulse,
    damping: &'a mut Damping,
    gravity: &'a mut GravityScale,
}

impl PhysicsBody for RapierBody<'_> {
    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn velocity(&self) -> Vec3 {
        self.velocity.linvel
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity.linvel = velocity;
    }

    fn apply_force(&mut self, force: Vec3) {
        self.force.force += force;
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        self.impulse.impulse += impulse;
    }

    fn set_linear_damping(&mut self, damping: f32) {
        self.damping.linear_damping = damping;
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity.0 = if enabled { 1.0 } else { 0.0 };
    }

    fn set_height_scale(&mut self, scale: f32) {
        self.transform.scale.y = scale;
    }

    fn raycast_down(&self, max_distance: f32) -> Option<RayHit> {
        let filter = QueryFilter::new()
            .exclude_rigid_body(self.entity)
            .groups(CollisionGroups::new(Group::ALL, GROUND_GROUP));

        self.context
            .cast_ray_and_get_normal(
                self.transform.translation,
                Vec3::NEG_Y,
                max_distance,
                true,
                filter,
            )
            .map(|(_, hit)| RayHit {
                distance: hit.time_of_impact,
                normal: hit.normal,
            })
    }
}

type PlayerBodyComponents = (
    Entity,
    &'static mut PlayerDriver,
    &'static mut Transform,
    &'static mut Velocity,
    &'static mut ExternalForce,
    &'static mut ExternalImpulse,
    &'static mut Damping,
    &'static mut GravityScale,
);

/// Variable-rate controller phase plus the transition bridge.
pub fn drive_controller(
    time: Res<Time>,
    input_state: Res<InputState>,
    rapier: ReadRapierContext,
    mut player: Query<PlayerBodyComponents>,
    mut transitions: MessageWriter<ControllerTransition>,
) {
    let Ok((entity, mut driver, mut transform, mut velocity, mut force, mut impulse, mut damping, mut gravity)) =
        player.single_mut()
    else {
        return;
    };
    let Ok(context) = rapier.single() else {
        return;
    };

    let input = input_state.tick_input();
    let mut body = RapierBody {
        entity,
        context,
        transform: &mut transform,
        velocity: &mut velocity,
        force: &mut force,
        impulse: &mut impulse,
        damping: &mut damping,
        gravity: &mut gravity,
    };
    driver
        .controller
        .advance(time.delta_secs(), &input, &mut body);

    for kind in driver.controller.take_transitions() {
        if kind == Transition::Jump {
            transitions.write(ControllerTransition(kind));
            continue;
        }
        if driver.last_state != Some(kind) {
            driver.last_state = Some(kind);
            transitions.write(ControllerTransition(kind));
        }
    }
}

/// Fixed-rate controller phase: rebuild the force accumulator for this
/// physics step.
pub fn apply_movement_forces(
    input_state: Res<InputState>,
    rapier: ReadRapierContext,
    mut player: Query<PlayerBodyComponents>,
) {
    let Ok((entity, mut driver, mut transform, mut velocity, mut force, mut impulse, mut damping, mut gravity)) =
        player.single_mut()
    else {
        return;
    };
    let Ok(context) = rapier.single() else {
        return;
    };

    // Forces are continuous: last step's accumulation must not leak into
    // this one. Impulses are consumed by rapier itself.
    force.force = Vec3::ZERO;
    force.torque = Vec3::ZERO;

    let input = input_state.tick_input();
    let mut body = RapierBody {
        entity,
        context,
        transform: &mut transform,
        velocity: &mut velocity,
        force: &mut force,
        impulse: &mut impulse,
        damping: &mut damping,
        gravity: &mut gravity,
    };
    driver.controller.advance_fixed(&input, &mut body);
}

/// Start accepting ticks when gameplay (re)starts.
pub fn enable_controller(mut player: Query<&mut PlayerDriver>) {
    if let Ok(mut driver) = player.single_mut() {
        driver.controller.enable();
        info!("Player controller enabled");
    }
}

/// Tear down subscriptions while paused; a cooldown elapsing now must not
/// mutate anything.
pub fn disable_controller(mut player: Query<&mut PlayerDriver>) {
    if let Ok(mut driver) = player.single_mut() {
        driver.controller.disable();
        info!("Player controller disabled");
    }
}
