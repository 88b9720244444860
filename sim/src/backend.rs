//! Physics interface consumed by the controller.
//!
//! The controller never owns the body it steers; the host supplies an
//! implementation of [`PhysicsBody`] backed by its physics engine. The
//! controller reads position/velocity, writes forces and impulses, and in
//! exactly one place (pre-jump) writes velocity directly.

use bevy::prelude::*;

/// Result of a downward ray query against the ground collision set.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    /// Distance from the ray origin to the surface.
    pub distance: f32,
    /// Unit surface normal at the hit point.
    pub normal: Vec3,
}

/// Operations the controller needs from the rigid body it steers.
pub trait PhysicsBody {
    /// Body center in world space.
    fn position(&self) -> Vec3;

    /// Current linear velocity.
    fn velocity(&self) -> Vec3;

    /// Overwrite linear velocity. Used for the speed clamp and for zeroing
    /// the vertical component before a jump impulse.
    fn set_velocity(&mut self, velocity: Vec3);

    /// Continuous force, accumulated over the current fixed tick.
    fn apply_force(&mut self, force: Vec3);

    /// Instantaneous velocity-changing application.
    fn apply_impulse(&mut self, impulse: Vec3);

    /// Linear damping on the body.
    fn set_linear_damping(&mut self, damping: f32);

    /// Whether the engine integrates gravity for this body.
    fn set_gravity_enabled(&mut self, enabled: bool);

    /// Vertical scale applied to the body's collider and visuals.
    fn set_height_scale(&mut self, scale: f32);

    /// Ray from the body center straight down, filtered to the ground
    /// collision set.
    fn raycast_down(&self, max_distance: f32) -> Option<RayHit>;
}

#[cfg(test)]
pub(crate) mod mock {
    //! Recording body used by the controller and sensor tests.

    use super::*;

    pub(crate) struct MockBody {
        pub position: Vec3,
        pub velocity: Vec3,
        /// Surface beneath the body, if any: (distance, normal).
        pub ground: Option<RayHit>,
        pub forces: Vec<Vec3>,
        pub impulses: Vec<Vec3>,
        pub damping: f32,
        pub gravity_enabled: bool,
        pub height_scale: f32,
    }

    impl Default for MockBody {
        fn default() -> Self {
            Self {
                position: Vec3::ZERO,
                velocity: Vec3::ZERO,
                ground: None,
                forces: Vec::new(),
                impulses: Vec::new(),
                damping: 0.0,
                gravity_enabled: true,
                height_scale: 1.0,
            }
        }
    }

    impl MockBody {
        /// Body resting on a flat surface directly below.
        pub(crate) fn on_flat_ground() -> Self {
            Self {
                ground: Some(RayHit {
                    distance: 1.0,
                    normal: Vec3::Y,
                }),
                ..Self::default()
            }
        }

        /// Body resting on an incline of the given angle in degrees.
        pub(crate) fn on_slope(angle_deg: f32) -> Self {
            let rad = angle_deg.to_radians();
            Self {
                ground: Some(RayHit {
                    distance: 1.0,
                    normal: Vec3::new(rad.sin(), rad.cos(), 0.0),
                }),
                ..Self::default()
            }
        }

        pub(crate) fn total_force(&self) -> Vec3 {
            self.forces.iter().copied().sum()
        }
    }

    impl PhysicsBody for MockBody {
        fn position(&self) -> Vec3 {
            self.position
        }

        fn velocity(&self) -> Vec3 {
            self.velocity
        }

        fn set_velocity(&mut self, velocity: Vec3) {
            self.velocity = velocity;
        }

        fn apply_force(&mut self, force: Vec3) {
            self.forces.push(force);
        }

        fn apply_impulse(&mut self, impulse: Vec3) {
            self.impulses.push(impulse);
        }

        fn set_linear_damping(&mut self, damping: f32) {
            self.damping = damping;
        }

        fn set_gravity_enabled(&mut self, enabled: bool) {
            self.gravity_enabled = enabled;
        }

        fn set_height_scale(&mut self, scale: f32) {
            self.height_scale = scale;
        }

        fn raycast_down(&self, max_distance: f32) -> Option<RayHit> {
            self.ground.filter(|hit| hit.distance <= max_distance)
        }
    }
}
