//! Ground and slope probing.
//!
//! Both probes use identical ray geometry so the grounded flag and the
//! slope classification cannot flicker apart at the exact threshold
//! distance.

use bevy::prelude::*;

use crate::backend::PhysicsBody;

/// Surface classification under the body. Recomputed from a fresh ray on
/// every use; valid for one tick only.
#[derive(Clone, Copy, Debug)]
pub struct SlopeSample {
    /// Whether the probe hit anything within range.
    pub has_contact: bool,
    /// Unit surface normal of the hit, world up when airborne.
    pub normal: Vec3,
    /// Angle between world up and the surface normal, in degrees.
    pub angle_deg: f32,
}

impl SlopeSample {
    /// Sample for a body with nothing beneath it.
    pub const AIRBORNE: Self = Self {
        has_contact: false,
        normal: Vec3::Y,
        angle_deg: 0.0,
    };

    /// Walkable incline: contact with an angle strictly between flat and
    /// the configured limit. Flat ground is excluded; it takes the ground
    /// force path, not the slope path.
    pub fn is_on_slope(&self, max_angle_deg: f32) -> bool {
        self.has_contact && self.angle_deg > 0.0 && self.angle_deg < max_angle_deg
    }
}

/// Probe the surface beneath the body.
pub fn sample(body: &impl PhysicsBody, probe_distance: f32) -> SlopeSample {
    match body.raycast_down(probe_distance) {
        Some(hit) => SlopeSample {
            has_contact: true,
            normal: hit.normal,
            angle_deg: Vec3::Y.angle_between(hit.normal).to_degrees(),
        },
        None => SlopeSample::AIRBORNE,
    }
}

/// Grounded-for-movement check used by the drag and state logic. Same
/// geometry as [`sample`], evaluated independently each tick.
pub fn grounded(body: &impl PhysicsBody, probe_distance: f32) -> bool {
    body.raycast_down(probe_distance).is_some()
}
