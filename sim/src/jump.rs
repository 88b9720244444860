//! Jump activation gating.
//!
//! Ready -> (activate) -> Cooling -> (cooldown elapses) -> Ready. The
//! original deferred-callback reset is an explicit countdown here, ticked
//! by the variable step and fired on the first tick boundary at or past
//! the cooldown.

/// Cooldown gate owned by the jump controller.
#[derive(Clone, Copy, Debug)]
pub struct JumpGate {
    ready: bool,
    cooldown_remaining: f32,
}

impl Default for JumpGate {
    fn default() -> Self {
        Self {
            ready: true,
            cooldown_remaining: 0.0,
        }
    }
}

impl JumpGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Count the cooldown down. Returns true on the tick it elapses, which
    /// is also the moment the jump-exit window closes.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.ready {
            return false;
        }
        self.cooldown_remaining -= dt;
        if self.cooldown_remaining <= 0.0 {
            self.ready = true;
            self.cooldown_remaining = 0.0;
            true
        } else {
            false
        }
    }

    /// Consume readiness if the gate is ready and the body is grounded.
    /// Anything else is a silent no-op: no event, no state change.
    pub fn try_activate(&mut self, grounded: bool, cooldown: f32) -> bool {
        if !self.ready || !grounded {
            return false;
        }
        self.ready = false;
        self.cooldown_remaining = cooldown;
        true
    }
}
