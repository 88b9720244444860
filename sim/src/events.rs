//! Transition dispatch.
//!
//! The controller announces state transitions through an explicit dispatch
//! table: each transition kind maps to an ordered list of handler
//! closures, invoked synchronously in registration order. Subscriptions
//! are created on controller enable and dropped wholesale on disable, so
//! nothing can mutate controller state after teardown.

use std::collections::HashMap;

use crate::state::CoreState;

/// Discrete, payload-free notifications fired by the classifier and the
/// jump controller. External listeners (sound triggers, UI) consume the
/// same kinds through the emitted-queue drain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    Jump,
    Crouch,
    Sprint,
    Walk,
    Air,
    Idle,
}

/// Handle returned by [`Dispatcher::subscribe`]; pass it back to
/// [`Dispatcher::unsubscribe`] to remove that handler alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subscription(u64);

type Handler = Box<dyn FnMut(&mut CoreState) + Send + Sync>;

/// Ordered observer lists keyed by transition kind.
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<Transition, Vec<(u64, Handler)>>,
    next_id: u64,
    emitted: Vec<Transition>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler to the list for `kind`. Handlers run in the order
    /// they were subscribed.
    pub fn subscribe(
        &mut self,
        kind: Transition,
        handler: impl FnMut(&mut CoreState) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.handlers
            .entry(kind)
            .or_default()
            .push((id, Box::new(handler)));
        Subscription(id)
    }

    /// Remove a single handler. Unknown handles are ignored.
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        for list in self.handlers.values_mut() {
            list.retain(|(id, _)| *id != subscription.0);
        }
    }

    /// Drop every handler. Emitted-but-undrained kinds are kept so a
    /// listener draining after teardown still sees them.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Invoke the handlers registered for `kind`, in registration order,
    /// then record the kind for external listeners.
    pub fn emit(&mut self, kind: Transition, core: &mut CoreState) {
        if let Some(list) = self.handlers.get_mut(&kind) {
            for (_, handler) in list.iter_mut() {
                handler(core);
            }
        }
        self.emitted.push(kind);
    }

    /// Drain the kinds emitted since the last call.
    pub fn take_emitted(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.emitted)
    }
}
