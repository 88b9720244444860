//! Deterministic movement simulation for the Ridgerunner sandbox.
//!
//! Everything in this crate is plain decision logic: state
//! classification, slope-aware force selection, jump gating, and the
//! transition dispatch table. The physics engine, input devices, and
//! rendering live in the host; they reach this crate only through
//! [`PhysicsBody`] and [`TickInput`].

pub mod backend;
pub mod config;
pub mod controller;
pub mod events;
pub mod intent;
pub mod jump;
pub mod sensor;
pub mod state;

pub use backend::{PhysicsBody, RayHit};
pub use config::ControllerConfig;
pub use controller::PlayerController;
pub use events::{Dispatcher, Subscription, Transition};
pub use intent::{MovementIntent, TickInput};
pub use jump::JumpGate;
pub use sensor::SlopeSample;
pub use state::ControllerState;
