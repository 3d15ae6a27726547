//! Hub Simulation: the scene, the player controller, and the session that
//! drives one logical tick per rendered frame.
//!
//! # Invariants
//! - Frame order is fixed: physics step, sensor rules, controller tick.
//! - The controller is the sole writer of the stored position.
//! - Interactive-object rules mutate only through the kernel's operations.

pub mod controller;
pub mod layout;
pub mod session;

pub use layout::{CrystalSpec, DoorSpec, HubLayout, RockSpec};
pub use session::HubSession;
