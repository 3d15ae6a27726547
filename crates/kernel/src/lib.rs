//! Hub Kernel: authoritative player/world state and its update rules.
//!
//! # Invariants
//! - All state mutations flow through explicit operations.
//! - Area and item collections only grow (outside of `reset`).
//! - Every effective mutation appends an event for view refresh.

pub mod state;

pub use state::{HubState, Objective, StateEvent};
