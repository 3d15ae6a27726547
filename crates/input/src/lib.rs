//! Player Input: logical movement flags decoupled from the window system.
//!
//! # Invariants
//! - The controller consumes `MovementFlags`, never raw key events.
//! - Flags are owned by the app loop and mutated on key transitions only.

pub mod movement;

pub use movement::{MovementFlags, MovementKey, ScriptError, ScriptStep, parse_script};
