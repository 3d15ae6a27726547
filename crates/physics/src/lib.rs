//! Physics Adapter: rapier3d bodies and sensors behind a tagged façade.
//!
//! # Invariants
//! - Every collider the simulation cares about carries a `BodyTag`.
//! - At most one player body exists at a time.
//! - Sensor intersections are reported once, on the step they start.

pub mod world;

pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
pub use world::{PhysicsError, PhysicsWorld, SensorHit};
