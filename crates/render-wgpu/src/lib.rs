//! wgpu render backend for the hub world.
//!
//! Renders a line-grid terrain patch and instanced cubes for the props the
//! view layer projects out of hub state. Camera orbits the player with
//! right-mouse drag and scroll zoom.
//!
//! # Invariants
//! - The renderer never mutates hub state; it consumes prop instances.
//! - Camera motion is presentation-only and never enters the simulation.

mod camera;
mod gpu;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::WgpuRenderer;
