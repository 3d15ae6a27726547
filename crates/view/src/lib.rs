//! Hub Views: read-side projections of the hub state.
//!
//! # Invariants
//! - Views cannot mutate state; everything here takes `&HubState`.
//! - A view re-render is driven by the session's event drain, once per frame.

pub mod hud;
pub mod props;

pub use hud::{CONTROLS, HudModel, HudObjective, TextHud};
pub use props::{PropInstance, door_label, scene_props};
