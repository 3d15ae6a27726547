//! Shared Types: gameplay identifiers and physics body tags.
//!
//! # Invariants
//! - Identifiers are plain strings; equality and ordering are byte-wise.
//! - Every physics body carries exactly one `BodyTag`.

pub mod types;

pub use types::{AreaId, BodyTag, ItemId, ObjectiveId};
