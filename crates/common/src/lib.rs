//! Shared types for the gizmospace core: ids, transforms, colors, geometry.
//!
//! # Invariants
//! - Ids are `Ord` so every map keyed by them iterates deterministically.
//! - Geometry helpers return `Option` on degenerate input; callers skip the
//!   frame rather than surface an error.

pub mod geometry;
pub mod types;

pub use geometry::{Aabb, Plane, Ray};
pub use types::{AvatarId, Color, GizmoId, ManipulatorId, TargetId, Transform};
