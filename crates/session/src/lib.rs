//! Session model: authoritative replicated gizmo state.
//!
//! Every participant holds an identical copy of [`SessionModel`] and feeds
//! it the same totally-ordered stream of operations and [`Intent`]s. Apply
//! is a pure function per variant, so replicas never diverge.
//!
//! # Invariants
//! - All state mutations flow through explicit operations or intents.
//! - A mode transition destroys the previous manipulator set before the
//!   next one is created; the sets never overlap.
//! - Intents aimed at a dismissed gizmo are idempotent no-ops.

pub mod gizmo;
pub mod intent;
pub mod model;
pub mod placement;

pub use gizmo::{GizmoActor, ManipulatorDescriptor, ManipulatorKind, Mode, PropertySheetButton};
pub use intent::Intent;
pub use model::{SessionError, SessionEvent, SessionModel, TargetState};
