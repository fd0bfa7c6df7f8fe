//! Pawn layer: the per-participant, non-replicated side of the gizmo.
//!
//! A pawn translates raw pointer rays into [`Intent`]s against the shared
//! session model and renders whatever the model says. Drag math happens
//! here, on transient [`DragSession`] state; only the published intents
//! are ordered across participants.
//!
//! # Invariants
//! - Pawn state never feeds back into the model except through intents.
//! - Geometric degeneracies skip the frame; they never error.
//! - A drag session ends at pointer-up or teardown; later events are
//!   ignored.
//!
//! [`Intent`]: gizmospace_session::Intent

pub mod drag;
pub mod gizmo_pawn;
pub mod liveness;
pub mod pointer;
pub mod rotate;
pub mod scale;
pub mod translate;

pub use drag::DragSession;
pub use gizmo_pawn::{GizmoPawn, LifecycleHooks};
pub use liveness::{CHECK_INTERVAL_MS, IDLE_TIMEOUT_MS, IdleMonitor};
pub use pointer::PointerEvent;
