//! Developer Tooling: session inspector and debugging queries.
//!
//! # Invariants
//! - Tools are read-only; they never mutate the session model.

pub mod inspector;

pub use inspector::{GizmoInfo, SessionInspector, SessionSummary};

pub fn crate_info() -> &'static str {
    "gizmospace-tools v0.1.0"
}
