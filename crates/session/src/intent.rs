use glam::{Quat, Vec3};
use gizmospace_common::GizmoId;
use serde::{Deserialize, Serialize};

/// A request to mutate canonical state, delivered in the same total order
/// to every participant and applied by one pure function per variant.
///
/// Transform intents carry the whole candidate value computed by the
/// publishing pawn; application is last-published-wins per handle, so no
/// merge logic is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Commit a candidate translation for the gizmo's target.
    Translate { gizmo: GizmoId, translation: Vec3 },
    /// Commit a candidate rotation for the gizmo's target.
    Rotate { gizmo: GizmoId, rotation: Quat },
    /// Commit a candidate scale for the gizmo's target.
    Scale { gizmo: GizmoId, scale: Vec3 },
    /// Advance the mode machine one step (move -> rotate -> scale -> move).
    CycleMode { gizmo: GizmoId },
    /// Tear the gizmo down. Duplicate dismissals are no-ops.
    Dismiss { gizmo: GizmoId },
    /// Reset the idle-liveness clock. The timestamp rides in the intent so
    /// every replica records the same value.
    InteractionPing { gizmo: GizmoId, at_ms: u64 },
}

impl Intent {
    /// The gizmo this intent is scoped to.
    pub fn gizmo(&self) -> GizmoId {
        match *self {
            Intent::Translate { gizmo, .. }
            | Intent::Rotate { gizmo, .. }
            | Intent::Scale { gizmo, .. }
            | Intent::CycleMode { gizmo }
            | Intent::Dismiss { gizmo }
            | Intent::InteractionPing { gizmo, .. } => gizmo,
        }
    }
}
