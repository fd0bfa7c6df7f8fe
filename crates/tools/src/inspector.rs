use gizmospace_common::GizmoId;
use gizmospace_session::{Mode, SessionModel};

/// Session inspector for developer tooling.
///
/// Provides read-only queries against the replicated session state for
/// debugging and development UI.
pub struct SessionInspector;

impl SessionInspector {
    /// Produce a summary of the session state.
    pub fn summary(model: &SessionModel) -> SessionSummary {
        SessionSummary {
            target_count: model.targets().len(),
            gizmo_count: model.gizmos().len(),
            pending_events: model.events().len(),
            state_hash: model.state_hash(),
        }
    }

    /// Detailed info about one gizmo actor.
    pub fn inspect_gizmo(model: &SessionModel, id: GizmoId) -> Option<GizmoInfo> {
        model.gizmo(id).map(|g| GizmoInfo {
            id,
            mode: g.mode,
            manipulators: g.manipulators.iter().map(|m| m.name).collect(),
            has_property_sheet: g.property_sheet.is_some(),
            last_interaction_ms: g.last_interaction_ms,
        })
    }

    /// List all live gizmo ids.
    pub fn list_gizmos(model: &SessionModel) -> Vec<GizmoId> {
        model.gizmos().keys().copied().collect()
    }
}

/// Summary of session state for the inspector.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub target_count: usize,
    pub gizmo_count: usize,
    pub pending_events: usize,
    pub state_hash: u64,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Session: targets={} gizmos={} pending_events={} hash={:#018x}",
            self.target_count, self.gizmo_count, self.pending_events, self.state_hash
        )
    }
}

/// Detailed info about a single gizmo actor.
#[derive(Debug, Clone)]
pub struct GizmoInfo {
    pub id: GizmoId,
    pub mode: Mode,
    pub manipulators: Vec<&'static str>,
    pub has_property_sheet: bool,
    pub last_interaction_ms: u64,
}

impl std::fmt::Display for GizmoInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Gizmo [{:.8}] mode={:?} handles=[{}] sheet={}",
            &self.id.0.to_string()[..8],
            self.mode,
            self.manipulators.join(", "),
            self.has_property_sheet,
        )
    }
}
