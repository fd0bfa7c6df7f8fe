use glam::Vec3;
use gizmospace_common::{AvatarId, Color, GizmoId, ManipulatorId, TargetId};
use serde::{Deserialize, Serialize};

/// Gizmo interaction mode. Cycles move -> rotate -> scale -> move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Move,
    Rotate,
    Scale,
}

impl Mode {
    /// The next mode in the cycle.
    pub fn next(self) -> Mode {
        match self {
            Mode::Move => Mode::Rotate,
            Mode::Rotate => Mode::Scale,
            Mode::Scale => Mode::Move,
        }
    }

    /// Number of manipulators this mode spawns.
    pub fn manipulator_count(self) -> usize {
        match self {
            Mode::Move => 6,
            Mode::Rotate => 3,
            Mode::Scale => 3,
        }
    }
}

/// Variant of a drag handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManipulatorKind {
    /// Axis-translation arrow.
    Axis,
    /// Single-axis rotation ring.
    Rotor,
    /// Axis-scale handle.
    Scaler,
}

/// Declarative description of one drag handle, handed to the host's
/// entity-creation facility. The axis is immutable after creation:
/// sign-bearing for Axis/Rotor handles, sign-free for Scalers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManipulatorDescriptor {
    pub id: ManipulatorId,
    pub kind: ManipulatorKind,
    pub axis: Vec3,
    pub name: &'static str,
    pub color: Color,
    pub hover_color: Color,
    /// Visual asset reference resolved by the host.
    pub shape: &'static str,
    /// Request always-on-top rendering (depth test off). The rendering
    /// layer honors this; the model only asks.
    pub overlay: bool,
}

/// Static per-mode handle table: (name, axis, color, shape).
/// A fixed array keyed by (mode, axis) instead of dynamic lookup.
const MOVE_HANDLES: [(&str, Vec3, Color, &str); 6] = [
    ("move_x_pos", Vec3::X, Color::RED, "arrow"),
    ("move_x_neg", Vec3::NEG_X, Color::RED, "arrow"),
    ("move_y_pos", Vec3::Y, Color::GREEN, "arrow"),
    ("move_y_neg", Vec3::NEG_Y, Color::GREEN, "arrow"),
    ("move_z_pos", Vec3::Z, Color::BLUE, "arrow"),
    ("move_z_neg", Vec3::NEG_Z, Color::BLUE, "arrow"),
];

const ROTATE_HANDLES: [(&str, Vec3, Color, &str); 3] = [
    ("rotate_x", Vec3::X, Color::RED, "ring"),
    ("rotate_y", Vec3::Y, Color::GREEN, "ring"),
    ("rotate_z", Vec3::Z, Color::BLUE, "ring"),
];

const SCALE_HANDLES: [(&str, Vec3, Color, &str); 3] = [
    ("scale_x", Vec3::X, Color::RED, "knob"),
    ("scale_y", Vec3::Y, Color::GREEN, "knob"),
    ("scale_z", Vec3::Z, Color::BLUE, "knob"),
];

/// Build the manipulator set for a mode from pre-minted ids.
///
/// `ids` must have exactly `mode.manipulator_count()` entries; the model
/// mints them in order so replay reproduces identical sets.
pub fn manipulator_set(mode: Mode, ids: &[ManipulatorId]) -> Vec<ManipulatorDescriptor> {
    let table: &[(&'static str, Vec3, Color, &'static str)] = match mode {
        Mode::Move => &MOVE_HANDLES,
        Mode::Rotate => &ROTATE_HANDLES,
        Mode::Scale => &SCALE_HANDLES,
    };
    debug_assert_eq!(ids.len(), table.len());
    let kind = match mode {
        Mode::Move => ManipulatorKind::Axis,
        Mode::Rotate => ManipulatorKind::Rotor,
        Mode::Scale => ManipulatorKind::Scaler,
    };
    table
        .iter()
        .zip(ids)
        .map(|(&(name, axis, color, shape), &id)| ManipulatorDescriptor {
            id,
            kind,
            axis,
            name,
            color,
            hover_color: Color::YELLOW,
            shape,
            overlay: true,
        })
        .collect()
}

/// The anchored affordance that opens the target's property sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropertySheetButton {
    /// Chosen corner offset in target-local space.
    pub offset: Vec3,
}

/// Replicated gizmo actor: one per edited target, identical on every
/// participant. Owns the mode machine and the active manipulator set.
/// Not serialized directly; replicas rebuild it from the event log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GizmoActor {
    pub id: GizmoId,
    pub creator: AvatarId,
    pub target: TargetId,
    pub mode: Mode,
    pub manipulators: Vec<ManipulatorDescriptor>,
    pub property_sheet: Option<PropertySheetButton>,
    /// Wall-clock of the last interaction ping, in milliseconds. Carried
    /// inside intents so replicas agree on it.
    pub last_interaction_ms: u64,
}

impl GizmoActor {
    /// Look up a live manipulator by id.
    pub fn manipulator(&self, id: ManipulatorId) -> Option<&ManipulatorDescriptor> {
        self.manipulators.iter().find(|m| m.id == id)
    }
}
