use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant's avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AvatarId(pub Uuid);

impl AvatarId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AvatarId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a manipulated scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub Uuid);

impl TargetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a gizmo actor.
///
/// Minted by the attaching participant and carried inside the ordered
/// attach operation, so every replica records the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GizmoId(pub Uuid);

impl GizmoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GizmoId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier for a single drag handle.
///
/// Minted from a counter inside the replicated model, never from local
/// randomness, so all replicas agree on handle identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ManipulatorId(pub u64);

/// Spatial transform: translation, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Local matrix in scale-rotation-translation order.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Linear RGB color for manipulator display and hover states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color(pub [f32; 3]);

impl Color {
    pub const RED: Color = Color([0.8, 0.1, 0.1]);
    pub const GREEN: Color = Color([0.1, 0.8, 0.1]);
    pub const BLUE: Color = Color([0.1, 0.1, 0.8]);
    pub const YELLOW: Color = Color([0.9, 0.9, 0.1]);
}
