use glam::{Mat4, Vec3};
use gizmospace_common::{Plane, Transform};

/// Transient pawn-local state for one pointer-down-to-pointer-up drag.
///
/// Captured once at pointer-down and read-only afterwards: per-frame
/// updates re-intersect against the same fixed plane and the same
/// inverse-frame snapshot, so candidates never drift with the live
/// transform.
#[derive(Debug, Clone, Copy)]
pub struct DragSession {
    /// The fixed drag plane, in world space.
    pub(crate) plane: Plane,
    /// Start hit expressed in the session's reference frame (parent-local
    /// for translate/scale frames, normalized direction for rotate).
    pub(crate) start_local: Vec3,
    /// Inverse of the frame matrix recorded at drag start.
    pub(crate) inverse_frame: Mat4,
    /// Target transform snapshot at drag start.
    pub(crate) start: Transform,
    /// The handle's designated axis, in gizmo-local space.
    pub(crate) axis: Vec3,
}

/// Index of the designated axis: the dominant component of the (possibly
/// sign-bearing) handle axis.
pub(crate) fn axis_index(axis: Vec3) -> usize {
    let a = axis.abs();
    if a.x >= a.y && a.x >= a.z {
        0
    } else if a.y >= a.z {
        1
    } else {
        2
    }
}

/// Drag plane containing the handle axis and facing the camera:
/// normal = axis x view direction. None when the axis is (near) parallel
/// to the view, which would make the grab unusable.
pub(crate) fn camera_facing_plane(
    axis_world: Vec3,
    view_dir: Vec3,
    through: Vec3,
) -> Option<Plane> {
    Plane::new(axis_world.cross(view_dir), through)
}
