//! Single-axis arcball rotate: pointer hits on a fixed ring plane become
//! directions from the target origin; the angle between the start and
//! current direction, signed about the ring axis, is composed onto the
//! rotation recorded at drag start. Composing against the snapshot (not
//! the live rotation) keeps repeated frames drift-free.

use glam::{Quat, Vec3};
use gizmospace_common::{Plane, Ray, TargetId};
use gizmospace_session::SessionModel;

use crate::drag::DragSession;
use crate::pointer::PointerEvent;

/// Open a rotate drag on a ring. The plane normal is the handle axis
/// re-expressed in the target's rotation at drag start, and the plane
/// passes through the target's world position.
pub fn begin(
    model: &SessionModel,
    target: TargetId,
    axis: Vec3,
    pointer: &PointerEvent,
) -> Option<DragSession> {
    let state = model.target(target)?;
    let world = model.world_matrix(target);
    let (_, world_rot, world_pos) = world.to_scale_rotation_translation();

    let plane = Plane::new(world_rot * axis, world_pos)?;
    let hit = plane.intersect(&pointer.ray)?;

    let inverse_frame = world.inverse();
    let d0 = inverse_frame.transform_point3(hit).normalize_or_zero();
    if d0 == Vec3::ZERO {
        return None;
    }

    Some(DragSession {
        plane,
        start_local: d0,
        inverse_frame,
        start: state.transform,
        axis,
    })
}

/// Recompute the candidate rotation for the current pointer ray.
///
/// angle = acos(clamp(d0 . d1)) with the sign taken from
/// cross(d0, d1) . axis in the target-local frame. The sign-bearing ring
/// axis flips both the measured direction and the composed axis-angle,
/// so no per-axis correction factor is needed.
pub fn update(session: &DragSession, ray: &Ray) -> Option<Quat> {
    let hit = session.plane.intersect(ray)?;
    let d1 = session.inverse_frame.transform_point3(hit).normalize_or_zero();
    if d1 == Vec3::ZERO {
        return None;
    }
    let d0 = session.start_local;

    let angle = d0.dot(d1).clamp(-1.0, 1.0).acos();
    let direction = if d0.cross(d1).dot(session.axis) >= 0.0 {
        1.0
    } else {
        -1.0
    };

    // Left-multiply the delta, expressed about the axis in parent space,
    // onto the rotation recorded at drag start.
    let axis_parent = (session.start.rotation * session.axis).normalize();
    let delta = Quat::from_axis_angle(axis_parent, angle * direction);
    Some((delta * session.start.rotation).normalize())
}
