//! Axis-scale drag: the ratio of the current to the starting hit
//! coordinate along the designated axis, measured from the target's own
//! origin, multiplies that axis of the scale recorded at drag start.
//! Also hosts the idle refresh that sizes scaler handles from the
//! target's world bounding box.

use glam::{Mat4, Vec3};
use gizmospace_common::{Ray, TargetId};
use gizmospace_session::SessionModel;

use crate::drag::{DragSession, axis_index, camera_facing_plane};
use crate::pointer::PointerEvent;

/// A start coordinate closer to the origin than this makes the scale
/// ratio unstable; such grabs and frames are rejected.
const MIN_START_COORD: f32 = 1.0e-4;

/// Open a scale drag: the translate plane recipe, but anchored at the
/// target's own origin since scale is origin-relative.
pub fn begin(
    model: &SessionModel,
    target: TargetId,
    axis: Vec3,
    pointer: &PointerEvent,
    view_dir: Vec3,
) -> Option<DragSession> {
    let state = model.target(target)?;
    let world = model.world_matrix(target);
    let (_, world_rot, world_pos) = world.to_scale_rotation_translation();

    let axis_world = (world_rot * axis).normalize_or_zero();
    if axis_world == Vec3::ZERO {
        return None;
    }
    let plane = camera_facing_plane(axis_world, view_dir, world_pos)?;
    let hit = plane.intersect(&pointer.ray)?;

    let inverse_frame = world.inverse();
    let start_local = inverse_frame.transform_point3(hit);
    if start_local[axis_index(axis)].abs() < MIN_START_COORD {
        return None;
    }

    Some(DragSession {
        plane,
        start_local,
        inverse_frame,
        start: state.transform,
        axis,
    })
}

/// Recompute the candidate scale for the current pointer ray. Only the
/// designated axis changes; plane misses skip the frame.
pub fn update(session: &DragSession, ray: &Ray) -> Option<Vec3> {
    let hit = session.plane.intersect(ray)?;
    let current = session.inverse_frame.transform_point3(hit);

    let idx = axis_index(session.axis);
    let start_coord = session.start_local[idx];
    if start_coord.abs() < MIN_START_COORD {
        return None;
    }
    let ratio = current[idx] / start_coord;

    let mut scale = session.start.scale;
    scale[idx] *= ratio;
    Some(scale)
}

/// Idle refresh for a scaler handle: its displayed endpoint, recomputed
/// whenever the target's scale changes from any source. The world
/// bounding box is brought into the target's unscaled local frame and
/// compensated by the inverse parent scale so handle length tracks the
/// target's own scale only.
pub fn scaler_endpoint(model: &SessionModel, target: TargetId, axis: Vec3) -> Option<Vec3> {
    let world_box = model.world_aabb(target)?;
    let world = model.world_matrix(target);
    let (_, rot, pos) = world.to_scale_rotation_translation();

    let frame = Mat4::from_rotation_translation(rot, pos);
    let local = world_box.transformed(&frame.inverse());

    let idx = axis_index(axis);
    let parent_scale = model.parent_world_scale(target)[idx].max(1.0e-6);
    Some(axis * (local.half_extents()[idx] / parent_scale))
}
