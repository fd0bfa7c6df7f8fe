//! Axis-translate drag: project pointer hits onto a camera-facing plane
//! through the grab point, measure the parent-local delta, and move the
//! target along the handle's designated axis only.

use glam::Vec3;
use gizmospace_common::{Ray, TargetId};
use gizmospace_session::SessionModel;

use crate::drag::{DragSession, axis_index, camera_facing_plane};
use crate::pointer::PointerEvent;

/// Open a translate drag. None when the grab is unusable: unknown target,
/// no hit point, or handle axis parallel to the view.
pub fn begin(
    model: &SessionModel,
    target: TargetId,
    axis: Vec3,
    pointer: &PointerEvent,
    view_dir: Vec3,
) -> Option<DragSession> {
    let state = model.target(target)?;
    let hit = pointer.hit?;

    // Translation lives in parent space, so the frame is the parent's
    // world matrix and the axis is rotated into world through it.
    let parent = model.parent_world_matrix(target);
    let axis_world = parent.transform_vector3(axis).normalize_or_zero();
    if axis_world == Vec3::ZERO {
        return None;
    }
    let plane = camera_facing_plane(axis_world, view_dir, hit)?;
    let inverse_frame = parent.inverse();

    Some(DragSession {
        plane,
        start_local: inverse_frame.transform_point3(hit),
        inverse_frame,
        start: state.transform,
        axis,
    })
}

/// Recompute the candidate translation for the current pointer ray.
/// A ray/plane miss is a skipped frame, not an error.
pub fn update(session: &DragSession, ray: &Ray) -> Option<Vec3> {
    let hit = session.plane.intersect(ray)?;
    let current = session.inverse_frame.transform_point3(hit);
    let delta = current - session.start_local;

    // Only the designated axis moves; the other two components stay
    // pinned to their drag-start values.
    let idx = axis_index(session.axis);
    let mut translation = session.start.translation;
    translation[idx] += delta[idx];
    Some(translation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gizmospace_common::{AvatarId, Transform};
    use gizmospace_session::TargetState;

    fn model_with(transform: Transform, parent: Option<(TargetId, Transform)>) -> (SessionModel, TargetId) {
        let mut model = SessionModel::new();
        let parent_id = parent.map(|(id, t)| {
            model.register_target(
                id,
                TargetState {
                    transform: t,
                    parent: None,
                    half_extents: Vec3::ONE,
                },
            );
            id
        });
        let target = TargetId::new();
        model.register_target(
            target,
            TargetState {
                transform,
                parent: parent_id,
                half_extents: Vec3::ONE,
            },
        );
        (model, target)
    }

    fn down_at(hit: Vec3) -> PointerEvent {
        PointerEvent::new(
            AvatarId::new(),
            Ray::new(hit + Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y),
            Some(hit),
            0,
        )
    }

    fn ray_down_at(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 5.0, z), Vec3::NEG_Y)
    }

    #[test]
    fn drag_x_handle_from_one_to_three() {
        // Identity parent, target at origin: +X handle dragged from local
        // (1,0,0) to (3,0,0) lands the target at (2,0,0).
        let (model, target) = model_with(Transform::default(), None);
        let session = begin(
            &model,
            target,
            Vec3::X,
            &down_at(Vec3::new(1.0, 0.0, 0.0)),
            Vec3::NEG_Z,
        )
        .unwrap();

        let translation = update(&session, &ray_down_at(3.0, 0.0)).unwrap();
        assert_eq!(translation, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn non_designated_axes_stay_pinned() {
        let start = Transform {
            translation: Vec3::new(0.0, 7.0, -2.0),
            ..Transform::default()
        };
        let (model, target) = model_with(start, None);
        let session = begin(
            &model,
            target,
            Vec3::X,
            &down_at(Vec3::new(1.0, 0.0, 0.0)),
            Vec3::NEG_Z,
        )
        .unwrap();

        // Drift the pointer off-axis; y/z of the candidate never move.
        let translation = update(&session, &ray_down_at(4.0, 3.0)).unwrap();
        assert_eq!(translation.y, 7.0);
        assert_eq!(translation.z, -2.0);
        assert_eq!(translation.x, 3.0);
    }

    #[test]
    fn negative_handle_shares_the_axis_index() {
        let (model, target) = model_with(Transform::default(), None);
        let session = begin(
            &model,
            target,
            Vec3::NEG_X,
            &down_at(Vec3::new(-1.0, 0.0, 0.0)),
            Vec3::NEG_Z,
        )
        .unwrap();

        let translation = update(&session, &ray_down_at(-2.0, 0.0)).unwrap();
        assert_eq!(translation, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn translated_parent_cancels_out() {
        // The delta is measured parent-locally, so a moved parent does not
        // bend the drag.
        let parent_id = TargetId::new();
        let (model, target) = model_with(
            Transform::default(),
            Some((
                parent_id,
                Transform {
                    translation: Vec3::new(100.0, 0.0, 0.0),
                    ..Transform::default()
                },
            )),
        );
        let session = begin(
            &model,
            target,
            Vec3::X,
            &down_at(Vec3::new(101.0, 0.0, 0.0)),
            Vec3::NEG_Z,
        )
        .unwrap();

        let translation = update(&session, &ray_down_at(103.0, 0.0)).unwrap();
        assert_eq!(translation, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn plane_miss_skips_the_frame() {
        let (model, target) = model_with(Transform::default(), None);
        let session = begin(
            &model,
            target,
            Vec3::X,
            &down_at(Vec3::new(1.0, 0.0, 0.0)),
            Vec3::NEG_Z,
        )
        .unwrap();

        // Ray parallel to the drag plane.
        let miss = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::X);
        assert_eq!(update(&session, &miss), None);
    }

    #[test]
    fn grab_without_hit_point_is_refused() {
        let (model, target) = model_with(Transform::default(), None);
        let mut event = down_at(Vec3::X);
        event.hit = None;
        assert!(begin(&model, target, Vec3::X, &event, Vec3::NEG_Z).is_none());
    }

    #[test]
    fn axis_parallel_to_view_is_refused() {
        let (model, target) = model_with(Transform::default(), None);
        assert!(
            begin(
                &model,
                target,
                Vec3::X,
                &down_at(Vec3::X),
                Vec3::X
            )
            .is_none()
        );
    }
}
