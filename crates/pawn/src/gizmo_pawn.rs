use glam::Vec3;
use gizmospace_common::{AvatarId, GizmoId, ManipulatorId, TargetId};
use gizmospace_session::{Intent, ManipulatorKind, SessionModel};

use crate::drag::DragSession;
use crate::pointer::PointerEvent;
use crate::{rotate, scale, translate};

/// Host-injected lifecycle strategies, passed at construction instead of
/// read from ambient globals: what to do when the property sheet opens
/// and when the gizmo lets go of its target.
pub struct LifecycleHooks {
    pub on_open_controls: Box<dyn Fn(TargetId)>,
    pub on_unselect: Box<dyn Fn(TargetId)>,
}

impl LifecycleHooks {
    /// Hooks that do nothing; useful for tests and headless hosts.
    pub fn noop() -> Self {
        Self {
            on_open_controls: Box::new(|_| {}),
            on_unselect: Box::new(|_| {}),
        }
    }
}

struct ActiveDrag {
    manipulator: ManipulatorId,
    kind: ManipulatorKind,
    session: DragSession,
}

/// The per-participant controller for one gizmo: routes pointer events to
/// drag sessions and turns candidate values into intents for the host to
/// publish. Holds no canonical state; everything it renders comes back
/// from the model.
pub struct GizmoPawn {
    gizmo: GizmoId,
    target: TargetId,
    avatar: AvatarId,
    hooks: LifecycleHooks,
    drag: Option<ActiveDrag>,
}

impl GizmoPawn {
    pub fn new(gizmo: GizmoId, target: TargetId, avatar: AvatarId, hooks: LifecycleHooks) -> Self {
        Self {
            gizmo,
            target,
            avatar,
            hooks,
            drag: None,
        }
    }

    pub fn gizmo(&self) -> GizmoId {
        self.gizmo
    }

    pub fn avatar(&self) -> AvatarId {
        self.avatar
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pointer-down on a manipulator: open a drag session and ping the
    /// liveness clock. A degenerate grab (parallel view, no hit point)
    /// still pings but opens no session.
    pub fn pointer_down(
        &mut self,
        model: &SessionModel,
        manipulator: ManipulatorId,
        event: &PointerEvent,
        view_dir: Vec3,
    ) -> Vec<Intent> {
        let Some(g) = model.gizmo(self.gizmo) else {
            self.drag = None;
            return Vec::new();
        };
        let Some(desc) = g.manipulator(manipulator) else {
            // Handle from a previous mode; the grab raced a cycle.
            return Vec::new();
        };

        let session = match desc.kind {
            ManipulatorKind::Axis => {
                translate::begin(model, self.target, desc.axis, event, view_dir)
            }
            ManipulatorKind::Rotor => rotate::begin(model, self.target, desc.axis, event),
            ManipulatorKind::Scaler => {
                scale::begin(model, self.target, desc.axis, event, view_dir)
            }
        };
        if let Some(session) = session {
            tracing::debug!(gizmo = ?self.gizmo, ?manipulator, kind = ?desc.kind, "drag began");
            self.drag = Some(ActiveDrag {
                manipulator,
                kind: desc.kind,
                session,
            });
        }
        vec![self.ping(event.at_ms)]
    }

    /// Per-frame pointer move: recompute the candidate value and pair it
    /// with a liveness ping. Ray/plane misses skip the frame; a session
    /// outliving its gizmo (teardown mid-drag) is dropped, not processed.
    pub fn pointer_move(&mut self, model: &SessionModel, event: &PointerEvent) -> Vec<Intent> {
        let Some(drag) = self.drag.as_ref() else {
            return Vec::new();
        };
        if model.gizmo(self.gizmo).is_none() {
            tracing::debug!(gizmo = ?self.gizmo, "dropping stale drag session");
            self.drag = None;
            return Vec::new();
        }

        let candidate = match drag.kind {
            ManipulatorKind::Axis => {
                translate::update(&drag.session, &event.ray).map(|translation| Intent::Translate {
                    gizmo: self.gizmo,
                    translation,
                })
            }
            ManipulatorKind::Rotor => {
                rotate::update(&drag.session, &event.ray).map(|rotation| Intent::Rotate {
                    gizmo: self.gizmo,
                    rotation,
                })
            }
            ManipulatorKind::Scaler => {
                scale::update(&drag.session, &event.ray).map(|scale| Intent::Scale {
                    gizmo: self.gizmo,
                    scale,
                })
            }
        };
        match candidate {
            Some(intent) => vec![intent, self.ping(event.at_ms)],
            None => Vec::new(),
        }
    }

    /// Pointer-up: close the session. Returns a final ping when a drag
    /// was actually in flight.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> Option<Intent> {
        let drag = self.drag.take()?;
        tracing::debug!(gizmo = ?self.gizmo, manipulator = ?drag.manipulator, "drag ended");
        Some(self.ping(event.at_ms))
    }

    /// Click on the property-sheet button: fire the injected open-controls
    /// strategy and ping. The host consumes the button through the ordered
    /// `click_property_sheet` operation.
    pub fn property_sheet_clicked(&mut self, model: &SessionModel, event: &PointerEvent) -> Option<Intent> {
        model.gizmo(self.gizmo)?;
        (self.hooks.on_open_controls)(self.target);
        Some(self.ping(event.at_ms))
    }

    /// Local teardown: cancel any drag and fire the unselect strategy.
    pub fn teardown(&mut self) {
        self.drag = None;
        (self.hooks.on_unselect)(self.target);
    }

    fn ping(&self, at_ms: u64) -> Intent {
        Intent::InteractionPing {
            gizmo: self.gizmo,
            at_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gizmospace_common::{Ray, Transform};
    use gizmospace_session::TargetState;
    use std::cell::Cell;
    use std::rc::Rc;

    fn session() -> (SessionModel, GizmoId, TargetId, AvatarId) {
        let mut model = SessionModel::new();
        let target = TargetId::new();
        model.register_target(
            target,
            TargetState {
                transform: Transform::default(),
                parent: None,
                half_extents: Vec3::ONE,
            },
        );
        let gizmo = GizmoId::new();
        let avatar = AvatarId::new();
        model
            .attach_gizmo(gizmo, avatar, target, Vec3::new(4.0, 2.0, 4.0), 0)
            .unwrap();
        (model, gizmo, target, avatar)
    }

    fn x_handle(model: &SessionModel, gizmo: GizmoId) -> ManipulatorId {
        model
            .gizmo(gizmo)
            .unwrap()
            .manipulators
            .iter()
            .find(|m| m.axis == Vec3::X)
            .unwrap()
            .id
    }

    fn down_at(avatar: AvatarId, hit: Vec3) -> PointerEvent {
        PointerEvent::new(
            avatar,
            Ray::new(hit + Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y),
            Some(hit),
            100,
        )
    }

    fn move_to(avatar: AvatarId, x: f32) -> PointerEvent {
        PointerEvent::new(
            avatar,
            Ray::new(Vec3::new(x, 5.0, 0.0), Vec3::NEG_Y),
            None,
            200,
        )
    }

    #[test]
    fn full_drag_publishes_translate_and_pings() {
        let (mut model, gizmo, target, avatar) = session();
        let mut pawn = GizmoPawn::new(gizmo, target, avatar, LifecycleHooks::noop());
        let handle = x_handle(&model, gizmo);

        let down = pawn.pointer_down(
            &model,
            handle,
            &down_at(avatar, Vec3::new(1.0, 0.0, 0.0)),
            Vec3::NEG_Z,
        );
        assert!(matches!(down[..], [Intent::InteractionPing { .. }]));
        assert!(pawn.is_dragging());

        let moved = pawn.pointer_move(&model, &move_to(avatar, 3.0));
        assert_eq!(moved.len(), 2);
        let Intent::Translate { translation, .. } = moved[0] else {
            panic!("expected translate, got {:?}", moved[0]);
        };
        assert_eq!(translation, Vec3::new(2.0, 0.0, 0.0));

        for intent in &moved {
            model.apply(intent);
        }
        assert_eq!(
            model.target(target).unwrap().transform.translation,
            Vec3::new(2.0, 0.0, 0.0)
        );

        assert!(pawn.pointer_up(&move_to(avatar, 3.0)).is_some());
        assert!(!pawn.is_dragging());
    }

    #[test]
    fn move_without_down_is_ignored() {
        let (model, gizmo, target, avatar) = session();
        let mut pawn = GizmoPawn::new(gizmo, target, avatar, LifecycleHooks::noop());
        assert!(pawn.pointer_move(&model, &move_to(avatar, 3.0)).is_empty());
        assert!(pawn.pointer_up(&move_to(avatar, 3.0)).is_none());
    }

    #[test]
    fn stale_session_after_dismiss_is_dropped() {
        let (mut model, gizmo, target, avatar) = session();
        let mut pawn = GizmoPawn::new(gizmo, target, avatar, LifecycleHooks::noop());
        let handle = x_handle(&model, gizmo);
        pawn.pointer_down(
            &model,
            handle,
            &down_at(avatar, Vec3::new(1.0, 0.0, 0.0)),
            Vec3::NEG_Z,
        );

        model.apply(&Intent::Dismiss { gizmo });
        assert!(pawn.pointer_move(&model, &move_to(avatar, 3.0)).is_empty());
        assert!(!pawn.is_dragging());
    }

    #[test]
    fn grab_on_cycled_out_handle_is_refused() {
        let (mut model, gizmo, target, avatar) = session();
        let mut pawn = GizmoPawn::new(gizmo, target, avatar, LifecycleHooks::noop());
        let old_handle = x_handle(&model, gizmo);

        model.apply(&Intent::CycleMode { gizmo });
        let out = pawn.pointer_down(
            &model,
            old_handle,
            &down_at(avatar, Vec3::new(1.0, 0.0, 0.0)),
            Vec3::NEG_Z,
        );
        assert!(out.is_empty());
        assert!(!pawn.is_dragging());
    }

    #[test]
    fn rotor_drag_publishes_rotation() {
        let (mut model, gizmo, target, avatar) = session();
        model.apply(&Intent::CycleMode { gizmo });
        let mut pawn = GizmoPawn::new(gizmo, target, avatar, LifecycleHooks::noop());
        let ring = model.gizmo(gizmo).unwrap().manipulators[1].id; // rotate_y

        pawn.pointer_down(
            &model,
            ring,
            &PointerEvent::new(
                avatar,
                Ray::new(Vec3::new(1.0, 10.0, 0.0), Vec3::NEG_Y),
                None,
                0,
            ),
            Vec3::NEG_Z,
        );
        assert!(pawn.is_dragging());

        let out = pawn.pointer_move(
            &model,
            &PointerEvent::new(
                avatar,
                Ray::new(Vec3::new(0.0, 10.0, -1.0), Vec3::NEG_Y),
                None,
                50,
            ),
        );
        assert!(matches!(out[0], Intent::Rotate { .. }));
    }

    #[test]
    fn property_sheet_click_fires_injected_hook() {
        let (model, gizmo, target, avatar) = session();
        let opened = Rc::new(Cell::new(false));
        let seen = opened.clone();
        let hooks = LifecycleHooks {
            on_open_controls: Box::new(move |_| seen.set(true)),
            on_unselect: Box::new(|_| {}),
        };
        let mut pawn = GizmoPawn::new(gizmo, target, avatar, hooks);

        let ping = pawn.property_sheet_clicked(&model, &move_to(avatar, 0.0));
        assert!(ping.is_some());
        assert!(opened.get());
    }

    #[test]
    fn teardown_cancels_drag_and_unselects() {
        let (model, gizmo, target, avatar) = session();
        let unselected = Rc::new(Cell::new(false));
        let seen = unselected.clone();
        let hooks = LifecycleHooks {
            on_open_controls: Box::new(|_| {}),
            on_unselect: Box::new(move |_| seen.set(true)),
        };
        let mut pawn = GizmoPawn::new(gizmo, target, avatar, hooks);
        let handle = x_handle(&model, gizmo);
        pawn.pointer_down(
            &model,
            handle,
            &down_at(avatar, Vec3::new(1.0, 0.0, 0.0)),
            Vec3::NEG_Z,
        );

        pawn.teardown();
        assert!(!pawn.is_dragging());
        assert!(unselected.get());
    }
}
