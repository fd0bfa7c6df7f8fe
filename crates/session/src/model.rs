use std::collections::BTreeMap;

use glam::{Mat4, Quat, Vec3};
use gizmospace_common::{Aabb, AvatarId, GizmoId, ManipulatorId, TargetId, Transform};
use serde::{Deserialize, Serialize};

use crate::gizmo::{GizmoActor, Mode, PropertySheetButton, manipulator_set};
use crate::intent::Intent;
use crate::placement::closest_corner;

/// Parent-chain walks are capped here; a longer chain means the host
/// registered a cycle and the walk bails out silently.
const MAX_PARENT_DEPTH: usize = 64;

/// A manipulated scene object as the session sees it. The target is never
/// owned by a gizmo; the model only mutates it through applied intents or
/// the host's own set-transform operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetState {
    pub transform: Transform,
    pub parent: Option<TargetId>,
    /// Local-space bounding-box half extents, for corner placement and
    /// scaler handle refresh.
    pub half_extents: Vec3,
}

/// An event record produced by every mutation to the session.
///
/// The event log is the replication substrate: replaying it into a fresh
/// model reproduces the exact state, which is how late joiners and
/// determinism checks work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    TargetRegistered {
        id: TargetId,
        state: TargetState,
    },
    /// Target transform changed, from an intent or an external edit.
    TransformUpdated {
        id: TargetId,
        old: Transform,
        new: Transform,
    },
    GizmoAttached {
        id: GizmoId,
        creator: AvatarId,
        target: TargetId,
        button_offset: Vec3,
        at_ms: u64,
    },
    /// Previous mode's manipulator set fully destroyed. Always precedes
    /// the matching `ManipulatorsCreated` in the log.
    ManipulatorsDestroyed {
        gizmo: GizmoId,
        mode: Mode,
        ids: Vec<ManipulatorId>,
    },
    ModeChanged {
        gizmo: GizmoId,
        from: Mode,
        to: Mode,
    },
    ManipulatorsCreated {
        gizmo: GizmoId,
        mode: Mode,
        ids: Vec<ManipulatorId>,
    },
    PropertySheetOpened {
        gizmo: GizmoId,
        target: TargetId,
    },
    GizmoDismissed {
        gizmo: GizmoId,
        target: TargetId,
    },
    InteractionPinged {
        gizmo: GizmoId,
        at_ms: u64,
    },
}

/// Errors from host-facing operations. Intent application never errors;
/// it degrades to idempotent no-ops instead.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("target {0:?} not registered")]
    UnknownTarget(TargetId),
    #[error("gizmo {0:?} not found")]
    UnknownGizmo(GizmoId),
}

/// The authoritative session state.
///
/// Uses BTreeMap throughout for deterministic iteration order across all
/// participants and platforms. Late joiners reconstruct it by replaying
/// the serialized event log rather than deserializing the model itself.
#[derive(Debug, Clone, Default)]
pub struct SessionModel {
    targets: BTreeMap<TargetId, TargetState>,
    gizmos: BTreeMap<GizmoId, GizmoActor>,
    /// Each avatar's currently bound gizmo, for liveness and exclusivity
    /// checks by pawns.
    bound: BTreeMap<AvatarId, GizmoId>,
    /// Next manipulator id. Minted only inside ordered operations.
    next_manipulator: u64,
    /// Append-only log of all mutations.
    event_log: Vec<SessionEvent>,
}

impl SessionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self, id: TargetId) -> Option<&TargetState> {
        self.targets.get(&id)
    }

    pub fn targets(&self) -> &BTreeMap<TargetId, TargetState> {
        &self.targets
    }

    pub fn gizmo(&self, id: GizmoId) -> Option<&GizmoActor> {
        self.gizmos.get(&id)
    }

    pub fn gizmos(&self) -> &BTreeMap<GizmoId, GizmoActor> {
        &self.gizmos
    }

    /// The gizmo currently bound to an avatar, if any.
    pub fn bound_gizmo(&self, avatar: AvatarId) -> Option<GizmoId> {
        self.bound.get(&avatar).copied()
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SessionEvent] {
        &self.event_log
    }

    /// Drain and return the event log (for broadcast to late joiners).
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Register a target the host wants editable. Overwrites any previous
    /// registration under the same id.
    pub fn register_target(&mut self, id: TargetId, state: TargetState) {
        self.targets.insert(id, state);
        self.event_log.push(SessionEvent::TargetRegistered { id, state });
    }

    /// Mirror an external edit into the session. Returns false for an
    /// unknown target.
    pub fn set_target_transform(&mut self, id: TargetId, new: Transform) -> bool {
        let Some(state) = self.targets.get_mut(&id) else {
            return false;
        };
        let old = state.transform;
        state.transform = new;
        self.event_log.push(SessionEvent::TransformUpdated { id, old, new });
        true
    }

    /// Bind a gizmo to a target, 1:1.
    ///
    /// Exclusivity (at most one live gizmo per target) is a caller
    /// precondition guaranteed by ordered delivery, not checked here.
    /// Spawns the Move manipulator set and places the property-sheet
    /// button at the corner nearest the invoking avatar.
    pub fn attach_gizmo(
        &mut self,
        id: GizmoId,
        creator: AvatarId,
        target: TargetId,
        avatar_pos: Vec3,
        now_ms: u64,
    ) -> Result<(), SessionError> {
        let state = *self
            .targets
            .get(&target)
            .ok_or(SessionError::UnknownTarget(target))?;
        let world = self.world_matrix(target);
        let button_offset = closest_corner(&world, state.half_extents, avatar_pos);

        self.event_log.push(SessionEvent::GizmoAttached {
            id,
            creator,
            target,
            button_offset,
            at_ms: now_ms,
        });
        self.gizmos.insert(
            id,
            GizmoActor {
                id,
                creator,
                target,
                mode: Mode::Move,
                manipulators: Vec::new(),
                property_sheet: Some(PropertySheetButton {
                    offset: button_offset,
                }),
                last_interaction_ms: now_ms,
            },
        );
        self.bound.insert(creator, id);
        self.create_manipulators(id, Mode::Move);
        tracing::debug!(gizmo = ?id, ?target, "gizmo attached");
        Ok(())
    }

    /// Handle a click on the property-sheet button: the button is consumed
    /// and the host opens the target's controls in response to the logged
    /// event. Returns false if no button was open.
    pub fn click_property_sheet(&mut self, gizmo: GizmoId) -> bool {
        let Some(g) = self.gizmos.get_mut(&gizmo) else {
            return false;
        };
        if g.property_sheet.take().is_none() {
            return false;
        }
        self.event_log.push(SessionEvent::PropertySheetOpened {
            gizmo,
            target: g.target,
        });
        true
    }

    /// Apply one ordered intent. Pure per variant; unknown gizmos make
    /// every variant an idempotent no-op (stale post-teardown intents).
    pub fn apply(&mut self, intent: &Intent) {
        match *intent {
            Intent::Translate { gizmo, translation } => {
                self.commit_transform(gizmo, |t| t.translation = translation);
            }
            Intent::Rotate { gizmo, rotation } => {
                self.commit_transform(gizmo, |t| t.rotation = rotation);
            }
            Intent::Scale { gizmo, scale } => {
                self.commit_transform(gizmo, |t| t.scale = scale);
            }
            Intent::CycleMode { gizmo } => self.cycle_mode(gizmo),
            Intent::Dismiss { gizmo } => self.dismiss(gizmo),
            Intent::InteractionPing { gizmo, at_ms } => {
                if let Some(g) = self.gizmos.get_mut(&gizmo) {
                    g.last_interaction_ms = g.last_interaction_ms.max(at_ms);
                    self.event_log
                        .push(SessionEvent::InteractionPinged { gizmo, at_ms });
                }
            }
        }
    }

    /// Write one transform field via the target's set-transform operation.
    fn commit_transform(&mut self, gizmo: GizmoId, write: impl FnOnce(&mut Transform)) {
        let Some(g) = self.gizmos.get(&gizmo) else {
            return;
        };
        let id = g.target;
        let Some(state) = self.targets.get_mut(&id) else {
            return;
        };
        let old = state.transform;
        write(&mut state.transform);
        let new = state.transform;
        self.event_log.push(SessionEvent::TransformUpdated { id, old, new });
    }

    /// Advance move -> rotate -> scale -> move. The previous set is fully
    /// destroyed before the next is created; leaving Move also closes an
    /// open property-sheet button.
    fn cycle_mode(&mut self, gizmo: GizmoId) {
        let Some(g) = self.gizmos.get_mut(&gizmo) else {
            return;
        };
        let from = g.mode;
        let old_ids: Vec<ManipulatorId> = g.manipulators.iter().map(|m| m.id).collect();
        g.manipulators.clear();
        if from == Mode::Move {
            g.property_sheet = None;
        }
        let to = from.next();
        g.mode = to;
        self.event_log.push(SessionEvent::ManipulatorsDestroyed {
            gizmo,
            mode: from,
            ids: old_ids,
        });
        self.event_log
            .push(SessionEvent::ModeChanged { gizmo, from, to });
        self.create_manipulators(gizmo, to);
        tracing::debug!(?gizmo, ?from, ?to, "mode cycled");
    }

    fn create_manipulators(&mut self, gizmo: GizmoId, mode: Mode) {
        let ids: Vec<ManipulatorId> = (0..mode.manipulator_count())
            .map(|_| {
                let id = ManipulatorId(self.next_manipulator);
                self.next_manipulator += 1;
                id
            })
            .collect();
        if let Some(g) = self.gizmos.get_mut(&gizmo) {
            g.manipulators = manipulator_set(mode, &ids);
        }
        self.event_log.push(SessionEvent::ManipulatorsCreated {
            gizmo,
            mode,
            ids,
        });
    }

    fn dismiss(&mut self, gizmo: GizmoId) {
        let Some(g) = self.gizmos.remove(&gizmo) else {
            return; // duplicate dismiss
        };
        if self.bound.get(&g.creator) == Some(&gizmo) {
            self.bound.remove(&g.creator);
        }
        self.event_log.push(SessionEvent::GizmoDismissed {
            gizmo,
            target: g.target,
        });
        tracing::debug!(?gizmo, "gizmo dismissed");
    }

    /// Local-to-world matrix for a target through its parent chain.
    pub fn world_matrix(&self, id: TargetId) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        let mut cur = Some(id);
        let mut depth = 0;
        while let Some(t) = cur {
            let Some(state) = self.targets.get(&t) else {
                break;
            };
            m = state.transform.to_matrix() * m;
            cur = state.parent;
            depth += 1;
            if depth > MAX_PARENT_DEPTH {
                break;
            }
        }
        m
    }

    /// World matrix of a target's parent (identity for roots).
    pub fn parent_world_matrix(&self, id: TargetId) -> Mat4 {
        match self.targets.get(&id).and_then(|s| s.parent) {
            Some(parent) => self.world_matrix(parent),
            None => Mat4::IDENTITY,
        }
    }

    /// Accumulated world scale of a target's parent chain.
    pub fn parent_world_scale(&self, id: TargetId) -> Vec3 {
        let (scale, _, _) = self
            .parent_world_matrix(id)
            .to_scale_rotation_translation();
        scale
    }

    /// The target's bounding box in world space.
    pub fn world_aabb(&self, id: TargetId) -> Option<Aabb> {
        let state = self.targets.get(&id)?;
        let local = Aabb::from_half_extents(Vec3::ZERO, state.half_extents);
        Some(local.transformed(&self.world_matrix(id)))
    }

    /// Display rule: in Move the gizmo is forced axis-aligned to parent
    /// space; in Rotate/Scale it follows the target's live rotation.
    pub fn display_rotation(&self, gizmo: GizmoId) -> Quat {
        let Some(g) = self.gizmos.get(&gizmo) else {
            return Quat::IDENTITY;
        };
        match g.mode {
            Mode::Move => Quat::IDENTITY,
            Mode::Rotate | Mode::Scale => self
                .targets
                .get(&g.target)
                .map(|s| s.transform.rotation)
                .unwrap_or(Quat::IDENTITY),
        }
    }

    /// Display rule: handle size is compensated by the inverse of the
    /// parent's world scale so it stays parent-scale-independent.
    pub fn display_scale(&self, gizmo: GizmoId) -> Vec3 {
        let Some(g) = self.gizmos.get(&gizmo) else {
            return Vec3::ONE;
        };
        let s = self.parent_world_scale(g.target);
        Vec3::new(
            1.0 / s.x.max(1.0e-6),
            1.0 / s.y.max(1.0e-6),
            1.0 / s.z.max(1.0e-6),
        )
    }

    /// Reconstruct session state from a sequence of events.
    pub fn replay(events: &[SessionEvent]) -> Self {
        let mut model = Self::new();
        for event in events {
            match event {
                SessionEvent::TargetRegistered { id, state } => {
                    model.targets.insert(*id, *state);
                }
                SessionEvent::TransformUpdated { id, new, .. } => {
                    if let Some(state) = model.targets.get_mut(id) {
                        state.transform = *new;
                    }
                }
                SessionEvent::GizmoAttached {
                    id,
                    creator,
                    target,
                    button_offset,
                    at_ms,
                } => {
                    model.gizmos.insert(
                        *id,
                        GizmoActor {
                            id: *id,
                            creator: *creator,
                            target: *target,
                            mode: Mode::Move,
                            manipulators: Vec::new(),
                            property_sheet: Some(PropertySheetButton {
                                offset: *button_offset,
                            }),
                            last_interaction_ms: *at_ms,
                        },
                    );
                    model.bound.insert(*creator, *id);
                }
                SessionEvent::ManipulatorsDestroyed { gizmo, .. } => {
                    if let Some(g) = model.gizmos.get_mut(gizmo) {
                        g.manipulators.clear();
                    }
                }
                SessionEvent::ModeChanged { gizmo, from, to } => {
                    if let Some(g) = model.gizmos.get_mut(gizmo) {
                        if *from == Mode::Move {
                            g.property_sheet = None;
                        }
                        g.mode = *to;
                    }
                }
                SessionEvent::ManipulatorsCreated { gizmo, mode, ids } => {
                    if let Some(g) = model.gizmos.get_mut(gizmo) {
                        g.manipulators = manipulator_set(*mode, ids);
                    }
                    let max = ids.iter().map(|i| i.0).max().unwrap_or(0);
                    model.next_manipulator = model.next_manipulator.max(max + 1);
                }
                SessionEvent::PropertySheetOpened { gizmo, .. } => {
                    if let Some(g) = model.gizmos.get_mut(gizmo) {
                        g.property_sheet = None;
                    }
                }
                SessionEvent::GizmoDismissed { gizmo, .. } => {
                    if let Some(g) = model.gizmos.remove(gizmo)
                        && model.bound.get(&g.creator) == Some(gizmo)
                    {
                        model.bound.remove(&g.creator);
                    }
                }
                SessionEvent::InteractionPinged { gizmo, at_ms } => {
                    if let Some(g) = model.gizmos.get_mut(gizmo) {
                        g.last_interaction_ms = g.last_interaction_ms.max(*at_ms);
                    }
                }
            }
        }
        model
    }

    /// Deterministic FNV-1a hash of canonical state, for divergence checks
    /// between replicas. Uses BTreeMap iteration order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_vec3 = |h: &mut u64, v: Vec3| {
            mix(h, &v.x.to_le_bytes());
            mix(h, &v.y.to_le_bytes());
            mix(h, &v.z.to_le_bytes());
        };
        for (id, state) in &self.targets {
            mix(&mut h, id.0.as_bytes());
            mix_vec3(&mut h, state.transform.translation);
            let r = state.transform.rotation;
            mix(&mut h, &r.x.to_le_bytes());
            mix(&mut h, &r.y.to_le_bytes());
            mix(&mut h, &r.z.to_le_bytes());
            mix(&mut h, &r.w.to_le_bytes());
            mix_vec3(&mut h, state.transform.scale);
        }
        for (id, g) in &self.gizmos {
            mix(&mut h, id.0.as_bytes());
            mix(&mut h, g.target.0.as_bytes());
            mix(&mut h, &[g.mode as u8]);
            for m in &g.manipulators {
                mix(&mut h, &m.id.0.to_le_bytes());
            }
            mix(&mut h, &g.last_interaction_ms.to_le_bytes());
            mix(&mut h, &[g.property_sheet.is_some() as u8]);
        }
        for (avatar, gizmo) in &self.bound {
            mix(&mut h, avatar.0.as_bytes());
            mix(&mut h, gizmo.0.as_bytes());
        }
        h
    }
}
