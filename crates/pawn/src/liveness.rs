use gizmospace_common::{AvatarId, GizmoId};
use gizmospace_session::{Intent, SessionModel};

/// Idle threshold after which an untouched gizmo asks to be dismissed.
pub const IDLE_TIMEOUT_MS: u64 = 15_000;

/// Suggested polling cadence for hosts driving [`IdleMonitor::poll`].
pub const CHECK_INTERVAL_MS: u64 = 1_000;

/// Pawn-side idle-liveness monitor for one gizmo.
///
/// An owned, explicitly stoppable task: the host polls it on a regular
/// cadence, it fires at most one dismiss request over its lifetime, and
/// stopping twice is harmless.
#[derive(Debug)]
pub struct IdleMonitor {
    gizmo: GizmoId,
    threshold_ms: u64,
    stopped: bool,
}

impl IdleMonitor {
    pub fn new(gizmo: GizmoId) -> Self {
        Self::with_threshold(gizmo, IDLE_TIMEOUT_MS)
    }

    pub fn with_threshold(gizmo: GizmoId, threshold_ms: u64) -> Self {
        Self {
            gizmo,
            threshold_ms,
            stopped: false,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// One liveness check. Returns the dismiss intent to publish when the
    /// idle threshold is breached and the owning avatar's bound gizmo is
    /// still this one (a newer gizmo wins the race and just stops the
    /// timer). After firing once the monitor stays stopped permanently.
    pub fn poll(&mut self, model: &SessionModel, avatar: AvatarId, now_ms: u64) -> Option<Intent> {
        if self.stopped {
            return None;
        }
        let Some(gizmo) = model.gizmo(self.gizmo) else {
            // Already dismissed elsewhere.
            self.stop();
            return None;
        };
        if now_ms.saturating_sub(gizmo.last_interaction_ms) < self.threshold_ms {
            return None;
        }
        self.stop();
        if model.bound_gizmo(avatar) != Some(self.gizmo) {
            return None;
        }
        tracing::debug!(gizmo = ?self.gizmo, "idle threshold breached, requesting dismissal");
        Some(Intent::Dismiss { gizmo: self.gizmo })
    }

    /// Stop the monitor. Idempotent; later polls are no-ops.
    pub fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use gizmospace_common::{TargetId, Transform};
    use gizmospace_session::TargetState;

    fn session() -> (SessionModel, GizmoId, AvatarId) {
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
        model.attach_gizmo(gizmo, avatar, target, Vec3::ONE, 0).unwrap();
        (model, gizmo, avatar)
    }

    #[test]
    fn fires_exactly_once_after_threshold() {
        let (model, gizmo, avatar) = session();
        let mut monitor = IdleMonitor::new(gizmo);

        // Simulated 1s cadence; nothing until 15s of silence.
        for now in (1_000..IDLE_TIMEOUT_MS).step_by(1_000) {
            assert_eq!(monitor.poll(&model, avatar, now), None);
        }
        let fired = monitor.poll(&model, avatar, IDLE_TIMEOUT_MS);
        assert_eq!(fired, Some(Intent::Dismiss { gizmo }));

        // Permanently stopped afterwards.
        assert!(monitor.is_stopped());
        assert_eq!(monitor.poll(&model, avatar, IDLE_TIMEOUT_MS + 60_000), None);
    }

    #[test]
    fn ping_resets_the_clock() {
        let (mut model, gizmo, avatar) = session();
        let mut monitor = IdleMonitor::new(gizmo);

        model.apply(&Intent::InteractionPing {
            gizmo,
            at_ms: 14_000,
        });
        assert_eq!(monitor.poll(&model, avatar, 15_000), None);
        assert_eq!(monitor.poll(&model, avatar, 29_000 - 1), None);
        assert!(monitor.poll(&model, avatar, 29_000).is_some());
    }

    #[test]
    fn newer_gizmo_wins_the_race() {
        let (mut model, gizmo, avatar) = session();
        // The avatar moved on to a different gizmo on another target.
        let other_target = TargetId::new();
        model.register_target(
            other_target,
            TargetState {
                transform: Transform::default(),
                parent: None,
                half_extents: Vec3::ONE,
            },
        );
        let newer = GizmoId::new();
        model
            .attach_gizmo(newer, avatar, other_target, Vec3::ONE, 1_000)
            .unwrap();

        let mut monitor = IdleMonitor::new(gizmo);
        assert_eq!(monitor.poll(&model, avatar, 100_000), None);
        assert!(monitor.is_stopped());
        // The old gizmo is still alive; only its timer died.
        assert!(model.gizmo(gizmo).is_some());
    }

    #[test]
    fn dismissed_elsewhere_stops_quietly() {
        let (mut model, gizmo, avatar) = session();
        model.apply(&Intent::Dismiss { gizmo });

        let mut monitor = IdleMonitor::new(gizmo);
        assert_eq!(monitor.poll(&model, avatar, 100_000), None);
        assert!(monitor.is_stopped());
    }

    #[test]
    fn double_stop_is_harmless() {
        let (_, gizmo, _) = session();
        let mut monitor = IdleMonitor::new(gizmo);
        monitor.stop();
        monitor.stop();
        assert!(monitor.is_stopped());
    }
}
