use glam::Vec3;
use gizmospace_common::{AvatarId, Ray};
use serde::{Deserialize, Serialize};

/// A pointer sample from the host's avatar event surface: who pointed,
/// the world ray, the hit point on the grabbed handle (when the host's
/// picker produced one), and modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub avatar: AvatarId,
    pub ray: Ray,
    pub hit: Option<Vec3>,
    pub shift: bool,
    /// Host wall-clock in milliseconds, forwarded into interaction pings.
    pub at_ms: u64,
}

impl PointerEvent {
    /// Convenience constructor for a plain unmodified pointer sample.
    pub fn new(avatar: AvatarId, ray: Ray, hit: Option<Vec3>, at_ms: u64) -> Self {
        Self {
            avatar,
            ray,
            hit,
            shift: false,
            at_ms,
        }
    }
}
