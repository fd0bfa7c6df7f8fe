use glam::{Mat4, Vec3};

/// Candidate corner offsets for the property-sheet button, in units of the
/// target's half-extents: two box widths laterally, one height vertically.
/// First-encountered order breaks distance ties.
const CORNER_OFFSETS: [Vec3; 8] = [
    Vec3::new(2.0, 1.0, 2.0),
    Vec3::new(2.0, 1.0, -2.0),
    Vec3::new(-2.0, 1.0, 2.0),
    Vec3::new(-2.0, 1.0, -2.0),
    Vec3::new(2.0, -1.0, 2.0),
    Vec3::new(2.0, -1.0, -2.0),
    Vec3::new(-2.0, -1.0, 2.0),
    Vec3::new(-2.0, -1.0, -2.0),
];

/// Pick the button corner nearest to the invoking avatar.
///
/// Each candidate is scaled by the target's half-extents, pushed through
/// the target's world matrix (which already folds in the parent chain),
/// and kept only if it sits above the target in world y. Among the kept
/// candidates the one closest to the avatar wins; ties go to the first
/// encountered. If every candidate is below the target, the first offset
/// is used as a fallback.
pub fn closest_corner(world_matrix: &Mat4, half_extents: Vec3, avatar_pos: Vec3) -> Vec3 {
    let target_y = world_matrix.transform_point3(Vec3::ZERO).y;
    let mut best: Option<(f32, Vec3)> = None;
    for offset in CORNER_OFFSETS {
        let local = offset * half_extents;
        let world = world_matrix.transform_point3(local);
        if world.y <= target_y {
            continue;
        }
        let dist = world.distance_squared(avatar_pos);
        if best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, local));
        }
    }
    best.map(|(_, local)| local)
        .unwrap_or(CORNER_OFFSETS[0] * half_extents)
}
