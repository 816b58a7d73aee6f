//! Intersection results and hit-to-cell targeting
//!
//! Raycasting itself lives outside the core; callers hand in the
//! nearest hit as a world position plus surface normal, and these
//! functions derive the grid cell an edit should target.

use crate::core::types::Vec3;
use crate::grid::FlatIndex;
use crate::grid::coords::{
    discrete_from_world, flat_from_discrete, flat_from_world, is_valid_discrete,
};
use crate::grid::footprint::voxel_size;

const NORMAL_EPSILON: f32 = 1e-4;

/// Nearest intersection reported by the geometry collaborator
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    /// World position of the hit voxel's cell center
    pub position: Vec3,
    /// Surface normal of the struck face
    pub normal: Vec3,
}

impl RayHit {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// Cell of the voxel that was struck
pub fn target_for_existing_voxel(hit: &RayHit) -> Option<FlatIndex> {
    flat_from_world(hit.position)
}

/// Free cell adjacent to the struck face: step one cell along the
/// normal and re-discretize. None when the hit cell itself is already
/// off the footprint or the step leaves it.
pub fn target_for_new_voxel(hit: &RayHit) -> Option<FlatIndex> {
    if !is_valid_discrete(discrete_from_world(hit.position)) {
        return None;
    }
    flat_from_world(hit.position + hit.normal * voxel_size())
}

/// First-layer cell above a struck floor cell. Floor cells sit one
/// layer below the grid, so only upward-facing hits count.
pub fn target_above_floor(hit: &RayHit) -> Option<FlatIndex> {
    if !hit.normal.abs_diff_eq(Vec3::Y, NORMAL_EPSILON) {
        return None;
    }
    let mut below = discrete_from_world(hit.position);
    below.y += 1;
    flat_from_discrete(below)
}
