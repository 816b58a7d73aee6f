//! Neighbor derivation over the hex-prism adjacency relation

use crate::core::types::IVec3;
use crate::voxel::store::VoxelStore;
use super::FlatIndex;
use super::coords::{discrete_from_flat, flat_from_discrete, is_valid_discrete};

/// Grid indices of the up-to-8 cells sharing a face with `index`:
/// the six axis steps plus the two row diagonals, whose x component
/// points toward the half-offset side and flips with row parity.
/// Candidates outside the footprint are dropped; order is fixed.
pub fn neighbors_of(index: FlatIndex) -> Vec<FlatIndex> {
    let Some(pos) = discrete_from_flat(index) else {
        return Vec::new();
    };
    let diag_x = if pos.z.rem_euclid(2) == 1 { 1 } else { -1 };
    let shifts = [
        IVec3::new(1, 0, 0),
        IVec3::new(-1, 0, 0),
        IVec3::new(0, 1, 0),
        IVec3::new(0, -1, 0),
        IVec3::new(0, 0, 1),
        IVec3::new(0, 0, -1),
        IVec3::new(diag_x, 0, 1),
        IVec3::new(diag_x, 0, -1),
    ];
    let mut result = Vec::with_capacity(shifts.len());
    for shift in shifts {
        let adjacent = pos + shift;
        if !is_valid_discrete(adjacent) {
            continue;
        }
        if let Some(adjacent_index) = flat_from_discrete(adjacent) {
            result.push(adjacent_index);
        }
    }
    result
}

/// Neighbors of `index` that currently hold a voxel
pub fn occupied_neighbors_of(index: FlatIndex, store: &VoxelStore) -> Vec<FlatIndex> {
    neighbors_of(index)
        .into_iter()
        .filter(|&adjacent| store.is_occupied(adjacent))
        .collect()
}
