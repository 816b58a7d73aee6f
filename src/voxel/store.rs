//! Dense, swap-compacted voxel store keyed by flat grid index
//!
//! Two representations are kept in lockstep: `voxels` is the
//! authoritative index -> voxel map, `slots` is the dense packed array
//! naming which index occupies each compaction slot (the render side
//! draws one instance per slot). Removal swaps the last slot into the
//! freed one, so both structures stay O(1) per mutation.

use std::collections::HashMap;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::grid::FlatIndex;
use crate::grid::coords::is_valid_flat;
use super::color::VoxelColor;

/// One occupied cell: its compaction slot and its color
#[derive(Clone, Debug)]
pub struct Voxel {
    pub slot: usize,
    pub color: VoxelColor,
}

/// Collection of occupied voxels over the tile grid
#[derive(Clone, Debug, Default)]
pub struct VoxelStore {
    voxels: HashMap<FlatIndex, Voxel>,
    slots: Vec<FlatIndex>,
}

impl VoxelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied cells (equals the dense slot count)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_occupied(&self, index: FlatIndex) -> bool {
        self.voxels.contains_key(&index)
    }

    /// Place a voxel. Out-of-range indices are ignored; an occupied
    /// index is replaced, never duplicated.
    pub fn add(&mut self, index: FlatIndex, color: VoxelColor) {
        if !is_valid_flat(index) {
            log::trace!("add ignored, index {index} out of range");
            return;
        }
        if self.is_occupied(index) {
            self.remove(index);
        }
        self.slots.push(index);
        self.voxels.insert(index, Voxel { slot: self.slots.len() - 1, color });
    }

    /// Remove the voxel at `index`, compacting the dense array by
    /// relocating the last slot's voxel into the freed slot.
    /// Unoccupied or out-of-range indices are ignored.
    pub fn remove(&mut self, index: FlatIndex) {
        let Some(voxel) = self.voxels.remove(&index) else {
            log::trace!("remove ignored, index {index} not occupied");
            return;
        };
        let freed = voxel.slot;
        self.slots.swap_remove(freed);
        if freed < self.slots.len() {
            let moved = self.slots[freed];
            if let Some(relocated) = self.voxels.get_mut(&moved) {
                relocated.slot = freed;
            }
        }
    }

    /// Overwrite the color at `index` in place; no-op when unoccupied
    pub fn recolor(&mut self, index: FlatIndex, color: VoxelColor) {
        if let Some(voxel) = self.voxels.get_mut(&index) {
            voxel.color = color;
        }
    }

    /// Recolor every voxel whose color matches `old` by value
    pub fn replace_color(&mut self, old: &VoxelColor, new: &VoxelColor) {
        let matching: Vec<FlatIndex> = self
            .voxels
            .iter()
            .filter(|(_, voxel)| voxel.color.approx_eq(old))
            .map(|(&index, _)| index)
            .collect();
        for index in matching {
            self.recolor(index, new.clone());
        }
    }

    /// Drop every voxel
    pub fn clear(&mut self) {
        self.voxels.clear();
        self.slots.clear();
    }

    pub fn color_of(&self, index: FlatIndex) -> Option<&VoxelColor> {
        self.voxels.get(&index).map(|voxel| &voxel.color)
    }

    /// `color_of` for reporting surfaces, distinguishing an index off
    /// the grid from a merely empty cell
    pub fn try_color_of(&self, index: FlatIndex) -> Result<&VoxelColor> {
        if !is_valid_flat(index) {
            return Err(Error::OutOfRangeIndex(index));
        }
        self.color_of(index).ok_or(Error::UnoccupiedCell(index))
    }

    pub fn slot_of(&self, index: FlatIndex) -> Option<usize> {
        self.voxels.get(&index).map(|voxel| voxel.slot)
    }

    /// Which index occupies a given dense slot
    pub fn index_at_slot(&self, slot: usize) -> Option<FlatIndex> {
        self.slots.get(slot).copied()
    }

    /// Occupied cells in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (FlatIndex, &Voxel)> {
        self.voxels.iter().map(|(&index, voxel)| (index, voxel))
    }

    /// Export the occupied set as index -> palette index pairs
    pub fn snapshot(&self) -> HashMap<FlatIndex, u8> {
        self.voxels
            .iter()
            .map(|(&index, voxel)| (index, voxel.color.palette_index))
            .collect()
    }

    /// Both representations agree; exercised by the churn tests
    #[cfg(test)]
    fn check_consistency(&self) {
        assert_eq!(self.slots.len(), self.voxels.len());
        for (&index, voxel) in &self.voxels {
            assert_eq!(self.slots.get(voxel.slot), Some(&index));
        }
    }
}
