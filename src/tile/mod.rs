//! Tile editing facade: a voxel store driven by intersection results

pub mod hit;
pub mod tools;

use std::collections::HashMap;

use crate::core::types::Quat;
use crate::grid::FlatIndex;
use crate::grid::coords::world_from_flat;
use crate::grid::flat_from_world;
use crate::voxel::cluster::same_color_cluster;
use crate::voxel::color::VoxelColor;
use crate::voxel::palette::Palette;
use crate::voxel::store::VoxelStore;

pub use hit::{RayHit, target_for_existing_voxel, target_for_new_voxel, target_above_floor};
pub use tools::EditTool;

/// One editable tile: the build occupying its grid.
///
/// All editing entry points consume intersection results (`RayHit`)
/// supplied by the geometry collaborator; the tile never casts rays.
#[derive(Clone, Debug, Default)]
pub struct Tile {
    store: VoxelStore,
}

impl Tile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &VoxelStore {
        &self.store
    }

    pub fn is_occupied(&self, index: FlatIndex) -> bool {
        self.store.is_occupied(index)
    }

    /// Place a voxel against a hit surface. A hit on the build itself
    /// wins; a floor hit only fills cells not already occupied.
    pub fn place_voxel(
        &mut self,
        voxel_hit: Option<&RayHit>,
        floor_hit: Option<&RayHit>,
        color: &VoxelColor,
    ) {
        if let Some(hit) = voxel_hit {
            if let Some(target) = target_for_new_voxel(hit) {
                self.store.add(target, color.clone());
                return;
            }
        }
        if let Some(hit) = floor_hit {
            if let Some(target) = target_above_floor(hit) {
                if !self.store.is_occupied(target) {
                    self.store.add(target, color.clone());
                }
            }
        }
    }

    pub fn erase_voxel(&mut self, hit: &RayHit) {
        if let Some(target) = target_for_existing_voxel(hit) {
            self.store.remove(target);
        }
    }

    pub fn spray_voxel(&mut self, hit: &RayHit, color: &VoxelColor) {
        if let Some(target) = target_for_existing_voxel(hit) {
            self.store.recolor(target, color.clone());
        }
    }

    /// Recolor the whole same-colored cluster under the hit
    pub fn recolor_cluster(&mut self, hit: &RayHit, color: &VoxelColor) {
        if let Some(seed) = target_for_existing_voxel(hit) {
            for index in same_color_cluster(seed, &self.store) {
                self.store.recolor(index, color.clone());
            }
        }
    }

    /// Recolor every voxel sharing the hit voxel's color
    pub fn replace_color(&mut self, hit: &RayHit, color: &VoxelColor) {
        if let Some(target) = target_for_existing_voxel(hit) {
            if let Some(old) = self.store.color_of(target).cloned() {
                self.store.replace_color(&old, color);
            }
        }
    }

    /// Dispatch one edit step for the active tool
    pub fn apply_tool(
        &mut self,
        tool: EditTool,
        voxel_hit: Option<&RayHit>,
        floor_hit: Option<&RayHit>,
        color: &VoxelColor,
    ) {
        match tool {
            EditTool::Build => self.place_voxel(voxel_hit, floor_hit, color),
            EditTool::Erase => {
                if let Some(hit) = voxel_hit {
                    self.erase_voxel(hit);
                }
            }
            EditTool::Spray => {
                if let Some(hit) = voxel_hit {
                    self.spray_voxel(hit, color);
                }
            }
            EditTool::FillCluster => {
                if let Some(hit) = voxel_hit {
                    self.recolor_cluster(hit, color);
                }
            }
            EditTool::ReplaceColor => {
                if let Some(hit) = voxel_hit {
                    self.replace_color(hit, color);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        let count = self.store.len();
        self.store.clear();
        log::debug!("cleared build of {count} voxels");
    }

    /// Rotate the whole build about the tile's vertical axis and snap
    /// every voxel back onto the grid. Voxels leaving the footprint are
    /// dropped; colliding voxels resolve last-wins.
    pub fn rotate(&mut self, angle_deg: f32) {
        let radians = angle_deg.to_radians().rem_euclid(std::f32::consts::TAU);
        let rotation = Quat::from_rotation_y(radians);
        let rebuilt: Vec<(FlatIndex, VoxelColor)> = self
            .store
            .iter()
            .filter_map(|(index, voxel)| {
                let world = world_from_flat(index)?;
                flat_from_world(rotation * world).map(|target| (target, voxel.color.clone()))
            })
            .collect();
        let before = self.store.len();
        self.store.clear();
        for (index, color) in rebuilt {
            self.store.add(index, color);
        }
        if self.store.len() < before {
            log::debug!(
                "rotation by {angle_deg} degrees dropped {} voxels off the footprint",
                before - self.store.len()
            );
        }
    }

    /// Add every entry of an imported index -> palette-index map.
    /// Entries without a palette color are skipped.
    pub fn load_voxel_map(&mut self, map: &HashMap<FlatIndex, u8>, palette: &Palette) {
        let mut skipped = 0;
        for (&index, &color_index) in map {
            match palette.require(color_index) {
                Ok(color) => self.store.add(index, color.clone()),
                Err(error) => {
                    log::debug!("skipping voxel {index}: {error}");
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            log::warn!("skipped {skipped} voxels with unknown palette indices");
        }
    }

    /// Snapshot of the build as index -> palette-index pairs
    pub fn voxel_map(&self) -> HashMap<FlatIndex, u8> {
        self.store.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{IVec3, Vec3};
    use crate::grid::coords::{flat_from_discrete, world_from_discrete};
    use crate::grid::footprint::voxel_size;

    fn color(index: u8) -> VoxelColor {
        VoxelColor::new("test", index, index as f32 / 16.0, 0.3, 0.3)
    }

    fn index_at(x: i32, y: i32, z: i32) -> FlatIndex {
        flat_from_discrete(IVec3::new(x, y, z)).unwrap()
    }

    /// A hit on the top face of the cell at `pos`
    fn top_hit(pos: IVec3) -> RayHit {
        RayHit::new(world_from_discrete(pos), Vec3::Y)
    }

    #[test]
    fn test_place_on_existing_voxel_stacks_up() {
        let mut tile = Tile::new();
        let base = IVec3::new(0, 0, 0);
        tile.store.add(index_at(0, 0, 0), color(1));

        tile.place_voxel(Some(&top_hit(base)), None, &color(2));
        assert!(tile.is_occupied(index_at(0, 1, 0)));
        assert_eq!(tile.store().len(), 2);
    }

    #[test]
    fn test_place_from_floor() {
        let mut tile = Tile::new();
        let size = voxel_size();
        // floor cells sit half a slab below layer 0
        let floor_center = world_from_discrete(IVec3::new(2, 0, 3)) - Vec3::new(0.0, size.y, 0.0);
        let hit = RayHit::new(floor_center, Vec3::Y);

        tile.place_voxel(None, Some(&hit), &color(1));
        assert!(tile.is_occupied(index_at(2, 0, 3)));

        // occupied floor target is left alone
        tile.place_voxel(None, Some(&hit), &color(5));
        assert_eq!(tile.store().color_of(index_at(2, 0, 3)).unwrap().palette_index, 1);
    }

    #[test]
    fn test_floor_hit_needs_upward_normal() {
        let mut tile = Tile::new();
        let size = voxel_size();
        let floor_center = world_from_discrete(IVec3::new(2, 0, 3)) - Vec3::new(0.0, size.y, 0.0);
        let hit = RayHit::new(floor_center, Vec3::X);
        tile.place_voxel(None, Some(&hit), &color(1));
        assert!(tile.store().is_empty());
    }

    #[test]
    fn test_place_past_grid_edge_is_noop() {
        let mut tile = Tile::new();
        let edge = IVec3::new(49, 0, 0);
        tile.store.add(index_at(49, 0, 0), color(1));
        // push outward past the even-row x bound
        let hit = RayHit::new(world_from_discrete(edge), Vec3::NEG_X);
        tile.place_voxel(Some(&hit), None, &color(2));
        assert_eq!(tile.store().len(), 1);
    }

    #[test]
    fn test_erase_and_spray() {
        let mut tile = Tile::new();
        let pos = IVec3::new(1, 5, 2);
        let index = index_at(1, 5, 2);
        tile.store.add(index, color(1));

        let hit = RayHit::new(world_from_discrete(pos), Vec3::Y);
        tile.spray_voxel(&hit, &color(7));
        assert_eq!(tile.store().color_of(index).unwrap().palette_index, 7);

        tile.erase_voxel(&hit);
        assert!(!tile.is_occupied(index));
    }

    #[test]
    fn test_recolor_cluster_stops_at_color_border() {
        let mut tile = Tile::new();
        for x in 0..3 {
            tile.store.add(index_at(x, 0, 0), color(1));
        }
        tile.store.add(index_at(3, 0, 0), color(2));

        let hit = RayHit::new(world_from_discrete(IVec3::new(0, 0, 0)), Vec3::Y);
        tile.recolor_cluster(&hit, &color(9));
        for x in 0..3 {
            assert_eq!(tile.store().color_of(index_at(x, 0, 0)).unwrap().palette_index, 9);
        }
        assert_eq!(tile.store().color_of(index_at(3, 0, 0)).unwrap().palette_index, 2);
    }

    #[test]
    fn test_replace_color_is_global() {
        let mut tile = Tile::new();
        tile.store.add(index_at(0, 0, 0), color(1));
        tile.store.add(index_at(5, 9, 5), color(1)); // disconnected
        tile.store.add(index_at(1, 0, 0), color(2));

        let hit = RayHit::new(world_from_discrete(IVec3::new(0, 0, 0)), Vec3::Y);
        tile.replace_color(&hit, &color(4));
        assert_eq!(tile.store().color_of(index_at(5, 9, 5)).unwrap().palette_index, 4);
        assert_eq!(tile.store().color_of(index_at(1, 0, 0)).unwrap().palette_index, 2);
    }

    #[test]
    fn test_rotate_sixty_degrees_moves_ring_cell() {
        let mut tile = Tile::new();
        tile.store.add(index_at(1, 0, 0), color(1));
        tile.rotate(60.0);
        assert_eq!(tile.store().len(), 1);
        assert!(tile.is_occupied(index_at(0, 0, 1)));
    }

    #[test]
    fn test_rotate_full_turn_is_identity() {
        let mut tile = Tile::new();
        for (x, z) in [(0, 0), (1, 0), (0, 1), (-3, 7)] {
            tile.store.add(index_at(x, 2, z), color(3));
        }
        let before = tile.voxel_map();
        tile.rotate(360.0);
        assert_eq!(tile.voxel_map(), before);
    }

    #[test]
    fn test_load_and_snapshot_roundtrip() {
        let palette = Palette::builtin();
        let mut map = HashMap::new();
        map.insert(index_at(0, 0, 0), 3u8);
        map.insert(index_at(1, 0, 0), 3u8);
        map.insert(index_at(0, 5, 0), 7u8);

        let mut tile = Tile::new();
        tile.load_voxel_map(&map, &palette);
        assert_eq!(tile.voxel_map(), map);
    }

    #[test]
    fn test_load_skips_unknown_palette_entries() {
        let palette = Palette::builtin();
        let mut map = HashMap::new();
        map.insert(index_at(0, 0, 0), 3u8);
        map.insert(index_at(1, 0, 0), 200u8); // no such entry

        let mut tile = Tile::new();
        tile.load_voxel_map(&map, &palette);
        assert_eq!(tile.store().len(), 1);
    }

    #[test]
    fn test_apply_tool_dispatch() {
        let mut tile = Tile::new();
        let base = IVec3::new(0, 0, 0);
        tile.store.add(index_at(0, 0, 0), color(1));
        let hit = top_hit(base);

        tile.apply_tool(EditTool::Build, Some(&hit), None, &color(2));
        assert_eq!(tile.store().len(), 2);

        tile.apply_tool(EditTool::Erase, Some(&top_hit(IVec3::new(0, 1, 0))), None, &color(2));
        assert_eq!(tile.store().len(), 1);
    }
}
