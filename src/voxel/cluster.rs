//! Same-color connectivity search over the occupied set

use std::collections::{HashSet, VecDeque};

use crate::grid::FlatIndex;
use crate::grid::adjacency::occupied_neighbors_of;
use super::store::VoxelStore;

/// Breadth-first flood fill from `seed`: every occupied cell reachable
/// through face-adjacent cells matching the seed's color by value.
/// The seed itself is always part of the cluster; an unoccupied seed
/// yields an empty cluster. Pure query, the store is not touched.
pub fn same_color_cluster(seed: FlatIndex, store: &VoxelStore) -> Vec<FlatIndex> {
    let Some(seed_color) = store.color_of(seed).cloned() else {
        return Vec::new();
    };
    let mut cluster = Vec::new();
    let mut seen: HashSet<FlatIndex> = HashSet::from([seed]);
    let mut frontier: VecDeque<FlatIndex> = VecDeque::from([seed]);

    while let Some(current) = frontier.pop_front() {
        cluster.push(current);
        for adjacent in occupied_neighbors_of(current, store) {
            if seen.contains(&adjacent) {
                continue;
            }
            let same = store
                .color_of(adjacent)
                .is_some_and(|color| color.approx_eq(&seed_color));
            if same {
                seen.insert(adjacent);
                frontier.push_back(adjacent);
            }
        }
    }
    cluster
}
