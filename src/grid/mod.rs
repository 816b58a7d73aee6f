//! Grid geometry: the fixed tile footprint, index conversions, adjacency

pub mod footprint;
pub mod coords;
pub mod adjacency;

/// Unique integer identifying one grid cell across the whole tile
pub type FlatIndex = u32;

pub use footprint::{GRID_HEIGHT, GRID_DEPTH, HALF_DEPTH, CORNER_BOUND, MAX_ROW_WIDTH, PILLAR_COUNT, MAX_VOXEL_COUNT};
pub use coords::{
    flat_from_discrete, discrete_from_flat, try_flat_from_discrete,
    world_from_discrete, discrete_from_world,
    world_from_flat, flat_from_world, snap_world,
    is_valid_discrete, is_valid_flat,
};
pub use adjacency::{neighbors_of, occupied_neighbors_of};
