//! Voxel data structures and operations

pub mod color;
pub mod palette;
pub mod store;
pub mod cluster;

pub use color::VoxelColor;
pub use palette::Palette;
pub use store::{Voxel, VoxelStore};
pub use cluster::same_color_cluster;
