//! The fixed hourglass footprint: 133 hex rows that widen by 3 pillars
//! per row, hold an alternating 99/100 width through the center band,
//! and narrow again. All derived counts follow from these constants;
//! the conversion formulas in `coords` are only valid for this shape.

use crate::core::types::Vec3;

/// Vertical layers per pillar
pub const GRID_HEIGHT: i32 = 128;
/// Number of rows along the z axis
pub const GRID_DEPTH: i32 = 133;
/// Rows span z in [-HALF_DEPTH, HALF_DEPTH]
pub const HALF_DEPTH: i32 = (GRID_DEPTH - 1) / 2;
/// |z| >= CORNER_BOUND is corner territory, |z| < CORNER_BOUND is the center band
pub const CORNER_BOUND: i32 = (GRID_DEPTH - 1) / 4;
/// Pillars gained per row moving inward through a corner
pub const CORNER_STEP: i32 = 3;
/// Width of the widest rows (odd center rows and the corner boundary rows)
pub const MAX_ROW_WIDTH: i32 = 1 + CORNER_STEP * CORNER_BOUND;

/// Width of the nth corner row, counted from the tip (n = 0 is a single pillar)
pub const fn row_width(n: i32) -> i32 {
    1 + CORNER_STEP * n
}

/// Total pillars in corner rows 0..=n (triangular sum; invertible in closed form)
pub const fn pillars_through_corner_row(n: i32) -> i32 {
    n + 1 + CORNER_STEP * n * (n + 1) / 2
}

const fn center_pillars() -> i32 {
    let mut total = 0;
    let mut z = -(CORNER_BOUND - 1);
    while z < CORNER_BOUND {
        total += if z % 2 == 0 { MAX_ROW_WIDTH - 1 } else { MAX_ROW_WIDTH };
        z += 1;
    }
    total
}

/// Pillars in one corner (rows 0..=CORNER_BOUND)
pub const CORNER_PILLARS: i32 = pillars_through_corner_row(CORNER_BOUND);
/// Pillars in one full layer of the tile
pub const PILLAR_COUNT: i32 = 2 * CORNER_PILLARS + center_pillars();
/// Total cells in the grid; FlatIndex range is [0, MAX_VOXEL_COUNT)
pub const MAX_VOXEL_COUNT: u32 = (PILLAR_COUNT * GRID_HEIGHT) as u32;

/// Pillar index of the center band's z = 0, x = 0 column
pub const CENTER_PILLAR: i32 = (PILLAR_COUNT - 1) / 2;
/// First pillar index past the widening corner
pub const WIDENING_PILLAR_END: i32 = CORNER_PILLARS;
/// First pillar index of the narrowing corner
pub const NARROWING_PILLAR_START: i32 = PILLAR_COUNT - CORNER_PILLARS;

/// Hex prism circumradius
pub const VOXEL_RADIUS: f32 = 1.0;
/// Slab height of one layer
pub const VOXEL_HEIGHT: f32 = 1.0;
/// Fraction of the cell depth between adjacent rows (hex rows interlock)
pub const ROW_PITCH: f32 = 0.75;

/// World-space extent of one cell: flat-to-flat width, slab height, tip-to-tip depth
pub fn voxel_size() -> Vec3 {
    Vec3::new(
        3.0_f32.sqrt() * VOXEL_RADIUS,
        VOXEL_HEIGHT,
        2.0 * VOXEL_RADIUS,
    )
}
