//! FlatIndex / DiscretePos / WorldPos conversions for the tile footprint
//!
//! A discrete position is (x, y, z): y is the vertical layer, (x, z)
//! locate a pillar. Pillars are numbered row by row from the near tip
//! (z = -66) to the far tip (z = 66), and `flat = pillar * height + y`.
//! The pillar arithmetic is case-split over the three footprint regions
//! and exact: the center band's fractional 99.5 pillars-per-row stride
//! is carried in half-pillar integer units, and corner rows invert
//! through the closed-form triangular-number root.

use crate::core::error::Error;
use crate::core::types::{IVec3, Result, Vec3};
use super::FlatIndex;
use super::footprint::{
    GRID_HEIGHT, HALF_DEPTH, CORNER_BOUND, MAX_ROW_WIDTH,
    PILLAR_COUNT, MAX_VOXEL_COUNT,
    CENTER_PILLAR, WIDENING_PILLAR_END, NARROWING_PILLAR_START,
    row_width, pillars_through_corner_row, voxel_size, ROW_PITCH,
};

/// Pillars in two adjacent center rows; the per-row stride is half this
const CENTER_STRIDE_X2: i32 = 2 * MAX_ROW_WIDTH - 1;

/// ceil(n / 2) for any sign of n
const fn ceil_half(n: i32) -> i32 {
    (n + 1).div_euclid(2)
}

/// Row index (from the tip) holding the kth corner pillar, k >= 1.
/// Inverts the triangular sum in `pillars_through_corner_row`; exact at
/// row boundaries because 24k+1 is then the perfect square (6n+5)^2.
fn corner_row_for(pillar_ordinal: i32) -> i32 {
    (((24.0 * pillar_ordinal as f64 + 1.0).sqrt() - 5.0) / 6.0).ceil() as i32
}

/// Range check against the grid's cell count
pub fn is_valid_flat(index: FlatIndex) -> bool {
    index < MAX_VOXEL_COUNT
}

/// Whether (x, y, z) falls inside the footprint for its row
pub fn is_valid_discrete(pos: IVec3) -> bool {
    if pos.y < 0 || pos.y >= GRID_HEIGHT || pos.z.abs() > HALF_DEPTH {
        return false;
    }
    if pos.z >= CORNER_BOUND {
        let width = row_width(HALF_DEPTH - pos.z);
        -(width / 2) <= pos.x && pos.x <= (width - 1) / 2
    } else if pos.z > -CORNER_BOUND {
        // even center rows are one pillar narrower on the negative side
        let half = (MAX_ROW_WIDTH - 2) / 2;
        let lo = if pos.z.rem_euclid(2) == 0 { -half } else { -(half + 1) };
        lo <= pos.x && pos.x <= half
    } else {
        let width = row_width(pos.z + HALF_DEPTH);
        -(width / 2) <= pos.x && pos.x <= (width - 1) / 2
    }
}

/// Map a discrete position to its flat index; None outside the footprint
pub fn flat_from_discrete(pos: IVec3) -> Option<FlatIndex> {
    if !is_valid_discrete(pos) {
        return None;
    }
    let pillar = if pos.z <= -CORNER_BOUND {
        // widening corner: count pillars from the near tip through this
        // row, then step back to the row center
        let row = pos.z + HALF_DEPTH;
        pillars_through_corner_row(row) - (row_width(row) + 1) / 2 + pos.x
    } else if pos.z < CORNER_BOUND {
        CENTER_PILLAR + ceil_half(CENTER_STRIDE_X2 * pos.z) + pos.x
    } else {
        // narrowing corner: mirror of the widening case from the far tip
        let row = HALF_DEPTH - pos.z;
        let from_far_end = pillars_through_corner_row(row) - row_width(row) / 2 - pos.x;
        PILLAR_COUNT - from_far_end
    };
    Some((pillar * GRID_HEIGHT + pos.y) as FlatIndex)
}

/// Inverse of `flat_from_discrete`; None out of range
pub fn discrete_from_flat(index: FlatIndex) -> Option<IVec3> {
    if !is_valid_flat(index) {
        return None;
    }
    let y = index as i32 % GRID_HEIGHT;
    let pillar = index as i32 / GRID_HEIGHT;
    let (x, z) = if pillar < WIDENING_PILLAR_END {
        let row = corner_row_for(pillar + 1);
        let x = pillar - pillars_through_corner_row(row) + (row_width(row) + 1) / 2;
        (x, row - HALF_DEPTH)
    } else if pillar < NARROWING_PILLAR_START {
        // offset / 99.5, rounded, then the remainder floored back to x;
        // all in half-pillar units so no float enters the bijection
        let offset = pillar - CENTER_PILLAR;
        let z_rounded = (4 * offset + CENTER_STRIDE_X2).div_euclid(2 * CENTER_STRIDE_X2);
        let x = (2 * offset - CENTER_STRIDE_X2 * z_rounded).div_euclid(2);
        let z = (4 * (offset - x) + CENTER_STRIDE_X2).div_euclid(2 * CENTER_STRIDE_X2);
        (x, z)
    } else {
        let from_far_end = PILLAR_COUNT - pillar;
        let row = corner_row_for(from_far_end);
        let x = pillars_through_corner_row(row) - row_width(row) / 2 - from_far_end;
        (x, HALF_DEPTH - row)
    };
    Some(IVec3::new(x, y, z))
}

/// `flat_from_discrete` for reporting surfaces: the rejection carries
/// the offending position instead of disappearing into a None
pub fn try_flat_from_discrete(pos: IVec3) -> Result<FlatIndex> {
    flat_from_discrete(pos).ok_or(Error::InvalidPosition(pos.x, pos.y, pos.z))
}

/// World position of a cell center. World x runs opposite grid x, odd
/// rows shift half a cell width, rows advance at 3/4 cell depth, and
/// centers sit half a slab above their layer.
pub fn world_from_discrete(pos: IVec3) -> Vec3 {
    let size = voxel_size();
    let x_fix = if pos.z.rem_euclid(2) == 0 { 0.0 } else { 0.5 * size.x };
    Vec3::new(
        size.x * -(pos.x as f32) - x_fix,
        size.y * pos.y as f32 + 0.5 * size.y,
        size.z * ROW_PITCH * pos.z as f32,
    )
}

/// Snap a continuous position to the nearest cell. The result may lie
/// outside the footprint; validity is the index conversions' concern.
pub fn discrete_from_world(world: Vec3) -> IVec3 {
    let size = voxel_size();
    let z = (world.z / (size.z * ROW_PITCH)).round() as i32;
    let x_fix = if z.rem_euclid(2) == 0 { 0.0 } else { 0.5 };
    IVec3::new(
        (-world.x / size.x - x_fix).round() as i32,
        (world.y / size.y - 0.5).round() as i32,
        z,
    )
}

/// World position of a cell center by flat index
pub fn world_from_flat(index: FlatIndex) -> Option<Vec3> {
    discrete_from_flat(index).map(world_from_discrete)
}

/// Flat index of the cell nearest a world position
pub fn flat_from_world(world: Vec3) -> Option<FlatIndex> {
    flat_from_discrete(discrete_from_world(world))
}

/// Re-center a continuous position onto its cell center, clearing
/// accumulated rounding drift before further conversions
pub fn snap_world(world: Vec3) -> Vec3 {
    world_from_discrete(discrete_from_world(world))
}
