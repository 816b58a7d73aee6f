//! Voxel color type

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;

/// Two colors closer than this per channel count as the same color
pub const COLOR_EPSILON: f32 = 1e-4;

/// A palette entry: display name, external palette index, linear RGB.
/// Identity for editing operations is the RGB value, not the name.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoxelColor {
    pub name: String,
    pub palette_index: u8,
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl VoxelColor {
    pub fn new(name: &str, palette_index: u8, r: f32, g: f32, b: f32) -> Self {
        Self { name: name.to_string(), palette_index, r, g, b }
    }

    /// Parse a `#rrggbb` hex literal
    pub fn from_hex(name: &str, palette_index: u8, hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::ColorFormat(hex.to_string()));
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| Error::ColorFormat(hex.to_string()))?;
        Ok(Self::new(
            name,
            palette_index,
            ((value >> 16) & 0xff) as f32 / 255.0,
            ((value >> 8) & 0xff) as f32 / 255.0,
            (value & 0xff) as f32 / 255.0,
        ))
    }

    /// Value equality under the channel epsilon
    pub fn approx_eq(&self, other: &VoxelColor) -> bool {
        (self.r - other.r).abs() < COLOR_EPSILON
            && (self.g - other.g).abs() < COLOR_EPSILON
            && (self.b - other.b).abs() < COLOR_EPSILON
    }

    /// Name equality, for palette bookkeeping
    pub fn same_name(&self, other: &VoxelColor) -> bool {
        self.name == other.name
    }

    /// Relative luminance per ITU-R BT.709
    pub fn luma(&self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    /// Whether overlaid labels should render light-on-dark
    pub fn is_dark(&self) -> bool {
        self.luma() < 0.5
    }
}
