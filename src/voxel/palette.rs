//! Palette table mapping external color indices to voxel colors

use std::collections::BTreeMap;
use std::path::Path;

use crate::core::error::Error;
use crate::core::types::Result;
use super::color::VoxelColor;

/// Ordered set of available colors, keyed by external palette index.
/// Index 0 is reserved for "empty" and never holds an entry.
/// Serialized form is the ordered entry list, not the map.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    colors: BTreeMap<u8, VoxelColor>,
}

impl Palette {
    /// Empty palette
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in default table
    pub fn builtin() -> Self {
        let table = [
            ("white", "#f4f4f4"),
            ("stone", "#a1a6b6"),
            ("charcoal", "#2b2b2e"),
            ("brick", "#b3402a"),
            ("amber", "#e0902b"),
            ("gold", "#e6c545"),
            ("moss", "#5d8a3c"),
            ("forest", "#2f5d33"),
            ("teal", "#2e8a87"),
            ("sky", "#5aa7d6"),
            ("cobalt", "#2d52a8"),
            ("violet", "#6c44a0"),
            ("magenta", "#b04a8e"),
            ("rose", "#d98ba3"),
            ("sand", "#d8c49a"),
            ("umber", "#6e4a2d"),
        ];
        let mut palette = Self::new();
        for (slot, (name, hex)) in table.into_iter().enumerate() {
            let index = slot as u8 + 1;
            let color = VoxelColor::from_hex(name, index, hex)
                .expect("builtin palette literals are well formed");
            palette.insert(color);
        }
        palette
    }

    /// Insert or replace the entry at the color's own index.
    /// Index 0 is ignored.
    pub fn insert(&mut self, color: VoxelColor) {
        if color.palette_index == 0 {
            log::warn!("palette index 0 is reserved, dropping entry '{}'", color.name);
            return;
        }
        self.colors.insert(color.palette_index, color);
    }

    pub fn get(&self, index: u8) -> Option<&VoxelColor> {
        self.colors.get(&index)
    }

    /// Entry at `index`, as an error for reporting surfaces
    pub fn require(&self, index: u8) -> Result<&VoxelColor> {
        self.get(index)
            .ok_or(Error::UnknownPaletteIndex(index as u32))
    }

    pub fn contains(&self, index: u8) -> bool {
        self.colors.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Entries in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = &VoxelColor> {
        self.colors.values()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let colors: Vec<VoxelColor> = serde_json::from_str(json)?;
        let mut palette = Self::new();
        for color in colors {
            palette.insert(color);
        }
        Ok(palette)
    }

    pub fn to_json(&self) -> Result<String> {
        let colors: Vec<&VoxelColor> = self.iter().collect();
        Ok(serde_json::to_string_pretty(&colors)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_indices_are_contiguous() {
        let palette = Palette::builtin();
        assert_eq!(palette.len(), 16);
        for (expected, color) in (1..=16u8).zip(palette.iter()) {
            assert_eq!(color.palette_index, expected);
        }
        assert!(!palette.contains(0));
    }

    #[test]
    fn test_index_zero_is_rejected() {
        let mut palette = Palette::new();
        palette.insert(VoxelColor::new("ghost", 0, 1.0, 1.0, 1.0));
        assert!(palette.is_empty());
    }

    #[test]
    fn test_require_reports_missing_entries() {
        let palette = Palette::builtin();
        assert!(palette.require(3).is_ok());
        assert!(matches!(
            palette.require(200),
            Err(crate::core::error::Error::UnknownPaletteIndex(200))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let palette = Palette::builtin();
        let json = palette.to_json().unwrap();
        let restored = Palette::from_json(&json).unwrap();
        assert_eq!(restored.len(), palette.len());
        for (a, b) in palette.iter().zip(restored.iter()) {
            assert!(a.approx_eq(b));
            assert!(a.same_name(b));
        }
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palette.json");
        let palette = Palette::builtin();
        palette.save(&path).unwrap();
        let restored = Palette::load(&path).unwrap();
        assert_eq!(restored.len(), palette.len());
    }
}
