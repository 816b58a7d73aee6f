//! Edit tools selectable while sculpting

/// What one pointer step does to the build
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditTool {
    /// Place a voxel against the struck surface
    Build,
    /// Remove the struck voxel
    Erase,
    /// Recolor the struck voxel
    Spray,
    /// Recolor the struck voxel's same-color cluster
    FillCluster,
    /// Recolor every voxel sharing the struck voxel's color
    ReplaceColor,
}

impl EditTool {
    /// Tools in palette-bar order
    pub const ALL: [EditTool; 5] = [
        EditTool::Build,
        EditTool::Erase,
        EditTool::Spray,
        EditTool::FillCluster,
        EditTool::ReplaceColor,
    ];

    /// Whether holding the pointer repeats the edit step
    pub fn repeats_while_held(self) -> bool {
        matches!(self, EditTool::Build | EditTool::Erase | EditTool::Spray)
    }
}
