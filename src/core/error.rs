//! Error types for the sculpting core

use thiserror::Error;

/// Main error type for the crate
///
/// The first four variants mirror the expected-and-tolerated conditions
/// of the editing model; store operations treat them as local no-ops and
/// only reporting surfaces (import summaries, the CLI) materialize them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("grid index {0} out of range")]
    OutOfRangeIndex(u32),

    #[error("discrete position ({0}, {1}, {2}) outside the tile footprint")]
    InvalidPosition(i32, i32, i32),

    #[error("no voxel at grid index {0}")]
    UnoccupiedCell(u32),

    #[error("unknown palette index {0}")]
    UnknownPaletteIndex(u32),

    #[error("malformed model script: {0}")]
    MalformedScript(String),

    #[error("invalid color literal: {0}")]
    ColorFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
