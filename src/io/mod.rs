//! Model text codec: the external game's conditional-range format

pub mod script;
pub mod export;
pub mod import;

use std::path::Path;

use crate::core::types::Result;

pub use script::{ModelScript, RowBlock, ColumnBlock, SpanRule, EMPTY_MODEL_TEXT};
pub use export::export_model;
pub use import::{import_model, ImportOutcome};

pub fn read_model_file(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

pub fn write_model_file(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text)?;
    Ok(())
}
