//! Parsed form of the external model format
//!
//! A model script is a chain of nested else-if blocks over the
//! external axes: rows keyed by the script's `y` (this grid's z),
//! columns keyed by `x`, and inside each column contiguous spans of
//! the script's `z` (this grid's vertical y) assigned a named color.
//! Color names are declared up front as `colorN = N` bindings.

use std::collections::BTreeMap;

/// What an empty build exports instead of a program
pub const EMPTY_MODEL_TEXT: &str = "Nothing built yet ...";

/// A whole parsed model program
#[derive(Clone, Debug, Default)]
pub struct ModelScript {
    /// Declared color constants, e.g. "color3" -> 3
    pub bindings: BTreeMap<String, i64>,
    /// Row blocks in source order; else-if chained, first match wins
    pub rows: Vec<RowBlock>,
}

/// `if (y == <row>) { ... }`
#[derive(Clone, Debug)]
pub struct RowBlock {
    pub row: i64,
    pub columns: Vec<ColumnBlock>,
}

/// `if (x == <column>) { ... }`
#[derive(Clone, Debug)]
pub struct ColumnBlock {
    pub column: i64,
    pub spans: Vec<SpanRule>,
}

/// `if (z == v)` or `if (z >= from && z <= to)`, assigning one color
#[derive(Clone, Debug)]
pub struct SpanRule {
    pub from: i64,
    pub to: i64,
    /// Name of the color binding the span assigns
    pub binding: String,
}
