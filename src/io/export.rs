//! Model text export
//!
//! Voxels are bucketed by (row, column) and contiguous vertical runs
//! of one color merge greedily while scanning upward; each run becomes
//! one conditional. The external format swaps axes: its `y` is this
//! grid's z and its `z` is the vertical layer.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write;

use crate::grid::FlatIndex;
use crate::grid::coords::discrete_from_flat;
use super::script::EMPTY_MODEL_TEXT;

/// Render an index -> palette-index map as a model program.
/// An empty map exports the fixed placeholder text.
pub fn export_model(map: &HashMap<FlatIndex, u8>) -> String {
    if map.is_empty() {
        return EMPTY_MODEL_TEXT.to_string();
    }

    // bucket by grid z, then x, then ascending layer
    let mut rows: BTreeMap<i32, BTreeMap<i32, BTreeMap<i32, u8>>> = BTreeMap::new();
    for (&index, &color_index) in map {
        let Some(pos) = discrete_from_flat(index) else {
            log::warn!("export skipping out-of-range index {index}");
            continue;
        };
        rows.entry(pos.z)
            .or_default()
            .entry(pos.x)
            .or_default()
            .insert(pos.y, color_index);
    }

    let mut used: BTreeSet<u8> = BTreeSet::new();
    let mut body = String::new();
    let mut first_row = true;
    for (z, columns) in &rows {
        if !first_row {
            body.push_str("else ");
        }
        first_row = false;
        let _ = writeln!(body, "if (y == {z}){{");

        let mut first_column = true;
        for (x, cells) in columns {
            if !first_column {
                body.push_str("else ");
            }
            first_column = false;
            let _ = writeln!(body, "if (x == {x}){{");

            let mut first_span = true;
            for (from, to, color_index) in merge_runs(cells) {
                used.insert(color_index);
                if !first_span {
                    body.push_str("else ");
                }
                first_span = false;
                if from == to {
                    let _ = writeln!(body, "if (z == {from}){{ result[i] = color{color_index}; }}");
                } else {
                    let _ = writeln!(
                        body,
                        "if (z >= {from} && z <= {to}){{ result[i] = color{color_index}; }}"
                    );
                }
            }
            body.push_str("}\n");
        }
        body.push_str("}\n");
    }

    let mut program = String::new();
    for color_index in used {
        let _ = writeln!(program, "color{color_index} = {color_index}");
    }
    program.push_str(&body);
    program
}

/// Greedy forward run-length merge over ascending layers
fn merge_runs(cells: &BTreeMap<i32, u8>) -> Vec<(i32, i32, u8)> {
    let mut runs: Vec<(i32, i32, u8)> = Vec::new();
    for (&layer, &color_index) in cells {
        match runs.last_mut() {
            Some((_, to, color)) if *to + 1 == layer && *color == color_index => *to = layer,
            _ => runs.push((layer, layer, color_index)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::IVec3;
    use crate::grid::coords::flat_from_discrete;

    fn index_at(x: i32, y: i32, z: i32) -> FlatIndex {
        flat_from_discrete(IVec3::new(x, y, z)).unwrap()
    }

    #[test]
    fn test_empty_map_exports_placeholder() {
        assert_eq!(export_model(&HashMap::new()), EMPTY_MODEL_TEXT);
    }

    #[test]
    fn test_single_voxel_program() {
        let mut map = HashMap::new();
        map.insert(index_at(2, 5, -4), 3u8);
        let text = export_model(&map);
        assert_eq!(
            text,
            "color3 = 3\n\
             if (y == -4){\n\
             if (x == 2){\n\
             if (z == 5){ result[i] = color3; }\n\
             }\n\
             }\n"
        );
    }

    #[test]
    fn test_contiguous_run_merges() {
        let mut map = HashMap::new();
        for y in 3..=6 {
            map.insert(index_at(0, y, 0), 2u8);
        }
        let text = export_model(&map);
        assert!(text.contains("if (z >= 3 && z <= 6){ result[i] = color2; }"));
    }

    #[test]
    fn test_color_change_breaks_run() {
        let mut map = HashMap::new();
        map.insert(index_at(0, 3, 0), 2u8);
        map.insert(index_at(0, 4, 0), 5u8);
        map.insert(index_at(0, 5, 0), 2u8);
        let text = export_model(&map);
        assert!(text.contains("if (z == 3){ result[i] = color2; }"));
        assert!(text.contains("else if (z == 4){ result[i] = color5; }"));
        assert!(text.contains("else if (z == 5){ result[i] = color2; }"));
    }

    #[test]
    fn test_gap_breaks_run() {
        let mut map = HashMap::new();
        map.insert(index_at(0, 3, 0), 2u8);
        map.insert(index_at(0, 7, 0), 2u8);
        let text = export_model(&map);
        assert!(text.contains("if (z == 3)"));
        assert!(text.contains("else if (z == 7)"));
    }

    #[test]
    fn test_rows_and_columns_chain_with_else() {
        let mut map = HashMap::new();
        map.insert(index_at(0, 0, 0), 1u8);
        map.insert(index_at(1, 0, 0), 1u8);
        map.insert(index_at(0, 0, 1), 1u8);
        let text = export_model(&map);
        assert!(text.contains("if (y == 0){"));
        assert!(text.contains("else if (y == 1){"));
        assert!(text.contains("else if (x == 1){"));
    }

    #[test]
    fn test_color_declarations_ascend_once() {
        let mut map = HashMap::new();
        map.insert(index_at(0, 0, 0), 9u8);
        map.insert(index_at(1, 0, 0), 2u8);
        map.insert(index_at(2, 0, 0), 9u8);
        let text = export_model(&map);
        let decls: Vec<&str> = text.lines().take_while(|l| l.contains(" = ")).collect();
        assert_eq!(decls, vec!["color2 = 2", "color9 = 9"]);
    }
}
