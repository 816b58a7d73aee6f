//! Model script checker — imports a model text file, reports what it
//! holds, and can write back a normalized export.
//!
//! Usage: cargo run --bin check_model -- --input <FILE> [OPTIONS]
//!
//! Options:
//!   --input <FILE>      Model script to import (required)
//!   --palette <FILE>    Palette JSON (default: built-in table)
//!   --normalize <FILE>  Re-export the imported model to this path

use std::path::PathBuf;

use hexvox::io::{export_model, import_model, read_model_file, write_model_file};
use hexvox::voxel::Palette;

fn main() {
    hexvox::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let Some(input) = parse_path_arg(&args, "--input") else {
        eprintln!("usage: check_model --input <FILE> [--palette <FILE>] [--normalize <FILE>]");
        std::process::exit(2);
    };
    let palette = match parse_path_arg(&args, "--palette") {
        Some(path) => match Palette::load(&path) {
            Ok(palette) => palette,
            Err(error) => {
                log::error!("failed to load palette {}: {error}", path.display());
                std::process::exit(1);
            }
        },
        None => Palette::builtin(),
    };

    let text = match read_model_file(&input) {
        Ok(text) => text,
        Err(error) => {
            log::error!("failed to read {}: {error}", input.display());
            std::process::exit(1);
        }
    };

    let outcome = match import_model(&text, &palette) {
        Ok(outcome) => outcome,
        Err(error) => {
            log::error!("{}: {error}", input.display());
            std::process::exit(1);
        }
    };

    let mut used: Vec<u8> = outcome.voxels.values().copied().collect();
    used.sort_unstable();
    used.dedup();
    log::info!(
        "{}: {} voxels accepted, {} rejected, {} distinct colors",
        input.display(),
        outcome.accepted,
        outcome.rejected,
        used.len()
    );

    if let Some(path) = parse_path_arg(&args, "--normalize") {
        let normalized = export_model(&outcome.voxels);
        if let Err(error) = write_model_file(&path, &normalized) {
            log::error!("failed to write {}: {error}", path.display());
            std::process::exit(1);
        }
        log::info!("normalized export written to {}", path.display());
    }
}

fn parse_path_arg(args: &[String], name: &str) -> Option<PathBuf> {
    args.iter()
        .position(|arg| arg == name)
        .and_then(|at| args.get(at + 1))
        .map(PathBuf::from)
}
