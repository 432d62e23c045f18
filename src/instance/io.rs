//! Instance file parsing and example generation

use super::{Instance, TileType};
use crate::error::{Result, TilingError};
use std::collections::HashMap;
use std::path::Path;

/// Load a tiling instance from a text file.
///
/// Format: an optional first line holding a single integer (ignored), a line
/// of color names, then one line per tile type with four colors in
/// (top, right, bottom, left) order, written either as bare tokens or as
/// bracketed comma-separated tuples like `<red,green,blue,yellow>`.
pub fn load_instance_from_file<P: AsRef<Path>>(path: P) -> Result<Instance> {
    let content = std::fs::read_to_string(&path).map_err(|e| {
        TilingError::io(
            format!("failed to read instance file: {}", path.as_ref().display()),
            e,
        )
    })?;

    parse_instance_from_str(&content)
}

/// Parse an instance from its text representation.
pub fn parse_instance_from_str(content: &str) -> Result<Instance> {
    let lines: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(TilingError::InstanceFormat(
            "instance file is empty".to_string(),
        ));
    }

    // An optional leading line with a single integer is ignored.
    let mut idx = 0;
    let first_tokens = tokenize(lines[0]);
    if first_tokens.len() == 1 && first_tokens[0].chars().all(|c| c.is_ascii_digit()) {
        idx = 1;
    }

    let colors_line = lines
        .get(idx)
        .ok_or_else(|| TilingError::InstanceFormat("missing colors line".to_string()))?;
    let color_names: Vec<String> = tokenize(colors_line)
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    if color_names.is_empty() {
        return Err(TilingError::InstanceFormat(
            "colors line declares no colors".to_string(),
        ));
    }

    let mut color_ids: HashMap<&str, usize> = HashMap::new();
    for (i, name) in color_names.iter().enumerate() {
        if color_ids.insert(name.as_str(), i).is_some() {
            return Err(TilingError::InstanceFormat(format!(
                "duplicate color name '{}'",
                name
            )));
        }
    }

    let mut tiles = Vec::new();
    for (line_no, line) in lines.iter().enumerate().skip(idx + 1) {
        let mut s = *line;
        if s.starts_with('<') && s.ends_with('>') {
            s = s[1..s.len() - 1].trim();
        }

        let parts = tokenize(s);
        if parts.len() != 4 {
            return Err(TilingError::InstanceFormat(format!(
                "tile line {} has {} colors, expected 4: '{}'",
                line_no + 1,
                parts.len(),
                line
            )));
        }

        let mut edges = [0usize; 4];
        for (slot, part) in edges.iter_mut().zip(&parts) {
            *slot = *color_ids.get(*part).ok_or_else(|| {
                TilingError::InstanceFormat(format!(
                    "tile line {} uses undeclared color '{}'",
                    line_no + 1,
                    part
                ))
            })?;
        }

        tiles.push(TileType { edges });
    }

    Instance::new(color_names, tiles)
}

fn tokenize(line: &str) -> Vec<&str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Create example instance files for testing and setup.
pub fn create_example_instances<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|e| {
        TilingError::io(format!("failed to create directory: {}", dir.display()), e)
    })?;

    // Two tiles that are edge-compatible only with each other; any solution
    // is a checkerboard of tile indices.
    let checkerboard = "\
red green blue yellow
<yellow,green,red,blue>
<red,blue,yellow,green>
";
    let checkerboard_path = dir.join("checkerboard.txt");
    std::fs::write(&checkerboard_path, checkerboard).map_err(|e| {
        TilingError::io(
            format!("failed to write {}", checkerboard_path.display()),
            e,
        )
    })?;

    // No tile pair agrees horizontally, so any grid wider than one cell is
    // unsatisfiable.
    let unsat = "\
red green blue yellow
<red,green,blue,yellow>
<green,red,yellow,blue>
";
    let unsat_path = dir.join("unsat.txt");
    std::fs::write(&unsat_path, unsat)
        .map_err(|e| TilingError::io(format!("failed to write {}", unsat_path.display()), e))?;

    Ok(())
}
