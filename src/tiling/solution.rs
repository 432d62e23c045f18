//! Model decoding and tiling solution representation

use crate::error::{Result, TilingError};
use crate::sat::VariableIndexer;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A solved tiling: one 1-based tile index per grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilingSolution {
    pub grid_size: usize,
    /// Row-major matrix of 1-based tile indices.
    pub tiles: Vec<Vec<usize>>,
}

impl TilingSolution {
    /// Tile index at 1-based grid coordinates.
    pub fn tile_at(&self, row: usize, col: usize) -> Option<usize> {
        self.tiles.get(row - 1)?.get(col - 1).copied()
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for TilingSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.tiles {
            let line: Vec<String> = row.iter().map(|t| t.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Decode a satisfying assignment from captured solver output.
///
/// Scans the output for `v ` value lines, collects the ids reported true,
/// and inverts each cell's candidate ids through the indexer. Exactly one
/// tile variable must be true per cell; anything else means the exactly-one
/// clauses were violated, which points at an encoder or solver defect and is
/// always fatal.
pub fn decode_solution(
    raw_output: &str,
    indexer: &VariableIndexer,
) -> Result<TilingSolution> {
    let true_ids = parse_true_ids(raw_output)?;
    let k = indexer.grid_size();

    let mut tiles = Vec::with_capacity(k);
    for row in 1..=k {
        let mut row_tiles = Vec::with_capacity(k);
        for col in 1..=k {
            let mut chosen = None;
            for tile in 1..=indexer.num_tiles() {
                let id = indexer.encode(row, col, tile)?;
                if true_ids.contains(&id) {
                    if let Some(previous) = chosen {
                        return Err(TilingError::DecodeInvariant(format!(
                            "cell ({}, {}) has multiple true tiles: {} and {}",
                            row, col, previous, tile
                        )));
                    }
                    chosen = Some(tile);
                }
            }

            match chosen {
                Some(tile) => row_tiles.push(tile),
                None => {
                    return Err(TilingError::DecodeInvariant(format!(
                        "cell ({}, {}) has no true tile variable",
                        row, col
                    )));
                }
            }
        }
        tiles.push(row_tiles);
    }

    Ok(TilingSolution {
        grid_size: k,
        tiles,
    })
}

/// Collect the set of variable ids reported true in the solver's `v` lines.
fn parse_true_ids(raw_output: &str) -> Result<HashSet<i32>> {
    let mut value_text = String::new();
    for line in raw_output.lines() {
        if let Some(rest) = line.strip_prefix("v ").or_else(|| line.strip_prefix("v\t")) {
            value_text.push_str(rest.trim());
            value_text.push(' ');
        }
    }

    if value_text.trim().is_empty() {
        return Err(TilingError::SolverProtocol(
            "solver reported SAT but emitted no value lines".to_string(),
        ));
    }

    let mut true_ids = HashSet::new();
    let mut terminated = false;
    for token in value_text.split_whitespace() {
        let literal: i32 = token.parse().map_err(|_| {
            TilingError::SolverProtocol(format!("unparsable literal '{}' in value line", token))
        })?;

        if literal == 0 {
            terminated = true;
            break;
        }
        if literal > 0 {
            true_ids.insert(literal);
        }
    }

    if !terminated {
        return Err(TilingError::SolverProtocol(
            "value lines are not terminated by the 0 sentinel".to_string(),
        ));
    }

    Ok(true_ids)
}
