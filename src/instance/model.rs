//! Tiling instance model: colors and tile types

use crate::error::{Result, TilingError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interned color identifier. Colors are mapped to dense indices into the
/// instance's color table at load time, so edge comparisons during clause
/// generation are plain integer equality.
pub type ColorId = usize;

/// A tile type: four edge colors in (top, right, bottom, left) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileType {
    pub edges: [ColorId; 4],
}

impl TileType {
    pub fn new(top: ColorId, right: ColorId, bottom: ColorId, left: ColorId) -> Self {
        Self {
            edges: [top, right, bottom, left],
        }
    }

    pub fn top(&self) -> ColorId {
        self.edges[0]
    }

    pub fn right(&self) -> ColorId {
        self.edges[1]
    }

    pub fn bottom(&self) -> ColorId {
        self.edges[2]
    }

    pub fn left(&self) -> ColorId {
        self.edges[3]
    }
}

/// An immutable tiling instance: the declared colors and the tile types
/// that may be placed on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Color names in declaration order; a `ColorId` indexes this table.
    pub colors: Vec<String>,
    /// Tile types; a 1-based tile index `t` refers to `tiles[t - 1]`.
    pub tiles: Vec<TileType>,
}

impl Instance {
    /// Create an instance, enforcing the model invariants.
    ///
    /// At least two tile types are required: the external solver is known to
    /// fail catastrophically on single-tile formulas, so the precondition is
    /// checked here, long before any subprocess is spawned.
    pub fn new(colors: Vec<String>, tiles: Vec<TileType>) -> Result<Self> {
        if colors.is_empty() {
            return Err(TilingError::InstanceFormat(
                "instance declares no colors".to_string(),
            ));
        }

        if tiles.len() < 2 {
            return Err(TilingError::InstanceFormat(format!(
                "instance has {} tile type(s), at least 2 are required",
                tiles.len()
            )));
        }

        for (idx, tile) in tiles.iter().enumerate() {
            for &edge in &tile.edges {
                if edge >= colors.len() {
                    return Err(TilingError::InstanceFormat(format!(
                        "tile {} references color id {} outside the color table (size {})",
                        idx + 1,
                        edge,
                        colors.len()
                    )));
                }
            }
        }

        Ok(Self { colors, tiles })
    }

    /// Number of tile types (`T`).
    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    pub fn num_colors(&self) -> usize {
        self.colors.len()
    }

    /// Tile type for a 1-based tile index.
    pub fn tile(&self, t: usize) -> Option<&TileType> {
        if t == 0 {
            return None;
        }
        self.tiles.get(t - 1)
    }

    pub fn color_name(&self, id: ColorId) -> Option<&str> {
        self.colors.get(id).map(|s| s.as_str())
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Instance:")?;
        writeln!(f, "  Colors: {}", self.colors.join(", "))?;
        writeln!(f, "  Tile types: {}", self.tiles.len())?;
        for (idx, tile) in self.tiles.iter().enumerate() {
            let names: Vec<&str> = tile
                .edges
                .iter()
                .map(|&e| self.color_name(e).unwrap_or("?"))
                .collect();
            writeln!(f, "    {}: <{}>", idx + 1, names.join(","))?;
        }
        Ok(())
    }
}
