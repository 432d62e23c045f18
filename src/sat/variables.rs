//! Variable indexing for the tiling SAT encoding

use crate::error::{Result, TilingError};

/// Bijection between `(row, col, tile)` triples and positive SAT variable
/// ids.
///
/// The mapping is a pure mixed-radix encoding over the fixed domain
/// `1..=k × 1..=k × 1..=T`:
///
/// ```text
/// id = ((i - 1) * k + (j - 1)) * T + (t - 1) + 1
/// ```
///
/// It is dense, deterministic and trivially invertible, which matters
/// because the variable id is the only information that crosses the solver
/// boundary in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableIndexer {
    grid_size: usize,
    num_tiles: usize,
}

impl VariableIndexer {
    /// Create an indexer for a `k`×`k` grid with `T` tile types.
    pub fn new(grid_size: usize, num_tiles: usize) -> Result<Self> {
        if grid_size == 0 || num_tiles == 0 {
            return Err(TilingError::Encoding(format!(
                "degenerate variable domain: grid size {}, {} tile types",
                grid_size, num_tiles
            )));
        }

        // The highest id must fit in a positive i32 literal.
        let ceiling = grid_size
            .checked_mul(grid_size)
            .and_then(|cells| cells.checked_mul(num_tiles));
        match ceiling {
            Some(n) if n <= i32::MAX as usize => Ok(Self {
                grid_size,
                num_tiles,
            }),
            _ => Err(TilingError::Encoding(format!(
                "variable domain {}x{}x{} exceeds the literal range",
                grid_size, grid_size, num_tiles
            ))),
        }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn num_tiles(&self) -> usize {
        self.num_tiles
    }

    /// Highest variable id the indexer will produce (`k²·T`). Also the id
    /// ceiling reported in the DIMACS header.
    pub fn variable_count(&self) -> i32 {
        (self.grid_size * self.grid_size * self.num_tiles) as i32
    }

    /// Variable id for "cell (i, j) holds tile t". All arguments 1-based.
    pub fn encode(&self, row: usize, col: usize, tile: usize) -> Result<i32> {
        self.validate(row, col, tile)?;

        let k = self.grid_size;
        let t = self.num_tiles;
        let id = ((row - 1) * k + (col - 1)) * t + (tile - 1) + 1;
        Ok(id as i32)
    }

    /// Recover the `(row, col, tile)` triple that produced `id`.
    pub fn decode(&self, id: i32) -> Result<(usize, usize, usize)> {
        if id < 1 || id > self.variable_count() {
            return Err(TilingError::Encoding(format!(
                "variable id {} outside 1..={}",
                id,
                self.variable_count()
            )));
        }

        let zero_based = (id - 1) as usize;
        let tile = zero_based % self.num_tiles + 1;
        let cell = zero_based / self.num_tiles;
        let col = cell % self.grid_size + 1;
        let row = cell / self.grid_size + 1;
        Ok((row, col, tile))
    }

    fn validate(&self, row: usize, col: usize, tile: usize) -> Result<()> {
        if row == 0 || row > self.grid_size {
            return Err(TilingError::Encoding(format!(
                "row {} outside 1..={}",
                row, self.grid_size
            )));
        }
        if col == 0 || col > self.grid_size {
            return Err(TilingError::Encoding(format!(
                "column {} outside 1..={}",
                col, self.grid_size
            )));
        }
        if tile == 0 || tile > self.num_tiles {
            return Err(TilingError::Encoding(format!(
                "tile index {} outside 1..={}",
                tile, self.num_tiles
            )));
        }
        Ok(())
    }
}
