//! Independent validation of decoded tiling solutions

use super::TilingSolution;
use crate::error::{Result, TilingError};
use crate::instance::Instance;

/// Re-checks a decoded solution directly against the instance, without
/// trusting the solver or the encoder: every tile index must exist and
/// every pair of adjacent cells must agree on the shared edge color.
pub struct SolutionValidator<'a> {
    instance: &'a Instance,
}

impl<'a> SolutionValidator<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// Validate the solution; any violation is a decode-invariant error
    /// naming the offending cells.
    pub fn validate(&self, solution: &TilingSolution) -> Result<()> {
        let k = solution.grid_size;

        if solution.tiles.len() != k || solution.tiles.iter().any(|row| row.len() != k) {
            return Err(TilingError::DecodeInvariant(format!(
                "solution matrix is not {}x{}",
                k, k
            )));
        }

        for row in 1..=k {
            for col in 1..=k {
                let tile = self.tile_at(solution, row, col)?;

                if col < k {
                    let right = self.tile_at(solution, row, col + 1)?;
                    if tile.right() != right.left() {
                        return Err(TilingError::DecodeInvariant(format!(
                            "cells ({}, {}) and ({}, {}) disagree on their shared edge: {} vs {}",
                            row,
                            col,
                            row,
                            col + 1,
                            self.color(tile.right()),
                            self.color(right.left())
                        )));
                    }
                }

                if row < k {
                    let below = self.tile_at(solution, row + 1, col)?;
                    if tile.bottom() != below.top() {
                        return Err(TilingError::DecodeInvariant(format!(
                            "cells ({}, {}) and ({}, {}) disagree on their shared edge: {} vs {}",
                            row,
                            col,
                            row + 1,
                            col,
                            self.color(tile.bottom()),
                            self.color(below.top())
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn tile_at(
        &self,
        solution: &TilingSolution,
        row: usize,
        col: usize,
    ) -> Result<&crate::instance::TileType> {
        let index = solution.tile_at(row, col).ok_or_else(|| {
            TilingError::DecodeInvariant(format!("cell ({}, {}) missing from solution", row, col))
        })?;

        self.instance.tile(index).ok_or_else(|| {
            TilingError::DecodeInvariant(format!(
                "cell ({}, {}) holds unknown tile index {}",
                row, col, index
            ))
        })
    }

    fn color(&self, id: usize) -> &str {
        self.instance.color_name(id).unwrap_or("?")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::parse_instance_from_str;

    fn checkerboard_instance() -> Instance {
        parse_instance_from_str(
            "red green blue yellow\n<yellow,green,red,blue>\n<red,blue,yellow,green>\n",
        )
        .unwrap()
    }

    fn solution(tiles: Vec<Vec<usize>>) -> TilingSolution {
        TilingSolution {
            grid_size: tiles.len(),
            tiles,
        }
    }

    #[test]
    fn test_alternating_grid_is_valid() {
        let instance = checkerboard_instance();
        let validator = SolutionValidator::new(&instance);

        let sol = solution(vec![
            vec![1, 2, 1, 2],
            vec![2, 1, 2, 1],
            vec![1, 2, 1, 2],
            vec![2, 1, 2, 1],
        ]);
        assert!(validator.validate(&sol).is_ok());
    }

    #[test]
    fn test_horizontal_mismatch_detected() {
        let instance = checkerboard_instance();
        let validator = SolutionValidator::new(&instance);

        // Tile 1 right of tile 1 mismatches (green vs blue).
        let sol = solution(vec![vec![1, 1], vec![2, 1]]);
        let result = validator.validate(&sol);
        assert!(matches!(result, Err(TilingError::DecodeInvariant(_))));
    }

    #[test]
    fn test_vertical_mismatch_detected() {
        let instance = checkerboard_instance();
        let validator = SolutionValidator::new(&instance);

        // Tile 1 above tile 1 mismatches (red vs yellow).
        let sol = solution(vec![vec![1, 2], vec![1, 2]]);
        let result = validator.validate(&sol);
        assert!(matches!(result, Err(TilingError::DecodeInvariant(_))));
    }

    #[test]
    fn test_unknown_tile_index_detected() {
        let instance = checkerboard_instance();
        let validator = SolutionValidator::new(&instance);

        let sol = solution(vec![vec![1, 2], vec![2, 9]]);
        let result = validator.validate(&sol);
        assert!(matches!(result, Err(TilingError::DecodeInvariant(_))));
    }

    #[test]
    fn test_ragged_matrix_detected() {
        let instance = checkerboard_instance();
        let validator = SolutionValidator::new(&instance);

        let sol = TilingSolution {
            grid_size: 2,
            tiles: vec![vec![1, 2], vec![2]],
        };
        let result = validator.validate(&sol);
        assert!(matches!(result, Err(TilingError::DecodeInvariant(_))));
    }

    #[test]
    fn test_single_cell_grid_is_trivially_valid() {
        let instance = checkerboard_instance();
        let validator = SolutionValidator::new(&instance);
        assert!(validator.validate(&solution(vec![vec![2]])).is_ok());
    }
}
