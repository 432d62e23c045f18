//! Clause generation for the tiling SAT encoding

use super::VariableIndexer;
use crate::error::Result;
use crate::instance::Instance;
use itertools::Itertools;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self {
            literals: vec![literal],
        }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self {
            literals: vec![lit1, lit2],
        }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }
}

/// Generates the three clause families of the tiling encoding.
///
/// The at-most-one family uses the naive pairwise encoding: `O(T²)` clauses
/// per cell, `O(k²·T²)` total. Sequential or commander encodings would grow
/// slower in `T`, but the pairwise form needs no auxiliary variables and
/// keeps the variable indexer a pure bijection; the quadratic growth is an
/// accepted trade-off, not an oversight.
pub struct ClauseGenerator<'a> {
    indexer: VariableIndexer,
    instance: &'a Instance,
}

impl<'a> ClauseGenerator<'a> {
    /// Create a clause generator for a `k`×`k` grid over `instance`.
    pub fn new(grid_size: usize, instance: &'a Instance) -> Result<Self> {
        let indexer = VariableIndexer::new(grid_size, instance.num_tiles())?;

        Ok(Self { indexer, instance })
    }

    pub fn indexer(&self) -> &VariableIndexer {
        &self.indexer
    }

    /// Generate all clauses in a fixed, deterministic order: per cell
    /// (row-major) the at-least-one clause followed by its at-most-one
    /// pairs, then per cell (row-major) the right-neighbor and
    /// down-neighbor compatibility clauses.
    pub fn generate_all_clauses(&self) -> Result<Vec<Clause>> {
        let mut clauses = Vec::new();
        let grid_size = self.indexer.grid_size();

        for row in 1..=grid_size {
            for col in 1..=grid_size {
                self.generate_cell_clauses(row, col, &mut clauses)?;
            }
        }

        for row in 1..=grid_size {
            for col in 1..=grid_size {
                self.generate_adjacency_clauses(row, col, &mut clauses)?;
            }
        }

        Ok(clauses)
    }

    /// Exactly-one clauses for a single cell: one at-least-one clause over
    /// all tile variables, then one binary clause per unordered tile pair.
    fn generate_cell_clauses(
        &self,
        row: usize,
        col: usize,
        clauses: &mut Vec<Clause>,
    ) -> Result<()> {
        let num_tiles = self.instance.num_tiles();

        let mut at_least_one = Vec::with_capacity(num_tiles);
        for tile in 1..=num_tiles {
            at_least_one.push(self.indexer.encode(row, col, tile)?);
        }
        clauses.push(Clause::new(at_least_one));

        for (t1, t2) in (1..=num_tiles).tuple_combinations() {
            let var1 = self.indexer.encode(row, col, t1)?;
            let var2 = self.indexer.encode(row, col, t2)?;
            clauses.push(Clause::binary(-var1, -var2));
        }

        Ok(())
    }

    /// Edge-compatibility clauses for the cell's right and down neighbors.
    ///
    /// Each shared edge is considered exactly once, from the cell above or
    /// to the left of it; cells in the last row/column simply contribute no
    /// clauses for the missing direction. For every ordered tile pair whose
    /// touching colors disagree, the pair is forbidden.
    fn generate_adjacency_clauses(
        &self,
        row: usize,
        col: usize,
        clauses: &mut Vec<Clause>,
    ) -> Result<()> {
        let tiles = &self.instance.tiles;

        if col < self.indexer.grid_size() {
            for (ta, tile_a) in tiles.iter().enumerate() {
                for (tb, tile_b) in tiles.iter().enumerate() {
                    if tile_a.right() != tile_b.left() {
                        let var_a = self.indexer.encode(row, col, ta + 1)?;
                        let var_b = self.indexer.encode(row, col + 1, tb + 1)?;
                        clauses.push(Clause::binary(-var_a, -var_b));
                    }
                }
            }
        }

        if row < self.indexer.grid_size() {
            for (ta, tile_a) in tiles.iter().enumerate() {
                for (tb, tile_b) in tiles.iter().enumerate() {
                    if tile_a.bottom() != tile_b.top() {
                        let var_a = self.indexer.encode(row, col, ta + 1)?;
                        let var_b = self.indexer.encode(row + 1, col, tb + 1)?;
                        clauses.push(Clause::binary(-var_a, -var_b));
                    }
                }
            }
        }

        Ok(())
    }

    /// Per-family clause counts for reporting.
    pub fn statistics(&self) -> Result<ClauseStatistics> {
        let k = self.indexer.grid_size();
        let t = self.instance.num_tiles();
        let cells = k * k;

        let at_least_one = cells;
        let at_most_one = cells * t * (t - 1) / 2;

        let mut horizontal_mismatches = 0;
        let mut vertical_mismatches = 0;
        for tile_a in &self.instance.tiles {
            for tile_b in &self.instance.tiles {
                if tile_a.right() != tile_b.left() {
                    horizontal_mismatches += 1;
                }
                if tile_a.bottom() != tile_b.top() {
                    vertical_mismatches += 1;
                }
            }
        }
        let edges_per_direction = k * (k - 1);
        let adjacency =
            edges_per_direction * horizontal_mismatches + edges_per_direction * vertical_mismatches;

        Ok(ClauseStatistics {
            grid_size: k,
            num_tiles: t,
            variable_count: self.indexer.variable_count() as usize,
            at_least_one,
            at_most_one,
            adjacency,
        })
    }
}

/// Statistics about clause generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseStatistics {
    pub grid_size: usize,
    pub num_tiles: usize,
    pub variable_count: usize,
    pub at_least_one: usize,
    pub at_most_one: usize,
    pub adjacency: usize,
}

impl ClauseStatistics {
    pub fn total_clauses(&self) -> usize {
        self.at_least_one + self.at_most_one + self.adjacency
    }
}

impl std::fmt::Display for ClauseStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Encoding Statistics:")?;
        writeln!(f, "  Grid: {}x{}", self.grid_size, self.grid_size)?;
        writeln!(f, "  Tile types: {}", self.num_tiles)?;
        writeln!(f, "  Variables: {}", self.variable_count)?;
        writeln!(f, "  At-least-one clauses: {}", self.at_least_one)?;
        writeln!(f, "  At-most-one clauses: {}", self.at_most_one)?;
        writeln!(f, "  Adjacency clauses: {}", self.adjacency)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::parse_instance_from_str;

    /// Tiles compatible only with each other in both directions; solutions
    /// alternate tile indices like a checkerboard.
    fn checkerboard_instance() -> Instance {
        parse_instance_from_str(
            "red green blue yellow\n<yellow,green,red,blue>\n<red,blue,yellow,green>\n",
        )
        .unwrap()
    }

    /// No tile pair is horizontally compatible; unsatisfiable for k >= 2.
    fn incompatible_instance() -> Instance {
        parse_instance_from_str(
            "red green blue yellow\n<red,green,blue,yellow>\n<green,red,yellow,blue>\n",
        )
        .unwrap()
    }

    #[test]
    fn test_clause_creation() {
        let clause = Clause::new(vec![1, -2, 3]);
        assert_eq!(clause.literals, vec![1, -2, 3]);
        assert!(!clause.is_empty());
        assert!(!clause.is_unit());

        let unit_clause = Clause::unit(5);
        assert!(unit_clause.is_unit());
        assert_eq!(unit_clause.literals, vec![5]);
    }

    #[test]
    fn test_hand_counted_2x2_formula() {
        // k=2, T=2 with the checkerboard tiles:
        //   at-least-one: 4 cells -> 4 clauses
        //   at-most-one:  4 cells * C(2,2)=1 pair -> 4 clauses
        //   adjacency:    2 horizontal + 2 vertical edges, each forbidding
        //                 the 2 same-tile pairs -> 8 clauses
        let instance = checkerboard_instance();
        let generator = ClauseGenerator::new(2, &instance).unwrap();

        let clauses = generator.generate_all_clauses().unwrap();
        assert_eq!(clauses.len(), 16);

        let stats = generator.statistics().unwrap();
        assert_eq!(stats.at_least_one, 4);
        assert_eq!(stats.at_most_one, 4);
        assert_eq!(stats.adjacency, 8);
        assert_eq!(stats.total_clauses(), clauses.len());
        assert_eq!(stats.variable_count, 8);
    }

    #[test]
    fn test_statistics_match_generated_clauses() {
        for k in [1, 2, 3, 5] {
            let instance = checkerboard_instance();
            let generator = ClauseGenerator::new(k, &instance).unwrap();
            let clauses = generator.generate_all_clauses().unwrap();
            let stats = generator.statistics().unwrap();
            assert_eq!(clauses.len(), stats.total_clauses(), "k={}", k);
        }
    }

    #[test]
    fn test_exactly_one_families_per_cell() {
        let instance = checkerboard_instance();
        let generator = ClauseGenerator::new(2, &instance).unwrap();
        let indexer = *generator.indexer();
        let clauses = generator.generate_all_clauses().unwrap();

        for row in 1..=2 {
            for col in 1..=2 {
                let v1 = indexer.encode(row, col, 1).unwrap();
                let v2 = indexer.encode(row, col, 2).unwrap();

                // at-least-one over both tiles
                assert!(clauses.iter().any(|c| c.literals == vec![v1, v2]));
                // pairwise at-most-one
                assert!(clauses.iter().any(|c| c.literals == vec![-v1, -v2]));
            }
        }
    }

    #[test]
    fn test_adjacency_clauses_forbid_mismatches_once() {
        let instance = checkerboard_instance();
        let generator = ClauseGenerator::new(2, &instance).unwrap();
        let indexer = *generator.indexer();
        let clauses = generator.generate_all_clauses().unwrap();

        // Tile 1 next to tile 1 horizontally is a mismatch: forbidden from
        // the left cell only.
        let a = indexer.encode(1, 1, 1).unwrap();
        let b = indexer.encode(1, 2, 1).unwrap();
        let forbidden = Clause::binary(-a, -b);
        assert_eq!(clauses.iter().filter(|c| **c == forbidden).count(), 1);

        // Tile 1 next to tile 2 horizontally is compatible: no clause.
        let b2 = indexer.encode(1, 2, 2).unwrap();
        let compatible = Clause::binary(-a, -b2);
        assert!(!clauses.contains(&compatible));
    }

    #[test]
    fn test_fully_incompatible_instance_forbids_all_horizontal_pairs() {
        let instance = incompatible_instance();
        let generator = ClauseGenerator::new(2, &instance).unwrap();
        let indexer = *generator.indexer();
        let clauses = generator.generate_all_clauses().unwrap();

        // All 4 ordered tile pairs mismatch on every horizontal edge.
        for ta in 1..=2 {
            for tb in 1..=2 {
                let a = indexer.encode(1, 1, ta).unwrap();
                let b = indexer.encode(1, 2, tb).unwrap();
                assert!(clauses.contains(&Clause::binary(-a, -b)));
            }
        }
    }

    #[test]
    fn test_generator_geometry_comes_from_indexer() {
        // The indexer is the single source of grid geometry; statistics and
        // clause generation must agree with it for every size.
        for k in [1, 2, 4] {
            let instance = checkerboard_instance();
            let generator = ClauseGenerator::new(k, &instance).unwrap();

            assert_eq!(generator.indexer().grid_size(), k);

            let stats = generator.statistics().unwrap();
            assert_eq!(stats.grid_size, k);
            assert_eq!(
                stats.variable_count,
                generator.indexer().variable_count() as usize
            );
        }
    }

    #[test]
    fn test_single_cell_grid_has_no_adjacency_clauses() {
        let instance = checkerboard_instance();
        let generator = ClauseGenerator::new(1, &instance).unwrap();
        let stats = generator.statistics().unwrap();
        assert_eq!(stats.adjacency, 0);
        assert_eq!(stats.total_clauses(), 2); // one ALO + one AMO pair
    }
}
