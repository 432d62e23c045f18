//! DIMACS CNF formula representation and serialization

use super::constraints::Clause;
use crate::error::{Result, TilingError};
use std::io::Write;
use std::path::Path;

/// A CNF formula ready for serialization: the id ceiling for the header and
/// the ordered clause list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnfFormula {
    /// Highest variable id referenced by any clause. The DIMACS header
    /// reports this ceiling, not the count of distinct ids in use; solvers
    /// tolerate unreferenced ids below it.
    pub num_vars: i32,
    pub clauses: Vec<Clause>,
}

impl CnfFormula {
    /// Build a formula from generated clauses, deriving the id ceiling.
    pub fn from_clauses(clauses: Vec<Clause>) -> Result<Self> {
        let mut num_vars = 0;
        for clause in &clauses {
            if clause.is_empty() {
                return Err(TilingError::Encoding(
                    "generated an empty clause".to_string(),
                ));
            }
            for &literal in &clause.literals {
                if literal == 0 {
                    return Err(TilingError::Encoding(
                        "literal 0 collides with the clause terminator".to_string(),
                    ));
                }
                num_vars = num_vars.max(literal.abs());
            }
        }

        Ok(Self { num_vars, clauses })
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Serialize to DIMACS text: `p cnf <NUMV> <NUMC>` then one
    /// `0`-terminated line per clause. Byte-deterministic for a given
    /// formula since clause order is preserved.
    pub fn to_dimacs_string(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("p cnf {} {}\n", self.num_vars, self.clause_count()));

        for clause in &self.clauses {
            for &literal in &clause.literals {
                out.push_str(&literal.to_string());
                out.push(' ');
            }
            out.push_str("0\n");
        }

        out
    }

    /// Write the formula to `path`. The handle is flushed and closed before
    /// returning, so the solver never observes a partially written file.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut file = std::fs::File::create(path)
            .map_err(|e| TilingError::io(format!("failed to create {}", path.display()), e))?;

        file.write_all(self.to_dimacs_string().as_bytes())
            .map_err(|e| TilingError::io(format!("failed to write {}", path.display()), e))?;
        file.flush()
            .map_err(|e| TilingError::io(format!("failed to flush {}", path.display()), e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_header_reports_id_ceiling_not_distinct_count() {
        // Only ids 2 and 7 are referenced; the header must still say 7.
        let formula =
            CnfFormula::from_clauses(vec![Clause::binary(2, -7), Clause::unit(7)]).unwrap();

        assert_eq!(formula.num_vars, 7);
        assert_eq!(formula.clause_count(), 2);
        assert_eq!(formula.to_dimacs_string(), "p cnf 7 2\n2 -7 0\n7 0\n");
    }

    #[test]
    fn test_empty_clause_rejected() {
        let result = CnfFormula::from_clauses(vec![Clause::new(vec![])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_literal_rejected() {
        let result = CnfFormula::from_clauses(vec![Clause::new(vec![1, 0])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let make = || {
            CnfFormula::from_clauses(vec![
                Clause::new(vec![1, 2, 3]),
                Clause::binary(-1, -2),
                Clause::binary(-2, -3),
            ])
            .unwrap()
        };

        assert_eq!(make().to_dimacs_string(), make().to_dimacs_string());
    }

    #[test]
    fn test_write_to_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("formula.cnf");

        let formula = CnfFormula::from_clauses(vec![Clause::binary(1, -2)]).unwrap();
        formula.write_to_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "p cnf 2 1\n1 -2 0\n");
    }
}
