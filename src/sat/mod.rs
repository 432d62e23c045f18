//! SAT encoding and external solver components

pub mod constraints;
pub mod dimacs;
pub mod solver;
pub mod variables;

pub use constraints::{Clause, ClauseGenerator, ClauseStatistics};
pub use dimacs::CnfFormula;
pub use solver::{SatSolver, SolverStats, SolverVerdict};
pub use variables::VariableIndexer;
