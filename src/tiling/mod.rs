//! Tiling problem, solution decoding and validation

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::{TilingOutcome, TilingProblem};
pub use solution::{decode_solution, TilingSolution};
pub use validator::SolutionValidator;
