//! Square Tiling SAT Solver
//!
//! This library decides whether a k×k grid can be tiled with colored-edge
//! tile types so that adjacent cells agree on their shared edge color. The
//! instance is encoded as a CNF formula, handed to an external SAT solver
//! subprocess, and the solver's model is decoded back into a validated grid.

pub mod config;
pub mod error;
pub mod instance;
pub mod sat;
pub mod tiling;

pub use config::Settings;
pub use error::{Result, TilingError};
pub use instance::Instance;
pub use tiling::{TilingOutcome, TilingProblem, TilingSolution};

/// Main entry point: load the instance named in the settings and run the
/// full encode → solve → decode pipeline once.
///
/// # Examples
///
/// ```no_run
/// use square_tiling::{solve_tiling, Settings, TilingOutcome};
///
/// let mut settings = Settings::default();
/// settings.grid.size = 4;
/// settings.input.instance_file = "input/instances/checkerboard.txt".into();
///
/// match solve_tiling(settings)? {
///     TilingOutcome::Satisfiable { solution, .. } => print!("{}", solution),
///     TilingOutcome::Unsatisfiable => println!("s UNSATISFIABLE"),
/// }
/// # Ok::<(), square_tiling::TilingError>(())
/// ```
pub fn solve_tiling(settings: Settings) -> Result<TilingOutcome> {
    let problem = TilingProblem::new(settings)?;
    problem.run()
}
