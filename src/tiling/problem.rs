//! Tiling problem definition and pipeline orchestration

use super::{decode_solution, SolutionValidator, TilingSolution};
use crate::config::Settings;
use crate::error::Result;
use crate::instance::{load_instance_from_file, Instance};
use crate::sat::{
    ClauseGenerator, ClauseStatistics, CnfFormula, SatSolver, SolverStats, SolverVerdict,
    VariableIndexer,
};
use std::time::Duration;

/// Terminal outcome of one run. UNSAT is a regular outcome, not an error;
/// every failure mode propagates as a [`TilingError`](crate::error::TilingError).
#[derive(Debug, Clone, PartialEq)]
pub enum TilingOutcome {
    Satisfiable {
        solution: TilingSolution,
        solver_stats: SolverStats,
    },
    Unsatisfiable,
}

/// One tiling run: the immutable context (settings and instance) and the
/// strictly sequential encode → write → solve → decode pipeline.
///
/// Each stage consumes its predecessor's output and produces a new immutable
/// value; nothing is retried and no state survives the run. The CNF file is
/// completely written and closed before the solver subprocess starts.
pub struct TilingProblem {
    settings: Settings,
    instance: Instance,
}

impl TilingProblem {
    /// Create a problem by loading the instance named in the settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let instance = load_instance_from_file(&settings.input.instance_file)?;
        Ok(Self { settings, instance })
    }

    /// Create a problem with an explicit instance (useful for testing).
    pub fn with_instance(settings: Settings, instance: Instance) -> Self {
        Self { settings, instance }
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn indexer(&self) -> Result<VariableIndexer> {
        VariableIndexer::new(self.settings.grid.size, self.instance.num_tiles())
    }

    /// Encode the instance into a CNF formula without invoking the solver.
    pub fn encode(&self) -> Result<CnfFormula> {
        let generator = ClauseGenerator::new(self.settings.grid.size, &self.instance)?;
        let clauses = generator.generate_all_clauses()?;
        CnfFormula::from_clauses(clauses)
    }

    /// Predicted per-family clause counts for reporting.
    pub fn encoding_statistics(&self) -> Result<ClauseStatistics> {
        let generator = ClauseGenerator::new(self.settings.grid.size, &self.instance)?;
        generator.statistics()
    }

    /// Run the full pipeline: encode, write the DIMACS file, invoke the
    /// solver once, and on SAT decode and independently validate the grid.
    pub fn run(&self) -> Result<TilingOutcome> {
        let formula = self.encode()?;
        formula.write_to_file(&self.settings.output.cnf_file)?;

        let mut solver = SatSolver::new(&self.settings.solver.binary);
        if let Some(seconds) = self.settings.solver.timeout_seconds {
            solver = solver.with_timeout(Duration::from_secs(seconds));
        }

        match solver.solve(&self.settings.output.cnf_file)? {
            SolverVerdict::Unsatisfiable => Ok(TilingOutcome::Unsatisfiable),
            SolverVerdict::Satisfiable { raw_output } => {
                let solver_stats = SolverStats::parse(&raw_output);
                let solution = decode_solution(&raw_output, &self.indexer()?)?;

                SolutionValidator::new(&self.instance).validate(&solution)?;

                Ok(TilingOutcome::Satisfiable {
                    solution,
                    solver_stats,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::parse_instance_from_str;
    use tempfile::TempDir;

    fn checkerboard_instance() -> Instance {
        parse_instance_from_str(
            "red green blue yellow\n<yellow,green,red,blue>\n<red,blue,yellow,green>\n",
        )
        .unwrap()
    }

    fn settings_in(dir: &TempDir, size: usize) -> Settings {
        let mut settings = Settings::default();
        settings.grid.size = size;
        settings.output.cnf_file = dir.path().join("output.cnf");
        settings
    }

    #[test]
    fn test_encode_writes_expected_header() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir, 2);
        let problem = TilingProblem::with_instance(settings, checkerboard_instance());

        let formula = problem.encode().unwrap();
        assert_eq!(formula.num_vars, 8);
        assert_eq!(formula.clause_count(), 16);
        assert!(formula.to_dimacs_string().starts_with("p cnf 8 16\n"));
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir, 3);
        let problem = TilingProblem::with_instance(settings, checkerboard_instance());

        let first = problem.encode().unwrap().to_dimacs_string();
        let second = problem.encode().unwrap().to_dimacs_string();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_instance_file_fails_construction() {
        let mut settings = Settings::default();
        settings.input.instance_file = "/nonexistent/instance.txt".into();
        assert!(TilingProblem::new(settings).is_err());
    }

    #[cfg(unix)]
    mod pipeline {
        use super::*;
        use crate::error::TilingError;
        use std::os::unix::fs::PermissionsExt;
        use std::path::PathBuf;

        /// Fake solver that ignores the formula and replays a canned
        /// checkerboard model for the 2x2, two-tile encoding.
        fn fake_solver(dir: &TempDir, script: &str) -> PathBuf {
            let path = dir.path().join("fake-solver");
            std::fs::write(&path, script).unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path
        }

        #[test]
        fn test_sat_run_decodes_and_validates() {
            let dir = TempDir::new().unwrap();
            let mut settings = settings_in(&dir, 2);
            settings.solver.binary = fake_solver(
                &dir,
                "#!/bin/sh\necho 's SATISFIABLE'\necho 'v 1 -2 -3 4 -5 6 7 -8 0'\nexit 10\n",
            );

            let problem = TilingProblem::with_instance(settings, checkerboard_instance());
            let outcome = problem.run().unwrap();

            match outcome {
                TilingOutcome::Satisfiable { solution, .. } => {
                    assert_eq!(solution.tiles, vec![vec![1, 2], vec![2, 1]]);
                }
                other => panic!("expected Satisfiable, got {:?}", other),
            }

            // The CNF file was written before the solver ran.
            let cnf = std::fs::read_to_string(dir.path().join("output.cnf")).unwrap();
            assert!(cnf.starts_with("p cnf 8 16\n"));
        }

        #[test]
        fn test_4x4_checkerboard_run() {
            // Build the alternating model for k=4: tile 1 where row+col is
            // even, tile 2 elsewhere.
            let indexer = crate::sat::VariableIndexer::new(4, 2).unwrap();
            let mut literals = Vec::new();
            for row in 1..=4 {
                for col in 1..=4 {
                    let chosen = if (row + col) % 2 == 0 { 1 } else { 2 };
                    for tile in 1..=2 {
                        let id = indexer.encode(row, col, tile).unwrap();
                        literals.push(if tile == chosen { id } else { -id });
                    }
                }
            }
            let value_line: Vec<String> = literals.iter().map(|l| l.to_string()).collect();
            let script = format!(
                "#!/bin/sh\necho 's SATISFIABLE'\necho 'v {} 0'\nexit 10\n",
                value_line.join(" ")
            );

            let dir = TempDir::new().unwrap();
            let mut settings = settings_in(&dir, 4);
            settings.solver.binary = fake_solver(&dir, &script);

            let problem = TilingProblem::with_instance(settings, checkerboard_instance());
            match problem.run().unwrap() {
                TilingOutcome::Satisfiable { solution, .. } => {
                    assert_eq!(
                        solution.tiles,
                        vec![
                            vec![1, 2, 1, 2],
                            vec![2, 1, 2, 1],
                            vec![1, 2, 1, 2],
                            vec![2, 1, 2, 1],
                        ]
                    );
                }
                other => panic!("expected Satisfiable, got {:?}", other),
            }
        }

        #[test]
        fn test_unsat_run() {
            let dir = TempDir::new().unwrap();
            let mut settings = settings_in(&dir, 2);
            settings.solver.binary = fake_solver(&dir, "#!/bin/sh\nexit 20\n");

            let problem = TilingProblem::with_instance(settings, checkerboard_instance());
            assert_eq!(problem.run().unwrap(), TilingOutcome::Unsatisfiable);
        }

        #[test]
        fn test_invalid_model_fails_validation() {
            // Model assigns tile 1 everywhere, which the adjacency rules of
            // the checkerboard instance forbid; decode succeeds but the
            // independent validator must reject it.
            let dir = TempDir::new().unwrap();
            let mut settings = settings_in(&dir, 2);
            settings.solver.binary = fake_solver(
                &dir,
                "#!/bin/sh\necho 'v 1 -2 3 -4 5 -6 7 -8 0'\nexit 10\n",
            );

            let problem = TilingProblem::with_instance(settings, checkerboard_instance());
            let result = problem.run();
            assert!(matches!(result, Err(TilingError::DecodeInvariant(_))));
        }

        #[test]
        fn test_sat_without_model_is_protocol_error() {
            let dir = TempDir::new().unwrap();
            let mut settings = settings_in(&dir, 2);
            settings.solver.binary =
                fake_solver(&dir, "#!/bin/sh\necho 's SATISFIABLE'\nexit 10\n");

            let problem = TilingProblem::with_instance(settings, checkerboard_instance());
            let result = problem.run();
            assert!(matches!(result, Err(TilingError::SolverProtocol(_))));
        }
    }
}
