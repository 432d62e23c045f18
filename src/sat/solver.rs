//! External SAT solver subprocess adapter

use crate::error::{Result, TilingError};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// Exit codes fixed by the SAT-competition convention the external binary
/// follows. Anything else is an invocation failure, not a verdict.
const EXIT_SATISFIABLE: i32 = 10;
const EXIT_UNSATISFIABLE: i32 = 20;

/// Flag asking the solver to print a model on SAT.
const MODEL_FLAG: &str = "-model";

/// Classified outcome of one solver invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverVerdict {
    /// The formula is satisfiable; carries the solver's full standard
    /// output, including the `v` value lines holding the model.
    Satisfiable { raw_output: String },
    Unsatisfiable,
}

/// Adapter around the external solver binary.
///
/// This is the only component aware that the solving capability happens to
/// be an OS process. The solver is invoked exactly once per run, blocking,
/// with its output fully drained while waiting so large models cannot
/// deadlock the pipe.
#[derive(Debug, Clone)]
pub struct SatSolver {
    binary: PathBuf,
    timeout: Option<Duration>,
}

impl SatSolver {
    pub fn new<P: Into<PathBuf>>(binary: P) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Opt into a wall-clock bound. On expiry the subprocess is killed and
    /// the run fails with a timeout error, distinct from UNSAT and from
    /// invocation failures.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run the solver against a fully written CNF file and classify the
    /// outcome by exit code.
    pub fn solve<P: AsRef<Path>>(&self, cnf_path: P) -> Result<SolverVerdict> {
        let cnf_path = cnf_path.as_ref();

        let mut command = Command::new(&self.binary);
        command
            .arg(MODEL_FLAG)
            .arg(cnf_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = command.spawn().map_err(|e| {
            TilingError::SolverInvocation(format!(
                "failed to start solver '{}': {}",
                self.binary.display(),
                e
            ))
        })?;

        let (status, stdout, stderr) = self.wait_and_drain(child)?;

        match status {
            Some(EXIT_SATISFIABLE) => Ok(SolverVerdict::Satisfiable { raw_output: stdout }),
            Some(EXIT_UNSATISFIABLE) => Ok(SolverVerdict::Unsatisfiable),
            Some(code) => Err(TilingError::SolverInvocation(format!(
                "solver '{}' exited with unexpected code {}: {}",
                self.binary.display(),
                code,
                summarize(&stderr)
            ))),
            None => Err(TilingError::SolverInvocation(format!(
                "solver '{}' was terminated by a signal: {}",
                self.binary.display(),
                summarize(&stderr)
            ))),
        }
    }

    /// Wait for the child while draining both output pipes on background
    /// threads. Returns the exit code (None if killed by a signal) plus the
    /// captured stdout and stderr.
    fn wait_and_drain(&self, mut child: Child) -> Result<(Option<i32>, String, String)> {
        let stdout_handle = spawn_drain(child.stdout.take());
        let stderr_handle = spawn_drain(child.stderr.take());

        let status = match self.timeout {
            None => child.wait().map_err(|e| {
                TilingError::SolverInvocation(format!("failed to wait for solver: {}", e))
            })?,
            Some(timeout) => {
                let deadline = Instant::now() + timeout;
                loop {
                    match child.try_wait() {
                        Ok(Some(status)) => break status,
                        Ok(None) => {
                            if Instant::now() >= deadline {
                                // Kill and reap before reporting the timeout
                                // so no zombie outlives the run.
                                let _ = child.kill();
                                let _ = child.wait();
                                let _ = stdout_handle.join();
                                let _ = stderr_handle.join();
                                return Err(TilingError::SolverTimeout {
                                    seconds: timeout.as_secs(),
                                });
                            }
                            std::thread::sleep(Duration::from_millis(10));
                        }
                        Err(e) => {
                            return Err(TilingError::SolverInvocation(format!(
                                "failed to poll solver: {}",
                                e
                            )));
                        }
                    }
                }
            }
        };

        let stdout = stdout_handle.join().unwrap_or_default();
        let stderr = stderr_handle.join().unwrap_or_default();
        Ok((status.code(), stdout, stderr))
    }
}

/// Drain a child pipe to a string on a background thread.
fn spawn_drain<R: Read + Send + 'static>(
    pipe: Option<R>,
) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buffer = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut buffer);
        }
        buffer
    })
}

fn summarize(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        "(no stderr)".to_string()
    } else {
        trimmed.lines().next().unwrap_or(trimmed).to_string()
    }
}

/// Best-effort statistics scraped from Glucose/MiniSat-style `c` comment
/// lines. Absent fields simply were not present in the output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverStats {
    pub restarts: Option<u64>,
    pub conflicts: Option<u64>,
    pub decisions: Option<u64>,
    pub propagations: Option<u64>,
    pub conflict_literals: Option<u64>,
    pub memory_mb: Option<f64>,
    pub cpu_seconds: Option<f64>,
}

impl SolverStats {
    /// Parse statistics from captured solver output.
    pub fn parse(output: &str) -> Self {
        let mut stats = SolverStats::default();

        for line in output.lines() {
            let line = line.trim().trim_start_matches("c ").trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };

            let key = key.trim().to_ascii_lowercase();
            // Values look like "123", "1,234 (56 /sec)" or "0.01 s".
            let Some(first) = value.split_whitespace().next() else {
                continue;
            };
            let number = first.replace(',', "");

            match key.as_str() {
                "restarts" => stats.restarts = number.parse().ok(),
                "conflicts" => stats.conflicts = number.parse().ok(),
                "decisions" => stats.decisions = number.parse().ok(),
                "propagations" => stats.propagations = number.parse().ok(),
                "conflict literals" => stats.conflict_literals = number.parse().ok(),
                "memory used" | "memory" => stats.memory_mb = number.parse().ok(),
                "cpu time" | "solving time" => stats.cpu_seconds = number.parse().ok(),
                _ => {}
            }
        }

        stats
    }

    pub fn is_empty(&self) -> bool {
        *self == SolverStats::default()
    }
}

impl std::fmt::Display for SolverStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return writeln!(f, "Solver statistics: (none found)");
        }

        writeln!(f, "Solver statistics:")?;
        if let Some(v) = self.restarts {
            writeln!(f, "  Restarts: {}", v)?;
        }
        if let Some(v) = self.conflicts {
            writeln!(f, "  Conflicts: {}", v)?;
        }
        if let Some(v) = self.decisions {
            writeln!(f, "  Decisions: {}", v)?;
        }
        if let Some(v) = self.propagations {
            writeln!(f, "  Propagations: {}", v)?;
        }
        if let Some(v) = self.conflict_literals {
            writeln!(f, "  Conflict literals: {}", v)?;
        }
        if let Some(v) = self.memory_mb {
            writeln!(f, "  Memory (MB): {}", v)?;
        }
        if let Some(v) = self.cpu_seconds {
            writeln!(f, "  CPU time (s): {}", v)?;
        }
        Ok(())
    }
}
