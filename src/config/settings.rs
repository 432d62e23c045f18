//! Configuration settings for the square tiling solver

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub grid: GridConfig,
    pub input: InputConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Side length of the square grid to tile.
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub instance_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Path to the external SAT solver binary (Glucose-compatible).
    pub binary: PathBuf,
    /// Optional wall-clock bound for the solver subprocess. No bound by
    /// default; the solver runs to completion.
    pub timeout_seconds: Option<u64>,
    /// Parse and print solver statistics from the captured output.
    pub print_stats: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where the DIMACS formula is written before invoking the solver.
    pub cnf_file: PathBuf,
    /// Echo the DIMACS text to stdout after writing it.
    pub print_dimacs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: GridConfig { size: 4 },
            input: InputConfig {
                instance_file: PathBuf::from("input/instances/checkerboard.txt"),
            },
            solver: SolverConfig {
                binary: PathBuf::from("./glucose-syrup"),
                timeout_seconds: None,
                print_stats: false,
            },
            output: OutputConfig {
                cnf_file: PathBuf::from("output.cnf"),
                print_dimacs: false,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.grid.size == 0 {
            anyhow::bail!("Grid size must be positive");
        }

        if let Some(0) = self.solver.timeout_seconds {
            anyhow::bail!("Solver timeout must be positive when set");
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(size) = cli_overrides.size {
            self.grid.size = size;
        }
        if let Some(ref instance_file) = cli_overrides.instance_file {
            self.input.instance_file = instance_file.clone();
        }
        if let Some(ref binary) = cli_overrides.solver_binary {
            self.solver.binary = binary.clone();
        }
        if let Some(ref cnf_file) = cli_overrides.cnf_file {
            self.output.cnf_file = cnf_file.clone();
        }
        if let Some(timeout) = cli_overrides.timeout_seconds {
            self.solver.timeout_seconds = Some(timeout);
        }
        if cli_overrides.print_dimacs {
            self.output.print_dimacs = true;
        }
        if cli_overrides.solver_stats {
            self.solver.print_stats = true;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub size: Option<usize>,
    pub instance_file: Option<PathBuf>,
    pub solver_binary: Option<PathBuf>,
    pub cnf_file: Option<PathBuf>,
    pub timeout_seconds: Option<u64>,
    pub print_dimacs: bool,
    pub solver_stats: bool,
}
