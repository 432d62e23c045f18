//! Main CLI application for the square tiling SAT solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use square_tiling::{
    config::{CliOverrides, Settings},
    instance::create_example_instances,
    error::TilingError,
    TilingOutcome, TilingProblem,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit code mandated by the solver convention when the instance is
/// unsatisfiable; all error categories use their own distinct codes.
const EXIT_UNSAT: u8 = 20;

/// Successful SAT run: decode and print succeeded.
const EXIT_SAT: u8 = 0;

#[derive(Parser)]
#[command(name = "square_tiling")]
#[command(about = "Square Tiling SAT Solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode an instance and run the external SAT solver
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Instance file (overrides config)
        #[arg(short, long)]
        instance: Option<PathBuf>,

        /// Grid side length k (overrides config)
        #[arg(short = 'k', long)]
        size: Option<usize>,

        /// Solver binary path (overrides config)
        #[arg(long)]
        solver: Option<PathBuf>,

        /// CNF output path (overrides config)
        #[arg(long)]
        cnf_out: Option<PathBuf>,

        /// Wall-clock solver timeout in seconds (overrides config)
        #[arg(long)]
        timeout: Option<u64>,

        /// Echo the DIMACS formula after writing it
        #[arg(long)]
        print_dimacs: bool,

        /// Print solver statistics parsed from the solver output
        #[arg(long)]
        solver_stats: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write the DIMACS encoding and exit without invoking the solver
    Encode {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Instance file (overrides config)
        #[arg(short, long)]
        instance: Option<PathBuf>,

        /// Grid side length k (overrides config)
        #[arg(short = 'k', long)]
        size: Option<usize>,

        /// Where to write the DIMACS file (overrides config)
        #[arg(long)]
        cnf_out: Option<PathBuf>,

        /// Print the DIMACS text to stdout instead of writing a file
        #[arg(long)]
        print: bool,
    },

    /// Create example configuration and instance files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Solve {
            config,
            instance,
            size,
            solver,
            cnf_out,
            timeout,
            print_dimacs,
            solver_stats,
            verbose,
        } => {
            let overrides = CliOverrides {
                size,
                instance_file: instance,
                solver_binary: solver,
                cnf_file: cnf_out,
                timeout_seconds: timeout,
                print_dimacs,
                solver_stats,
            };
            solve_command(config, overrides, verbose)
        }
        Commands::Encode {
            config,
            instance,
            size,
            cnf_out,
            print,
        } => {
            let overrides = CliOverrides {
                size,
                instance_file: instance,
                cnf_file: cnf_out,
                print_dimacs: print,
                ..Default::default()
            };
            encode_command(config, overrides)
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            let code = error
                .downcast_ref::<TilingError>()
                .map(TilingError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn load_settings(config_path: &PathBuf, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

/// Run the solve pipeline and return the process exit code: `0` on SAT,
/// `20` on UNSAT (errors propagate and map to their own codes in `main`).
fn solve_command(config_path: PathBuf, overrides: CliOverrides, verbose: bool) -> Result<u8> {
    let settings = load_settings(&config_path, &overrides)?;

    let problem = TilingProblem::new(settings.clone())?;

    if verbose {
        println!("Configuration:");
        println!("  Grid size: {}", settings.grid.size);
        println!("  Instance: {}", settings.input.instance_file.display());
        println!("  Solver: {}", settings.solver.binary.display());
        println!("  CNF file: {}", settings.output.cnf_file.display());
        println!();
        print!("{}", problem.instance());
        print!("{}", problem.encoding_statistics()?);
        println!();
    }

    if settings.output.print_dimacs {
        print!("{}", problem.encode()?.to_dimacs_string());
    }

    match problem.run()? {
        TilingOutcome::Unsatisfiable => {
            println!("s UNSATISFIABLE");
            Ok(EXIT_UNSAT)
        }
        TilingOutcome::Satisfiable {
            solution,
            solver_stats,
        } => {
            if settings.solver.print_stats {
                print!("{}", solver_stats);
            }
            println!("s SATISFIABLE");
            println!("Model:");
            print!("{}", solution);
            Ok(EXIT_SAT)
        }
    }
}

fn encode_command(config_path: PathBuf, overrides: CliOverrides) -> Result<u8> {
    let settings = load_settings(&config_path, &overrides)?;
    let problem = TilingProblem::new(settings.clone())?;
    let formula = problem.encode()?;

    if settings.output.print_dimacs {
        print!("{}", formula.to_dimacs_string());
    } else {
        formula.write_to_file(&settings.output.cnf_file)?;
        println!("Wrote DIMACS to {}", settings.output.cnf_file.display());
    }

    Ok(EXIT_SAT)
}

fn setup_command(directory: PathBuf, force: bool) -> Result<u8> {
    let config_dir = directory.join("config");
    let instance_dir = directory.join("input/instances");

    for dir in [&config_dir, &instance_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_instances(&instance_dir).context("Failed to create example instances")?;
    println!("Created example instances in: {}", instance_dir.display());

    println!("\nNext steps:");
    println!("1. Place a Glucose-compatible solver binary at ./glucose-syrup");
    println!("2. Edit {} as needed", config_path.display());
    println!("3. Run: cargo run -- solve --config config/default.yaml");

    Ok(EXIT_SAT)
}
