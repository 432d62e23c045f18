//! Configuration management for the square tiling solver

pub mod settings;

pub use settings::{
    CliOverrides, GridConfig, InputConfig, OutputConfig, Settings, SolverConfig,
};
