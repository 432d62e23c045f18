//! Error taxonomy for the tiling pipeline

use thiserror::Error;

/// Errors that can abort a tiling run.
///
/// UNSAT is not an error; it is a regular pipeline outcome. Every variant
/// here maps to its own process exit code so callers and scripts can tell
/// the failure categories apart (and apart from the solver's exit code 20
/// for UNSAT).
#[derive(Debug, Error)]
pub enum TilingError {
    /// Malformed instance text, or fewer than two tile types.
    #[error("invalid instance: {0}")]
    InstanceFormat(String),

    /// Internal inconsistency detected while generating variables or clauses.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Solver binary missing, not executable, or exited outside {10, 20}.
    #[error("solver invocation failed: {0}")]
    SolverInvocation(String),

    /// Solver reported SAT but its output carried no parsable value line.
    #[error("solver protocol error: {0}")]
    SolverProtocol(String),

    /// A decoded cell has zero or more than one true tile variable, or the
    /// decoded grid violates an adjacency. Indicates an encoder or solver
    /// defect; always fatal.
    #[error("decode invariant violated: {0}")]
    DecodeInvariant(String),

    /// The opt-in wall-clock bound expired and the solver was killed.
    #[error("solver timed out after {seconds}s")]
    SolverTimeout { seconds: u64 },

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl TilingError {
    /// Process exit code for this error category. Distinct per category and
    /// never 20, which is reserved for the UNSAT passthrough.
    pub fn exit_code(&self) -> u8 {
        match self {
            TilingError::InstanceFormat(_) => 2,
            TilingError::Encoding(_) => 3,
            TilingError::SolverInvocation(_) => 4,
            TilingError::SolverProtocol(_) => 5,
            TilingError::DecodeInvariant(_) => 6,
            TilingError::SolverTimeout { .. } => 7,
            TilingError::Io { .. } => 1,
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        TilingError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TilingError>;
