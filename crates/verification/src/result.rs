//! Verification results and error types

use thiserror::Error;

/// Main error type for verification operations
#[derive(Error, Debug)]
pub enum Error {
    /// The requested solver backend was not compiled in.
    #[error("solver backend '{0}' is not available in this build")]
    BackendUnavailable(&'static str),
    /// A solver call hit its deadline and was abandoned.
    #[error("solver call cancelled: {0}")]
    Cancelled(String),
    #[error(transparent)]
    Core(#[from] armor_core::Error),
    /// An excluded model does not match the system's domain.
    #[error("model has {actual} bytes but the system has {expected} variables")]
    DomainMismatch { expected: usize, actual: usize },
    /// An invariant of the generated system does not hold, or the solver
    /// answered something other than sat/unsat.
    #[error("solver internal error: {0}")]
    SolverInternal(String),
}

/// Result type for verification operations
pub type Result<T> = std::result::Result<T, Error>;
