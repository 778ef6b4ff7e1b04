//! The solver capability consumed by the verifier.

use crate::result::{Error, Result};
use armor_core::ConstraintSystem;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Answer to a satisfiability query over a byte domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Unsat,
    /// One satisfying assignment, one byte per variable.
    Model(Vec<u8>),
}

impl Outcome {
    pub fn is_sat(&self) -> bool {
        matches!(self, Self::Model(_))
    }

    pub fn into_model(self) -> Option<Vec<u8>> {
        match self {
            Self::Model(model) => Some(model),
            Self::Unsat => None,
        }
    }
}

/// A decision procedure for constraint systems over 8-bit variables.
///
/// Implementations must treat every variable as an unsigned byte with
/// wraparound arithmetic, never as an unbounded integer. Calls are
/// independent: no state is carried from one query to the next.
pub trait Solver {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Finds any assignment satisfying every relation.
    fn solve(&self, system: &ConstraintSystem) -> Result<Outcome> {
        self.solve_with_exclusion(system, &[])
    }

    /// Finds an assignment satisfying every relation that differs from each
    /// of the `excluded` models in at least one byte.
    fn solve_with_exclusion(
        &self,
        system: &ConstraintSystem,
        excluded: &[&[u8]],
    ) -> Result<Outcome>;
}

/// Shared stop flag for work running on another thread.
///
/// Clones observe the same flag. Raising it makes solvers and the verifier
/// return [`Error::Cancelled`] at their next check.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Fails with [`Error::Cancelled`] once the flag is raised.
    pub fn check(&self, during: &str) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled(format!("{during} was cancelled")))
        } else {
            Ok(())
        }
    }
}

/// Settings shared by every backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Per-call deadline. A call that exceeds it fails with
    /// [`Error::Cancelled`].
    pub timeout: Option<Duration>,
    /// Aborts a running call from another thread.
    #[serde(skip)]
    pub cancel: Cancellation,
}

impl SolverConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::default()
        }
    }

    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Selectable solver implementations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    /// In-process finite-domain search.
    #[default]
    Search,
    /// Z3 over 8-bit bit-vectors (requires the `z3` feature).
    Z3,
}

impl SolverBackend {
    pub fn build(self, config: SolverConfig) -> Result<Box<dyn Solver + Send + Sync>> {
        match self {
            Self::Search => Ok(Box::new(crate::search::SearchSolver::new(config))),
            #[cfg(feature = "z3")]
            Self::Z3 => Ok(Box::new(crate::smt::Z3Solver::new(config))),
            #[cfg(not(feature = "z3"))]
            Self::Z3 => Err(Error::BackendUnavailable("z3")),
        }
    }
}

/// Checks that every excluded model matches the domain size.
pub(crate) fn check_exclusions(system: &ConstraintSystem, excluded: &[&[u8]]) -> Result<()> {
    match excluded.iter().find(|model| model.len() != system.size()) {
        Some(model) => Err(Error::DomainMismatch {
            expected: system.size(),
            actual: model.len(),
        }),
        None => Ok(()),
    }
}
