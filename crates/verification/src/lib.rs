//! Uniqueness verification for constraint systems.
//!
//! A [`Solver`] answers satisfiability queries over byte-variable domains,
//! optionally excluding known models. [`UniquenessVerifier`] builds the
//! "exactly one solution" proof on top of that. Two backends ship in this
//! crate: the in-process [`SearchSolver`] and, behind the `z3` feature, the
//! SMT-backed `Z3Solver`. [`ExhaustiveSolver`] brute-forces tiny domains and
//! exists for cross-checking.

pub mod exhaustive;
pub mod result;
pub mod search;
#[cfg(feature = "z3")]
pub mod smt;
pub mod solver;
pub mod uniqueness;

pub use exhaustive::ExhaustiveSolver;
pub use result::{Error, Result};
pub use search::SearchSolver;
#[cfg(feature = "z3")]
pub use smt::Z3Solver;
pub use solver::{Cancellation, Outcome, Solver, SolverBackend, SolverConfig};
pub use uniqueness::{enumerate_solutions, UniquenessVerifier, Verdict};
