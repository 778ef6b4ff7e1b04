//! Uniqueness proofs.
//!
//! A system is unique when the solver finds one model and then proves that
//! the system conjoined with "differs from that model" is unsatisfiable.
//! Verification keeps no state between calls: after the system changes the
//! whole check is simply run again.

use crate::result::{Error, Result};
use crate::solver::{Cancellation, Outcome, Solver};
use armor_core::{ConstraintSystem, Secret};
use tracing::debug;

/// Result of a uniqueness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The only satisfying assignment.
    Unique(Vec<u8>),
    /// Two distinct satisfying assignments.
    NotUnique { first: Vec<u8>, second: Vec<u8> },
}

impl Verdict {
    pub fn is_unique(&self) -> bool {
        matches!(self, Self::Unique(_))
    }

    /// A satisfying assignment other than `reference`, if one was found.
    pub fn counterexample(&self, reference: &[u8]) -> Option<&[u8]> {
        match self {
            Self::Unique(_) => None,
            Self::NotUnique { first, second } => {
                if first.as_slice() != reference {
                    Some(first)
                } else {
                    Some(second)
                }
            }
        }
    }
}

/// Proves or refutes that a constraint system has a single solution.
pub struct UniquenessVerifier<'a> {
    solver: &'a dyn Solver,
    cancel: Cancellation,
}

impl<'a> UniquenessVerifier<'a> {
    pub fn new(solver: &'a dyn Solver) -> Self {
        Self {
            solver,
            cancel: Cancellation::default(),
        }
    }

    /// Checks `cancel` before every solver query.
    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    /// Checks uniqueness without knowing the intended solution.
    pub fn verify(&self, system: &ConstraintSystem) -> Result<Verdict> {
        self.cancel.check("verification")?;
        let first = match self.solver.solve(system)? {
            Outcome::Model(model) => model,
            Outcome::Unsat => {
                return Err(Error::SolverInternal(
                    "constraint system is unsatisfiable".to_string(),
                ))
            }
        };
        self.check_model(system, &first)?;
        self.exclude(system, first)
    }

    /// Checks uniqueness of a system generated from `secret`.
    ///
    /// The secret must satisfy every relation; a violation means relation
    /// evaluation is broken and is reported as [`Error::SolverInternal`].
    pub fn verify_against(&self, system: &ConstraintSystem, secret: &Secret) -> Result<Verdict> {
        if system.size() != secret.len() {
            return Err(Error::DomainMismatch {
                expected: system.size(),
                actual: secret.len(),
            });
        }
        if let Some(index) = system.first_violation(secret.as_bytes()) {
            return Err(Error::SolverInternal(format!(
                "secret violates its own relation #{index}: {}",
                system.relations()[index]
            )));
        }

        self.cancel.check("verification")?;
        let first = match self.solver.solve(system)? {
            Outcome::Model(model) => model,
            Outcome::Unsat => {
                return Err(Error::SolverInternal(format!(
                    "{} reported unsat for a system the secret satisfies",
                    self.solver.name()
                )))
            }
        };
        self.check_model(system, &first)?;

        if first.as_slice() != secret.as_bytes() {
            debug!("first model already differs from the secret");
            return Ok(Verdict::NotUnique {
                first: secret.as_bytes().to_vec(),
                second: first,
            });
        }
        self.exclude(system, first)
    }

    fn exclude(&self, system: &ConstraintSystem, first: Vec<u8>) -> Result<Verdict> {
        self.cancel.check("verification")?;
        match self.solver.solve_with_exclusion(system, &[&first])? {
            Outcome::Unsat => {
                debug!(relations = system.len(), "system is unique");
                Ok(Verdict::Unique(first))
            }
            Outcome::Model(second) => {
                self.check_model(system, &second)?;
                if second == first {
                    return Err(Error::SolverInternal(format!(
                        "{} returned an excluded model",
                        self.solver.name()
                    )));
                }
                debug!(relations = system.len(), "system has another solution");
                Ok(Verdict::NotUnique { first, second })
            }
        }
    }

    fn check_model(&self, system: &ConstraintSystem, model: &[u8]) -> Result<()> {
        match system.first_violation(model) {
            None => Ok(()),
            Some(index) => Err(Error::SolverInternal(format!(
                "{} returned a model violating relation #{index}",
                self.solver.name()
            ))),
        }
    }
}

/// Collects up to `limit` distinct solutions by excluding each model found.
pub fn enumerate_solutions(
    solver: &dyn Solver,
    system: &ConstraintSystem,
    limit: usize,
) -> Result<Vec<Vec<u8>>> {
    let mut found: Vec<Vec<u8>> = Vec::new();
    while found.len() < limit {
        let excluded: Vec<&[u8]> = found.iter().map(Vec::as_slice).collect();
        match solver.solve_with_exclusion(system, &excluded)? {
            Outcome::Model(model) => found.push(model),
            Outcome::Unsat => break,
        }
    }
    Ok(found)
}
