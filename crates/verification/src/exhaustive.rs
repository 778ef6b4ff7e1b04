//! Brute-force reference solver for tiny domains.

use crate::result::{Error, Result};
use crate::solver::{check_exclusions, Outcome, Solver};
use armor_core::ConstraintSystem;

/// Largest domain the enumerator accepts (256^2 assignments).
pub const EXHAUSTIVE_MAX_VARIABLES: usize = 2;

/// Walks every assignment in lexicographic order.
///
/// Only meant for cross-checking the real backends on one- and two-byte
/// systems.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveSolver;

impl ExhaustiveSolver {
    /// Every satisfying assignment, in lexicographic order.
    pub fn all_solutions(&self, system: &ConstraintSystem) -> Result<Vec<Vec<u8>>> {
        let size = system.size();
        if size > EXHAUSTIVE_MAX_VARIABLES {
            return Err(Error::SolverInternal(format!(
                "exhaustive search supports at most {EXHAUSTIVE_MAX_VARIABLES} variables, \
                 got {size}"
            )));
        }

        let total = 1usize << (8 * size);
        let solutions = (0..total)
            .map(|counter| {
                (0..size)
                    .rev()
                    .map(|position| (counter >> (8 * position)) as u8)
                    .collect::<Vec<u8>>()
            })
            .filter(|assignment| system.holds(assignment))
            .collect();
        Ok(solutions)
    }
}

impl Solver for ExhaustiveSolver {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn solve_with_exclusion(
        &self,
        system: &ConstraintSystem,
        excluded: &[&[u8]],
    ) -> Result<Outcome> {
        check_exclusions(system, excluded)?;
        let found = self
            .all_solutions(system)?
            .into_iter()
            .find(|model| !excluded.contains(&model.as_slice()));
        Ok(found.map_or(Outcome::Unsat, Outcome::Model))
    }
}
