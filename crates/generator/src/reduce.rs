//! Removal of relations that uniqueness does not depend on.

use crate::Result;
use armor_core::{ConstraintSystem, Secret};
use armor_verification::UniquenessVerifier;
use tracing::{debug, info};

/// What a reduction pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reduction {
    pub removed: usize,
    pub verifications: usize,
}

/// Walks the relations in order and drops each one whose removal keeps
/// `secret` the only solution.
///
/// Removing a relation can only add solutions, so a relation kept once stays
/// necessary for the rest of the pass and the result is irreducible.
pub fn reduce(
    system: &mut ConstraintSystem,
    verifier: &UniquenessVerifier<'_>,
    secret: &Secret,
) -> Result<Reduction> {
    let before = system.len();
    let mut reduction = Reduction::default();
    let mut index = 0;

    while index < system.len() {
        let relation = system.remove(index);
        reduction.verifications += 1;
        if verifier.verify_against(system, secret)?.is_unique() {
            debug!("dropped redundant relation {relation}");
            reduction.removed += 1;
        } else {
            system.insert(index, relation);
            index += 1;
        }
    }

    info!("reduction: {} -> {} relations", before, system.len());
    Ok(reduction)
}
