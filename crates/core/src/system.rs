//! Constraint systems: relations over a fixed byte domain.

use crate::relation::Relation;
use crate::result::{Error, Result};
use crate::secret::Secret;
use serde::{Deserialize, Serialize};

/// An ordered list of relations over `size` byte variables.
///
/// Every relation's operands are checked against the domain when it is
/// added, including when a system is deserialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSystem")]
pub struct ConstraintSystem {
    size: usize,
    relations: Vec<Relation>,
}

#[derive(Deserialize)]
struct RawSystem {
    size: usize,
    relations: Vec<Relation>,
}

impl TryFrom<RawSystem> for ConstraintSystem {
    type Error = Error;

    fn try_from(raw: RawSystem) -> Result<Self> {
        let mut system = Self::new(raw.size);
        for relation in raw.relations {
            system.push(relation)?;
        }
        Ok(system)
    }
}

impl ConstraintSystem {
    /// An empty system over `size` variables.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            relations: Vec::new(),
        }
    }

    /// An empty system over the secret's bytes.
    pub fn for_secret(secret: &Secret) -> Self {
        Self::new(secret.len())
    }

    /// Number of byte variables in the domain.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Appends a relation after checking its operands against the domain.
    pub fn push(&mut self, relation: Relation) -> Result<()> {
        if let Some(&index) = relation.operands().iter().find(|&&i| i >= self.size) {
            return Err(Error::OperandOutOfRange {
                index,
                size: self.size,
            });
        }
        self.relations.push(relation);
        Ok(())
    }

    /// Removes and returns the relation at `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Relation {
        self.relations.remove(index)
    }

    /// Reinserts a relation previously taken out with [`Self::remove`].
    ///
    /// # Panics
    /// If `index > len`.
    pub fn insert(&mut self, index: usize, relation: Relation) {
        self.relations.insert(index, relation);
    }

    /// Whether a relation with the same canonical key is already present.
    pub fn contains_equivalent(&self, relation: &Relation) -> bool {
        let key = relation.canonical_key();
        self.relations.iter().any(|r| r.canonical_key() == key)
    }

    /// Whether `assignment` satisfies every relation.
    ///
    /// Assignments of the wrong length never satisfy the system.
    pub fn holds(&self, assignment: &[u8]) -> bool {
        assignment.len() == self.size && self.relations.iter().all(|r| r.holds(assignment))
    }

    /// Index of the first relation `assignment` violates, if any.
    pub fn first_violation(&self, assignment: &[u8]) -> Option<usize> {
        if assignment.len() != self.size {
            return Some(0);
        }
        self.relations.iter().position(|r| !r.holds(assignment))
    }

    /// How many relations mention each byte.
    pub fn usage_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.size];
        for &index in self.relations.iter().flat_map(Relation::operands) {
            counts[index] += 1;
        }
        counts
    }
}
