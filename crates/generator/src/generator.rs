//! The relation-accumulation loop.

use crate::reduce::reduce;
use crate::sampler::{IndexSampler, ReusePolicy};
use crate::{Error, Result};
use armor_core::{ConstraintSystem, Relation, RelationKind, Secret, MAX_ARITY};
use armor_verification::{Cancellation, Solver, UniquenessVerifier, Verdict};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Limits and policies for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Relations accumulated before uniqueness is first checked.
    pub min_relations: usize,
    /// Upper bound on accepted relations; `None` scales with the secret.
    pub max_relations: Option<usize>,
    /// Consecutive rejected candidates tolerated before giving up.
    pub max_draws_per_relation: usize,
    pub reuse_policy: ReusePolicy,
    /// Drop relations that are not needed once the system is unique.
    pub reduce: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_relations: 1,
            max_relations: None,
            max_draws_per_relation: 256,
            reuse_policy: ReusePolicy::default(),
            reduce: true,
        }
    }
}

impl GeneratorConfig {
    /// Effective relation limit for a secret of `size` bytes.
    pub fn relation_limit(&self, size: usize) -> usize {
        self.max_relations.unwrap_or(4 * size + 32)
    }
}

/// Counters collected while generating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Candidates drawn, accepted or not.
    pub draws: usize,
    /// Candidates rejected as tautological, duplicate or non-reducing.
    pub rejected: usize,
    /// Uniqueness checks run, including during reduction.
    pub verifications: usize,
    /// Relations in the system when it first became unique.
    pub relations_generated: usize,
    /// Relations removed by the reduction pass.
    pub relations_removed: usize,
}

/// A finished, uniquely-solvable system.
#[derive(Debug, Clone)]
pub struct Generation {
    pub system: ConstraintSystem,
    pub stats: GenerationStats,
}

/// Grows a constraint system until the secret is its only solution.
pub struct ConstraintGenerator<'a> {
    config: &'a GeneratorConfig,
    verifier: UniquenessVerifier<'a>,
    cancel: Cancellation,
}

impl<'a> ConstraintGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig, solver: &'a dyn Solver) -> Self {
        Self {
            config,
            verifier: UniquenessVerifier::new(solver),
            cancel: Cancellation::default(),
        }
    }

    /// Stops generation with [`Error::Cancelled`] once `cancel` is raised.
    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.verifier = self.verifier.with_cancellation(cancel.clone());
        self.cancel = cancel;
        self
    }

    /// Runs the bounded generation loop.
    ///
    /// Every random choice is drawn from `rng`, so a seeded RNG and a given
    /// secret always produce the same system.
    pub fn generate<R: Rng + ?Sized>(&self, secret: &Secret, rng: &mut R) -> Result<Generation> {
        let size = secret.len();
        let limit = self.config.relation_limit(size);
        let warmup = self.config.min_relations.max(1);

        let mut system = ConstraintSystem::for_secret(secret);
        let mut sampler = IndexSampler::new(size, self.config.reuse_policy);
        let mut stats = GenerationStats::default();

        debug!(
            size,
            limit,
            policy = %self.config.reuse_policy,
            "starting generation"
        );

        loop {
            self.cancel.check("generation")?;
            let mut counterexample = None;
            if system.len() >= warmup {
                stats.verifications += 1;
                match self.verifier.verify_against(&system, secret)? {
                    Verdict::Unique(_) => break,
                    verdict => {
                        counterexample = verdict
                            .counterexample(secret.as_bytes())
                            .map(<[u8]>::to_vec);
                    }
                }
            }

            if system.len() >= limit {
                return Err(Error::GenerationExhausted {
                    relations: system.len(),
                    draws: stats.draws,
                });
            }

            let relation = self.draw(
                secret,
                rng,
                &sampler,
                &system,
                counterexample.as_deref(),
                &mut stats,
            )?;
            info!("accepted relation #{}: {}", system.len(), relation);
            sampler.record(relation.operands());
            system.push(relation)?;
        }

        stats.relations_generated = system.len();
        info!(
            relations = system.len(),
            draws = stats.draws,
            verifications = stats.verifications,
            "system is unique"
        );

        if self.config.reduce {
            let reduction = reduce(&mut system, &self.verifier, secret)?;
            stats.verifications += reduction.verifications;
            stats.relations_removed = reduction.removed;
        }

        if let Some(index) = system.first_violation(secret.as_bytes()) {
            return Err(Error::SolverInternal(format!(
                "relation #{index} does not hold on the secret: {}",
                system.relations()[index]
            )));
        }

        Ok(Generation { system, stats })
    }

    /// Draws candidates until one is acceptable.
    fn draw<R: Rng + ?Sized>(
        &self,
        secret: &Secret,
        rng: &mut R,
        sampler: &IndexSampler,
        system: &ConstraintSystem,
        counterexample: Option<&[u8]>,
        stats: &mut GenerationStats,
    ) -> Result<Relation> {
        let max_arity = MAX_ARITY.min(secret.len());
        let focus: Vec<usize> = counterexample
            .map(|model| {
                model
                    .iter()
                    .zip(secret.as_bytes())
                    .enumerate()
                    .filter(|(_, (a, b))| a != b)
                    .map(|(index, _)| index)
                    .collect()
            })
            .unwrap_or_default();

        for _ in 0..self.config.max_draws_per_relation {
            stats.draws += 1;
            let Some(kind) = RelationKind::random(rng, max_arity) else {
                break;
            };
            let Some(operands) = sampler.sample(rng, kind.arity(), &focus) else {
                stats.rejected += 1;
                continue;
            };
            let candidate = Relation::instantiate(kind, operands, secret.as_bytes())?;

            let reason = if candidate.is_tautological() {
                Some("tautological")
            } else if system.contains_equivalent(&candidate) {
                Some("duplicate")
            } else if counterexample.is_some_and(|model| candidate.holds(model)) {
                Some("does not exclude the counterexample")
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    stats.rejected += 1;
                    debug!("rejected {candidate}: {reason}");
                }
                None => return Ok(candidate),
            }
        }

        warn!(
            relations = system.len(),
            draws = self.config.max_draws_per_relation,
            "no acceptable relation found"
        );
        Err(Error::GenerationExhausted {
            relations: system.len(),
            draws: stats.draws,
        })
    }
}
