//! Operand index selection.

use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How strongly operand picks avoid bytes that are already constrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReusePolicy {
    /// Every byte equally likely.
    Uniform,
    /// Weight `max_count + 1 - count`, so the least used bytes are favoured
    /// while every byte stays reachable.
    #[default]
    Balanced,
    /// Only never-used bytes while enough remain, then [`Self::Balanced`].
    Fresh,
}

impl ReusePolicy {
    pub const ALL: [ReusePolicy; 3] = [Self::Uniform, Self::Balanced, Self::Fresh];

    pub fn name(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Balanced => "balanced",
            Self::Fresh => "fresh",
        }
    }
}

impl fmt::Display for ReusePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReusePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.name() == s)
            .ok_or_else(|| format!("unknown reuse policy '{s}'"))
    }
}

/// Picks distinct byte indices and tracks how often each one was used.
#[derive(Debug, Clone)]
pub struct IndexSampler {
    counts: Vec<u32>,
    policy: ReusePolicy,
}

impl IndexSampler {
    pub fn new(size: usize, policy: ReusePolicy) -> Self {
        Self {
            counts: vec![0; size],
            policy,
        }
    }

    /// Usage count per byte index.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Draws `amount` distinct indices, or `None` when the domain is smaller.
    ///
    /// With a non-empty `focus`, one of the picks is taken from it. The
    /// generator passes the bytes where the last counterexample differs from
    /// the secret, since only relations over those bytes can exclude it.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        amount: usize,
        focus: &[usize],
    ) -> Option<Vec<usize>> {
        if amount > self.counts.len() {
            return None;
        }
        let everything: Vec<usize> = (0..self.counts.len()).collect();
        if focus.is_empty() || amount == 0 {
            return Some(self.pick(rng, everything, amount));
        }

        let mut picks = self.pick(rng, focus.to_vec(), 1);
        let rest: Vec<usize> = everything
            .into_iter()
            .filter(|index| !picks.contains(index))
            .collect();
        picks.extend(self.pick(rng, rest, amount - 1));
        picks.shuffle(rng);
        Some(picks)
    }

    /// Counts one more use of each operand.
    pub fn record(&mut self, operands: &[usize]) {
        for &index in operands {
            self.counts[index] += 1;
        }
    }

    /// Draws `amount` distinct members of `pool` under the policy.
    fn pick<R: Rng + ?Sized>(&self, rng: &mut R, pool: Vec<usize>, amount: usize) -> Vec<usize> {
        match self.policy {
            ReusePolicy::Uniform => uniform(rng, &pool, amount),
            ReusePolicy::Balanced => self.balanced(rng, pool, amount),
            ReusePolicy::Fresh => {
                let unused: Vec<usize> = pool
                    .iter()
                    .copied()
                    .filter(|&i| self.counts[i] == 0)
                    .collect();
                if unused.len() >= amount {
                    uniform(rng, &unused, amount)
                } else {
                    self.balanced(rng, pool, amount)
                }
            }
        }
    }

    fn balanced<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        pool: Vec<usize>,
        amount: usize,
    ) -> Vec<usize> {
        let mut pool: Vec<(usize, u32)> = pool.into_iter().map(|i| (i, self.counts[i])).collect();
        let mut picks = Vec::with_capacity(amount);

        for _ in 0..amount {
            let ceiling = pool.iter().map(|&(_, count)| count).max().unwrap_or(0) + 1;
            let total: u32 = pool.iter().map(|&(_, count)| ceiling - count).sum();
            let mut roll = rng.random_range(0..total);
            let position = pool
                .iter()
                .position(|&(_, count)| {
                    let weight = ceiling - count;
                    if roll < weight {
                        true
                    } else {
                        roll -= weight;
                        false
                    }
                })
                .unwrap_or(pool.len() - 1);
            picks.push(pool.swap_remove(position).0);
        }
        picks
    }
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, pool: &[usize], amount: usize) -> Vec<usize> {
    index::sample(rng, pool.len(), amount)
        .into_iter()
        .map(|position| pool[position])
        .collect()
}
