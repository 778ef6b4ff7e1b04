//! In-process finite-domain solver.
//!
//! Each variable keeps a 256-bit domain. Relations are revised by
//! enumerating the product of their operands' domains whenever that product
//! is small enough. Shapes whose last operand follows from the others only
//! enumerate the leading operands and compute the last one, so binary
//! bijections cost one pass over a domain and ternary relations get full
//! arc consistency too. The search branches on the smallest open domain,
//! values ascending, so answers are deterministic for a given system.

use crate::result::{Error, Result};
use crate::solver::{check_exclusions, Outcome, Solver, SolverConfig};
use armor_core::{ConstraintSystem, Relation, MAX_ARITY};
use std::collections::VecDeque;
use std::time::Instant;
use tracing::debug;

/// Largest operand-domain product revised eagerly.
const REVISE_LIMIT: usize = 1 << 17;

/// Search nodes between two deadline checks.
const DEADLINE_CHECK_INTERVAL: u64 = 256;

/// Set of byte values a variable may still take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Domain([u64; 4]);

impl Domain {
    const FULL: Self = Self([u64::MAX; 4]);
    const EMPTY: Self = Self([0; 4]);

    fn single(value: u8) -> Self {
        let mut domain = Self::EMPTY;
        domain.insert(value);
        domain
    }

    fn insert(&mut self, value: u8) {
        self.0[usize::from(value >> 6)] |= 1 << (value & 63);
    }

    fn contains(&self, value: u8) -> bool {
        self.0[usize::from(value >> 6)] & (1 << (value & 63)) != 0
    }

    fn len(&self) -> usize {
        self.0.iter().map(|word| word.count_ones() as usize).sum()
    }

    fn is_empty(&self) -> bool {
        self.0.iter().all(|&word| word == 0)
    }

    fn intersection(&self, other: &Self) -> Self {
        let mut out = *self;
        for (word, mask) in out.0.iter_mut().zip(other.0) {
            *word &= mask;
        }
        out
    }

    fn singleton(&self) -> Option<u8> {
        let mut values = self.values();
        let first = values.next()?;
        values.next().is_none().then_some(first)
    }

    fn values(self) -> impl Iterator<Item = u8> {
        (0..=u8::MAX).filter(move |&value| self.contains(value))
    }
}

enum Revision {
    Unchanged,
    Narrowed(Vec<usize>),
    Wiped,
}

/// Finite-domain backtracking solver over byte variables.
#[derive(Debug, Clone, Default)]
pub struct SearchSolver {
    config: SolverConfig,
}

impl SearchSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Solver for SearchSolver {
    fn name(&self) -> &'static str {
        "search"
    }

    fn solve_with_exclusion(
        &self,
        system: &ConstraintSystem,
        excluded: &[&[u8]],
    ) -> Result<Outcome> {
        check_exclusions(system, excluded)?;

        let mut search = Search::new(system, excluded, &self.config);
        let model = search.run()?;
        debug!(
            relations = system.len(),
            excluded = excluded.len(),
            nodes = search.nodes,
            sat = model.is_some(),
            "search finished"
        );

        Ok(model.map_or(Outcome::Unsat, Outcome::Model))
    }
}

struct Search<'a> {
    system: &'a ConstraintSystem,
    excluded: &'a [&'a [u8]],
    /// Relations mentioning each variable.
    watches: Vec<Vec<usize>>,
    started: Instant,
    config: &'a SolverConfig,
    nodes: u64,
}

impl<'a> Search<'a> {
    fn new(
        system: &'a ConstraintSystem,
        excluded: &'a [&'a [u8]],
        config: &'a SolverConfig,
    ) -> Self {
        let mut watches = vec![Vec::new(); system.size()];
        for (index, relation) in system.relations().iter().enumerate() {
            for &var in relation.operands() {
                if watches[var].last() != Some(&index) {
                    watches[var].push(index);
                }
            }
        }
        Self {
            system,
            excluded,
            watches,
            started: Instant::now(),
            config,
            nodes: 0,
        }
    }

    fn run(&mut self) -> Result<Option<Vec<u8>>> {
        let mut domains = vec![Domain::FULL; self.system.size()];
        let everything = (0..self.system.len()).collect();
        if !self.propagate(&mut domains, everything)? {
            return Ok(None);
        }
        self.descend(domains)
    }

    fn descend(&mut self, domains: Vec<Domain>) -> Result<Option<Vec<u8>>> {
        self.tick()?;

        let branch = domains
            .iter()
            .enumerate()
            .filter(|(_, domain)| domain.len() > 1)
            .min_by_key(|(index, domain)| (domain.len(), *index))
            .map(|(index, _)| index);

        let Some(var) = branch else {
            return Ok(self.accept_leaf(&domains));
        };

        for value in domains[var].values() {
            let mut next = domains.clone();
            next[var] = Domain::single(value);
            if !self.propagate(&mut next, self.watches[var].clone())? {
                continue;
            }
            if let Some(model) = self.descend(next)? {
                return Ok(Some(model));
            }
        }
        Ok(None)
    }

    /// All domains are singletons: check relations the propagation skipped
    /// and the exclusions.
    fn accept_leaf(&self, domains: &[Domain]) -> Option<Vec<u8>> {
        let model: Vec<u8> = domains.iter().map(Domain::singleton).collect::<Option<_>>()?;
        let excluded = self.excluded.iter().any(|other| *other == model.as_slice());
        (self.system.holds(&model) && !excluded).then_some(model)
    }

    /// Runs revisions to a fixpoint. Returns false when a domain empties.
    fn propagate(&self, domains: &mut [Domain], seeds: Vec<usize>) -> Result<bool> {
        let relations = self.system.relations();
        let mut queued = vec![false; relations.len()];
        let mut queue = VecDeque::with_capacity(seeds.len());
        for index in seeds {
            if !queued[index] {
                queued[index] = true;
                queue.push_back(index);
            }
        }

        while let Some(index) = queue.pop_front() {
            self.config.cancel.check("search")?;
            queued[index] = false;
            match revise(&relations[index], domains) {
                Revision::Unchanged => {}
                Revision::Wiped => return Ok(false),
                Revision::Narrowed(vars) => {
                    for var in vars {
                        for &other in &self.watches[var] {
                            if other != index && !queued[other] {
                                queued[other] = true;
                                queue.push_back(other);
                            }
                        }
                    }
                }
            }
        }
        Ok(true)
    }

    fn tick(&mut self) -> Result<()> {
        self.config.cancel.check("search")?;
        self.nodes += 1;
        if self.nodes % DEADLINE_CHECK_INTERVAL != 0 {
            return Ok(());
        }
        match self.config.timeout {
            Some(timeout) if self.started.elapsed() >= timeout => Err(Error::Cancelled(format!(
                "search exceeded {timeout:?} after {} nodes",
                self.nodes
            ))),
            _ => Ok(()),
        }
    }
}

/// Removes values without support in `relation` from its operands' domains.
fn revise(relation: &Relation, domains: &mut [Domain]) -> Revision {
    let operands = relation.operands();
    let arity = operands.len();
    if operands.iter().any(|&var| domains[var].is_empty()) {
        return Revision::Wiped;
    }

    let kind = relation.kind();
    let constant = relation.constant();
    let enumerated = if kind.determines_last() { arity - 1 } else { arity };
    let space: usize = operands[..enumerated]
        .iter()
        .map(|&var| domains[var].len())
        .product();
    if space > REVISE_LIMIT {
        return Revision::Unchanged;
    }

    let pools: Vec<Vec<u8>> = operands[..enumerated]
        .iter()
        .map(|&var| domains[var].values().collect())
        .collect();
    let last = domains[operands[arity - 1]];
    let mut supported = [Domain::EMPTY; MAX_ARITY];
    let mut cursor = [0usize; MAX_ARITY];
    let mut values = [0u8; MAX_ARITY];

    'tuples: loop {
        for (slot, (pool, &at)) in values.iter_mut().zip(pools.iter().zip(&cursor)) {
            *slot = pool[at];
        }
        let holds = if enumerated < arity {
            match kind.complete(&values[..enumerated], constant) {
                Some(value) if last.contains(value) => {
                    values[enumerated] = value;
                    true
                }
                _ => false,
            }
        } else {
            kind.evaluate(&values[..arity]) == Some(constant)
        };
        if holds {
            for (support, &value) in supported.iter_mut().zip(&values[..arity]) {
                support.insert(value);
            }
        }

        let mut position = 0;
        loop {
            if position == enumerated {
                break 'tuples;
            }
            cursor[position] += 1;
            if cursor[position] < pools[position].len() {
                break;
            }
            cursor[position] = 0;
            position += 1;
        }
    }

    let mut narrowed = Vec::new();
    for (support, &var) in supported.iter().zip(operands) {
        let before = domains[var];
        let after = before.intersection(support);
        if after.is_empty() {
            return Revision::Wiped;
        }
        if after != before {
            domains[var] = after;
            narrowed.push(var);
        }
    }

    if narrowed.is_empty() {
        Revision::Unchanged
    } else {
        Revision::Narrowed(narrowed)
    }
}
