//! Population of candidate schedules and the generation step.

use crate::ga::candidate::Candidate;
use crate::ga::crossover::crossover;
use crate::ga::fitness;
use crate::ga::mutation::mutate;
use crate::store::{SolutionId, Store};
use rand::Rng;
use rayon::prelude::*;
use std::collections::HashSet;

/// Tunables for the genetic search.
#[derive(Debug, Clone, Copy)]
pub struct GaConfig {
    /// Candidates kept after each generation.
    pub population_size: usize,
    /// Random index swaps per mutation.
    pub mutation_swaps: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            mutation_swaps: 3,
            seed: 42,
        }
    }
}

/// Fixed-size set of candidate schedules, best first.
#[derive(Debug)]
pub struct Population {
    candidates: Vec<Candidate>,
    config: GaConfig,
}

impl Population {
    /// Start from a single empty schedule.
    #[must_use]
    pub fn new(config: GaConfig) -> Self {
        Self {
            candidates: vec![Candidate::new()],
            config,
        }
    }

    /// The configured tunables.
    #[must_use]
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// The best-ranked schedule, walked by the scheduling pass.
    #[must_use]
    pub fn active(&self) -> &[SolutionId] {
        self.candidates[0].order()
    }

    /// Number of candidates currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the population holds no candidates. Never true: the
    /// generation step keeps at least one schedule alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Append a newly arrived solution to every candidate.
    pub fn admit(&mut self, id: SolutionId) {
        for candidate in &mut self.candidates {
            candidate.push(id);
        }
    }

    /// Run one generation: build a pool by cleaning, mutating, and
    /// crossing every candidate, score it, and keep the best
    /// `population_size` distinct schedules.
    pub fn evolve<R: Rng>(&mut self, store: &Store, rng: &mut R) {
        let mut pool: Vec<Candidate> = Vec::with_capacity(self.candidates.len() * 3);
        for candidate in &self.candidates {
            let base = candidate.cleaned(store);
            let mut mutant = base.clone();
            mutate(mutant.order_mut(), self.config.mutation_swaps, rng);
            if self.candidates.len() > 1 {
                let partner = &self.candidates[rng.gen_range(0..self.candidates.len())];
                pool.push(Candidate::from_order(crossover(
                    base.order(),
                    partner.cleaned(store).order(),
                    rng,
                )));
            }
            pool.push(mutant);
            pool.push(base);
        }

        let mut scored: Vec<(f64, Candidate)> = pool
            .into_par_iter()
            .map(|candidate| (fitness::score(candidate.order(), store), candidate))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut seen = HashSet::with_capacity(scored.len());
        let mut next = Vec::with_capacity(self.config.population_size);
        for (_, candidate) in scored {
            if next.len() == self.config.population_size {
                break;
            }
            if seen.insert(candidate.ident_hash()) {
                next.push(candidate);
            }
        }
        if next.is_empty() {
            next.push(Candidate::new());
        }
        self.candidates = next;
    }
}
