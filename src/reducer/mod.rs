//! Orchestrates the genetic loop that shrinks one source vertex's chain.

mod caches;

pub(crate) use caches::ReducerCaches;

use std::collections::HashSet;

use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{
    Chain, VId,
    config::ReducerConfig,
    error::{ReducerError, Result},
    individual::CscIndividual,
    view::EmbeddingView,
};

/// Shrinks `source_vertex`'s chain against a snapshot of the global
/// embedding via an evolutionary local search.
///
/// Construct one instance per source vertex being optimized; it borrows the
/// supplied [`EmbeddingView`] for its entire lifetime and never mutates it.
#[derive(Debug)]
pub struct EvolutionaryCscReducer<'v, V: EmbeddingView> {
    view: &'v V,
    source_vertex: VId,
    config: ReducerConfig,
    seed_chain: Chain,
    best_chain: Chain,
    best_fitness: usize,
    expansion_possible: bool,
    caches: ReducerCaches,
    population_a: Vec<CscIndividual>,
    population_b: Vec<CscIndividual>,
    tournament_rng: SmallRng,
}

impl<'v, V: EmbeddingView> EvolutionaryCscReducer<'v, V> {
    /// Builds a reducer for `source_vertex` against `view`, seeding both
    /// populations from its current chain.
    ///
    /// # Errors
    /// Returns [`ReducerError::EmbeddingViewInconsistency`] if `view` reports
    /// no mapping for `source_vertex` at all: callers must guarantee the
    /// source vertex is already embedded.
    #[tracing::instrument(
        name = "csc_reducer.new",
        skip(view, config),
        fields(source_vertex = source_vertex, population_size = config.population_size()),
    )]
    pub fn new(view: &'v V, source_vertex: VId, config: ReducerConfig) -> Result<Self> {
        let seed_chain: Chain = view.mapping(source_vertex).into_iter().collect();
        if seed_chain.is_empty() {
            return Err(ReducerError::EmbeddingViewInconsistency { source_vertex });
        }

        let mut adjacent_source_set = HashSet::new();
        view.iterate_source_adjacent(source_vertex, &mut |s| {
            if !view.mapping(s).is_empty() {
                adjacent_source_set.insert(s);
            }
        });

        let mut caches = ReducerCaches::new(adjacent_source_set);
        let expansion_possible = can_expand(&seed_chain, view);
        let best_fitness = caches.fitness_of(&seed_chain, view);

        let population_size = config.population_size();
        let rng_seed = config.rng_seed();
        let mut population_a = Vec::with_capacity(population_size);
        let mut population_b = Vec::with_capacity(population_size);

        if expansion_possible {
            for &t in &seed_chain {
                caches.prepare_vertex(t, view);
            }
            for slot in 0..population_size {
                let mut individual = CscIndividual::new(source_vertex, rng_seed ^ slot_salt(slot));
                individual.from_initial(&seed_chain, &mut caches, view);
                population_a.push(individual);
                population_b.push(CscIndividual::new(
                    source_vertex,
                    rng_seed ^ slot_salt(population_size + slot),
                ));
            }
        }

        tracing::debug!(
            source_vertex,
            seed_chain_len = seed_chain.len(),
            expansion_possible,
            "constructed CSC reducer"
        );

        Ok(Self {
            view,
            source_vertex,
            config,
            best_chain: seed_chain.clone(),
            seed_chain,
            best_fitness,
            expansion_possible,
            caches,
            population_a,
            population_b,
            tournament_rng: SmallRng::seed_from_u64(rng_seed ^ TOURNAMENT_RNG_SALT),
        })
    }

    /// Runs the full evolutionary search. A no-op if construction determined
    /// no expansion is possible.
    #[tracing::instrument(
        name = "csc_reducer.optimize",
        skip(self),
        fields(source_vertex = self.source_vertex, seed_chain_len = self.seed_chain.len()),
    )]
    pub fn optimize(&mut self) {
        if !self.expansion_possible {
            tracing::debug!("no expansion possible, optimize is a no-op");
            return;
        }

        let iteration_limit = self.config.iteration_limit();
        for i in 0..iteration_limit {
            optimize_iteration(
                &mut self.population_a,
                &mut self.caches,
                self.view,
                &self.config,
                &mut self.best_chain,
                &mut self.best_fitness,
            );
            emit_generation_metrics(i, self.best_fitness);

            if i + 1 == iteration_limit {
                break;
            }

            let grown = create_next_generation(
                &self.population_a,
                &mut self.population_b,
                &mut self.caches,
                self.view,
                &self.config,
                &mut self.tournament_rng,
            );
            if !grown {
                tracing::debug!(generation = i, "crossover budget exhausted, stopping early");
                emit_crossover_failure_metric();
                break;
            }
            std::mem::swap(&mut self.population_a, &mut self.population_b);
        }
    }

    /// The best chain found so far (the seed chain if no improvement occurred).
    #[must_use]
    pub fn best_chain(&self) -> &Chain {
        &self.best_chain
    }

    /// Fitness of [`Self::best_chain`].
    #[must_use]
    pub fn best_fitness(&self) -> usize {
        self.best_fitness
    }

    /// True iff `best_chain` differs from the seed chain.
    #[must_use]
    pub fn improved(&self) -> bool {
        self.best_chain != self.seed_chain
    }
}

const TOURNAMENT_RNG_SALT: u64 = 0xC5C_7E0D_0000_0001;

/// Derives a distinct per-slot RNG seed offset so population individuals do
/// not share identical random streams.
fn slot_salt(slot: usize) -> u64 {
    let slot = u64::try_from(slot).unwrap_or(u64::MAX);
    slot.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(1)
}

fn can_expand(chain: &Chain, view: &impl EmbeddingView) -> bool {
    let remaining = view.remaining_targets();
    chain
        .iter()
        .any(|&t| view.target_neighbours(t).iter().any(|n| remaining.contains(n)))
}

/// Evaluates every individual, sorts ascending, and adopts the winner as the
/// new best chain if it strictly improves on `(best_fitness, best_chain.len())`.
fn optimize_iteration(
    pop: &mut Vec<CscIndividual>,
    caches: &mut ReducerCaches,
    view: &impl EmbeddingView,
    config: &ReducerConfig,
    best_chain: &mut Chain,
    best_fitness: &mut usize,
) {
    for individual in pop.iter_mut() {
        individual.optimize(
            caches,
            view,
            config.max_new_vertices(),
            config.reduce_iteration_coefficient(),
        );
    }
    pop.sort();

    if let Some(winner) = pop.first() {
        if (winner.fitness(), winner.size()) < (*best_fitness, best_chain.len()) {
            *best_fitness = winner.fitness();
            *best_chain = winner.chain().clone();
            tracing::info!(
                best_fitness = *best_fitness,
                best_chain_len = best_chain.len(),
                "adopted new best chain"
            );
        }
    }
}

/// Fills `children` with `elite_count` re-seeded top parents plus crossover
/// offspring. Returns false if the crossover attempt budget is exhausted
/// before every slot is filled.
fn create_next_generation(
    parents: &[CscIndividual],
    children: &mut Vec<CscIndividual>,
    caches: &mut ReducerCaches,
    view: &impl EmbeddingView,
    config: &ReducerConfig,
    tournament_rng: &mut SmallRng,
) -> bool {
    let population_size = config.population_size();
    let elite_count = config.elite_count().min(parents.len()).min(children.len());

    for (parent, child) in parents.iter().zip(children.iter_mut()).take(elite_count) {
        let seed = parent.chain().clone();
        child.from_initial(&seed, caches, view);
    }

    let mut idx = elite_count;
    let mut attempts = 0;
    let attempt_budget = config.crossover_attempt_budget();
    while idx < population_size && attempts < attempt_budget {
        attempts += 1;
        let pa = tournament_selection(parents, tournament_rng);
        let pb = tournament_selection(parents, tournament_rng);
        let (Some(chain_a), Some(chain_b), Some(child)) = (
            parents.get(pa).map(CscIndividual::chain),
            parents.get(pb).map(CscIndividual::chain),
            children.get_mut(idx),
        ) else {
            break;
        };
        if child.from_crossover(chain_a, chain_b, caches, view) {
            idx += 1;
        }
    }

    idx == population_size
}

/// Picks two uniformly random parents and returns the index of the fitter one.
fn tournament_selection(parents: &[CscIndividual], rng: &mut SmallRng) -> usize {
    let i = rng.gen_range(0..parents.len());
    let j = rng.gen_range(0..parents.len());
    match (parents.get(i), parents.get(j)) {
        (Some(pi), Some(pj)) if pj < pi => j,
        _ => i,
    }
}

#[cfg(feature = "metrics")]
fn emit_generation_metrics(generation: usize, best_fitness: usize) {
    #[expect(clippy::cast_precision_loss, reason = "fitness values are small counts")]
    let best_fitness = best_fitness as f64;
    metrics::counter!("csc_reducer_generations_run").increment(1);
    metrics::gauge!("csc_reducer_best_fitness").set(best_fitness);
    let _ = generation;
}

#[cfg(not(feature = "metrics"))]
fn emit_generation_metrics(_generation: usize, _best_fitness: usize) {}

#[cfg(feature = "metrics")]
fn emit_crossover_failure_metric() {
    metrics::counter!("csc_reducer_crossover_failures").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn emit_crossover_failure_metric() {}
