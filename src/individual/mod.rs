//! A single candidate chain and its mutate/reduce local search.

use std::cmp::Ordering;
use std::collections::HashMap;

use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{
    Chain, VId,
    graph_utils::{are_sets_connected, is_cut_vertex, overlapping_sets},
    reducer::ReducerCaches,
    view::EmbeddingView,
};

/// One candidate chain for `sourceVertex`, together with the per-source
/// connectivity counter that tracks whether it is still a feasible
/// placement.
#[derive(Debug)]
pub(crate) struct CscIndividual {
    source_vertex: VId,
    chain: Chain,
    connectivity: HashMap<VId, usize>,
    fitness: usize,
    done: bool,
    rng: SmallRng,
}

impl CscIndividual {
    /// Allocates a population slot for `source_vertex`, seeded with its own
    /// private RNG derived from `rng_seed`.
    pub(crate) fn new(source_vertex: VId, rng_seed: u64) -> Self {
        Self {
            source_vertex,
            chain: Chain::new(),
            connectivity: HashMap::new(),
            fitness: 0,
            done: true,
            rng: SmallRng::seed_from_u64(rng_seed),
        }
    }

    pub(crate) fn chain(&self) -> &Chain {
        &self.chain
    }

    pub(crate) fn size(&self) -> usize {
        self.chain.len()
    }

    pub(crate) fn fitness(&self) -> usize {
        self.fitness
    }

    /// Seeds this slot with a copy of `seed_chain`, rebuilding connectivity
    /// from scratch. Marks the individual as not yet optimized.
    pub(crate) fn from_initial(
        &mut self,
        seed_chain: &Chain,
        caches: &mut ReducerCaches,
        view: &impl EmbeddingView,
    ) {
        self.chain = seed_chain.clone();
        self.connectivity.clear();
        for &t in &self.chain {
            caches.add_connectivity(&mut self.connectivity, t, view);
        }
        self.fitness = 0;
        self.done = false;
    }

    /// Attempts to seed this slot from two parents' chains. Succeeds iff the
    /// parents' chains overlap or are connected by an edge of `G_t`.
    pub(crate) fn from_crossover(
        &mut self,
        a: &Chain,
        b: &Chain,
        caches: &mut ReducerCaches,
        view: &impl EmbeddingView,
    ) -> bool {
        if !(overlapping_sets(a, b) || are_sets_connected(view, a, b)) {
            return false;
        }
        self.chain = a.union(b).copied().collect();
        self.connectivity.clear();
        for &t in &self.chain {
            caches.add_connectivity(&mut self.connectivity, t, view);
        }
        self.fitness = 0;
        self.done = false;
        true
    }

    /// Runs `mutate` then `reduce`, then records fitness. Idempotent: calling
    /// this twice in a row is a no-op on the second call.
    pub(crate) fn optimize(
        &mut self,
        caches: &mut ReducerCaches,
        view: &impl EmbeddingView,
        max_new_vertices: usize,
        reduce_iteration_coefficient: usize,
    ) {
        if self.done {
            return;
        }
        self.mutate(caches, view, max_new_vertices);
        self.reduce(caches, view, reduce_iteration_coefficient);
        self.fitness = caches.fitness_of(&self.chain, view);
        self.done = true;
    }

    /// Grows the chain by DFS from a random frontier vertex, adding up to
    /// `max_new_vertices` free targets.
    fn mutate(&mut self, caches: &mut ReducerCaches, view: &impl EmbeddingView, max_new_vertices: usize) {
        let remaining = view.remaining_targets();
        let mut frontier: Vec<VId> = Vec::new();
        for &t in &self.chain {
            for neighbour in view.target_neighbours(t) {
                if remaining.contains(&neighbour) && !frontier.contains(&neighbour) {
                    frontier.push(neighbour);
                }
            }
        }
        if frontier.is_empty() {
            return;
        }
        // `self.chain` is a `HashSet`, whose iteration order depends on the
        // process-local hasher seed: sort before using a random index into
        // this `Vec` so vertex selection is a pure function of vertex ids and
        // the RNG stream, not of that seed.
        frontier.sort_unstable();
        let start_idx = self.rng.gen_range(0..frontier.len());
        let Some(&start) = frontier.get(start_idx) else {
            return;
        };

        let mut stack: Vec<(Vec<VId>, usize)> = vec![(view.target_neighbours(start), 0)];
        let mut added = 0usize;
        while added < max_new_vertices {
            let Some((range, cursor)) = stack.last_mut() else {
                break;
            };
            let Some(&adj) = range.get(*cursor) else {
                stack.pop();
                continue;
            };
            *cursor += 1;
            if remaining.contains(&adj) && !self.chain.contains(&adj) {
                self.add_vertex(adj, caches, view);
                stack.push((view.target_neighbours(adj), 0));
                added += 1;
            }
        }
    }

    fn add_vertex(&mut self, v: VId, caches: &mut ReducerCaches, view: &impl EmbeddingView) {
        self.chain.insert(v);
        caches.add_connectivity(&mut self.connectivity, v, view);
    }

    /// Drops vertices whose removal keeps the chain connected and preserves
    /// every adjacent source's connectivity, in three passes: greedy overlap
    /// pruning, randomized pruning, and a final linear sweep.
    fn reduce(&mut self, caches: &mut ReducerCaches, view: &impl EmbeddingView, reduce_iteration_coefficient: usize) {
        let mut vertices: Vec<VId> = self.chain.iter().copied().collect();
        // Same rationale as `mutate`: fix the order before indexing with the
        // RNG, since `self.chain` is a `HashSet` and its iteration order is
        // not reproducible across processes or threads.
        vertices.sort_unstable();

        let mut i = 0;
        while let Some(&v) = vertices.get(i) {
            if caches.fitness_of_vertex(v, view) > 0 && self.try_remove(v, caches, view) {
                vertices.swap_remove(i);
            } else {
                i += 1;
            }
        }

        let max_iterations = reduce_iteration_coefficient * vertices.len();
        for _ in 0..max_iterations {
            if vertices.is_empty() {
                break;
            }
            let idx = self.rng.gen_range(0..vertices.len());
            if let Some(&v) = vertices.get(idx) {
                if self.try_remove(v, caches, view) {
                    vertices.swap_remove(idx);
                }
            }
        }

        let mut i = 0;
        while let Some(&v) = vertices.get(i) {
            if self.try_remove(v, caches, view) {
                vertices.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Removes `v` from the chain iff it is safe to do so: every adjacent
    /// source retains connectivity, and `v` is not a cut vertex of the chain.
    pub(crate) fn try_remove(&mut self, v: VId, caches: &mut ReducerCaches, view: &impl EmbeddingView) -> bool {
        if !caches.is_removeable(&self.connectivity, v) {
            return false;
        }
        if is_cut_vertex(view, &self.chain, v) {
            return false;
        }
        caches.remove_vertex(&mut self.connectivity, v);
        self.chain.remove(&v);
        true
    }

    pub(crate) fn source_vertex(&self) -> VId {
        self.source_vertex
    }
}

impl PartialEq for CscIndividual {
    fn eq(&self, other: &Self) -> bool {
        self.fitness == other.fitness && self.size() == other.size()
    }
}

impl Eq for CscIndividual {}

impl PartialOrd for CscIndividual {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lower fitness first, tiebreak by smaller chain size.
impl Ord for CscIndividual {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.fitness, self.size()).cmp(&(other.fitness, other.size()))
    }
}
