//! Write-once caches owned by the reducer and read by individuals through
//! explicit accessor methods (never through a stored back-reference).

use std::collections::{HashMap, HashSet};

use crate::{Chain, VId, view::EmbeddingView};

/// Shared state conceptually owned by the reducer: the per-vertex overlap
/// fitness, the target-to-adjacent-source multimap, and the fixed set of
/// source vertices adjacent to the vertex being optimized (`A_s`).
#[derive(Debug)]
pub(crate) struct ReducerCaches {
    adjacent_source_set: HashSet<VId>,
    vertex_fitness: HashMap<VId, usize>,
    adjacent_sources: HashMap<VId, Vec<VId>>,
    prepared_vertices: HashSet<VId>,
}

impl ReducerCaches {
    pub(crate) fn new(adjacent_source_set: HashSet<VId>) -> Self {
        Self {
            adjacent_source_set,
            vertex_fitness: HashMap::new(),
            adjacent_sources: HashMap::new(),
            prepared_vertices: HashSet::new(),
        }
    }

    /// Populates `adjacent_sources[t]` with every `s ∈ A_s` that has a chain
    /// vertex adjacent to `t`. Idempotent.
    pub(crate) fn prepare_vertex(&mut self, t: VId, view: &impl EmbeddingView) {
        if !self.prepared_vertices.insert(t) {
            return;
        }
        let mut sources = Vec::new();
        view.iterate_target_adjacent_reverse_mapping(t, &mut |s| {
            if self.adjacent_source_set.contains(&s) && !sources.contains(&s) {
                sources.push(s);
            }
        });
        self.adjacent_sources.insert(t, sources);
    }

    /// Prepares `t` if necessary, then increments `connectivity[s]` for every
    /// adjacent source of `t`.
    pub(crate) fn add_connectivity(
        &mut self,
        connectivity: &mut HashMap<VId, usize>,
        t: VId,
        view: &impl EmbeddingView,
    ) {
        self.prepare_vertex(t, view);
        for &s in self.adjacent_sources.get(&t).into_iter().flatten() {
            *connectivity.entry(s).or_insert(0) += 1;
        }
    }

    /// Decrements `connectivity[s]` for every adjacent source of `t`. Assumes
    /// `t` was previously prepared via [`Self::add_connectivity`].
    pub(crate) fn remove_vertex(&self, connectivity: &mut HashMap<VId, usize>, t: VId) {
        for &s in self.adjacent_sources.get(&t).into_iter().flatten() {
            if let Some(count) = connectivity.get_mut(&s) {
                *count = count.saturating_sub(1);
            }
        }
    }

    /// True iff removing `t` would leave every adjacent source's connectivity
    /// at or above `1`, i.e. every current count is at least `2`.
    pub(crate) fn is_removeable(&self, connectivity: &HashMap<VId, usize>, t: VId) -> bool {
        self.adjacent_sources
            .get(&t)
            .into_iter()
            .flatten()
            .all(|s| connectivity.get(s).copied().unwrap_or(0) >= 2)
    }

    /// Overlap cost of placing `t` in a chain: `reverse_mapping(t).len() - 1`,
    /// guarded against underflow for a `t` with no current owner.
    pub(crate) fn fitness_of_vertex(&mut self, t: VId, view: &impl EmbeddingView) -> usize {
        *self
            .vertex_fitness
            .entry(t)
            .or_insert_with(|| view.reverse_mapping(t).len().saturating_sub(1))
    }

    /// Sum of `fitness_of_vertex` over every vertex of `chain`.
    pub(crate) fn fitness_of(&mut self, chain: &Chain, view: &impl EmbeddingView) -> usize {
        chain.iter().map(|&t| self.fitness_of_vertex(t, view)).sum()
    }
}
