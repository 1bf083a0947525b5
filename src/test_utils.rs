//! In-memory [`EmbeddingView`] fixture used by unit and property tests.

use std::collections::{HashMap, HashSet};

use crate::{VId, view::EmbeddingView};

/// A fixed, hand-assembled embedding view for tests.
///
/// Built incrementally via `with_*` methods; every query reads from plain
/// maps populated at construction time, matching the "current global
/// embedding" snapshot the trait models in production.
#[derive(Clone, Debug, Default)]
pub(crate) struct StaticEmbeddingView {
    mapping: HashMap<VId, Vec<VId>>,
    reverse_mapping: HashMap<VId, Vec<VId>>,
    remaining_targets: HashSet<VId>,
    source_adjacency: HashMap<VId, Vec<VId>>,
    target_adjacency: HashMap<VId, Vec<VId>>,
}

impl StaticEmbeddingView {
    /// Creates an empty view with no mappings or edges.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records that source vertex `s` maps to targets `ts`, updating the
    /// reverse mapping accordingly.
    #[must_use]
    pub(crate) fn with_mapping(mut self, s: VId, ts: impl IntoIterator<Item = VId>) -> Self {
        let targets: Vec<VId> = ts.into_iter().collect();
        for &t in &targets {
            self.reverse_mapping.entry(t).or_default().push(s);
        }
        self.mapping.entry(s).or_default().extend(targets);
        self
    }

    /// Declares `targets` as unoccupied.
    #[must_use]
    pub(crate) fn with_remaining_targets(mut self, targets: impl IntoIterator<Item = VId>) -> Self {
        self.remaining_targets.extend(targets);
        self
    }

    /// Adds an undirected edge to `G_s`.
    #[must_use]
    pub(crate) fn with_source_edges(mut self, edges: impl IntoIterator<Item = (VId, VId)>) -> Self {
        for (a, b) in edges {
            self.source_adjacency.entry(a).or_default().push(b);
            self.source_adjacency.entry(b).or_default().push(a);
        }
        self
    }

    /// Adds an undirected edge to `G_t`.
    #[must_use]
    pub(crate) fn with_target_edges(mut self, edges: impl IntoIterator<Item = (VId, VId)>) -> Self {
        for (a, b) in edges {
            self.target_adjacency.entry(a).or_default().push(b);
            self.target_adjacency.entry(b).or_default().push(a);
        }
        self
    }
}

impl EmbeddingView for StaticEmbeddingView {
    fn mapping(&self, s: VId) -> Vec<VId> {
        self.mapping.get(&s).cloned().unwrap_or_default()
    }

    fn reverse_mapping(&self, t: VId) -> Vec<VId> {
        self.reverse_mapping.get(&t).cloned().unwrap_or_default()
    }

    fn remaining_targets(&self) -> HashSet<VId> {
        self.remaining_targets.clone()
    }

    fn iterate_source_adjacent(&self, s: VId, f: &mut dyn FnMut(VId)) {
        if let Some(neighbours) = self.source_adjacency.get(&s) {
            for &neighbour in neighbours {
                f(neighbour);
            }
        }
    }

    fn iterate_target_adjacent(&self, t: VId, f: &mut dyn FnMut(VId)) {
        if let Some(neighbours) = self.target_adjacency.get(&t) {
            for &neighbour in neighbours {
                f(neighbour);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_and_reverse_mapping_stay_consistent() {
        let view = StaticEmbeddingView::new().with_mapping(1, [10, 11]);
        assert_eq!(view.mapping(1), vec![10, 11]);
        assert_eq!(view.reverse_mapping(10), vec![1]);
        assert_eq!(view.reverse_mapping(11), vec![1]);
    }

    #[test]
    fn remaining_targets_reports_declared_set() {
        let view = StaticEmbeddingView::new().with_remaining_targets([4, 5]);
        assert_eq!(view.remaining_targets(), [4, 5].into_iter().collect());
    }

    #[test]
    fn target_edges_are_undirected() {
        let view = StaticEmbeddingView::new().with_target_edges([(0, 1)]);
        assert_eq!(view.target_neighbours(0), vec![1]);
        assert_eq!(view.target_neighbours(1), vec![0]);
    }
}
