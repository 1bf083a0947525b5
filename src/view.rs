//! The read-only contract the reducer consumes for the current global embedding.

use std::collections::HashSet;

use crate::VId;

/// Read-only queries over the embedding state the reducer operates against.
///
/// An implementation is a capability set, not a concrete data structure: the
/// reducer never constructs or mutates an embedding, it only queries one that
/// some outer component (out of scope here) maintains. All methods observe a
/// single consistent snapshot for the lifetime of a reducer instance.
pub trait EmbeddingView {
    /// Targets currently assigned to source vertex `s`.
    fn mapping(&self, s: VId) -> Vec<VId>;

    /// Source vertices currently claiming target `t`.
    fn reverse_mapping(&self, t: VId) -> Vec<VId>;

    /// Target vertices with no current owner.
    fn remaining_targets(&self) -> HashSet<VId>;

    /// Visits every `G_s` neighbour of source vertex `s`.
    fn iterate_source_adjacent(&self, s: VId, f: &mut dyn FnMut(VId));

    /// Visits every `G_t` neighbour of target vertex `t`.
    fn iterate_target_adjacent(&self, t: VId, f: &mut dyn FnMut(VId));

    /// For each `t' ∈ N_{G_t}(t)`, visits each source vertex in `reverse_mapping(t')`.
    fn iterate_target_adjacent_reverse_mapping(&self, t: VId, f: &mut dyn FnMut(VId)) {
        self.iterate_target_adjacent(t, &mut |neighbour| {
            for s in self.reverse_mapping(neighbour) {
                f(s);
            }
        });
    }

    /// Visits `N_{G_t}(t) ∩ remaining_targets()`.
    fn iterate_free_target_adjacent(&self, t: VId, f: &mut dyn FnMut(VId)) {
        let remaining = self.remaining_targets();
        self.iterate_target_adjacent(t, &mut |neighbour| {
            if remaining.contains(&neighbour) {
                f(neighbour);
            }
        });
    }

    /// Read-only adjacency used for DFS range queries in `mutate`.
    ///
    /// Default implementation built from `iterate_target_adjacent`; an
    /// implementation backed by an adjacency multimap may override this to
    /// avoid per-call closures.
    fn target_neighbours(&self, t: VId) -> Vec<VId> {
        let mut neighbours = Vec::new();
        self.iterate_target_adjacent(t, &mut |neighbour| neighbours.push(neighbour));
        neighbours
    }
}
