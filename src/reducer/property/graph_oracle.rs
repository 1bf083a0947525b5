use std::collections::{HashMap, HashSet, VecDeque};

use proptest::prelude::*;

use crate::{
    Chain, VId,
    graph_utils::is_cut_vertex,
    individual::CscIndividual,
    reducer::ReducerCaches,
    test_utils::StaticEmbeddingView,
    view::EmbeddingView,
};

/// Brute-force reference: `G_t[set \ {v}]` is connected, checked by BFS.
fn connected_without(view: &impl EmbeddingView, set: &Chain, v: VId) -> bool {
    let remaining: Vec<VId> = set.iter().copied().filter(|&t| t != v).collect();
    let Some(&start) = remaining.first() else {
        return true;
    };
    let mut visited = HashSet::new();
    visited.insert(start);
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        view.iterate_target_adjacent(node, &mut |neighbour| {
            if neighbour != v && set.contains(&neighbour) && visited.insert(neighbour) {
                queue.push_back(neighbour);
            }
        });
    }
    visited.len() == remaining.len()
}

/// A random connected vertex subset plus a candidate vertex to remove, built
/// over a random spanning tree so the base set is always connected.
fn cut_vertex_fixture_strategy() -> impl Strategy<Value = (StaticEmbeddingView, Chain, VId)> {
    (4_usize..14, any::<u64>()).prop_map(|(node_count, seed)| {
        use rand::{Rng, SeedableRng, rngs::SmallRng};
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut edges = Vec::new();
        let mut adjacency: HashMap<VId, Vec<VId>> = HashMap::new();
        for child in 1..node_count {
            let parent = rng.gen_range(0..child);
            edges.push((parent, child));
            adjacency.entry(parent).or_default().push(child);
            adjacency.entry(child).or_default().push(parent);
        }
        let view = StaticEmbeddingView::new().with_target_edges(edges);
        let set: Chain = (0..node_count).collect();
        let v = rng.gen_range(0..node_count);
        (view, set, v)
    })
}

proptest! {
    #[test]
    fn is_cut_vertex_matches_bfs_oracle((view, set, v) in cut_vertex_fixture_strategy()) {
        let expected = set.len() >= 2 && !connected_without(&view, &set, v);
        prop_assert_eq!(is_cut_vertex(&view, &set, v), expected);
    }

    #[test]
    fn try_remove_soundness((view, set, v) in cut_vertex_fixture_strategy()) {
        let mut caches = ReducerCaches::new(HashSet::new());
        let mut individual = CscIndividual::new(0, 7);
        individual.from_initial(&set, &mut caches, &view);
        let removed = individual.try_remove(v, &mut caches, &view);
        if removed {
            prop_assert!(connected_without(&view, &set, v));
        }
    }
}
