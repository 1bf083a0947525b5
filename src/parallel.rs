//! Optional batch helper for running independent reducer instances concurrently.
//!
//! Gated behind the `parallel` feature, mirroring `chutoro-core`'s optional
//! `rayon` dependency and its use in `mst::parallel_kruskal`. Each source
//! vertex in the batch gets its own [`EvolutionaryCscReducer`], its own
//! caches, and its own population: nothing is shared across reducer
//! instances, so no lock is ever actually taken on this path.

use rayon::prelude::*;

use crate::{
    Chain, VId,
    config::ReducerConfig,
    error::Result,
    reducer::EvolutionaryCscReducer,
    view::EmbeddingView,
};

/// The outcome of optimizing one source vertex's chain within a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchResult {
    /// The source vertex this result belongs to.
    pub source_vertex: VId,
    /// The best chain found for `source_vertex`.
    pub best_chain: Chain,
    /// Fitness of `best_chain`.
    pub best_fitness: usize,
    /// True iff `best_chain` differs from `view`'s current mapping.
    pub improved: bool,
}

/// Runs independent [`EvolutionaryCscReducer`] instances for every vertex in
/// `source_vertices`, in parallel, against one shared read-only `view`.
///
/// Each reducer owns its own caches and populations: `view` is the only
/// state shared across threads, and it is never mutated. Results are
/// returned in the same order as `source_vertices`.
///
/// # Errors
/// Returns the first [`ReducerError`](crate::ReducerError) encountered while
/// constructing a reducer for one of `source_vertices`; construction errors
/// from other vertices in the batch are not reported once one has failed.
pub fn optimize_many<V>(view: &V, source_vertices: &[VId], config: &ReducerConfig) -> Result<Vec<BatchResult>>
where
    V: EmbeddingView + Sync,
{
    source_vertices
        .par_iter()
        .map(|&source_vertex| {
            let mut reducer = EvolutionaryCscReducer::new(view, source_vertex, config.clone())?;
            reducer.optimize();
            Ok(BatchResult {
                source_vertex,
                best_chain: reducer.best_chain().clone(),
                best_fitness: reducer.best_fitness(),
                improved: reducer.improved(),
            })
        })
        .collect()
}
