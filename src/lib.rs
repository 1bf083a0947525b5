//! Evolutionary chain-size contraction (CSC) reducer.
//!
//! Shrinks one source vertex's chain in a minor embedding through a small
//! evolutionary local search: candidate chains mutate by growing into free
//! target vertices, then reduce by dropping vertices whose removal keeps the
//! chain connected and every adjacent source covered. The reducer only reads
//! from the surrounding embedding through [`EmbeddingView`]; it never
//! constructs or mutates one.

mod config;
mod error;
mod graph_utils;
mod individual;
#[cfg(feature = "parallel")]
mod parallel;
mod reducer;
#[cfg(test)]
pub(crate) mod test_utils;
mod view;

pub use crate::{
    config::{ConfigError, ReducerConfig},
    error::{ReducerError, ReducerErrorCode, Result},
    reducer::EvolutionaryCscReducer,
    view::EmbeddingView,
};

#[cfg(feature = "parallel")]
/// Batch helper for running independent reducers concurrently; requires the
/// `parallel` feature.
pub use crate::parallel::{BatchResult, optimize_many};

/// A vertex id in either the source or target graph.
pub type VId = usize;

/// A vertex id in the source graph `G_s`.
pub type SourceId = VId;

/// A vertex id in the target graph `G_t`.
pub type TargetId = VId;

/// A candidate chain: an unordered set of target vertices.
pub type Chain = std::collections::HashSet<VId>;
