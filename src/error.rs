//! Error types for the CSC reducer.
//!
//! The core algorithm is total on valid inputs; these types cover the two
//! documented fallible preconditions (see `spec.md` §7): an `EmbeddingView`
//! that does not actually map the requested source vertex, and a poisoned
//! synchronisation primitive, which only the optional `parallel` feature can
//! ever surface.

use std::fmt;

use thiserror::Error;

use crate::VId;

/// Stable codes describing [`ReducerError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ReducerErrorCode {
    /// The requested source vertex has no seed mapping in the embedding view.
    EmbeddingViewInconsistency,
    /// A synchronisation primitive became poisoned after a panic.
    LockPoisoned,
}

impl ReducerErrorCode {
    /// Returns the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmbeddingViewInconsistency => "CSC_REDUCER_EMBEDDING_VIEW_INCONSISTENCY",
            Self::LockPoisoned => "CSC_REDUCER_LOCK_POISONED",
        }
    }
}

impl fmt::Display for ReducerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error produced while constructing or driving an
/// [`EvolutionaryCscReducer`](crate::EvolutionaryCscReducer).
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ReducerError {
    /// The caller claims `source_vertex` is already embedded, but the
    /// supplied [`EmbeddingView`](crate::EmbeddingView) reports no mapping
    /// for it.
    #[error("source vertex {source_vertex} has no seed mapping in the embedding view")]
    EmbeddingViewInconsistency {
        /// The source vertex that the caller claims is embedded.
        source_vertex: VId,
    },
    /// A synchronisation primitive became poisoned after a panic. Only
    /// reachable through the optional `parallel` feature.
    #[error("lock for {resource} is poisoned")]
    LockPoisoned {
        /// Name of the locked resource that was poisoned.
        resource: &'static str,
    },
}

impl ReducerError {
    /// Retrieves the stable [`ReducerErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> ReducerErrorCode {
        match self {
            Self::EmbeddingViewInconsistency { .. } => ReducerErrorCode::EmbeddingViewInconsistency,
            Self::LockPoisoned { .. } => ReducerErrorCode::LockPoisoned,
        }
    }
}

/// Convenient alias for results returned by the reducer API.
pub type Result<T> = core::result::Result<T, ReducerError>;
