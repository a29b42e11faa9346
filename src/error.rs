use crate::graph::StorageKind;
use thiserror::Error;

/// Errors reported by graph, builder and weights operations.
///
/// All of them are contract violations on the caller side.
/// They are reported at the offending call and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("no such vertex: {0}")]
    NoSuchVertex(String),

    #[error("no such edge: {0}")]
    NoSuchEdge(String),

    #[error("duplicate vertex: {0}")]
    DuplicateVertex(String),

    #[error("duplicate edge: {0}")]
    DuplicateEdge(String),

    #[error("self edges are not allowed")]
    SelfEdgesNotAllowed,

    #[error("parallel edges are not allowed")]
    ParallelEdgesNotAllowed,

    #[error("edge {edge} is not incident to vertex {vertex}")]
    EdgeNotIncident { edge: String, vertex: String },

    #[error("graph is unmodifiable")]
    Unmodifiable,

    #[error("{0:?} storage does not support mutation")]
    ImmutableStorage(StorageKind),

    #[error("edges were added both with and without explicit indices")]
    MixedEdgeIndexing,

    #[error("edge indices are not dense: {0} is missing")]
    SparseEdgeIndices(String),

    #[error("contradictory hints: {0}")]
    ContradictoryHints(String),

    #[error("no such weights: {0}")]
    NoSuchWeights(String),

    #[error("weights {0:?} requested twice")]
    AliasedWeights(String),

    #[error("weights {key:?} hold {actual}, not {expected}")]
    WeightsTypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("no identifier left to assign")]
    IdSpaceExhausted,
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

impl GraphError {
    pub(crate) fn no_such_vertex<T: std::fmt::Debug>(v: T) -> Self {
        Self::NoSuchVertex(format!("{:?}", v))
    }

    pub(crate) fn no_such_edge<T: std::fmt::Debug>(e: T) -> Self {
        Self::NoSuchEdge(format!("{:?}", e))
    }

    pub(crate) fn not_incident<E, V>(edge: E, vertex: V) -> Self
    where
        E: std::fmt::Debug,
        V: std::fmt::Debug,
    {
        Self::EdgeNotIncident {
            edge: format!("{:?}", edge),
            vertex: format!("{:?}", vertex),
        }
    }
}
