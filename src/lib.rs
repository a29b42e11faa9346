//! Index-addressed graphs with interchangeable storage backends.
//!
//! Algorithms in this crate family work on [IndexGraph](graph::IndexGraph)s,
//! whose vertices and edges are dense indices in `[0, n)` and `[0, m)`.
//! Callers who want their own identifiers use [Graph](graph::Graph),
//! which wraps an index graph together with two id maps.
//!
//! The physical layout (arrays, hash tables, an adjacency matrix, linked lists
//! or a compressed static representation) is picked once by
//! [IndexGraphFactory](graph::IndexGraphFactory) and hidden behind one API.
//!
//! Removing a vertex or an edge keeps indices dense by moving the last element
//! into the freed slot.
//! Attached [Weights](weights::Weights), id maps and user listeners are told
//! about every such move before the removing call returns.

mod error;
pub use self::error::*;

pub mod graph;
pub mod weights;
