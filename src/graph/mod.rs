//! Graphs addressed by dense indices, and graphs named by caller ids on top of them.
//!
//! # Index graphs
//!
//! In an [IndexGraph], vertices are the indices `[0, n)` and edges are `[0, m)`.
//! Algorithms can keep per-element data in plain arrays and copy ids freely;
//! they are essentially `usize`.
//!
//! Removing an element keeps the indices dense by moving the last element into the freed index.
//! Everything addressing elements by index must follow such moves:
//! attached [Weights](crate::weights::Weights) do so on their own,
//! other structures subscribe with `add_vertex_listener` or `add_edge_listener`.
//!
//! # Graphs with caller ids
//!
//! A [Graph] wraps an index graph and two [IndexIdMap]s.
//! Ids never change while their element lives, whatever happens to its index.
//! Code written against [QueryableGraph] and friends runs on both.
//!
//! # Storages
//!
//! [IndexGraphFactory] and [IndexGraphBuilder] pick the storage once, from [Hints] or an explicit
//! [StorageKind]. Every storage answers the same queries; they differ in costs.
//!
//! # Views
//!
//! [ReverseView] and [UnmodifiableView] wrap a graph, or a reference to one, without copying it.

mod vertex;
pub use self::vertex::*;
mod edge;
pub use self::edge::*;
mod capabilities;
pub use self::capabilities::*;
mod listener;
pub use self::listener::*;
#[macro_use]
mod r#trait;
pub use self::r#trait::*;
mod storage;
pub use self::storage::{Endpoints, StorageKind};
mod index_graph;
pub use self::index_graph::*;
mod id_map;
pub use self::id_map::*;
mod mapped_graph;
pub use self::mapped_graph::*;
mod views;
pub use self::views::*;
mod factory;
pub use self::factory::*;
mod builder;
pub use self::builder::*;
mod graph_debug;
pub use self::graph_debug::*;

#[cfg(test)]
mod tests;
