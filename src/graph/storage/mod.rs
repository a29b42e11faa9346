//! Physical adjacency representations.
//!
//! |                  | [ArrayStorage]  | [LinkedStorage] | [HashtableStorage] | [MatrixStorage] | [CsrStorage]    |
//! | ---------------- | --------------- | --------------- | ------------------ | --------------- | --------------- |
//! | add vertex       | $O(1)$          | $O(1)$          | $O(1)$             | $O(\|V\|)$      | immutable       |
//! | add edge         | $O(1)$          | $O(1)$          | $O(1)$             | $O(1)$          | immutable       |
//! | remove edge      | $O(d)$          | $O(1)$          | $O(1)$             | $O(1)$          | immutable       |
//! | edges between    | $O(d)$          | $O(d)$          | $O(1)$             | $O(1)$          | $O(d)$          |
//! | iterate out/in   | $O(d)$          | $O(d)$          | $O(d)$             | $O(\|V\|)$      | $O(d)$          |
//! | parallel edges   | yes             | yes             | yes                | no              | yes             |
//!
//! Here $d$ is the degree of the vertex involved.
//!
//! A storage only records which edge indices touch which vertex.
//! Endpoints, weights and index compaction are handled by [IndexGraph](super::IndexGraph).

mod array;
pub use self::array::*;
mod linked;
pub use self::linked::*;
mod hashtable;
pub use self::hashtable::*;
mod matrix;
pub use self::matrix::*;
mod csr;
pub use self::csr::*;

use crate::graph::*;
use crate::{GraphError, Result};

/// The kinds of storage a graph can be built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Array,
    Linked,
    Hashtable,
    Matrix,
    Csr,
}

impl StorageKind {
    pub fn is_mutable(&self) -> bool {
        !matches!(self, StorageKind::Csr)
    }

    pub fn supports_parallel_edges(&self) -> bool {
        !matches!(self, StorageKind::Matrix)
    }
}

/// Endpoints of an edge as `(source, target)`.
pub type Endpoints = (VertexId, VertexId);

/// Read access to incidence.
///
/// For undirected storages `out_edges` and `in_edges` both iterate over all incident edges,
/// each self edge once.
pub(crate) trait Adjacency {
    fn kind(&self) -> StorageKind;
    fn out_edges(&self, v: VertexId) -> Box<dyn Iterator<Item = EdgeId> + '_>;
    fn in_edges(&self, v: VertexId) -> Box<dyn Iterator<Item = EdgeId> + '_>;
    fn edges_between<'a>(
        &'a self,
        source: VertexId,
        target: VertexId,
        endpoints: &'a [Endpoints],
    ) -> Box<dyn Iterator<Item = EdgeId> + 'a>;

    fn out_degree(&self, v: VertexId) -> usize {
        self.out_edges(v).count()
    }

    fn in_degree(&self, v: VertexId) -> usize {
        self.in_edges(v).count()
    }
}

/// Write access to incidence.
///
/// Callers keep vertex and edge indices dense:
/// * `add_edge` is called either with a brand-new last index or with an index whose entry was just removed.
/// * `move_edge` relabels the last edge `from` into the freed index `to`; `pop_edge` then shrinks the edge slots.
/// * `remove_vertex` is called only with an isolated vertex; the last vertex, if different, takes its slot.
pub(crate) trait MutableAdjacency: Adjacency {
    fn add_vertex(&mut self);
    fn remove_vertex(&mut self, v: VertexId);
    fn add_edge(&mut self, e: EdgeId, source: VertexId, target: VertexId);
    fn remove_edge(&mut self, e: EdgeId, source: VertexId, target: VertexId);
    fn move_edge(&mut self, from: EdgeId, to: EdgeId, source: VertexId, target: VertexId);
    fn pop_edge(&mut self) {}
    fn clear_edges(&mut self);
    fn clear(&mut self);
}

/// The storage chosen for a graph, fixed for its whole life.
#[derive(Debug, Clone)]
pub(crate) enum Storage {
    Array(ArrayStorage),
    Linked(LinkedStorage),
    Hashtable(HashtableStorage),
    Matrix(MatrixStorage),
    Csr(CsrStorage),
}

impl Storage {
    /// An empty mutable storage of the given kind.
    ///
    /// Csr storages can only be built from a full edge list, see [Storage::csr].
    pub fn new(
        kind: StorageKind,
        directed: bool,
        expected_vertices: usize,
        expected_edges: usize,
    ) -> Self {
        match kind {
            StorageKind::Array => {
                Storage::Array(ArrayStorage::with_capacity(directed, expected_vertices))
            }
            StorageKind::Linked => Storage::Linked(LinkedStorage::with_capacity(
                directed,
                expected_vertices,
                expected_edges,
            )),
            StorageKind::Hashtable => {
                Storage::Hashtable(HashtableStorage::with_capacity(directed, expected_vertices))
            }
            StorageKind::Matrix => {
                Storage::Matrix(MatrixStorage::with_capacity(directed, expected_vertices))
            }
            StorageKind::Csr => Storage::Csr(CsrStorage::new(directed, 0, &[])),
        }
    }

    pub fn csr(directed: bool, vertex_size: usize, endpoints: &[Endpoints]) -> Self {
        Storage::Csr(CsrStorage::new(directed, vertex_size, endpoints))
    }

    pub fn adjacency(&self) -> &dyn Adjacency {
        match self {
            Storage::Array(x) => x,
            Storage::Linked(x) => x,
            Storage::Hashtable(x) => x,
            Storage::Matrix(x) => x,
            Storage::Csr(x) => x,
        }
    }

    pub fn adjacency_mut(&mut self) -> Result<&mut dyn MutableAdjacency> {
        match self {
            Storage::Array(x) => Ok(x),
            Storage::Linked(x) => Ok(x),
            Storage::Hashtable(x) => Ok(x),
            Storage::Matrix(x) => Ok(x),
            Storage::Csr(x) => Err(GraphError::ImmutableStorage(x.kind())),
        }
    }

    pub fn kind(&self) -> StorageKind {
        self.adjacency().kind()
    }
}

/// Replaces the first occurrence of `old` by `new`.
pub(crate) fn replace_in<T: PartialEq>(vec: &mut [T], old: &T, new: T) -> bool {
    if let Some(slot) = vec.iter_mut().find(|x| *x == old) {
        *slot = new;
        true
    } else {
        false
    }
}

/// Removes one occurrence of `x`, not preserving order.
pub(crate) fn remove_from<T: PartialEq>(vec: &mut Vec<T>, x: &T) -> bool {
    if let Some(pos) = vec.iter().position(|y| y == x) {
        vec.swap_remove(pos);
        true
    } else {
        false
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const MUTABLE_KINDS: [StorageKind; 4] = [
        StorageKind::Array,
        StorageKind::Linked,
        StorageKind::Hashtable,
        StorageKind::Matrix,
    ];

    fn sorted(it: Box<dyn Iterator<Item = EdgeId> + '_>) -> Vec<usize> {
        let mut res: Vec<_> = it.map(|e| e.to_raw()).collect();
        res.sort();
        res
    }

    fn triangle(kind: StorageKind, directed: bool) -> (Storage, Vec<Endpoints>) {
        let mut storage = Storage::new(kind, directed, 0, 0);
        let endpoints = vec![
            (VertexId(0), VertexId(1)),
            (VertexId(1), VertexId(2)),
            (VertexId(2), VertexId(0)),
        ];
        {
            let adj = storage.adjacency_mut().unwrap();
            for _ in 0..3 {
                adj.add_vertex();
            }
            for (i, (s, t)) in endpoints.iter().enumerate() {
                adj.add_edge(EdgeId(i), *s, *t);
            }
        }
        (storage, endpoints)
    }

    #[test]
    fn directed_incidence() {
        for kind in MUTABLE_KINDS {
            let (storage, endpoints) = triangle(kind, true);
            let adj = storage.adjacency();
            assert_eq!(sorted(adj.out_edges(VertexId(1))), vec![1], "{:?}", kind);
            assert_eq!(sorted(adj.in_edges(VertexId(1))), vec![0], "{:?}", kind);
            assert_eq!(
                sorted(adj.edges_between(VertexId(2), VertexId(0), &endpoints)),
                vec![2],
                "{:?}",
                kind
            );
            assert_eq!(
                sorted(adj.edges_between(VertexId(0), VertexId(2), &endpoints)),
                Vec::<usize>::new(),
                "{:?}",
                kind
            );
        }
    }

    #[test]
    fn undirected_incidence() {
        for kind in MUTABLE_KINDS {
            let (storage, endpoints) = triangle(kind, false);
            let adj = storage.adjacency();
            assert_eq!(sorted(adj.out_edges(VertexId(1))), vec![0, 1], "{:?}", kind);
            assert_eq!(sorted(adj.in_edges(VertexId(1))), vec![0, 1], "{:?}", kind);
            assert_eq!(
                sorted(adj.edges_between(VertexId(0), VertexId(2), &endpoints)),
                vec![2],
                "{:?}",
                kind
            );
        }
    }

    #[test]
    fn move_last_edge_and_vertex() {
        for kind in MUTABLE_KINDS {
            for directed in [true, false] {
                let (mut storage, mut endpoints) = triangle(kind, directed);
                let adj = storage.adjacency_mut().unwrap();
                // remove edge 0 (0 -> 1), edge 2 (2 -> 0) takes index 0
                adj.remove_edge(EdgeId(0), VertexId(0), VertexId(1));
                adj.move_edge(EdgeId(2), EdgeId(0), VertexId(2), VertexId(0));
                adj.pop_edge();
                endpoints.swap_remove(0);
                assert_eq!(
                    sorted(adj.out_edges(VertexId(2))),
                    if directed { vec![0] } else { vec![0, 1] },
                    "{:?}",
                    kind
                );
                // isolate vertex 0 and drop it, vertex 2 takes index 0
                adj.remove_edge(EdgeId(0), VertexId(2), VertexId(0));
                adj.move_edge(EdgeId(1), EdgeId(0), VertexId(1), VertexId(2));
                adj.pop_edge();
                endpoints.swap_remove(0);
                adj.remove_vertex(VertexId(0));
                endpoints[0] = (VertexId(1), VertexId(0));
                assert_eq!(sorted(adj.in_edges(VertexId(0))), vec![0], "{:?}", kind);
                assert_eq!(
                    sorted(adj.edges_between(VertexId(1), VertexId(0), &endpoints)),
                    vec![0],
                    "{:?}",
                    kind
                );
                assert_eq!(adj.out_degree(VertexId(1)), 1, "{:?}", kind);
            }
        }
    }
}
