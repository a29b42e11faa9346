use crate::graph::*;
use crate::weights::{WeightValue, Weights};
use crate::{GraphError, Result};
use std::fmt::Debug;
use std::hash::Hash;

/// Read access to a graph.
///
/// `V` and `E` are how vertices and edges are named to callers:
/// [VertexId] and [EdgeId] for [IndexGraph], caller ids for [Graph].
/// Every vertex and edge also has a dense index, reachable through the `*_index` methods,
/// so algorithms can run on indices and translate their results back.
///
/// Queries given an unknown vertex or edge fail with a not-found error.
pub trait QueryableGraph {
    type V: Clone + Eq + Hash + Debug;
    type E: Clone + Eq + Hash + Debug;

    fn capabilities(&self) -> GraphCapabilities;

    fn is_directed(&self) -> bool {
        self.capabilities().directed
    }

    fn vertex_size(&self) -> usize;
    /// Iterates over vertices in index order.
    fn iter_vertices(&self) -> Box<dyn Iterator<Item = Self::V> + '_>;
    fn contains_vertex(&self, v: &Self::V) -> bool;

    fn edge_size(&self) -> usize;
    /// Iterates over edges in index order, each with its stored orientation.
    fn iter_edges(&self) -> Box<dyn Iterator<Item = Edge<Self::V, Self::E>> + '_>;
    fn contains_edge(&self, e: &Self::E) -> bool;
    fn find_edge(&self, e: &Self::E) -> Result<Edge<Self::V, Self::E>>;

    fn edge_source(&self, e: &Self::E) -> Result<Self::V> {
        self.find_edge(e).map(|x| x.source)
    }

    fn edge_target(&self, e: &Self::E) -> Result<Self::V> {
        self.find_edge(e).map(|x| x.target)
    }

    /// The endpoint of `e` other than `v`.
    fn edge_endpoint(&self, e: &Self::E, v: &Self::V) -> Result<Self::V> {
        let edge = self.find_edge(e)?;
        edge.opposite(v)
            .cloned()
            .ok_or_else(|| GraphError::not_incident(e, v))
    }

    /// Iterates over all edges from `source` to `target`,
    /// or between them for undirected graphs.
    fn edges_connecting(
        &self,
        source: &Self::V,
        target: &Self::V,
    ) -> Result<Box<dyn Iterator<Item = Edge<Self::V, Self::E>> + '_>>;

    /// Any edge from `source` to `target`.
    fn get_edge(&self, source: &Self::V, target: &Self::V) -> Result<Option<Self::E>> {
        Ok(self.edges_connecting(source, target)?.next().map(|e| e.id))
    }

    /// Edges going into `v`, all with `target == v`.
    fn in_edges(&self, v: &Self::V) -> Result<Box<dyn Iterator<Item = Edge<Self::V, Self::E>> + '_>>;
    /// Edges going out of `v`, all with `source == v`.
    fn out_edges(&self, v: &Self::V) -> Result<Box<dyn Iterator<Item = Edge<Self::V, Self::E>> + '_>>;

    fn out_degree(&self, v: &Self::V) -> Result<usize> {
        Ok(self.out_edges(v)?.count())
    }

    fn in_degree(&self, v: &Self::V) -> Result<usize> {
        Ok(self.in_edges(v)?.count())
    }

    fn vertex_index(&self, v: &Self::V) -> Result<VertexId>;
    fn vertex_by_index(&self, index: VertexId) -> Result<Self::V>;
    fn edge_index(&self, e: &Self::E) -> Result<EdgeId>;
    fn edge_by_index(&self, index: EdgeId) -> Result<Self::E>;

    /// A view with every edge pointing the other way.
    fn reverse(&self) -> ReverseView<&Self>
    where
        Self: Sized,
    {
        ReverseView::new(self)
    }

    /// A view that forwards reads and rejects every mutation.
    fn unmodifiable(&self) -> UnmodifiableView<&Self>
    where
        Self: Sized,
    {
        UnmodifiableView::new(self)
    }

    fn debug(&self) -> GraphDebug<'_, Self>
    where
        Self: Sized,
    {
        GraphDebug::new(self)
    }
}

/// Adding vertices and edges with automatically assigned ids.
pub trait GrowableGraph: QueryableGraph {
    fn add_vertex(&mut self) -> Result<Self::V>;

    /// Fails if an endpoint is absent or the edge violates the graph capabilities.
    fn add_edge(&mut self, source: &Self::V, target: &Self::V) -> Result<Self::E>;
}

/// Removing and redirecting edges.
///
/// Removals may move the last edge into the freed index.
pub trait EdgeShrinkableGraph: QueryableGraph {
    fn remove_edge(&mut self, e: &Self::E) -> Result<()>;
    /// Removes every edge incident to `v`.
    fn remove_edges_of(&mut self, v: &Self::V) -> Result<()>;
    fn remove_in_edges_of(&mut self, v: &Self::V) -> Result<()>;
    fn remove_out_edges_of(&mut self, v: &Self::V) -> Result<()>;
    /// Exchanges source and target of `e`.
    fn reverse_edge(&mut self, e: &Self::E) -> Result<()>;
    fn clear_edges(&mut self) -> Result<()>;
}

/// Removing vertices, together with their incident edges.
pub trait VertexShrinkableGraph: EdgeShrinkableGraph {
    fn remove_vertex(&mut self, v: &Self::V) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

/// Read access to the weights attached to a graph under a key.
///
/// Maps are addressed by [VertexId] and [EdgeId] whatever `V` and `E` are;
/// translate with `vertex_index` and `edge_index`.
pub trait WeightedGraph: QueryableGraph {
    fn vertices_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>>;
    fn edges_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>>;
}

/// Forwards every required query to `$inner`.
macro_rules! forward_queryable {
    ($s:ident => $inner:expr) => {
        type V = G::V;
        type E = G::E;

        fn capabilities(&$s) -> GraphCapabilities {
            $inner.capabilities()
        }

        fn vertex_size(&$s) -> usize {
            $inner.vertex_size()
        }

        fn iter_vertices(&$s) -> Box<dyn Iterator<Item = Self::V> + '_> {
            $inner.iter_vertices()
        }

        fn contains_vertex(&$s, v: &Self::V) -> bool {
            $inner.contains_vertex(v)
        }

        fn edge_size(&$s) -> usize {
            $inner.edge_size()
        }

        fn iter_edges(&$s) -> Box<dyn Iterator<Item = Edge<Self::V, Self::E>> + '_> {
            $inner.iter_edges()
        }

        fn contains_edge(&$s, e: &Self::E) -> bool {
            $inner.contains_edge(e)
        }

        fn find_edge(&$s, e: &Self::E) -> Result<Edge<Self::V, Self::E>> {
            $inner.find_edge(e)
        }

        fn edges_connecting(
            &$s,
            source: &Self::V,
            target: &Self::V,
        ) -> Result<Box<dyn Iterator<Item = Edge<Self::V, Self::E>> + '_>> {
            $inner.edges_connecting(source, target)
        }

        fn in_edges(
            &$s,
            v: &Self::V,
        ) -> Result<Box<dyn Iterator<Item = Edge<Self::V, Self::E>> + '_>> {
            $inner.in_edges(v)
        }

        fn out_edges(
            &$s,
            v: &Self::V,
        ) -> Result<Box<dyn Iterator<Item = Edge<Self::V, Self::E>> + '_>> {
            $inner.out_edges(v)
        }

        fn out_degree(&$s, v: &Self::V) -> Result<usize> {
            $inner.out_degree(v)
        }

        fn in_degree(&$s, v: &Self::V) -> Result<usize> {
            $inner.in_degree(v)
        }

        fn vertex_index(&$s, v: &Self::V) -> Result<VertexId> {
            $inner.vertex_index(v)
        }

        fn vertex_by_index(&$s, index: VertexId) -> Result<Self::V> {
            $inner.vertex_by_index(index)
        }

        fn edge_index(&$s, e: &Self::E) -> Result<EdgeId> {
            $inner.edge_index(e)
        }

        fn edge_by_index(&$s, index: EdgeId) -> Result<Self::E> {
            $inner.edge_by_index(index)
        }
    };
}

impl<'a, G> QueryableGraph for &'a G
where
    G: QueryableGraph + ?Sized,
{
    forward_queryable!(self => (**self));
}

impl<'a, G> QueryableGraph for &'a mut G
where
    G: QueryableGraph + ?Sized,
{
    forward_queryable!(self => (**self));
}

impl<'a, G> GrowableGraph for &'a mut G
where
    G: GrowableGraph + ?Sized,
{
    fn add_vertex(&mut self) -> Result<Self::V> {
        (**self).add_vertex()
    }

    fn add_edge(&mut self, source: &Self::V, target: &Self::V) -> Result<Self::E> {
        (**self).add_edge(source, target)
    }
}

impl<'a, G> EdgeShrinkableGraph for &'a mut G
where
    G: EdgeShrinkableGraph + ?Sized,
{
    fn remove_edge(&mut self, e: &Self::E) -> Result<()> {
        (**self).remove_edge(e)
    }

    fn remove_edges_of(&mut self, v: &Self::V) -> Result<()> {
        (**self).remove_edges_of(v)
    }

    fn remove_in_edges_of(&mut self, v: &Self::V) -> Result<()> {
        (**self).remove_in_edges_of(v)
    }

    fn remove_out_edges_of(&mut self, v: &Self::V) -> Result<()> {
        (**self).remove_out_edges_of(v)
    }

    fn reverse_edge(&mut self, e: &Self::E) -> Result<()> {
        (**self).reverse_edge(e)
    }

    fn clear_edges(&mut self) -> Result<()> {
        (**self).clear_edges()
    }
}

impl<'a, G> VertexShrinkableGraph for &'a mut G
where
    G: VertexShrinkableGraph + ?Sized,
{
    fn remove_vertex(&mut self, v: &Self::V) -> Result<()> {
        (**self).remove_vertex(v)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}

impl<'a, G> WeightedGraph for &'a G
where
    G: WeightedGraph + ?Sized,
{
    fn vertices_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        (**self).vertices_weights(key)
    }

    fn edges_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        (**self).edges_weights(key)
    }
}

impl<'a, G> WeightedGraph for &'a mut G
where
    G: WeightedGraph + ?Sized,
{
    fn vertices_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        (**self).vertices_weights(key)
    }

    fn edges_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        (**self).edges_weights(key)
    }
}
