//! Graphs derived from another graph without copying it.

use crate::graph::*;
use crate::weights::{WeightValue, Weights};
use crate::{GraphError, Result};

/// The wrapped graph with every edge pointing the other way.
///
/// Nothing is copied: each query is answered by the wrapped graph with sources and targets exchanged,
/// so later changes of the wrapped graph show through.
/// Wrapping a `&mut G` gives a mutable view; edges added through it are stored reversed.
#[derive(Debug, Clone, Copy)]
pub struct ReverseView<G> {
    graph: G,
}

impl<G> ReverseView<G> {
    pub fn new(graph: G) -> Self {
        Self { graph }
    }

    /// The wrapped graph, facing its own way again.
    pub fn into_inner(self) -> G {
        self.graph
    }
}

impl<G> QueryableGraph for ReverseView<G>
where
    G: QueryableGraph,
{
    type V = G::V;
    type E = G::E;

    fn capabilities(&self) -> GraphCapabilities {
        self.graph.capabilities()
    }

    fn vertex_size(&self) -> usize {
        self.graph.vertex_size()
    }

    fn iter_vertices(&self) -> Box<dyn Iterator<Item = Self::V> + '_> {
        self.graph.iter_vertices()
    }

    fn contains_vertex(&self, v: &Self::V) -> bool {
        self.graph.contains_vertex(v)
    }

    fn edge_size(&self) -> usize {
        self.graph.edge_size()
    }

    fn iter_edges(&self) -> Box<dyn Iterator<Item = Edge<Self::V, Self::E>> + '_> {
        Box::new(self.graph.iter_edges().map(Edge::reversed))
    }

    fn contains_edge(&self, e: &Self::E) -> bool {
        self.graph.contains_edge(e)
    }

    fn find_edge(&self, e: &Self::E) -> Result<Edge<Self::V, Self::E>> {
        self.graph.find_edge(e).map(Edge::reversed)
    }

    fn edges_connecting(
        &self,
        source: &Self::V,
        target: &Self::V,
    ) -> Result<Box<dyn Iterator<Item = Edge<Self::V, Self::E>> + '_>> {
        let it = self.graph.edges_connecting(target, source)?;
        Ok(Box::new(it.map(Edge::reversed)))
    }

    fn in_edges(&self, v: &Self::V) -> Result<Box<dyn Iterator<Item = Edge<Self::V, Self::E>> + '_>> {
        let it = self.graph.out_edges(v)?;
        Ok(Box::new(it.map(Edge::reversed)))
    }

    fn out_edges(&self, v: &Self::V) -> Result<Box<dyn Iterator<Item = Edge<Self::V, Self::E>> + '_>> {
        let it = self.graph.in_edges(v)?;
        Ok(Box::new(it.map(Edge::reversed)))
    }

    fn out_degree(&self, v: &Self::V) -> Result<usize> {
        self.graph.in_degree(v)
    }

    fn in_degree(&self, v: &Self::V) -> Result<usize> {
        self.graph.out_degree(v)
    }

    fn vertex_index(&self, v: &Self::V) -> Result<VertexId> {
        self.graph.vertex_index(v)
    }

    fn vertex_by_index(&self, index: VertexId) -> Result<Self::V> {
        self.graph.vertex_by_index(index)
    }

    fn edge_index(&self, e: &Self::E) -> Result<EdgeId> {
        self.graph.edge_index(e)
    }

    fn edge_by_index(&self, index: EdgeId) -> Result<Self::E> {
        self.graph.edge_by_index(index)
    }
}

impl<G> GrowableGraph for ReverseView<G>
where
    G: GrowableGraph,
{
    fn add_vertex(&mut self) -> Result<Self::V> {
        self.graph.add_vertex()
    }

    fn add_edge(&mut self, source: &Self::V, target: &Self::V) -> Result<Self::E> {
        self.graph.add_edge(target, source)
    }
}

impl<G> EdgeShrinkableGraph for ReverseView<G>
where
    G: EdgeShrinkableGraph,
{
    fn remove_edge(&mut self, e: &Self::E) -> Result<()> {
        self.graph.remove_edge(e)
    }

    fn remove_edges_of(&mut self, v: &Self::V) -> Result<()> {
        self.graph.remove_edges_of(v)
    }

    fn remove_in_edges_of(&mut self, v: &Self::V) -> Result<()> {
        self.graph.remove_out_edges_of(v)
    }

    fn remove_out_edges_of(&mut self, v: &Self::V) -> Result<()> {
        self.graph.remove_in_edges_of(v)
    }

    fn reverse_edge(&mut self, e: &Self::E) -> Result<()> {
        self.graph.reverse_edge(e)
    }

    fn clear_edges(&mut self) -> Result<()> {
        self.graph.clear_edges()
    }
}

impl<G> VertexShrinkableGraph for ReverseView<G>
where
    G: VertexShrinkableGraph,
{
    fn remove_vertex(&mut self, v: &Self::V) -> Result<()> {
        self.graph.remove_vertex(v)
    }

    fn clear(&mut self) -> Result<()> {
        self.graph.clear()
    }
}

/// Weights are indexed by edge, so reversing leaves them as they are.
impl<G> WeightedGraph for ReverseView<G>
where
    G: WeightedGraph,
{
    fn vertices_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        self.graph.vertices_weights(key)
    }

    fn edges_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        self.graph.edges_weights(key)
    }
}

/// Read access to the wrapped graph; every mutator fails with [GraphError::Unmodifiable].
///
/// Safe to hand to code that must not change the graph, including code running on other threads
/// while the owner does not mutate.
#[derive(Debug, Clone, Copy)]
pub struct UnmodifiableView<G> {
    graph: G,
}

impl<G> UnmodifiableView<G> {
    pub fn new(graph: G) -> Self {
        Self { graph }
    }

    /// Already unmodifiable, so this is the view itself.
    pub fn unmodifiable(&self) -> &Self {
        self
    }
}

impl<G> QueryableGraph for UnmodifiableView<G>
where
    G: QueryableGraph,
{
    forward_queryable!(self => self.graph);
}

impl<G> GrowableGraph for UnmodifiableView<G>
where
    G: QueryableGraph,
{
    fn add_vertex(&mut self) -> Result<Self::V> {
        Err(GraphError::Unmodifiable)
    }

    fn add_edge(&mut self, _: &Self::V, _: &Self::V) -> Result<Self::E> {
        Err(GraphError::Unmodifiable)
    }
}

impl<G> EdgeShrinkableGraph for UnmodifiableView<G>
where
    G: QueryableGraph,
{
    fn remove_edge(&mut self, _: &Self::E) -> Result<()> {
        Err(GraphError::Unmodifiable)
    }

    fn remove_edges_of(&mut self, _: &Self::V) -> Result<()> {
        Err(GraphError::Unmodifiable)
    }

    fn remove_in_edges_of(&mut self, _: &Self::V) -> Result<()> {
        Err(GraphError::Unmodifiable)
    }

    fn remove_out_edges_of(&mut self, _: &Self::V) -> Result<()> {
        Err(GraphError::Unmodifiable)
    }

    fn reverse_edge(&mut self, _: &Self::E) -> Result<()> {
        Err(GraphError::Unmodifiable)
    }

    fn clear_edges(&mut self) -> Result<()> {
        Err(GraphError::Unmodifiable)
    }
}

impl<G> VertexShrinkableGraph for UnmodifiableView<G>
where
    G: QueryableGraph,
{
    fn remove_vertex(&mut self, _: &Self::V) -> Result<()> {
        Err(GraphError::Unmodifiable)
    }

    fn clear(&mut self) -> Result<()> {
        Err(GraphError::Unmodifiable)
    }
}

impl<G> WeightedGraph for UnmodifiableView<G>
where
    G: WeightedGraph,
{
    fn vertices_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        self.graph.vertices_weights(key)
    }

    fn edges_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        self.graph.edges_weights(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> IndexGraph {
        let mut g = IndexGraphFactory::directed().new_graph().unwrap();
        let a = g.add_vertex().unwrap();
        let b = g.add_vertex().unwrap();
        let c = g.add_vertex().unwrap();
        g.add_edge(&a, &b).unwrap();
        g.add_edge(&b, &c).unwrap();
        g
    }

    #[test]
    fn reverse_swaps_endpoints() {
        let g = path();
        let (a, b) = (VertexId(0), VertexId(1));
        let r = g.reverse();
        let e = r.find_edge(&EdgeId(0)).unwrap();
        assert_eq!((e.source, e.target), (b, a));
        assert_eq!(r.get_edge(&b, &a).unwrap(), Some(EdgeId(0)));
        assert_eq!(r.get_edge(&a, &b).unwrap(), None);
        assert_eq!(r.out_degree(&a).unwrap(), 0);
        assert_eq!(r.in_degree(&a).unwrap(), 1);
        for e in r.out_edges(&b).unwrap() {
            assert_eq!(e.source, b);
        }
        assert_eq!(g.edge_source(&EdgeId(0)).unwrap(), a);
        assert_eq!(g.edge_target(&EdgeId(0)).unwrap(), b);
        assert_eq!(r.into_inner().edge_size(), 2);
    }

    #[test]
    fn reverse_view_sees_later_changes() {
        let mut g = path();
        {
            let mut r = ReverseView::new(&mut g);
            let e = r.add_edge(&VertexId(0), &VertexId(2)).unwrap();
            assert_eq!(r.edge_source(&e).unwrap(), VertexId(0));
            r.remove_out_edges_of(&VertexId(2)).unwrap();
        }
        let mut edges: Vec<_> = g.iter_edges().map(|e| (e.source, e.target)).collect();
        edges.sort();
        // the reversed (1, 2) was the only edge leaving 2 in the view
        assert_eq!(
            edges,
            vec![(VertexId(0), VertexId(1)), (VertexId(2), VertexId(0))]
        );
    }

    #[test]
    fn unmodifiable_rejects_mutation() {
        let g = path();
        let view = g.unmodifiable();
        assert_eq!(view.edge_size(), 2);
        assert_eq!(view.out_degree(&VertexId(1)).unwrap(), 1);
        let mut twice = view.unmodifiable().clone();
        assert_eq!(twice.add_vertex(), Err(GraphError::Unmodifiable));
        assert_eq!(twice.remove_edge(&EdgeId(0)), Err(GraphError::Unmodifiable));
        assert_eq!(twice.clear(), Err(GraphError::Unmodifiable));
        assert_eq!(
            twice.iter_edges().collect::<Vec<_>>(),
            g.iter_edges().collect::<Vec<_>>()
        );
        assert_eq!(g.vertex_size(), 3);
    }

    fn heaviest_edge<G: WeightedGraph>(g: &G, key: &str) -> Result<Option<(G::E, u32)>> {
        let lens = g.edges_weights::<u32>(key)?;
        let mut best = None;
        for e in g.iter_edges() {
            let len = lens.get(g.edge_index(&e.id)?)?;
            if best.as_ref().map_or(true, |(_, l)| len > *l) {
                best = Some((e.id, len));
            }
        }
        Ok(best)
    }

    #[test]
    fn views_read_weights() {
        let mut g = path();
        g.add_edges_weights("len", 1u32).unwrap();
        g.edges_weights_mut::<u32>("len").unwrap().set(EdgeId(1), 9).unwrap();
        g.add_vertices_weights("seen", false).unwrap();
        assert_eq!(heaviest_edge(&g.unmodifiable(), "len").unwrap(), Some((EdgeId(1), 9)));
        assert_eq!(heaviest_edge(&g.reverse(), "len").unwrap(), Some((EdgeId(1), 9)));
        let view = UnmodifiableView::new(ReverseView::new(&g));
        assert!(!view.vertices_weights::<bool>("seen").unwrap().get(VertexId(2)).unwrap());
        assert!(matches!(
            view.edges_weights::<u64>("len"),
            Err(GraphError::WeightsTypeMismatch { .. })
        ));
        assert!(matches!(
            view.edges_weights::<u32>("missing"),
            Err(GraphError::NoSuchWeights(_))
        ));

        let mut named: Graph<&str, u8> = IndexGraphFactory::undirected().new_id_graph().unwrap();
        named.add_vertex_with_id("a").unwrap();
        named.add_vertex_with_id("b").unwrap();
        named.add_edge_with_id(&"a", &"b", 4).unwrap();
        named.add_edges_weights("len", 6u32).unwrap();
        assert_eq!(heaviest_edge(&named.reverse(), "len").unwrap(), Some((4, 6)));
    }
}
