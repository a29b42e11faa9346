use crate::graph::*;
use crate::weights::*;
use crate::{GraphError, Result};
use std::fmt::Debug;
use std::hash::Hash;

/// An [IndexGraph] whose vertices and edges are named by caller ids.
///
/// Every operation translates ids to indices through two [IndexIdMap]s and runs on the
/// wrapped index graph. Removals keep the maps in step with index compaction,
/// so an id keeps naming the same element for as long as it lives.
///
/// Weights are still addressed by index, as algorithms see them;
/// [vertex_weight](Graph::vertex_weight) and [edge_weight](Graph::edge_weight) look them up by id.
#[derive(Clone)]
pub struct Graph<V, E>
where
    V: Clone + Eq + Hash + Debug,
    E: Clone + Eq + Hash + Debug,
{
    index_graph: IndexGraph,
    vertices: IndexIdMap<V>,
    edges: IndexIdMap<E>,
}

impl<V, E> Graph<V, E>
where
    V: Clone + Eq + Hash + Debug,
    E: Clone + Eq + Hash + Debug,
{
    pub(crate) fn from_parts(
        index_graph: IndexGraph,
        vertices: IndexIdMap<V>,
        edges: IndexIdMap<E>,
    ) -> Self {
        debug_assert_eq!(index_graph.vertex_size(), vertices.len());
        debug_assert_eq!(index_graph.edge_size(), edges.len());
        Self {
            index_graph,
            vertices,
            edges,
        }
    }

    /// The wrapped index graph, for running algorithms on indices.
    pub fn index_graph(&self) -> &IndexGraph {
        &self.index_graph
    }

    pub fn vertices_map(&self) -> &IndexIdMap<V> {
        &self.vertices
    }

    pub fn edges_map(&self) -> &IndexIdMap<E> {
        &self.edges
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.index_graph.storage_kind()
    }

    fn index_of_vertex(&self, v: &V) -> Result<VertexId> {
        self.vertices
            .index(v)
            .map(VertexId)
            .ok_or_else(|| GraphError::no_such_vertex(v))
    }

    fn index_of_edge(&self, e: &E) -> Result<EdgeId> {
        self.edges
            .index(e)
            .map(EdgeId)
            .ok_or_else(|| GraphError::no_such_edge(e))
    }

    /// Names an index edge by ids; the maps cover every live index.
    fn to_mapped(&self, e: Edge) -> Option<Edge<V, E>> {
        Some(Edge {
            id: self.edges.id(e.id.to_raw())?.clone(),
            source: self.vertices.id(e.source.to_raw())?.clone(),
            target: self.vertices.id(e.target.to_raw())?.clone(),
        })
    }

    fn mapped_iter<'a, I>(&'a self, it: I) -> Box<dyn Iterator<Item = Edge<V, E>> + 'a>
    where
        I: Iterator<Item = Edge> + 'a,
    {
        Box::new(it.filter_map(move |e| self.to_mapped(e)))
    }

    /// Adds a vertex named `id`; fails if `id` is taken.
    pub fn add_vertex_with_id(&mut self, id: V) -> Result<()> {
        self.vertices.check_new(&id)?;
        self.index_graph.insert_vertex()?;
        self.vertices.push(id)
    }

    /// Adds an edge named `id`; fails if `id` is taken or an endpoint is absent.
    pub fn add_edge_with_id(&mut self, source: &V, target: &V, id: E) -> Result<()> {
        self.edges.check_new(&id)?;
        let s = self.index_of_vertex(source)?;
        let t = self.index_of_vertex(target)?;
        self.index_graph.insert_edge(s, t)?;
        self.edges.push(id)
    }

    fn remove_edges_where(&mut self, v: &V, outgoing: bool, incoming: bool) -> Result<()> {
        let v = self.index_of_vertex(v)?;
        let (vertices, edges) = (&mut self.vertices, &mut self.edges);
        self.index_graph
            .remove_incident_observed(v, outgoing, incoming, &mut |kind, ev| {
                sync_maps(vertices, edges, kind, ev)
            })
    }

    /// A copy sharing no state with this graph, without listeners.
    pub fn copy(&self, copy_weights: bool) -> Self {
        Self::from_parts(
            self.index_graph.copy(copy_weights),
            self.vertices.clone(),
            self.edges.clone(),
        )
    }

    /// A copy on a compressed static storage; its mutators fail.
    pub fn immutable_copy(&self) -> Self {
        Self::from_parts(
            self.index_graph.immutable_copy(),
            self.vertices.clone(),
            self.edges.clone(),
        )
    }

    pub fn add_vertex_listener<F>(&mut self, f: F) -> ListenerId
    where
        F: FnMut(IndexEvent) + Send + Sync + 'static,
    {
        self.index_graph.add_vertex_listener(f)
    }

    pub fn remove_vertex_listener(&mut self, id: ListenerId) -> bool {
        self.index_graph.remove_vertex_listener(id)
    }

    pub fn add_edge_listener<F>(&mut self, f: F) -> ListenerId
    where
        F: FnMut(IndexEvent) + Send + Sync + 'static,
    {
        self.index_graph.add_edge_listener(f)
    }

    pub fn remove_edge_listener(&mut self, id: ListenerId) -> bool {
        self.index_graph.remove_edge_listener(id)
    }

    pub fn add_vertices_weights<T: WeightValue>(
        &mut self,
        key: &str,
        default: T,
    ) -> Result<&mut Weights<T>> {
        self.index_graph.add_vertices_weights(key, default)
    }

    pub fn vertices_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        self.index_graph.vertices_weights(key)
    }

    pub fn vertices_weights_mut<T: WeightValue>(&mut self, key: &str) -> Result<&mut Weights<T>> {
        self.index_graph.vertices_weights_mut(key)
    }

    pub fn remove_vertices_weights(&mut self, key: &str) -> bool {
        self.index_graph.remove_vertices_weights(key)
    }

    pub fn vertices_weights_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.index_graph.vertices_weights_keys()
    }

    pub fn vertex_weight<T: WeightValue>(&self, key: &str, v: &V) -> Result<T> {
        let index = self.index_of_vertex(v)?;
        self.vertices_weights::<T>(key)?.get(index)
    }

    /// Sets the weight of vertex `v` in the map `key`.
    ///
    /// `T` is taken from `value`, so it must be the map's exact type: an unsuffixed
    /// integer literal is an `i32` and misses a `u64` map. Write `3u64` or use a turbofish.
    pub fn set_vertex_weight<T: WeightValue>(&mut self, key: &str, v: &V, value: T) -> Result<()> {
        let index = self.index_of_vertex(v)?;
        self.vertices_weights_mut::<T>(key)?.set(index, value)
    }

    pub fn add_edges_weights<T: WeightValue>(
        &mut self,
        key: &str,
        default: T,
    ) -> Result<&mut Weights<T>> {
        self.index_graph.add_edges_weights(key, default)
    }

    pub fn edges_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        self.index_graph.edges_weights(key)
    }

    pub fn edges_weights_mut<T: WeightValue>(&mut self, key: &str) -> Result<&mut Weights<T>> {
        self.index_graph.edges_weights_mut(key)
    }

    pub fn remove_edges_weights(&mut self, key: &str) -> bool {
        self.index_graph.remove_edges_weights(key)
    }

    pub fn edges_weights_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.index_graph.edges_weights_keys()
    }

    pub fn edge_weight<T: WeightValue>(&self, key: &str, e: &E) -> Result<T> {
        let index = self.index_of_edge(e)?;
        self.edges_weights::<T>(key)?.get(index)
    }

    /// Sets the weight of edge `e` in the map `key`.
    ///
    /// As with [set_vertex_weight](Self::set_vertex_weight), `T` must be the map's exact type.
    pub fn set_edge_weight<T: WeightValue>(&mut self, key: &str, e: &E, value: T) -> Result<()> {
        let index = self.index_of_edge(e)?;
        self.edges_weights_mut::<T>(key)?.set(index, value)
    }

    /// A flow network over two attached `f64` edge weight maps, addressed by edge index.
    pub fn flow_network(
        &mut self,
        capacity_key: &str,
        flow_key: &str,
    ) -> Result<WeightsFlowNetwork<'_>> {
        self.index_graph.flow_network(capacity_key, flow_key)
    }
}

fn sync_maps<V, E>(
    vertices: &mut IndexIdMap<V>,
    edges: &mut IndexIdMap<E>,
    kind: ElementKind,
    event: IndexEvent,
) where
    V: Clone + Eq + Hash + Debug,
    E: Clone + Eq + Hash + Debug,
{
    match kind {
        ElementKind::Vertex => vertices.apply(event),
        ElementKind::Edge => edges.apply(event),
    }
}

impl<V, E> QueryableGraph for Graph<V, E>
where
    V: Clone + Eq + Hash + Debug,
    E: Clone + Eq + Hash + Debug,
{
    type V = V;
    type E = E;

    fn capabilities(&self) -> GraphCapabilities {
        self.index_graph.capabilities()
    }

    fn vertex_size(&self) -> usize {
        self.index_graph.vertex_size()
    }

    fn iter_vertices(&self) -> Box<dyn Iterator<Item = V> + '_> {
        Box::new(self.vertices.iter().cloned())
    }

    fn contains_vertex(&self, v: &V) -> bool {
        self.vertices.contains_id(v)
    }

    fn edge_size(&self) -> usize {
        self.index_graph.edge_size()
    }

    fn iter_edges(&self) -> Box<dyn Iterator<Item = Edge<V, E>> + '_> {
        self.mapped_iter(self.index_graph.iter_edges())
    }

    fn contains_edge(&self, e: &E) -> bool {
        self.edges.contains_id(e)
    }

    fn find_edge(&self, e: &E) -> Result<Edge<V, E>> {
        let index = self.index_of_edge(e)?;
        let edge = self.index_graph.find_edge(&index)?;
        self.to_mapped(edge)
            .ok_or_else(|| GraphError::no_such_edge(e))
    }

    fn edges_connecting(
        &self,
        source: &V,
        target: &V,
    ) -> Result<Box<dyn Iterator<Item = Edge<V, E>> + '_>> {
        let s = self.index_of_vertex(source)?;
        let t = self.index_of_vertex(target)?;
        Ok(self.mapped_iter(self.index_graph.edges_connecting(&s, &t)?))
    }

    fn in_edges(&self, v: &V) -> Result<Box<dyn Iterator<Item = Edge<V, E>> + '_>> {
        let v = self.index_of_vertex(v)?;
        Ok(self.mapped_iter(self.index_graph.in_edges(&v)?))
    }

    fn out_edges(&self, v: &V) -> Result<Box<dyn Iterator<Item = Edge<V, E>> + '_>> {
        let v = self.index_of_vertex(v)?;
        Ok(self.mapped_iter(self.index_graph.out_edges(&v)?))
    }

    fn out_degree(&self, v: &V) -> Result<usize> {
        self.index_graph.out_degree(&self.index_of_vertex(v)?)
    }

    fn in_degree(&self, v: &V) -> Result<usize> {
        self.index_graph.in_degree(&self.index_of_vertex(v)?)
    }

    fn vertex_index(&self, v: &V) -> Result<VertexId> {
        self.index_of_vertex(v)
    }

    fn vertex_by_index(&self, index: VertexId) -> Result<V> {
        self.vertices.index_to_id(index.to_raw())
    }

    fn edge_index(&self, e: &E) -> Result<EdgeId> {
        self.index_of_edge(e)
    }

    fn edge_by_index(&self, index: EdgeId) -> Result<E> {
        self.edges.index_to_id(index.to_raw())
    }
}

impl<V, E> GrowableGraph for Graph<V, E>
where
    V: Clone + Eq + Hash + Debug + AutoId,
    E: Clone + Eq + Hash + Debug + AutoId,
{
    fn add_vertex(&mut self) -> Result<V> {
        let id = self.vertices.next_auto_id()?;
        self.add_vertex_with_id(id.clone())?;
        Ok(id)
    }

    fn add_edge(&mut self, source: &V, target: &V) -> Result<E> {
        let s = self.index_of_vertex(source)?;
        let t = self.index_of_vertex(target)?;
        let id = self.edges.next_auto_id()?;
        self.index_graph.insert_edge(s, t)?;
        self.edges.push(id.clone())?;
        Ok(id)
    }
}

impl<V, E> EdgeShrinkableGraph for Graph<V, E>
where
    V: Clone + Eq + Hash + Debug,
    E: Clone + Eq + Hash + Debug,
{
    fn remove_edge(&mut self, e: &E) -> Result<()> {
        let e = self.index_of_edge(e)?;
        let (vertices, edges) = (&mut self.vertices, &mut self.edges);
        self.index_graph
            .remove_edge_observed(e, &mut |kind, ev| sync_maps(vertices, edges, kind, ev))
    }

    fn remove_edges_of(&mut self, v: &V) -> Result<()> {
        self.remove_edges_where(v, true, true)
    }

    fn remove_in_edges_of(&mut self, v: &V) -> Result<()> {
        self.remove_edges_where(v, false, true)
    }

    fn remove_out_edges_of(&mut self, v: &V) -> Result<()> {
        self.remove_edges_where(v, true, false)
    }

    fn reverse_edge(&mut self, e: &E) -> Result<()> {
        let e = self.index_of_edge(e)?;
        self.index_graph.flip_edge(e)
    }

    fn clear_edges(&mut self) -> Result<()> {
        let (vertices, edges) = (&mut self.vertices, &mut self.edges);
        self.index_graph
            .clear_edges_observed(&mut |kind, ev| sync_maps(vertices, edges, kind, ev))
    }
}

impl<V, E> VertexShrinkableGraph for Graph<V, E>
where
    V: Clone + Eq + Hash + Debug,
    E: Clone + Eq + Hash + Debug,
{
    fn remove_vertex(&mut self, v: &V) -> Result<()> {
        let v = self.index_of_vertex(v)?;
        let (vertices, edges) = (&mut self.vertices, &mut self.edges);
        self.index_graph
            .remove_vertex_observed(v, &mut |kind, ev| sync_maps(vertices, edges, kind, ev))
    }

    fn clear(&mut self) -> Result<()> {
        let (vertices, edges) = (&mut self.vertices, &mut self.edges);
        self.index_graph
            .clear_observed(&mut |kind, ev| sync_maps(vertices, edges, kind, ev))
    }
}

impl<V, E> WeightedGraph for Graph<V, E>
where
    V: Clone + Eq + Hash + Debug,
    E: Clone + Eq + Hash + Debug,
{
    fn vertices_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        Graph::vertices_weights(self, key)
    }

    fn edges_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        Graph::edges_weights(self, key)
    }
}

impl<V, E> std::fmt::Debug for Graph<V, E>
where
    V: Clone + Eq + Hash + Debug,
    E: Clone + Eq + Hash + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.debug())
    }
}

/// Graphs are equal when they have the same vertex ids and the same edge ids
/// connecting the same vertex ids, whatever their indices and storages.
impl<V, E> PartialEq for Graph<V, E>
where
    V: Clone + Eq + Hash + Debug,
    E: Clone + Eq + Hash + Debug,
{
    fn eq(&self, other: &Self) -> bool {
        if self.is_directed() != other.is_directed()
            || self.vertex_size() != other.vertex_size()
            || self.edge_size() != other.edge_size()
        {
            return false;
        }
        if !self.iter_vertices().all(|v| other.contains_vertex(&v)) {
            return false;
        }
        let directed = self.is_directed();
        self.iter_edges().all(|e| match other.find_edge(&e.id) {
            Ok(o) if directed => o == e,
            Ok(o) => o == e || o.reversed() == e,
            Err(_) => false,
        })
    }
}

impl<V, E> Eq for Graph<V, E>
where
    V: Clone + Eq + Hash + Debug,
    E: Clone + Eq + Hash + Debug,
{
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities() -> Graph<String, u32> {
        let mut g: Graph<String, u32> = IndexGraphFactory::undirected().new_id_graph().unwrap();
        for c in ["oslo", "rome", "lima", "kyiv"] {
            g.add_vertex_with_id(c.to_string()).unwrap();
        }
        g.add_edge_with_id(&"oslo".into(), &"rome".into(), 10).unwrap();
        g.add_edge_with_id(&"rome".into(), &"lima".into(), 20).unwrap();
        g.add_edge_with_id(&"lima".into(), &"kyiv".into(), 30).unwrap();
        g
    }

    #[test]
    fn ids_survive_compaction() {
        let mut g = cities();
        g.add_vertices_weights("pop", 0u64).unwrap();
        g.set_vertex_weight("pop", &"kyiv".to_string(), 3u64).unwrap();
        assert_eq!(
            g.set_vertex_weight("pop", &"kyiv".to_string(), 3),
            Err(GraphError::WeightsTypeMismatch {
                key: "pop".to_string(),
                expected: "i32",
                actual: "u64",
            })
        );
        g.remove_vertex(&"oslo".to_string()).unwrap();
        assert_eq!(g.vertex_size(), 3);
        assert_eq!(g.vertex_index(&"kyiv".to_string()).unwrap(), VertexId(0));
        assert_eq!(g.vertex_weight::<u64>("pop", &"kyiv".to_string()).unwrap(), 3);
        assert!(!g.contains_edge(&10));
        let e = g.find_edge(&30).unwrap();
        assert_eq!(
            (e.source.as_str(), e.target.as_str()),
            ("lima", "kyiv")
        );
        for v in g.iter_vertices() {
            let index = g.vertex_index(&v).unwrap();
            assert_eq!(g.vertex_by_index(index).unwrap(), v);
        }
        assert!(matches!(
            g.remove_vertex(&"oslo".to_string()),
            Err(GraphError::NoSuchVertex(_))
        ));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut g = cities();
        assert!(matches!(
            g.add_vertex_with_id("rome".into()),
            Err(GraphError::DuplicateVertex(_))
        ));
        assert!(matches!(
            g.add_edge_with_id(&"oslo".into(), &"kyiv".into(), 20),
            Err(GraphError::DuplicateEdge(_))
        ));
        assert!(matches!(
            g.add_edge_with_id(&"oslo".into(), &"nowhere".into(), 40),
            Err(GraphError::NoSuchVertex(_))
        ));
        assert_eq!(g.edge_size(), 3);
        assert_eq!(g.vertex_size(), 4);
    }

    #[test]
    fn auto_ids() {
        let mut g: Graph<u32, u32> = IndexGraphFactory::directed().new_id_graph().unwrap();
        g.add_vertex_with_id(0).unwrap();
        let a = g.add_vertex().unwrap();
        let b = g.add_vertex().unwrap();
        assert_eq!((a, b), (1, 2));
        let e = g.add_edge(&a, &b).unwrap();
        assert_eq!(g.edge_endpoint(&e, &b).unwrap(), a);
        g.remove_vertex(&a).unwrap();
        assert_eq!(g.add_vertex().unwrap(), 3);
    }

    #[test]
    fn copies_are_equal_and_independent() {
        let mut g = cities();
        g.add_edges_weights("km", 0.0f64).unwrap();
        g.set_edge_weight("km", &20, 9.5).unwrap();
        let mut copy = g.copy(true);
        assert_eq!(copy, g);
        assert_eq!(copy.edge_weight::<f64>("km", &20).unwrap(), 9.5);
        copy.remove_edge(&20).unwrap();
        copy.clear_edges().unwrap();
        assert_ne!(copy, g);
        assert_eq!(g.edge_size(), 3);
        assert_eq!(g.edge_weight::<f64>("km", &20).unwrap(), 9.5);
        let frozen = g.immutable_copy();
        assert_eq!(frozen, g);
        assert_eq!(frozen.storage_kind(), StorageKind::Csr);
    }

    #[test]
    fn remove_edges_of_vertex() {
        let mut g = cities();
        g.remove_edges_of(&"rome".to_string()).unwrap();
        assert_eq!(g.iter_edges().map(|e| e.id).collect::<Vec<_>>(), vec![30]);
        g.clear().unwrap();
        assert_eq!(g.vertex_size(), 0);
        assert!(g.vertices_map().is_empty());
        assert!(g.edges_map().is_empty());
    }
}
