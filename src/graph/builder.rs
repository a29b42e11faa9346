use crate::graph::index_graph::{fill_storage, validate_edges};
use crate::graph::*;
use crate::weights::*;
use crate::{GraphError, Result};
use ahash::RandomState;
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

/// A permutation of edge indices applied while building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReindexingMap {
    orig_to_reindexed: Vec<EdgeId>,
    reindexed_to_orig: Vec<EdgeId>,
}

impl ReindexingMap {
    /// `order[i]` is the original index of the edge now at index `i`.
    fn from_order(order: &[usize]) -> Self {
        let reindexed_to_orig: Vec<_> = order.iter().map(|i| EdgeId(*i)).collect();
        let mut orig_to_reindexed = vec![EdgeId::MIN; order.len()];
        for (i, orig) in order.iter().enumerate() {
            orig_to_reindexed[*orig] = EdgeId(i);
        }
        Self {
            orig_to_reindexed,
            reindexed_to_orig,
        }
    }

    fn reindexed_to_orig_order(&self) -> Vec<usize> {
        self.reindexed_to_orig.iter().map(|e| e.to_raw()).collect()
    }

    pub fn len(&self) -> usize {
        self.orig_to_reindexed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orig_to_reindexed.is_empty()
    }

    /// Where the edge added as `orig` ended up.
    pub fn orig_to_reindexed(&self, orig: EdgeId) -> Result<EdgeId> {
        self.orig_to_reindexed
            .get(orig.to_raw())
            .copied()
            .ok_or_else(|| GraphError::no_such_edge(orig))
    }

    /// Which edge, in the order they were added, sits at `reindexed`.
    pub fn reindexed_to_orig(&self, reindexed: EdgeId) -> Result<EdgeId> {
        self.reindexed_to_orig
            .get(reindexed.to_raw())
            .copied()
            .ok_or_else(|| GraphError::no_such_edge(reindexed))
    }
}

/// The result of [IndexGraphBuilder::reindex_and_build].
#[derive(Debug)]
pub struct ReindexedGraph {
    pub graph: IndexGraph,
    /// `None` when edges kept the indices they were added with.
    pub edges_reindexing: Option<ReindexingMap>,
}

/// The result of [GraphBuilder::reindex_and_build].
///
/// Ids follow their edges, so the map only matters to code holding edge indices.
#[derive(Debug)]
pub struct ReindexedIdGraph<V, E>
where
    V: Clone + Eq + Hash + Debug,
    E: Clone + Eq + Hash + Debug,
{
    pub graph: Graph<V, E>,
    /// `None` when edges kept the indices they were added with.
    pub edges_reindexing: Option<ReindexingMap>,
}

/// Edges added with explicit indices, in any order; slot `i` holds edge `i`.
#[derive(Debug, Clone, Default)]
struct ExplicitEdges {
    slots: Vec<Option<Endpoints>>,
    len: usize,
}

/// Collects vertices, edges and weights, then builds an [IndexGraph] in one go.
///
/// Indices are assigned in insertion order, unless edges are added with
/// [add_edge_with_index](Self::add_edge_with_index); the two ways do not mix until [clear](Self::clear).
/// Capabilities are checked at build time,
/// which lets a compressed static graph be built from edges only known up front.
/// Building consumes the builder.
#[derive(Debug, Clone)]
pub struct IndexGraphBuilder {
    factory: IndexGraphFactory,
    vertex_size: usize,
    endpoints: Vec<Endpoints>,
    explicit: Option<ExplicitEdges>,
    vertices_weights: WeightsSet,
    edges_weights: WeightsSet,
}

/// Stable counting sort of edge indices by source.
fn order_by_source(vertex_size: usize, endpoints: &[Endpoints]) -> Vec<usize> {
    let mut begin = vec![0usize; vertex_size + 1];
    for (s, _) in endpoints.iter() {
        begin[s.to_raw() + 1] += 1;
    }
    for i in 0..vertex_size {
        begin[i + 1] += begin[i];
    }
    let mut order = vec![0usize; endpoints.len()];
    for (i, (s, _)) in endpoints.iter().enumerate() {
        order[begin[s.to_raw()]] = i;
        begin[s.to_raw()] += 1;
    }
    order
}

impl IndexGraphBuilder {
    pub fn new(directed: bool) -> Self {
        Self::with_factory(IndexGraphFactory::new(directed))
    }

    pub(crate) fn with_factory(factory: IndexGraphFactory) -> Self {
        let (_, edges) = factory.expected_sizes();
        Self {
            factory,
            vertex_size: 0,
            endpoints: Vec::with_capacity(edges),
            explicit: None,
            vertices_weights: WeightsSet::new(ElementKind::Vertex, 0),
            edges_weights: WeightsSet::new(ElementKind::Edge, 0),
        }
    }

    /// A builder already holding the vertices and edges of `g`, with the same indices.
    pub fn new_copy_of(g: &IndexGraph, copy_weights: bool) -> Self {
        let capabilities = g.capabilities();
        let factory = IndexGraphFactory::new(capabilities.directed)
            .allow_self_edges(capabilities.self_edges)
            .allow_parallel_edges(capabilities.parallel_edges);
        let (vertices_weights, edges_weights) = if copy_weights {
            let (v, e) = g.weights_sets();
            (v.clone(), e.clone())
        } else {
            (
                WeightsSet::new(ElementKind::Vertex, g.vertex_size()),
                WeightsSet::new(ElementKind::Edge, g.edge_size()),
            )
        };
        Self {
            factory,
            vertex_size: g.vertex_size(),
            endpoints: g.endpoints().to_vec(),
            explicit: None,
            vertices_weights,
            edges_weights,
        }
    }

    pub fn is_directed(&self) -> bool {
        self.factory.capabilities().directed
    }

    pub fn vertex_size(&self) -> usize {
        self.vertex_size
    }

    pub fn edge_size(&self) -> usize {
        self.endpoints.len() + self.explicit.as_ref().map_or(0, |x| x.len)
    }

    /// Reserves room for `n` more edges.
    pub fn expected_edges(&mut self, n: usize) {
        self.endpoints.reserve(n);
    }

    pub fn add_vertex(&mut self) -> Result<VertexId> {
        if self.vertex_size == VertexId::MAX.to_raw() {
            return Err(GraphError::IdSpaceExhausted);
        }
        let v = VertexId(self.vertex_size);
        self.vertex_size += 1;
        self.vertices_weights.push_default();
        Ok(v)
    }

    /// Adds `n` vertices, numbered after the existing ones.
    pub fn add_vertices(&mut self, n: usize) -> Result<Vec<VertexId>> {
        if VertexId::MAX.to_raw() - self.vertex_size < n {
            return Err(GraphError::IdSpaceExhausted);
        }
        (0..n).map(|_| self.add_vertex()).collect()
    }

    fn check_vertex(&self, v: VertexId) -> Result<()> {
        if v.to_raw() < self.vertex_size {
            Ok(())
        } else {
            Err(GraphError::no_such_vertex(v))
        }
    }

    /// Adds an edge between existing vertices.
    ///
    /// Self and parallel edges are only rejected by `build`.
    pub fn add_edge(&mut self, source: VertexId, target: VertexId) -> Result<EdgeId> {
        if self.explicit.is_some() {
            return Err(GraphError::MixedEdgeIndexing);
        }
        self.check_vertex(source)?;
        self.check_vertex(target)?;
        let e = EdgeId(self.endpoints.len());
        self.endpoints.push((source, target));
        self.edges_weights.push_default();
        Ok(e)
    }

    /// Adds edges with the next indices, in iteration order.
    ///
    /// Nothing is added when some endpoint does not exist.
    pub fn add_edges<I>(&mut self, edges: I) -> Result<Vec<EdgeId>>
    where
        I: IntoIterator<Item = Endpoints>,
    {
        if self.explicit.is_some() {
            return Err(GraphError::MixedEdgeIndexing);
        }
        let edges: Vec<Endpoints> = edges.into_iter().collect();
        for (s, t) in edges.iter() {
            self.check_vertex(*s)?;
            self.check_vertex(*t)?;
        }
        self.endpoints.reserve(edges.len());
        edges
            .into_iter()
            .map(|(s, t)| self.add_edge(s, t))
            .collect()
    }

    /// Adds an edge with its final index chosen by the caller.
    ///
    /// Edges may come in any order, but by build time their indices must be exactly `[0, m)`.
    /// Edge weights are addressed by these indices as soon as the edge is added.
    pub fn add_edge_with_index(
        &mut self,
        source: VertexId,
        target: VertexId,
        e: EdgeId,
    ) -> Result<()> {
        if !self.endpoints.is_empty() {
            return Err(GraphError::MixedEdgeIndexing);
        }
        self.check_vertex(source)?;
        self.check_vertex(target)?;
        if e == EdgeId::MAX {
            return Err(GraphError::IdSpaceExhausted);
        }
        let explicit = self.explicit.get_or_insert_with(ExplicitEdges::default);
        let i = e.to_raw();
        if explicit.slots.get(i).map_or(false, Option::is_some) {
            return Err(GraphError::DuplicateEdge(format!("{:?}", e)));
        }
        if explicit.slots.len() <= i {
            explicit.slots.resize(i + 1, None);
        }
        explicit.slots[i] = Some((source, target));
        explicit.len += 1;
        while self.edges_weights.len() <= i {
            self.edges_weights.push_default();
        }
        Ok(())
    }

    pub fn edge_endpoints(&self, e: EdgeId) -> Result<Endpoints> {
        let found = match &self.explicit {
            Some(explicit) => explicit.slots.get(e.to_raw()).copied().flatten(),
            None => self.endpoints.get(e.to_raw()).copied(),
        };
        found.ok_or_else(|| GraphError::no_such_edge(e))
    }

    /// Moves edges added with explicit indices into index order.
    fn settle_edges(&mut self) -> Result<()> {
        if let Some(explicit) = self.explicit.take() {
            let missing = |i| GraphError::SparseEdgeIndices(format!("{:?}", EdgeId(i)));
            self.endpoints = explicit
                .slots
                .into_iter()
                .enumerate()
                .map(|(i, slot)| slot.ok_or_else(|| missing(i)))
                .collect::<Result<_>>()?;
        }
        Ok(())
    }

    pub fn add_vertices_weights<T: WeightValue>(
        &mut self,
        key: &str,
        default: T,
    ) -> Result<&mut Weights<T>> {
        self.vertices_weights.add(key, default)
    }

    pub fn vertices_weights_mut<T: WeightValue>(&mut self, key: &str) -> Result<&mut Weights<T>> {
        self.vertices_weights.get_mut(key)
    }

    pub fn add_edges_weights<T: WeightValue>(
        &mut self,
        key: &str,
        default: T,
    ) -> Result<&mut Weights<T>> {
        self.edges_weights.add(key, default)
    }

    pub fn edges_weights_mut<T: WeightValue>(&mut self, key: &str) -> Result<&mut Weights<T>> {
        self.edges_weights.get_mut(key)
    }

    /// Drops every vertex, edge and weight map collected so far.
    pub fn clear(&mut self) {
        self.vertex_size = 0;
        self.endpoints.clear();
        self.explicit = None;
        self.vertices_weights = WeightsSet::new(ElementKind::Vertex, 0);
        self.edges_weights = WeightsSet::new(ElementKind::Edge, 0);
    }

    /// A mutable graph on the storage chosen by the factory configuration.
    pub fn build(self) -> Result<IndexGraph> {
        let kind = self.factory.choose_storage()?;
        self.assemble(kind)
    }

    /// A graph on a compressed static storage, with edges keeping their indices.
    pub fn build_immutable(self) -> Result<IndexGraph> {
        self.assemble(StorageKind::Csr)
    }

    /// A compressed static graph whose edges may be reordered for locality.
    ///
    /// Directed graphs get their edges sorted by source, stable within a source,
    /// so the out edges of every vertex have consecutive indices.
    /// Edge weights are reordered with them; vertices keep their indices.
    pub fn reindex_and_build(self) -> Result<ReindexedGraph> {
        self.reindex_onto(StorageKind::Csr)
    }

    /// Like [reindex_and_build](Self::reindex_and_build), on the mutable storage
    /// chosen by the factory configuration.
    pub fn reindex_and_build_mutable(self) -> Result<ReindexedGraph> {
        let kind = self.factory.choose_storage()?;
        self.reindex_onto(kind)
    }

    fn reindex_onto(mut self, kind: StorageKind) -> Result<ReindexedGraph> {
        self.settle_edges()?;
        let capabilities = self.factory.capabilities();
        validate_edges(capabilities, kind, self.vertex_size, &self.endpoints)?;
        let mut edges_reindexing = None;
        if capabilities.directed {
            let order = order_by_source(self.vertex_size, &self.endpoints);
            if order.iter().enumerate().any(|(i, x)| i != *x) {
                self.endpoints = order.iter().map(|i| self.endpoints[*i]).collect();
                self.edges_weights = self.edges_weights.permuted(&order);
                edges_reindexing = Some(ReindexingMap::from_order(&order));
            }
        }
        debug!(reindexed = edges_reindexing.is_some(), "edges reindexed");
        Ok(ReindexedGraph {
            graph: self.assemble(kind)?,
            edges_reindexing,
        })
    }

    fn assemble(mut self, kind: StorageKind) -> Result<IndexGraph> {
        self.settle_edges()?;
        let capabilities = self.factory.capabilities();
        validate_edges(capabilities, kind, self.vertex_size, &self.endpoints)?;
        let storage = fill_storage(kind, capabilities.directed, self.vertex_size, &self.endpoints)?;
        debug!(
            ?kind,
            vertices = self.vertex_size,
            edges = self.endpoints.len(),
            "graph built"
        );
        Ok(IndexGraph::from_parts(
            capabilities,
            storage,
            self.vertex_size,
            self.endpoints,
            self.vertices_weights,
            self.edges_weights,
        ))
    }
}

/// Collects vertices and edges named by caller ids, then builds a [Graph].
#[derive(Debug, Clone)]
pub struct GraphBuilder<V, E>
where
    V: Clone + Eq + Hash + Debug,
    E: Clone + Eq + Hash + Debug,
{
    builder: IndexGraphBuilder,
    vertices: IndexIdMap<V>,
    edges: IndexIdMap<E>,
}

impl<V, E> GraphBuilder<V, E>
where
    V: Clone + Eq + Hash + Debug,
    E: Clone + Eq + Hash + Debug,
{
    pub fn new(directed: bool) -> Self {
        Self::with_factory(IndexGraphFactory::new(directed))
    }

    pub(crate) fn with_factory(factory: IndexGraphFactory) -> Self {
        Self {
            builder: IndexGraphBuilder::with_factory(factory),
            vertices: IndexIdMap::new(ElementKind::Vertex),
            edges: IndexIdMap::new(ElementKind::Edge),
        }
    }

    /// A builder already holding `g`, with the same ids and indices.
    pub fn new_copy_of(g: &Graph<V, E>, copy_weights: bool) -> Self {
        Self {
            builder: IndexGraphBuilder::new_copy_of(g.index_graph(), copy_weights),
            vertices: g.vertices_map().clone(),
            edges: g.edges_map().clone(),
        }
    }

    pub fn vertex_size(&self) -> usize {
        self.builder.vertex_size()
    }

    pub fn edge_size(&self) -> usize {
        self.builder.edge_size()
    }

    pub fn add_vertex_with_id(&mut self, id: V) -> Result<()> {
        self.vertices.check_new(&id)?;
        self.builder.add_vertex()?;
        self.vertices.push(id)
    }

    pub fn add_edge_with_id(&mut self, source: &V, target: &V, id: E) -> Result<()> {
        self.edges.check_new(&id)?;
        let s = self.vertex_index(source)?;
        let t = self.vertex_index(target)?;
        self.builder.add_edge(s, t)?;
        self.edges.push(id)
    }

    /// Adds vertices in iteration order; nothing is added when some id is taken.
    pub fn add_vertices_with_ids<I>(&mut self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
    {
        let ids: Vec<V> = ids.into_iter().collect();
        let mut fresh = HashSet::with_capacity_and_hasher(ids.len(), RandomState::new());
        for id in ids.iter() {
            self.vertices.check_new(id)?;
            if !fresh.insert(id) {
                return Err(GraphError::DuplicateVertex(format!("{:?}", id)));
            }
        }
        for id in ids {
            self.add_vertex_with_id(id)?;
        }
        Ok(())
    }

    /// Adds `(source, target, id)` edges in iteration order.
    ///
    /// Nothing is added when some id is taken or some endpoint does not exist.
    pub fn add_edges_with_ids<I>(&mut self, edges: I) -> Result<()>
    where
        I: IntoIterator<Item = (V, V, E)>,
    {
        let edges: Vec<(V, V, E)> = edges.into_iter().collect();
        let mut fresh = HashSet::with_capacity_and_hasher(edges.len(), RandomState::new());
        for (s, t, id) in edges.iter() {
            self.edges.check_new(id)?;
            if !fresh.insert(id) {
                return Err(GraphError::DuplicateEdge(format!("{:?}", id)));
            }
            self.vertex_index(s)?;
            self.vertex_index(t)?;
        }
        for (s, t, id) in edges {
            self.add_edge_with_id(&s, &t, id)?;
        }
        Ok(())
    }

    fn vertex_index(&self, v: &V) -> Result<VertexId> {
        self.vertices
            .index(v)
            .map(VertexId)
            .ok_or_else(|| GraphError::no_such_vertex(v))
    }

    fn edge_index(&self, e: &E) -> Result<EdgeId> {
        self.edges
            .index(e)
            .map(EdgeId)
            .ok_or_else(|| GraphError::no_such_edge(e))
    }

    pub fn add_vertices_weights<T: WeightValue>(
        &mut self,
        key: &str,
        default: T,
    ) -> Result<&mut Weights<T>> {
        self.builder.add_vertices_weights(key, default)
    }

    /// `T` must be the map's exact type; suffix literals, as in `3u64`.
    pub fn set_vertex_weight<T: WeightValue>(&mut self, key: &str, v: &V, value: T) -> Result<()> {
        let index = self.vertex_index(v)?;
        self.builder.vertices_weights_mut::<T>(key)?.set(index, value)
    }

    pub fn add_edges_weights<T: WeightValue>(
        &mut self,
        key: &str,
        default: T,
    ) -> Result<&mut Weights<T>> {
        self.builder.add_edges_weights(key, default)
    }

    /// `T` must be the map's exact type; suffix literals, as in `7u32`.
    pub fn set_edge_weight<T: WeightValue>(&mut self, key: &str, e: &E, value: T) -> Result<()> {
        let index = self.edge_index(e)?;
        self.builder.edges_weights_mut::<T>(key)?.set(index, value)
    }

    pub fn clear(&mut self) {
        self.builder.clear();
        self.vertices = IndexIdMap::new(ElementKind::Vertex);
        self.edges = IndexIdMap::new(ElementKind::Edge);
    }

    pub fn build(self) -> Result<Graph<V, E>> {
        let graph = self.builder.build()?;
        Ok(Graph::from_parts(graph, self.vertices, self.edges))
    }

    /// A graph on a compressed static storage.
    ///
    /// Edge indices may be reordered for locality; ids follow their edges.
    pub fn build_immutable(self) -> Result<Graph<V, E>> {
        self.reindex_and_build().map(|r| r.graph)
    }

    /// Like [build_immutable](Self::build_immutable), also telling where each edge index went.
    pub fn reindex_and_build(self) -> Result<ReindexedIdGraph<V, E>> {
        let reindexed = self.builder.reindex_and_build()?;
        Ok(Self::follow_ids(reindexed, self.vertices, self.edges))
    }

    /// A mutable graph with edges reordered for locality; ids follow their edges.
    pub fn reindex_and_build_mutable(self) -> Result<ReindexedIdGraph<V, E>> {
        let reindexed = self.builder.reindex_and_build_mutable()?;
        Ok(Self::follow_ids(reindexed, self.vertices, self.edges))
    }

    fn follow_ids(
        reindexed: ReindexedGraph,
        vertices: IndexIdMap<V>,
        edges: IndexIdMap<E>,
    ) -> ReindexedIdGraph<V, E> {
        let edges = match &reindexed.edges_reindexing {
            Some(map) => edges.permuted(&map.reindexed_to_orig_order()),
            None => edges,
        };
        ReindexedIdGraph {
            graph: Graph::from_parts(reindexed.graph, vertices, edges),
            edges_reindexing: reindexed.edges_reindexing,
        }
    }
}

impl<V, E> GraphBuilder<V, E>
where
    V: Clone + Eq + Hash + Debug + AutoId,
    E: Clone + Eq + Hash + Debug + AutoId,
{
    pub fn add_vertex(&mut self) -> Result<V> {
        let id = self.vertices.next_auto_id()?;
        self.add_vertex_with_id(id.clone())?;
        Ok(id)
    }

    pub fn add_edge(&mut self, source: &V, target: &V) -> Result<E> {
        let s = self.vertex_index(source)?;
        let t = self.vertex_index(target)?;
        let id = self.edges.next_auto_id()?;
        self.builder.add_edge(s, t)?;
        self.edges.push(id.clone())?;
        Ok(id)
    }
}
