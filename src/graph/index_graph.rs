use crate::graph::storage::Storage;
use crate::graph::*;
use crate::weights::*;
use crate::{GraphError, Result};
use ahash::RandomState;
use std::collections::HashSet;
use tracing::trace;

/// Called with every index event before user listeners run.
pub(crate) type Observer<'a> = &'a mut dyn FnMut(ElementKind, IndexEvent);

/// A graph whose vertices are `[0, n)` and edges are `[0, m)`.
///
/// This is the form algorithms run on: vertex and edge ids are their indices,
/// so [vertex_index](QueryableGraph::vertex_index) and friends are the identity.
///
/// Removals keep both index spaces dense.
/// Removing a vertex or an edge that is not the last one moves the last one into the freed index,
/// fires [IndexEvent::Swap] and, for a vertex, rewrites the endpoints of edges incident to the moved vertex.
/// Removing the last one fires [IndexEvent::RemoveLast].
/// Weights attached through [add_vertices_weights](IndexGraph::add_vertices_weights)
/// and [add_edges_weights](IndexGraph::add_edges_weights) follow these moves.
///
/// Build one with [IndexGraphFactory] or [IndexGraphBuilder].
pub struct IndexGraph {
    capabilities: GraphCapabilities,
    storage: Storage,
    vertex_size: usize,
    endpoints: Vec<Endpoints>,
    vertices_weights: WeightsSet,
    edges_weights: WeightsSet,
    vertex_listeners: Listeners,
    edge_listeners: Listeners,
}

impl IndexGraph {
    pub(crate) fn new(capabilities: GraphCapabilities, storage: Storage) -> Self {
        Self::from_parts(
            capabilities,
            storage,
            0,
            vec![],
            WeightsSet::new(ElementKind::Vertex, 0),
            WeightsSet::new(ElementKind::Edge, 0),
        )
    }

    /// Assembles a graph from a storage already holding `vertex_size` vertices and `endpoints`.
    pub(crate) fn from_parts(
        capabilities: GraphCapabilities,
        storage: Storage,
        vertex_size: usize,
        endpoints: Vec<Endpoints>,
        vertices_weights: WeightsSet,
        edges_weights: WeightsSet,
    ) -> Self {
        debug_assert_eq!(vertices_weights.len(), vertex_size);
        debug_assert_eq!(edges_weights.len(), endpoints.len());
        Self {
            capabilities,
            storage,
            vertex_size,
            endpoints,
            vertices_weights,
            edges_weights,
            vertex_listeners: Listeners::new(),
            edge_listeners: Listeners::new(),
        }
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.storage.kind()
    }

    /// The identity translation of vertex indices, for code shared with [Graph].
    pub fn vertices_id_map(&self) -> IdentityIdMap {
        IdentityIdMap::new(ElementKind::Vertex, self.vertex_size)
    }

    pub fn edges_id_map(&self) -> IdentityIdMap {
        IdentityIdMap::new(ElementKind::Edge, self.endpoints.len())
    }

    pub(crate) fn endpoints(&self) -> &[Endpoints] {
        &self.endpoints
    }

    fn check_vertex(&self, v: VertexId) -> Result<VertexId> {
        if v.to_raw() < self.vertex_size {
            Ok(v)
        } else {
            Err(GraphError::no_such_vertex(v))
        }
    }

    fn check_edge(&self, e: EdgeId) -> Result<Endpoints> {
        self.endpoints
            .get(e.to_raw())
            .copied()
            .ok_or_else(|| GraphError::no_such_edge(e))
    }

    fn to_edge(&self, e: EdgeId) -> Edge {
        let (source, target) = self.endpoints[e.to_raw()];
        Edge {
            id: e,
            source,
            target,
        }
    }

    /// Orients `e` so that `v` is its source, for undirected graphs.
    fn out_edge(&self, e: EdgeId, v: VertexId) -> Edge {
        let edge = self.to_edge(e);
        if edge.source == v {
            edge
        } else {
            edge.reversed()
        }
    }

    fn in_edge(&self, e: EdgeId, v: VertexId) -> Edge {
        let edge = self.to_edge(e);
        if edge.target == v {
            edge
        } else {
            edge.reversed()
        }
    }

    fn fire(&mut self, kind: ElementKind, event: IndexEvent, observer: Observer) {
        trace!(?kind, ?event, "index event");
        match kind {
            ElementKind::Vertex => {
                self.vertices_weights.apply(event);
                observer(kind, event);
                self.vertex_listeners.fire(event);
            }
            ElementKind::Edge => {
                self.edges_weights.apply(event);
                observer(kind, event);
                self.edge_listeners.fire(event);
            }
        }
    }

    pub(crate) fn insert_vertex(&mut self) -> Result<VertexId> {
        if self.vertex_size == VertexId::MAX.to_raw() {
            return Err(GraphError::IdSpaceExhausted);
        }
        self.storage.adjacency_mut()?.add_vertex();
        let v = VertexId(self.vertex_size);
        self.vertex_size += 1;
        self.vertices_weights.push_default();
        Ok(v)
    }

    pub(crate) fn insert_edge(&mut self, source: VertexId, target: VertexId) -> Result<EdgeId> {
        self.check_vertex(source)?;
        self.check_vertex(target)?;
        if source == target && !self.capabilities.self_edges {
            return Err(GraphError::SelfEdgesNotAllowed);
        }
        if !self.capabilities.parallel_edges
            && self
                .storage
                .adjacency()
                .edges_between(source, target, &self.endpoints)
                .next()
                .is_some()
        {
            return Err(GraphError::ParallelEdgesNotAllowed);
        }
        if self.endpoints.len() == EdgeId::MAX.to_raw() {
            return Err(GraphError::IdSpaceExhausted);
        }
        let e = EdgeId(self.endpoints.len());
        self.storage.adjacency_mut()?.add_edge(e, source, target);
        self.endpoints.push((source, target));
        self.edges_weights.push_default();
        Ok(e)
    }

    pub(crate) fn remove_edge_observed(&mut self, e: EdgeId, observer: Observer) -> Result<()> {
        let (source, target) = self.check_edge(e)?;
        let adj = self.storage.adjacency_mut()?;
        adj.remove_edge(e, source, target);
        let last = EdgeId(self.endpoints.len() - 1);
        let event = if e != last {
            let (s, t) = self.endpoints[last.to_raw()];
            adj.move_edge(last, e, s, t);
            self.endpoints[e.to_raw()] = (s, t);
            IndexEvent::Swap {
                from: last.to_raw(),
                to: e.to_raw(),
            }
        } else {
            IndexEvent::RemoveLast {
                index: e.to_raw(),
            }
        };
        adj.pop_edge();
        self.endpoints.pop();
        self.fire(ElementKind::Edge, event, observer);
        Ok(())
    }

    fn first_incident(&self, v: VertexId, outgoing: bool, incoming: bool) -> Option<EdgeId> {
        let adj = self.storage.adjacency();
        let out = if outgoing { adj.out_edges(v).next() } else { None };
        out.or_else(|| {
            if incoming {
                adj.in_edges(v).next()
            } else {
                None
            }
        })
    }

    pub(crate) fn remove_incident_observed(
        &mut self,
        v: VertexId,
        outgoing: bool,
        incoming: bool,
        observer: Observer,
    ) -> Result<()> {
        self.check_vertex(v)?;
        self.storage.adjacency_mut()?;
        while let Some(e) = self.first_incident(v, outgoing, incoming) {
            self.remove_edge_observed(e, observer)?;
        }
        Ok(())
    }

    pub(crate) fn remove_vertex_observed(&mut self, v: VertexId, observer: Observer) -> Result<()> {
        self.remove_incident_observed(v, true, true, observer)?;
        let last = VertexId(self.vertex_size - 1);
        let moved: Vec<EdgeId> = if v != last {
            let adj = self.storage.adjacency();
            adj.out_edges(last).chain(adj.in_edges(last)).collect()
        } else {
            vec![]
        };
        self.storage.adjacency_mut()?.remove_vertex(v);
        self.vertex_size -= 1;
        let event = if v != last {
            for e in moved {
                let (s, t) = &mut self.endpoints[e.to_raw()];
                if *s == last {
                    *s = v;
                }
                if *t == last {
                    *t = v;
                }
            }
            IndexEvent::Swap {
                from: last.to_raw(),
                to: v.to_raw(),
            }
        } else {
            IndexEvent::RemoveLast {
                index: v.to_raw(),
            }
        };
        self.fire(ElementKind::Vertex, event, observer);
        Ok(())
    }

    pub(crate) fn clear_edges_observed(&mut self, observer: Observer) -> Result<()> {
        let adj = self.storage.adjacency_mut()?;
        if self.endpoints.is_empty() {
            return Ok(());
        }
        adj.clear_edges();
        self.endpoints.clear();
        self.fire(ElementKind::Edge, IndexEvent::Clear, observer);
        Ok(())
    }

    pub(crate) fn clear_observed(&mut self, observer: Observer) -> Result<()> {
        self.clear_edges_observed(observer)?;
        if self.vertex_size == 0 {
            return Ok(());
        }
        self.storage.adjacency_mut()?.clear();
        self.vertex_size = 0;
        self.fire(ElementKind::Vertex, IndexEvent::Clear, observer);
        Ok(())
    }

    pub(crate) fn flip_edge(&mut self, e: EdgeId) -> Result<()> {
        let (source, target) = self.check_edge(e)?;
        self.storage.adjacency_mut()?;
        if source == target {
            return Ok(());
        }
        if self.capabilities.directed
            && !self.capabilities.parallel_edges
            && self
                .storage
                .adjacency()
                .edges_between(target, source, &self.endpoints)
                .next()
                .is_some()
        {
            return Err(GraphError::ParallelEdgesNotAllowed);
        }
        let adj = self.storage.adjacency_mut()?;
        adj.remove_edge(e, source, target);
        adj.add_edge(e, target, source);
        self.endpoints[e.to_raw()] = (target, source);
        Ok(())
    }

    /// Registers a callback for vertex index events.
    ///
    /// It runs after attached weights and id maps have been updated, before the removing call returns.
    pub fn add_vertex_listener<F>(&mut self, f: F) -> ListenerId
    where
        F: FnMut(IndexEvent) + Send + Sync + 'static,
    {
        self.vertex_listeners.add(Box::new(f))
    }

    pub fn remove_vertex_listener(&mut self, id: ListenerId) -> bool {
        self.vertex_listeners.remove(id)
    }

    /// Registers a callback for edge index events.
    pub fn add_edge_listener<F>(&mut self, f: F) -> ListenerId
    where
        F: FnMut(IndexEvent) + Send + Sync + 'static,
    {
        self.edge_listeners.add(Box::new(f))
    }

    pub fn remove_edge_listener(&mut self, id: ListenerId) -> bool {
        self.edge_listeners.remove(id)
    }

    /// Attaches a vertex weight map named `key`, replacing any map of the same name.
    pub fn add_vertices_weights<T: WeightValue>(
        &mut self,
        key: &str,
        default: T,
    ) -> Result<&mut Weights<T>> {
        self.vertices_weights.add(key, default)
    }

    pub fn vertices_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        self.vertices_weights.get(key)
    }

    pub fn vertices_weights_mut<T: WeightValue>(&mut self, key: &str) -> Result<&mut Weights<T>> {
        self.vertices_weights.get_mut(key)
    }

    pub fn remove_vertices_weights(&mut self, key: &str) -> bool {
        self.vertices_weights.remove(key)
    }

    pub fn vertices_weights_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.vertices_weights.keys()
    }

    /// Attaches an edge weight map named `key`, replacing any map of the same name.
    pub fn add_edges_weights<T: WeightValue>(
        &mut self,
        key: &str,
        default: T,
    ) -> Result<&mut Weights<T>> {
        self.edges_weights.add(key, default)
    }

    pub fn edges_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        self.edges_weights.get(key)
    }

    pub fn edges_weights_mut<T: WeightValue>(&mut self, key: &str) -> Result<&mut Weights<T>> {
        self.edges_weights.get_mut(key)
    }

    pub fn remove_edges_weights(&mut self, key: &str) -> bool {
        self.edges_weights.remove(key)
    }

    pub fn edges_weights_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.edges_weights.keys()
    }

    pub(crate) fn weights_sets(&self) -> (&WeightsSet, &WeightsSet) {
        (&self.vertices_weights, &self.edges_weights)
    }

    /// A flow network over two attached `f64` edge weight maps.
    pub fn flow_network(
        &mut self,
        capacity_key: &str,
        flow_key: &str,
    ) -> Result<WeightsFlowNetwork<'_>> {
        let (capacities, flows) = self
            .edges_weights
            .get_pair_mut::<f64, f64>(capacity_key, flow_key)?;
        Ok(WeightsFlowNetwork::new(capacities, flows))
    }

    /// Evaluates `w` on every edge into a map not attached to this graph.
    ///
    /// Fails if `w` does not know some edge, e.g. a map taken before edges were added.
    pub fn local_edge_weights<W: WeightFunction>(&self, w: &W) -> Result<Weights<f64>> {
        let mut res = Weights::new(ElementKind::Edge, self.endpoints.len(), 0.0f64);
        for i in 0..self.endpoints.len() {
            res.set(i, w.weight(EdgeId(i))?)?;
        }
        Ok(res)
    }

    /// A copy on the same storage kind, without any listener.
    ///
    /// Attached weights are copied when `copy_weights` is set, otherwise the copy has none.
    pub fn copy(&self, copy_weights: bool) -> Self {
        let (vertices_weights, edges_weights) = self.copied_weights(copy_weights);
        Self::from_parts(
            self.capabilities,
            self.storage.clone(),
            self.vertex_size,
            self.endpoints.clone(),
            vertices_weights,
            edges_weights,
        )
    }

    /// A copy on a compressed static storage, with weights.
    ///
    /// Every mutator of the copy fails with [GraphError::ImmutableStorage].
    pub fn immutable_copy(&self) -> Self {
        let (vertices_weights, edges_weights) = self.copied_weights(true);
        Self::from_parts(
            self.capabilities,
            Storage::csr(self.capabilities.directed, self.vertex_size, &self.endpoints),
            self.vertex_size,
            self.endpoints.clone(),
            vertices_weights,
            edges_weights,
        )
    }

    /// A copy on a fresh storage of `kind`, keeping every vertex and edge index.
    pub(crate) fn copy_onto(
        &self,
        kind: StorageKind,
        capabilities: GraphCapabilities,
        copy_weights: bool,
    ) -> Result<Self> {
        validate_edges(capabilities, kind, self.vertex_size, &self.endpoints)?;
        let (vertices_weights, edges_weights) = self.copied_weights(copy_weights);
        let storage = fill_storage(
            kind,
            capabilities.directed,
            self.vertex_size,
            &self.endpoints,
        )?;
        Ok(Self::from_parts(
            capabilities,
            storage,
            self.vertex_size,
            self.endpoints.clone(),
            vertices_weights,
            edges_weights,
        ))
    }

    fn copied_weights(&self, copy_weights: bool) -> (WeightsSet, WeightsSet) {
        if copy_weights {
            (self.vertices_weights.clone(), self.edges_weights.clone())
        } else {
            (
                WeightsSet::new(ElementKind::Vertex, self.vertex_size),
                WeightsSet::new(ElementKind::Edge, self.endpoints.len()),
            )
        }
    }
}

/// Checks an edge list against capabilities before it is stored anywhere.
pub(crate) fn validate_edges(
    capabilities: GraphCapabilities,
    kind: StorageKind,
    vertex_size: usize,
    endpoints: &[Endpoints],
) -> Result<()> {
    let mut seen: HashSet<Endpoints, RandomState> =
        HashSet::with_capacity_and_hasher(endpoints.len(), RandomState::new());
    let check_parallel = !capabilities.parallel_edges || !kind.supports_parallel_edges();
    for (i, (s, t)) in endpoints.iter().enumerate() {
        for v in [s, t] {
            if v.to_raw() >= vertex_size {
                return Err(GraphError::no_such_vertex(v));
            }
        }
        if s == t && !capabilities.self_edges {
            return Err(GraphError::SelfEdgesNotAllowed);
        }
        if check_parallel {
            let key = if capabilities.directed || s <= t {
                (*s, *t)
            } else {
                (*t, *s)
            };
            if !seen.insert(key) {
                trace!(edge = i, "parallel edge rejected");
                return Err(GraphError::ParallelEdgesNotAllowed);
            }
        }
    }
    Ok(())
}

/// A storage of `kind` holding `vertex_size` vertices and `endpoints`, edge `i` at index `i`.
pub(crate) fn fill_storage(
    kind: StorageKind,
    directed: bool,
    vertex_size: usize,
    endpoints: &[Endpoints],
) -> Result<Storage> {
    if !kind.is_mutable() {
        return Ok(Storage::csr(directed, vertex_size, endpoints));
    }
    let mut storage = Storage::new(kind, directed, vertex_size, endpoints.len());
    let adj = storage.adjacency_mut()?;
    for _ in 0..vertex_size {
        adj.add_vertex();
    }
    for (i, (s, t)) in endpoints.iter().enumerate() {
        adj.add_edge(EdgeId(i), *s, *t);
    }
    Ok(storage)
}

impl Clone for IndexGraph {
    /// Copies structure and weights; listeners are not copied.
    fn clone(&self) -> Self {
        self.copy(true)
    }
}

impl std::fmt::Debug for IndexGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexGraph")
            .field("capabilities", &self.capabilities)
            .field("storage", &self.storage_kind())
            .field("vertex_size", &self.vertex_size)
            .field("endpoints", &self.endpoints)
            .field("vertices_weights", &self.vertices_weights)
            .field("edges_weights", &self.edges_weights)
            .finish()
    }
}

impl QueryableGraph for IndexGraph {
    type V = VertexId;
    type E = EdgeId;

    fn capabilities(&self) -> GraphCapabilities {
        self.capabilities
    }

    fn vertex_size(&self) -> usize {
        self.vertex_size
    }

    fn iter_vertices(&self) -> Box<dyn Iterator<Item = VertexId> + '_> {
        Box::new((0..self.vertex_size).map(VertexId))
    }

    fn contains_vertex(&self, v: &VertexId) -> bool {
        v.to_raw() < self.vertex_size
    }

    fn edge_size(&self) -> usize {
        self.endpoints.len()
    }

    fn iter_edges(&self) -> Box<dyn Iterator<Item = Edge> + '_> {
        Box::new((0..self.endpoints.len()).map(|i| self.to_edge(EdgeId(i))))
    }

    fn contains_edge(&self, e: &EdgeId) -> bool {
        e.to_raw() < self.endpoints.len()
    }

    fn find_edge(&self, e: &EdgeId) -> Result<Edge> {
        self.check_edge(*e)?;
        Ok(self.to_edge(*e))
    }

    fn edges_connecting(
        &self,
        source: &VertexId,
        target: &VertexId,
    ) -> Result<Box<dyn Iterator<Item = Edge> + '_>> {
        let source = self.check_vertex(*source)?;
        let target = self.check_vertex(*target)?;
        let it = self
            .storage
            .adjacency()
            .edges_between(source, target, &self.endpoints)
            .map(move |e| Edge {
                id: e,
                source,
                target,
            });
        Ok(Box::new(it))
    }

    fn in_edges(&self, v: &VertexId) -> Result<Box<dyn Iterator<Item = Edge> + '_>> {
        let v = self.check_vertex(*v)?;
        let it = self
            .storage
            .adjacency()
            .in_edges(v)
            .map(move |e| self.in_edge(e, v));
        Ok(Box::new(it))
    }

    fn out_edges(&self, v: &VertexId) -> Result<Box<dyn Iterator<Item = Edge> + '_>> {
        let v = self.check_vertex(*v)?;
        let it = self
            .storage
            .adjacency()
            .out_edges(v)
            .map(move |e| self.out_edge(e, v));
        Ok(Box::new(it))
    }

    fn out_degree(&self, v: &VertexId) -> Result<usize> {
        let v = self.check_vertex(*v)?;
        Ok(self.storage.adjacency().out_degree(v))
    }

    fn in_degree(&self, v: &VertexId) -> Result<usize> {
        let v = self.check_vertex(*v)?;
        Ok(self.storage.adjacency().in_degree(v))
    }

    fn vertex_index(&self, v: &VertexId) -> Result<VertexId> {
        self.check_vertex(*v)
    }

    fn vertex_by_index(&self, index: VertexId) -> Result<VertexId> {
        self.check_vertex(index)
    }

    fn edge_index(&self, e: &EdgeId) -> Result<EdgeId> {
        self.check_edge(*e).map(|_| *e)
    }

    fn edge_by_index(&self, index: EdgeId) -> Result<EdgeId> {
        self.check_edge(index).map(|_| index)
    }
}

impl GrowableGraph for IndexGraph {
    fn add_vertex(&mut self) -> Result<VertexId> {
        self.insert_vertex()
    }

    fn add_edge(&mut self, source: &VertexId, target: &VertexId) -> Result<EdgeId> {
        self.insert_edge(*source, *target)
    }
}

impl EdgeShrinkableGraph for IndexGraph {
    fn remove_edge(&mut self, e: &EdgeId) -> Result<()> {
        self.remove_edge_observed(*e, &mut |_, _| {})
    }

    fn remove_edges_of(&mut self, v: &VertexId) -> Result<()> {
        self.remove_incident_observed(*v, true, true, &mut |_, _| {})
    }

    fn remove_in_edges_of(&mut self, v: &VertexId) -> Result<()> {
        self.remove_incident_observed(*v, false, true, &mut |_, _| {})
    }

    fn remove_out_edges_of(&mut self, v: &VertexId) -> Result<()> {
        self.remove_incident_observed(*v, true, false, &mut |_, _| {})
    }

    fn reverse_edge(&mut self, e: &EdgeId) -> Result<()> {
        self.flip_edge(*e)
    }

    fn clear_edges(&mut self) -> Result<()> {
        self.clear_edges_observed(&mut |_, _| {})
    }
}

impl VertexShrinkableGraph for IndexGraph {
    fn remove_vertex(&mut self, v: &VertexId) -> Result<()> {
        self.remove_vertex_observed(*v, &mut |_, _| {})
    }

    fn clear(&mut self) -> Result<()> {
        self.clear_observed(&mut |_, _| {})
    }
}

impl WeightedGraph for IndexGraph {
    fn vertices_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        IndexGraph::vertices_weights(self, key)
    }

    fn edges_weights<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        IndexGraph::edges_weights(self, key)
    }
}
