use crate::graph::storage::Storage;
use crate::graph::*;
use crate::{GraphError, Result};
use bitflags::bitflags;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

bitflags! {
    /// Non-binding performance preferences, used to pick a storage.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Hints: u32 {
        /// Most vertex pairs will be connected.
        const DENSE_GRAPH = 1;
        /// `edges_connecting` and `get_edge` will be frequent.
        const FAST_EDGE_LOOKUP = 1 << 1;
        /// Edge removals will be frequent.
        const FAST_EDGE_REMOVAL = 1 << 2;
    }
}

/// Configuration of index graphs to build.
///
/// Chained setters adjust it; `new_graph`, `new_builder` and `new_copy_of` commit to one storage.
/// Unless a storage is pinned with [storage](IndexGraphFactory::storage), it is chosen from the hints:
/// a dense graph without parallel edges gets a matrix, fast lookup or removal gets hash tables,
/// and anything else gets arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexGraphFactory {
    capabilities: GraphCapabilities,
    expected_vertices: usize,
    expected_edges: usize,
    hints: Hints,
    storage: Option<StorageKind>,
}

impl IndexGraphFactory {
    /// A factory of directed or undirected graphs allowing self and parallel edges.
    pub fn new(directed: bool) -> Self {
        Self {
            capabilities: GraphCapabilities::new(directed, true, true),
            expected_vertices: 0,
            expected_edges: 0,
            hints: Hints::empty(),
            storage: None,
        }
    }

    pub fn directed() -> Self {
        Self::new(true)
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    pub fn allow_self_edges(mut self, allow: bool) -> Self {
        self.capabilities.self_edges = allow;
        self
    }

    pub fn allow_parallel_edges(mut self, allow: bool) -> Self {
        self.capabilities.parallel_edges = allow;
        self
    }

    /// A sizing hint, not a limit.
    pub fn expected_vertices(mut self, n: usize) -> Self {
        self.expected_vertices = n;
        self
    }

    /// A sizing hint, not a limit.
    pub fn expected_edges(mut self, m: usize) -> Self {
        self.expected_edges = m;
        self
    }

    pub fn add_hint(mut self, hints: Hints) -> Self {
        self.hints.insert(hints);
        self
    }

    pub fn remove_hint(mut self, hints: Hints) -> Self {
        self.hints.remove(hints);
        self
    }

    /// Pins the storage, overriding the hints.
    pub fn storage(mut self, kind: StorageKind) -> Self {
        self.storage = Some(kind);
        self
    }

    pub fn capabilities(&self) -> GraphCapabilities {
        self.capabilities
    }

    pub fn hints(&self) -> Hints {
        self.hints
    }

    pub(crate) fn expected_sizes(&self) -> (usize, usize) {
        (self.expected_vertices, self.expected_edges)
    }

    /// The storage graphs of this factory get, or why the configuration cannot be built.
    pub fn choose_storage(&self) -> Result<StorageKind> {
        let parallel = self.capabilities.parallel_edges;
        let kind = match self.storage {
            Some(StorageKind::Matrix) if parallel => {
                return Err(GraphError::ContradictoryHints(
                    "matrix storage with parallel edges".to_string(),
                ))
            }
            Some(StorageKind::Csr) if self.hints.contains(Hints::FAST_EDGE_REMOVAL) => {
                return Err(GraphError::ContradictoryHints(
                    "immutable storage with fast edge removal".to_string(),
                ))
            }
            Some(kind) => kind,
            None if self.hints.contains(Hints::DENSE_GRAPH) && !parallel => StorageKind::Matrix,
            None if self
                .hints
                .intersects(Hints::FAST_EDGE_LOOKUP | Hints::FAST_EDGE_REMOVAL) =>
            {
                StorageKind::Hashtable
            }
            None => StorageKind::Array,
        };
        debug!(?kind, hints = ?self.hints, capabilities = ?self.capabilities, "storage chosen");
        Ok(kind)
    }

    /// An empty graph.
    pub fn new_graph(&self) -> Result<IndexGraph> {
        let kind = self.choose_storage()?;
        let storage = Storage::new(
            kind,
            self.capabilities.directed,
            self.expected_vertices,
            self.expected_edges,
        );
        Ok(IndexGraph::new(self.capabilities, storage))
    }

    /// An empty graph named by caller ids.
    pub fn new_id_graph<V, E>(&self) -> Result<Graph<V, E>>
    where
        V: Clone + Eq + Hash + Debug,
        E: Clone + Eq + Hash + Debug,
    {
        Ok(Graph::from_parts(
            self.new_graph()?,
            IndexIdMap::new(ElementKind::Vertex),
            IndexIdMap::new(ElementKind::Edge),
        ))
    }

    pub fn new_builder(&self) -> IndexGraphBuilder {
        IndexGraphBuilder::with_factory(self.clone())
    }

    /// A copy of `g` on this factory's storage, keeping every index.
    ///
    /// The copy keeps the directedness of `g` and takes the self and parallel edge permissions of this factory;
    /// it fails if `g` has edges they forbid.
    pub fn new_copy_of(&self, g: &IndexGraph, copy_weights: bool) -> Result<IndexGraph> {
        let factory = self.clone_with_directed(g.is_directed());
        let kind = factory.choose_storage()?;
        g.copy_onto(kind, factory.capabilities, copy_weights)
    }

    fn clone_with_directed(&self, directed: bool) -> Self {
        let mut res = self.clone();
        res.capabilities.directed = directed;
        res
    }
}

impl Default for IndexGraphFactory {
    fn default() -> Self {
        Self::directed()
    }
}

/// Configuration of graphs named by caller ids.
///
/// A thin layer over [IndexGraphFactory], which chooses the storage of the wrapped index graphs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphFactory {
    index_factory: IndexGraphFactory,
}

impl GraphFactory {
    pub fn new(directed: bool) -> Self {
        Self {
            index_factory: IndexGraphFactory::new(directed),
        }
    }

    pub fn directed() -> Self {
        Self::new(true)
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    /// Adjusts the underlying index graph configuration.
    pub fn configure<F>(mut self, f: F) -> Self
    where
        F: FnOnce(IndexGraphFactory) -> IndexGraphFactory,
    {
        self.index_factory = f(self.index_factory);
        self
    }

    pub fn index_factory(&self) -> &IndexGraphFactory {
        &self.index_factory
    }

    pub fn new_graph<V, E>(&self) -> Result<Graph<V, E>>
    where
        V: Clone + Eq + Hash + Debug,
        E: Clone + Eq + Hash + Debug,
    {
        self.index_factory.new_id_graph()
    }

    pub fn new_builder<V, E>(&self) -> GraphBuilder<V, E>
    where
        V: Clone + Eq + Hash + Debug,
        E: Clone + Eq + Hash + Debug,
    {
        GraphBuilder::with_factory(self.index_factory.clone())
    }

    /// A copy of `g` on this factory's storage, with the same ids.
    pub fn new_copy_of<V, E>(&self, g: &Graph<V, E>, copy_weights: bool) -> Result<Graph<V, E>>
    where
        V: Clone + Eq + Hash + Debug,
        E: Clone + Eq + Hash + Debug,
    {
        let index_graph = self
            .index_factory
            .new_copy_of(g.index_graph(), copy_weights)?;
        Ok(Graph::from_parts(
            index_graph,
            g.vertices_map().clone(),
            g.edges_map().clone(),
        ))
    }
}
