use super::*;

/// Per-vertex arrays of incident edges.
///
/// Appending is $O(1)$; removal and lookup scan the array of one endpoint.
/// Undirected storages keep every edge in the arrays of both endpoints, self edges once.
#[derive(Debug, Clone)]
pub struct ArrayStorage {
    directed: bool,
    out_edges: Vec<Vec<EdgeId>>,
    in_edges: Vec<Vec<EdgeId>>,
}

impl ArrayStorage {
    pub fn with_capacity(directed: bool, vertices: usize) -> Self {
        Self {
            directed,
            out_edges: Vec::with_capacity(vertices),
            in_edges: if directed {
                Vec::with_capacity(vertices)
            } else {
                vec![]
            },
        }
    }

    fn incoming(&self) -> &Vec<Vec<EdgeId>> {
        if self.directed {
            &self.in_edges
        } else {
            &self.out_edges
        }
    }
}

impl Adjacency for ArrayStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Array
    }

    fn out_edges(&self, v: VertexId) -> Box<dyn Iterator<Item = EdgeId> + '_> {
        Box::new(self.out_edges[v.to_raw()].iter().copied())
    }

    fn in_edges(&self, v: VertexId) -> Box<dyn Iterator<Item = EdgeId> + '_> {
        Box::new(self.incoming()[v.to_raw()].iter().copied())
    }

    fn edges_between<'a>(
        &'a self,
        source: VertexId,
        target: VertexId,
        endpoints: &'a [Endpoints],
    ) -> Box<dyn Iterator<Item = EdgeId> + 'a> {
        let directed = self.directed;
        let it = self.out_edges[source.to_raw()]
            .iter()
            .copied()
            .filter(move |e| {
                let (s, t) = endpoints[e.to_raw()];
                if directed {
                    t == target
                } else {
                    (s == source && t == target) || (s == target && t == source)
                }
            });
        Box::new(it)
    }

    fn out_degree(&self, v: VertexId) -> usize {
        self.out_edges[v.to_raw()].len()
    }

    fn in_degree(&self, v: VertexId) -> usize {
        self.incoming()[v.to_raw()].len()
    }
}

impl MutableAdjacency for ArrayStorage {
    fn add_vertex(&mut self) {
        self.out_edges.push(vec![]);
        if self.directed {
            self.in_edges.push(vec![]);
        }
    }

    fn remove_vertex(&mut self, v: VertexId) {
        debug_assert!(self.out_edges[v.to_raw()].is_empty());
        self.out_edges.swap_remove(v.to_raw());
        if self.directed {
            self.in_edges.swap_remove(v.to_raw());
        }
    }

    fn add_edge(&mut self, e: EdgeId, source: VertexId, target: VertexId) {
        self.out_edges[source.to_raw()].push(e);
        if self.directed {
            self.in_edges[target.to_raw()].push(e);
        } else if source != target {
            self.out_edges[target.to_raw()].push(e);
        }
    }

    fn remove_edge(&mut self, e: EdgeId, source: VertexId, target: VertexId) {
        remove_from(&mut self.out_edges[source.to_raw()], &e);
        if self.directed {
            remove_from(&mut self.in_edges[target.to_raw()], &e);
        } else if source != target {
            remove_from(&mut self.out_edges[target.to_raw()], &e);
        }
    }

    fn move_edge(&mut self, from: EdgeId, to: EdgeId, source: VertexId, target: VertexId) {
        replace_in(&mut self.out_edges[source.to_raw()], &from, to);
        if self.directed {
            replace_in(&mut self.in_edges[target.to_raw()], &from, to);
        } else if source != target {
            replace_in(&mut self.out_edges[target.to_raw()], &from, to);
        }
    }

    fn clear_edges(&mut self) {
        for x in self.out_edges.iter_mut() {
            x.clear();
        }
        for x in self.in_edges.iter_mut() {
            x.clear();
        }
    }

    fn clear(&mut self) {
        self.out_edges.clear();
        self.in_edges.clear();
    }
}
