use super::*;

/// Compressed static adjacency.
///
/// For a graph with $n$ vertices, `out_begin` holds $n + 1$ offsets and
/// `out_edges[out_begin[v]..out_begin[v + 1]]` are the out edges of `v`.
/// Directed storages keep a second pair of arrays for in edges;
/// undirected ones list every edge under both endpoints, self edges once.
///
/// Built once from a complete edge list and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct CsrStorage {
    directed: bool,
    out_begin: Vec<usize>,
    out_edges: Vec<EdgeId>,
    in_begin: Vec<usize>,
    in_edges: Vec<EdgeId>,
}

/// Counting sort of edges by a key vertex, written as prefix-sum offsets.
fn compress<F>(vertex_size: usize, endpoints: &[Endpoints], keys: F) -> (Vec<usize>, Vec<EdgeId>)
where
    F: Fn(&Endpoints) -> (Option<VertexId>, Option<VertexId>),
{
    let mut begin = vec![0usize; vertex_size + 1];
    for ep in endpoints.iter() {
        let (a, b) = keys(ep);
        for v in a.into_iter().chain(b) {
            begin[v.to_raw() + 1] += 1;
        }
    }
    for i in 0..vertex_size {
        begin[i + 1] += begin[i];
    }
    let mut next = begin.clone();
    let mut edges = vec![EdgeId::MIN; begin[vertex_size]];
    for (i, ep) in endpoints.iter().enumerate() {
        let (a, b) = keys(ep);
        for v in a.into_iter().chain(b) {
            edges[next[v.to_raw()]] = EdgeId(i);
            next[v.to_raw()] += 1;
        }
    }
    (begin, edges)
}

impl CsrStorage {
    pub fn new(directed: bool, vertex_size: usize, endpoints: &[Endpoints]) -> Self {
        if directed {
            let (out_begin, out_edges) =
                compress(vertex_size, endpoints, |(s, _)| (Some(*s), None));
            let (in_begin, in_edges) =
                compress(vertex_size, endpoints, |(_, t)| (Some(*t), None));
            Self {
                directed,
                out_begin,
                out_edges,
                in_begin,
                in_edges,
            }
        } else {
            let (out_begin, out_edges) = compress(vertex_size, endpoints, |(s, t)| {
                (Some(*s), if s != t { Some(*t) } else { None })
            });
            Self {
                directed,
                out_begin,
                out_edges,
                in_begin: vec![],
                in_edges: vec![],
            }
        }
    }

    fn out_slice(&self, v: VertexId) -> &[EdgeId] {
        let v = v.to_raw();
        &self.out_edges[self.out_begin[v]..self.out_begin[v + 1]]
    }

    fn in_slice(&self, v: VertexId) -> &[EdgeId] {
        if !self.directed {
            return self.out_slice(v);
        }
        let v = v.to_raw();
        &self.in_edges[self.in_begin[v]..self.in_begin[v + 1]]
    }
}

impl Adjacency for CsrStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Csr
    }

    fn out_edges(&self, v: VertexId) -> Box<dyn Iterator<Item = EdgeId> + '_> {
        Box::new(self.out_slice(v).iter().copied())
    }

    fn in_edges(&self, v: VertexId) -> Box<dyn Iterator<Item = EdgeId> + '_> {
        Box::new(self.in_slice(v).iter().copied())
    }

    fn edges_between<'a>(
        &'a self,
        source: VertexId,
        target: VertexId,
        endpoints: &'a [Endpoints],
    ) -> Box<dyn Iterator<Item = EdgeId> + 'a> {
        let directed = self.directed;
        let it = self.out_slice(source).iter().copied().filter(move |e| {
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
        self.out_slice(v).len()
    }

    fn in_degree(&self, v: VertexId) -> usize {
        self.in_slice(v).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directed_offsets() {
        let endpoints = vec![
            (VertexId(2), VertexId(0)),
            (VertexId(0), VertexId(1)),
            (VertexId(0), VertexId(2)),
        ];
        let csr = CsrStorage::new(true, 3, &endpoints);
        assert_eq!(csr.out_begin, vec![0, 2, 2, 3]);
        assert_eq!(csr.out_slice(VertexId(0)), &[EdgeId(1), EdgeId(2)]);
        assert_eq!(csr.in_slice(VertexId(0)), &[EdgeId(0)]);
        assert_eq!(csr.out_degree(VertexId(1)), 0);
        assert_eq!(csr.in_degree(VertexId(2)), 1);
    }

    #[test]
    fn undirected_self_edge_listed_once() {
        let endpoints = vec![(VertexId(0), VertexId(0)), (VertexId(0), VertexId(1))];
        let csr = CsrStorage::new(false, 2, &endpoints);
        assert_eq!(csr.out_degree(VertexId(0)), 2);
        assert_eq!(csr.in_degree(VertexId(1)), 1);
        let between: Vec<_> = csr
            .edges_between(VertexId(1), VertexId(0), &endpoints)
            .collect();
        assert_eq!(between, vec![EdgeId(1)]);
    }
}
