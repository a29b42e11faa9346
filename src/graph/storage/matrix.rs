use super::*;

/// A $|V| \times |V|$ adjacency matrix.
///
/// Edge existence is $O(1)$, iterating the edges of a vertex is $O(|V|)$ and adding a vertex
/// grows every row.
/// There is at most one edge per cell, so parallel edges are never supported.
/// Undirected storages fill both `(u, v)` and `(v, u)`.
#[derive(Debug, Clone)]
pub struct MatrixStorage {
    directed: bool,
    rows: Vec<Vec<Option<EdgeId>>>,
}

impl MatrixStorage {
    pub fn with_capacity(directed: bool, vertices: usize) -> Self {
        Self {
            directed,
            rows: Vec::with_capacity(vertices),
        }
    }

    fn set(&mut self, source: VertexId, target: VertexId, e: Option<EdgeId>) {
        self.rows[source.to_raw()][target.to_raw()] = e;
        if !self.directed {
            self.rows[target.to_raw()][source.to_raw()] = e;
        }
    }
}

impl Adjacency for MatrixStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Matrix
    }

    fn out_edges(&self, v: VertexId) -> Box<dyn Iterator<Item = EdgeId> + '_> {
        Box::new(self.rows[v.to_raw()].iter().filter_map(|x| *x))
    }

    fn in_edges(&self, v: VertexId) -> Box<dyn Iterator<Item = EdgeId> + '_> {
        if self.directed {
            let col = v.to_raw();
            Box::new(self.rows.iter().filter_map(move |row| row[col]))
        } else {
            self.out_edges(v)
        }
    }

    fn edges_between<'a>(
        &'a self,
        source: VertexId,
        target: VertexId,
        _: &'a [Endpoints],
    ) -> Box<dyn Iterator<Item = EdgeId> + 'a> {
        Box::new(self.rows[source.to_raw()][target.to_raw()].into_iter())
    }
}

impl MutableAdjacency for MatrixStorage {
    fn add_vertex(&mut self) {
        for row in self.rows.iter_mut() {
            row.push(None);
        }
        let n = self.rows.len() + 1;
        let mut row = Vec::with_capacity(self.rows.capacity().max(n));
        row.resize(n, None);
        self.rows.push(row);
    }

    fn remove_vertex(&mut self, v: VertexId) {
        self.rows.swap_remove(v.to_raw());
        for row in self.rows.iter_mut() {
            row.swap_remove(v.to_raw());
        }
    }

    fn add_edge(&mut self, e: EdgeId, source: VertexId, target: VertexId) {
        debug_assert!(self.rows[source.to_raw()][target.to_raw()].is_none());
        self.set(source, target, Some(e));
    }

    fn remove_edge(&mut self, _: EdgeId, source: VertexId, target: VertexId) {
        self.set(source, target, None);
    }

    fn move_edge(&mut self, _: EdgeId, to: EdgeId, source: VertexId, target: VertexId) {
        self.set(source, target, Some(to));
    }

    fn clear_edges(&mut self) {
        for row in self.rows.iter_mut() {
            row.iter_mut().for_each(|x| *x = None);
        }
    }

    fn clear(&mut self) {
        self.rows.clear();
    }
}
