use super::*;
use ahash::RandomState;
use std::collections::HashMap;

type Neighbors = HashMap<VertexId, Vec<EdgeId>, RandomState>;

/// Per-vertex hash tables from neighbors to the edges connecting them.
///
/// Lookups and removals are $O(1)$ on average for graphs without many parallel edges,
/// at the price of more memory.
/// Undirected storages keep only `out`, recording every edge under both endpoints.
#[derive(Debug, Clone)]
pub struct HashtableStorage {
    directed: bool,
    out: Vec<Neighbors>,
    r#in: Vec<Neighbors>,
}

fn new_neighbors() -> Neighbors {
    HashMap::with_hasher(RandomState::new())
}

fn insert(map: &mut Neighbors, key: VertexId, e: EdgeId) {
    map.entry(key).or_default().push(e);
}

fn remove(map: &mut Neighbors, key: VertexId, e: EdgeId) {
    if let Some(es) = map.get_mut(&key) {
        remove_from(es, &e);
        if es.is_empty() {
            map.remove(&key);
        }
    }
}

fn rename(map: &mut Neighbors, key: VertexId, from: EdgeId, to: EdgeId) {
    if let Some(es) = map.get_mut(&key) {
        replace_in(es, &from, to);
    }
}

fn rekey(map: &mut Neighbors, from: VertexId, to: VertexId) {
    if let Some(es) = map.remove(&from) {
        map.insert(to, es);
    }
}

impl HashtableStorage {
    pub fn with_capacity(directed: bool, vertices: usize) -> Self {
        Self {
            directed,
            out: Vec::with_capacity(vertices),
            r#in: if directed {
                Vec::with_capacity(vertices)
            } else {
                vec![]
            },
        }
    }

    fn incoming(&self) -> &Vec<Neighbors> {
        if self.directed {
            &self.r#in
        } else {
            &self.out
        }
    }
}

impl Adjacency for HashtableStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Hashtable
    }

    fn out_edges(&self, v: VertexId) -> Box<dyn Iterator<Item = EdgeId> + '_> {
        Box::new(self.out[v.to_raw()].values().flatten().copied())
    }

    fn in_edges(&self, v: VertexId) -> Box<dyn Iterator<Item = EdgeId> + '_> {
        Box::new(self.incoming()[v.to_raw()].values().flatten().copied())
    }

    fn edges_between<'a>(
        &'a self,
        source: VertexId,
        target: VertexId,
        _: &'a [Endpoints],
    ) -> Box<dyn Iterator<Item = EdgeId> + 'a> {
        match self.out[source.to_raw()].get(&target) {
            Some(es) => Box::new(es.iter().copied()),
            None => Box::new(std::iter::empty()),
        }
    }
}

impl MutableAdjacency for HashtableStorage {
    fn add_vertex(&mut self) {
        self.out.push(new_neighbors());
        if self.directed {
            self.r#in.push(new_neighbors());
        }
    }

    fn remove_vertex(&mut self, v: VertexId) {
        debug_assert!(self.out[v.to_raw()].is_empty());
        let last = VertexId(self.out.len() - 1);
        self.out.swap_remove(v.to_raw());
        if self.directed {
            self.r#in.swap_remove(v.to_raw());
        }
        if last == v {
            return;
        }
        // self edges of `last` are keyed by `last` in its own tables
        rekey(&mut self.out[v.to_raw()], last, v);
        if self.directed {
            rekey(&mut self.r#in[v.to_raw()], last, v);
            let targets: Vec<_> = self.out[v.to_raw()].keys().copied().collect();
            for w in targets.into_iter().filter(|w| *w != v) {
                rekey(&mut self.r#in[w.to_raw()], last, v);
            }
            let sources: Vec<_> = self.r#in[v.to_raw()].keys().copied().collect();
            for w in sources.into_iter().filter(|w| *w != v) {
                rekey(&mut self.out[w.to_raw()], last, v);
            }
        } else {
            let neighbors: Vec<_> = self.out[v.to_raw()].keys().copied().collect();
            for w in neighbors.into_iter().filter(|w| *w != v) {
                rekey(&mut self.out[w.to_raw()], last, v);
            }
        }
    }

    fn add_edge(&mut self, e: EdgeId, source: VertexId, target: VertexId) {
        insert(&mut self.out[source.to_raw()], target, e);
        if self.directed {
            insert(&mut self.r#in[target.to_raw()], source, e);
        } else if source != target {
            insert(&mut self.out[target.to_raw()], source, e);
        }
    }

    fn remove_edge(&mut self, e: EdgeId, source: VertexId, target: VertexId) {
        remove(&mut self.out[source.to_raw()], target, e);
        if self.directed {
            remove(&mut self.r#in[target.to_raw()], source, e);
        } else if source != target {
            remove(&mut self.out[target.to_raw()], source, e);
        }
    }

    fn move_edge(&mut self, from: EdgeId, to: EdgeId, source: VertexId, target: VertexId) {
        rename(&mut self.out[source.to_raw()], target, from, to);
        if self.directed {
            rename(&mut self.r#in[target.to_raw()], source, from, to);
        } else if source != target {
            rename(&mut self.out[target.to_raw()], source, from, to);
        }
    }

    fn clear_edges(&mut self) {
        self.out.iter_mut().for_each(|m| m.clear());
        self.r#in.iter_mut().for_each(|m| m.clear());
    }

    fn clear(&mut self) {
        self.out.clear();
        self.r#in.clear();
    }
}
