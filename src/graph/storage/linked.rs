use super::*;

#[derive(Debug, Clone, Copy, Default)]
struct Link {
    prev: Option<EdgeId>,
    next: Option<EdgeId>,
}

/// Intrusive doubly-linked incidence lists.
///
/// Every edge carries two links: one in the list of its source and one in the list of its target.
/// Removal is $O(1)$ but traversal jumps around memory.
///
/// Undirected self edges are linked into the list of their source only.
#[derive(Debug, Clone)]
pub struct LinkedStorage {
    directed: bool,
    out_heads: Vec<Option<EdgeId>>,
    in_heads: Vec<Option<EdgeId>>,
    out_links: Vec<Link>,
    in_links: Vec<Link>,
}

struct ListIter<'a> {
    links: &'a [Link],
    cur: Option<EdgeId>,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.cur?;
        self.cur = self.links[cur.to_raw()].next;
        Some(cur)
    }
}

impl LinkedStorage {
    pub fn with_capacity(directed: bool, vertices: usize, edges: usize) -> Self {
        Self {
            directed,
            out_heads: Vec::with_capacity(vertices),
            in_heads: Vec::with_capacity(vertices),
            out_links: Vec::with_capacity(edges),
            in_links: Vec::with_capacity(edges),
        }
    }

    fn out_list(&self, v: VertexId) -> ListIter<'_> {
        ListIter {
            links: &self.out_links,
            cur: self.out_heads[v.to_raw()],
        }
    }

    fn in_list(&self, v: VertexId) -> ListIter<'_> {
        ListIter {
            links: &self.in_links,
            cur: self.in_heads[v.to_raw()],
        }
    }

    fn incident(&self, v: VertexId) -> Box<dyn Iterator<Item = EdgeId> + '_> {
        Box::new(self.out_list(v).chain(self.in_list(v)))
    }

    fn has_in_link(&self, source: VertexId, target: VertexId) -> bool {
        self.directed || source != target
    }
}

fn link(heads: &mut [Option<EdgeId>], links: &mut [Link], v: VertexId, e: EdgeId) {
    let head = heads[v.to_raw()];
    links[e.to_raw()] = Link {
        prev: None,
        next: head,
    };
    if let Some(h) = head {
        links[h.to_raw()].prev = Some(e);
    }
    heads[v.to_raw()] = Some(e);
}

fn unlink(heads: &mut [Option<EdgeId>], links: &mut [Link], v: VertexId, e: EdgeId) {
    let Link { prev, next } = links[e.to_raw()];
    match prev {
        Some(p) => links[p.to_raw()].next = next,
        None => heads[v.to_raw()] = next,
    }
    if let Some(n) = next {
        links[n.to_raw()].prev = prev;
    }
    links[e.to_raw()] = Link::default();
}

fn relink(heads: &mut [Option<EdgeId>], links: &mut [Link], v: VertexId, from: EdgeId, to: EdgeId) {
    let moved = links[from.to_raw()];
    links[to.to_raw()] = moved;
    match moved.prev {
        Some(p) => links[p.to_raw()].next = Some(to),
        None => heads[v.to_raw()] = Some(to),
    }
    if let Some(n) = moved.next {
        links[n.to_raw()].prev = Some(to);
    }
    links[from.to_raw()] = Link::default();
}

impl Adjacency for LinkedStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Linked
    }

    fn out_edges(&self, v: VertexId) -> Box<dyn Iterator<Item = EdgeId> + '_> {
        if self.directed {
            Box::new(self.out_list(v))
        } else {
            self.incident(v)
        }
    }

    fn in_edges(&self, v: VertexId) -> Box<dyn Iterator<Item = EdgeId> + '_> {
        if self.directed {
            Box::new(self.in_list(v))
        } else {
            self.incident(v)
        }
    }

    fn edges_between<'a>(
        &'a self,
        source: VertexId,
        target: VertexId,
        endpoints: &'a [Endpoints],
    ) -> Box<dyn Iterator<Item = EdgeId> + 'a> {
        if self.directed {
            let it = self
                .out_list(source)
                .filter(move |e| endpoints[e.to_raw()].1 == target);
            Box::new(it)
        } else {
            let it = self.incident(source).filter(move |e| {
                let (s, t) = endpoints[e.to_raw()];
                (s == source && t == target) || (s == target && t == source)
            });
            Box::new(it)
        }
    }
}

impl MutableAdjacency for LinkedStorage {
    fn add_vertex(&mut self) {
        self.out_heads.push(None);
        self.in_heads.push(None);
    }

    fn remove_vertex(&mut self, v: VertexId) {
        debug_assert!(self.out_heads[v.to_raw()].is_none());
        debug_assert!(self.in_heads[v.to_raw()].is_none());
        self.out_heads.swap_remove(v.to_raw());
        self.in_heads.swap_remove(v.to_raw());
    }

    fn add_edge(&mut self, e: EdgeId, source: VertexId, target: VertexId) {
        if e.to_raw() == self.out_links.len() {
            self.out_links.push(Link::default());
            self.in_links.push(Link::default());
        }
        link(&mut self.out_heads, &mut self.out_links, source, e);
        if self.has_in_link(source, target) {
            link(&mut self.in_heads, &mut self.in_links, target, e);
        }
    }

    fn remove_edge(&mut self, e: EdgeId, source: VertexId, target: VertexId) {
        unlink(&mut self.out_heads, &mut self.out_links, source, e);
        if self.has_in_link(source, target) {
            unlink(&mut self.in_heads, &mut self.in_links, target, e);
        }
    }

    fn move_edge(&mut self, from: EdgeId, to: EdgeId, source: VertexId, target: VertexId) {
        relink(&mut self.out_heads, &mut self.out_links, source, from, to);
        if self.has_in_link(source, target) {
            relink(&mut self.in_heads, &mut self.in_links, target, from, to);
        }
    }

    fn pop_edge(&mut self) {
        self.out_links.pop();
        self.in_links.pop();
    }

    fn clear_edges(&mut self) {
        self.out_links.clear();
        self.in_links.clear();
        self.out_heads.iter_mut().for_each(|h| *h = None);
        self.in_heads.iter_mut().for_each(|h| *h = None);
    }

    fn clear(&mut self) {
        self.out_links.clear();
        self.in_links.clear();
        self.out_heads.clear();
        self.in_heads.clear();
    }
}
