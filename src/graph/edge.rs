use super::VertexId;

/// Index of an edge, which is essentially a `usize` in `[0, m)`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub usize);

/// An edge together with its endpoints.
///
/// Index graphs use [VertexId] and [EdgeId]; graphs with caller ids use their own types.
/// Edges of undirected graphs are reported oriented away from the vertex they were queried by.
#[derive(Debug, Clone, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct Edge<V = VertexId, E = EdgeId> {
    pub id: E,
    pub source: V,
    pub target: V,
}

impl EdgeId {
    pub const MIN: EdgeId = EdgeId(0);
    pub const MAX: EdgeId = EdgeId(usize::MAX);

    pub fn new(x: usize) -> Self {
        Self(x)
    }

    pub fn to_raw(&self) -> usize {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<usize> for EdgeId {
    fn from(x: usize) -> Self {
        Self(x)
    }
}

impl<V, E> Edge<V, E>
where
    V: Clone + PartialEq,
{
    /// The same edge with `source` and `target` exchanged.
    pub fn reversed(self) -> Self {
        Self {
            id: self.id,
            source: self.target,
            target: self.source,
        }
    }

    /// Given one endpoint, returns the other one.
    pub fn opposite(&self, v: &V) -> Option<&V> {
        if *v == self.source {
            Some(&self.target)
        } else if *v == self.target {
            Some(&self.source)
        } else {
            None
        }
    }

    pub fn is_self_edge(&self) -> bool {
        self.source == self.target
    }
}

impl From<EdgeId> for usize {
    fn from(e: EdgeId) -> Self {
        e.0
    }
}
