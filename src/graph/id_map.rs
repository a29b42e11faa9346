use crate::graph::{ElementKind, IndexEvent};
use crate::{GraphError, Result};
use ahash::RandomState;
use bimap::BiHashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Translation between caller ids and indices of one index space.
///
/// Algorithms run on indices and use this to hand their results back to callers.
pub trait IdMap {
    type Id;

    fn index_to_id(&self, index: usize) -> Result<Self::Id>;
    fn id_to_index(&self, id: &Self::Id) -> Result<usize>;
}

/// The id map of an [IndexGraph](crate::graph::IndexGraph), where ids are indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityIdMap {
    kind: ElementKind,
    len: usize,
}

impl IdentityIdMap {
    pub fn new(kind: ElementKind, len: usize) -> Self {
        Self { kind, len }
    }

    fn check(&self, index: usize) -> Result<usize> {
        if index < self.len {
            Ok(index)
        } else {
            Err(not_found(self.kind, index))
        }
    }
}

impl IdMap for IdentityIdMap {
    type Id = usize;

    fn index_to_id(&self, index: usize) -> Result<usize> {
        self.check(index)
    }

    fn id_to_index(&self, id: &usize) -> Result<usize> {
        self.check(*id)
    }
}

fn not_found<T: Debug>(kind: ElementKind, x: T) -> GraphError {
    match kind {
        ElementKind::Vertex => GraphError::no_such_vertex(x),
        ElementKind::Edge => GraphError::no_such_edge(x),
    }
}

fn duplicate<T: Debug>(kind: ElementKind, x: T) -> GraphError {
    match kind {
        ElementKind::Vertex => GraphError::DuplicateVertex(format!("{:?}", x)),
        ElementKind::Edge => GraphError::DuplicateEdge(format!("{:?}", x)),
    }
}

/// Ids that can be generated automatically.
pub trait AutoId: Sized {
    /// The `n`-th id of the sequence, if it is representable.
    fn nth(n: usize) -> Option<Self>;
}

macro_rules! auto_ids {
    ($($t:ty),*) => {
        $(
            impl AutoId for $t {
                fn nth(n: usize) -> Option<Self> {
                    <$t>::try_from(n).ok()
                }
            }
        )*
    };
}

auto_ids!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// A bijection between the indices `[0, n)` of one index space and caller ids.
///
/// It is kept in step with the index space by [IndexEvent]s:
/// when the last element moves into a freed index, its id moves along.
#[derive(Clone)]
pub struct IndexIdMap<K>
where
    K: Clone + Eq + Hash,
{
    kind: ElementKind,
    map: BiHashMap<usize, K, RandomState, RandomState>,
    next_auto: usize,
}

impl<K> IndexIdMap<K>
where
    K: Clone + Eq + Hash + Debug,
{
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            map: BiHashMap::with_hashers(RandomState::new(), RandomState::new()),
            next_auto: 0,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn id(&self, index: usize) -> Option<&K> {
        self.map.get_by_left(&index)
    }

    pub fn index(&self, id: &K) -> Option<usize> {
        self.map.get_by_right(id).copied()
    }

    pub fn contains_id(&self, id: &K) -> bool {
        self.map.contains_right(id)
    }

    /// Ids in index order.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        (0..self.map.len()).filter_map(move |i| self.map.get_by_left(&i))
    }

    pub(crate) fn check_new(&self, id: &K) -> Result<()> {
        if self.contains_id(id) {
            Err(duplicate(self.kind, id))
        } else {
            Ok(())
        }
    }

    /// Binds `id` to the next index, `len()`.
    ///
    /// A taken id leaves the map untouched.
    pub(crate) fn push(&mut self, id: K) -> Result<()> {
        let kind = self.kind;
        let index = self.map.len();
        self.map
            .insert_no_overwrite(index, id)
            .map_err(|(_, id)| duplicate(kind, &id))
    }

    pub(crate) fn apply(&mut self, event: IndexEvent) {
        match event {
            IndexEvent::Swap { from, to } => {
                self.map.remove_by_left(&to);
                if let Some((_, id)) = self.map.remove_by_left(&from) {
                    self.map.insert(to, id);
                }
            }
            IndexEvent::RemoveLast { index } => {
                self.map.remove_by_left(&index);
            }
            IndexEvent::Clear => self.map.clear(),
        }
    }

    /// The map with index `i` bound to the id of old index `order[i]`.
    pub(crate) fn permuted(&self, order: &[usize]) -> Self {
        let mut res = Self::new(self.kind);
        res.next_auto = self.next_auto;
        for (i, old) in order.iter().enumerate() {
            if let Some(id) = self.map.get_by_left(old) {
                res.map.insert(i, id.clone());
            }
        }
        res
    }
}

impl<K> IndexIdMap<K>
where
    K: Clone + Eq + Hash + Debug + AutoId,
{
    /// The next generated id not already taken.
    pub(crate) fn next_auto_id(&mut self) -> Result<K> {
        loop {
            let id = K::nth(self.next_auto).ok_or(GraphError::IdSpaceExhausted)?;
            self.next_auto += 1;
            if !self.contains_id(&id) {
                return Ok(id);
            }
        }
    }
}

impl<K> IdMap for IndexIdMap<K>
where
    K: Clone + Eq + Hash + Debug,
{
    type Id = K;

    fn index_to_id(&self, index: usize) -> Result<K> {
        self.id(index)
            .cloned()
            .ok_or_else(|| not_found(self.kind, index))
    }

    fn id_to_index(&self, id: &K) -> Result<usize> {
        self.index(id).ok_or_else(|| not_found(self.kind, id))
    }
}

impl<K> std::fmt::Debug for IndexIdMap<K>
where
    K: Clone + Eq + Hash + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
