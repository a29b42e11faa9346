use super::*;
use crate::graph::{ElementKind, IndexEvent};
use crate::{GraphError, Result};
use std::any::Any;

/// Object-safe face of a [Weights] map, used to keep maps of different types side by side.
trait ErasedWeights: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn type_name(&self) -> &'static str;
    fn len(&self) -> usize;
    fn push_default(&mut self);
    fn apply(&mut self, event: IndexEvent);
    fn clone_box(&self) -> Box<dyn ErasedWeights>;
    fn permuted(&self, order: &[usize]) -> Box<dyn ErasedWeights>;
}

impl<T: WeightValue> ErasedWeights for Weights<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn len(&self) -> usize {
        Weights::len(self)
    }

    fn push_default(&mut self) {
        Weights::push_default(self)
    }

    fn apply(&mut self, event: IndexEvent) {
        Weights::apply(self, event)
    }

    fn clone_box(&self) -> Box<dyn ErasedWeights> {
        Box::new(self.clone())
    }

    fn permuted(&self, order: &[usize]) -> Box<dyn ErasedWeights> {
        Box::new(Weights::permuted(self, order))
    }
}

struct Entry {
    key: String,
    weights: Box<dyn ErasedWeights>,
}

impl Clone for Entry {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            weights: self.weights.clone_box(),
        }
    }
}

/// Named weight maps of one index space, possibly of different value types.
///
/// All maps always have exactly `len` slots.
#[derive(Clone)]
pub struct WeightsSet {
    kind: ElementKind,
    len: usize,
    entries: Vec<Entry>,
}

fn downcast<'a, T: WeightValue>(
    key: &str,
    w: &'a dyn ErasedWeights,
) -> Result<&'a Weights<T>> {
    w.as_any()
        .downcast_ref::<Weights<T>>()
        .ok_or_else(|| GraphError::WeightsTypeMismatch {
            key: key.to_string(),
            expected: std::any::type_name::<T>(),
            actual: w.type_name(),
        })
}

fn downcast_mut<'a, T: WeightValue>(
    key: &str,
    w: &'a mut dyn ErasedWeights,
) -> Result<&'a mut Weights<T>> {
    let actual = w.type_name();
    w.as_any_mut()
        .downcast_mut::<Weights<T>>()
        .ok_or_else(|| GraphError::WeightsTypeMismatch {
            key: key.to_string(),
            expected: std::any::type_name::<T>(),
            actual,
        })
}

impl WeightsSet {
    pub fn new(kind: ElementKind, len: usize) -> Self {
        Self {
            kind,
            len,
            entries: vec![],
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Number of slots in every map.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Attaches a new map under `key`, replacing whatever map was there.
    pub fn add<T: WeightValue>(&mut self, key: &str, default: T) -> Result<&mut Weights<T>> {
        let weights: Box<dyn ErasedWeights> = Box::new(Weights::new(self.kind, self.len, default));
        let pos = match self.position(key) {
            Some(pos) => {
                self.entries[pos].weights = weights;
                pos
            }
            None => {
                self.entries.push(Entry {
                    key: key.to_string(),
                    weights,
                });
                self.entries.len() - 1
            }
        };
        downcast_mut(key, self.entries[pos].weights.as_mut())
    }

    pub fn get<T: WeightValue>(&self, key: &str) -> Result<&Weights<T>> {
        let pos = self.find(key)?;
        downcast(key, self.entries[pos].weights.as_ref())
    }

    pub fn get_mut<T: WeightValue>(&mut self, key: &str) -> Result<&mut Weights<T>> {
        let pos = self.find(key)?;
        downcast_mut(key, self.entries[pos].weights.as_mut())
    }

    /// Mutable access to two different maps at once.
    pub fn get_pair_mut<A, B>(
        &mut self,
        a: &str,
        b: &str,
    ) -> Result<(&mut Weights<A>, &mut Weights<B>)>
    where
        A: WeightValue,
        B: WeightValue,
    {
        let pa = self.find(a)?;
        let pb = self.find(b)?;
        if pa == pb {
            return Err(GraphError::AliasedWeights(a.to_string()));
        }
        let (lo, hi) = self.entries.split_at_mut(pa.max(pb));
        let (ea, eb) = if pa < pb {
            (&mut lo[pa], &mut hi[0])
        } else {
            (&mut hi[0], &mut lo[pb])
        };
        Ok((
            downcast_mut(a, ea.weights.as_mut())?,
            downcast_mut(b, eb.weights.as_mut())?,
        ))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Detaches the map under `key`, returning whether there was one.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Names of attached maps in attaching order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub(crate) fn push_default(&mut self) {
        self.len += 1;
        for e in self.entries.iter_mut() {
            e.weights.push_default();
        }
    }

    pub(crate) fn apply(&mut self, event: IndexEvent) {
        self.len = match event {
            IndexEvent::Swap { .. } | IndexEvent::RemoveLast { .. } => self.len - 1,
            IndexEvent::Clear => 0,
        };
        for e in self.entries.iter_mut() {
            e.weights.apply(event);
            debug_assert_eq!(e.weights.len(), self.len);
        }
    }

    pub(crate) fn permuted(&self, order: &[usize]) -> Self {
        debug_assert_eq!(order.len(), self.len);
        Self {
            kind: self.kind,
            len: self.len,
            entries: self
                .entries
                .iter()
                .map(|e| Entry {
                    key: e.key.clone(),
                    weights: e.weights.permuted(order),
                })
                .collect(),
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    fn find(&self, key: &str) -> Result<usize> {
        self.position(key)
            .ok_or_else(|| GraphError::NoSuchWeights(key.to_string()))
    }
}

impl std::fmt::Debug for WeightsSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (&e.key, e.weights.type_name())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access() {
        let mut set = WeightsSet::new(ElementKind::Edge, 3);
        set.add("w", 0i32).unwrap().set(1usize, 7).unwrap();
        set.add("flag", false).unwrap();
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["w", "flag"]);
        assert_eq!(set.get::<i32>("w").unwrap().get(1usize).unwrap(), 7);
        assert!(matches!(
            set.get::<i64>("w"),
            Err(GraphError::WeightsTypeMismatch { .. })
        ));
        assert_eq!(
            set.get::<i32>("nope").unwrap_err(),
            GraphError::NoSuchWeights("nope".to_string())
        );
    }

    #[test]
    fn add_replaces() {
        let mut set = WeightsSet::new(ElementKind::Vertex, 2);
        set.add("w", 1i32).unwrap();
        set.add("w", 2.5f64).unwrap();
        assert_eq!(set.keys().count(), 1);
        assert_eq!(set.get::<f64>("w").unwrap().get(0usize).unwrap(), 2.5);
        assert!(set.remove("w"));
        assert!(!set.remove("w"));
    }

    #[test]
    fn pair_and_events() {
        let mut set = WeightsSet::new(ElementKind::Edge, 0);
        set.add("cap", 1.0f64).unwrap();
        set.add("flow", 0.0f64).unwrap();
        for _ in 0..3 {
            set.push_default();
        }
        {
            let (flow, cap) = set.get_pair_mut::<f64, f64>("flow", "cap").unwrap();
            cap.set(2usize, 4.0).unwrap();
            flow.set(2usize, 9.0).unwrap();
        }
        assert!(set.get_pair_mut::<f64, f64>("cap", "cap").is_err());
        set.apply(IndexEvent::Swap { from: 2, to: 0 });
        assert_eq!(set.len(), 2);
        assert_eq!(set.get::<f64>("cap").unwrap().get(0usize).unwrap(), 4.0);
        assert_eq!(set.get::<f64>("flow").unwrap().get(0usize).unwrap(), 9.0);
    }
}
