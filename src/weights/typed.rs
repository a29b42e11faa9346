use super::*;
use crate::graph::{ElementKind, IndexEvent};
use crate::{GraphError, Result};

/// One value of type `T` per vertex or edge index.
#[derive(Debug, Clone)]
pub struct Weights<T: WeightValue> {
    kind: ElementKind,
    default: T,
    data: T::Storage,
}

impl<T: WeightValue> Weights<T> {
    /// Creates `len` slots, all holding `default`.
    ///
    /// Such a map is not attached to any graph and does not follow its removals.
    pub fn new(kind: ElementKind, len: usize, default: T) -> Self {
        Self {
            kind,
            data: T::Storage::with_len(len, &default),
            default,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// The value of slots never set.
    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get<I: Into<usize>>(&self, index: I) -> Result<T> {
        let index = self.check(index.into())?;
        Ok(self.data.get(index))
    }

    pub fn set<I: Into<usize>>(&mut self, index: I, value: T) -> Result<()> {
        let index = self.check(index.into())?;
        self.data.set(index, value);
        Ok(())
    }

    /// Sets a slot back to the default value.
    pub fn reset<I: Into<usize>>(&mut self, index: I) -> Result<()> {
        let value = self.default.clone();
        self.set(index, value)
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.data.len()).map(move |i| self.data.get(i))
    }

    fn check(&self, index: usize) -> Result<usize> {
        if index < self.data.len() {
            Ok(index)
        } else {
            Err(match self.kind {
                ElementKind::Vertex => GraphError::no_such_vertex(index),
                ElementKind::Edge => GraphError::no_such_edge(index),
            })
        }
    }

    pub(crate) fn push_default(&mut self) {
        self.data.push(self.default.clone());
    }

    pub(crate) fn apply(&mut self, event: IndexEvent) {
        match event {
            IndexEvent::Swap { from, to } => {
                debug_assert_eq!(from + 1, self.data.len());
                self.data.swap_remove(to);
            }
            IndexEvent::RemoveLast { index } => {
                debug_assert_eq!(index + 1, self.data.len());
                self.data.swap_remove(index);
            }
            IndexEvent::Clear => self.data.clear(),
        }
    }

    /// Values rearranged so that new slot `i` holds old slot `order[i]`.
    pub(crate) fn permuted(&self, order: &[usize]) -> Self {
        let mut data = T::Storage::with_len(0, &self.default);
        for i in order.iter() {
            data.push(self.data.get(*i));
        }
        Self {
            kind: self.kind,
            default: self.default.clone(),
            data,
        }
    }
}

impl<T> Weights<T>
where
    T: WeightValue<Storage = VecStorage<T>>,
{
    /// Borrows a value without cloning it.
    pub fn get_ref<I: Into<usize>>(&self, index: I) -> Result<&T> {
        let index = self.check(index.into())?;
        Ok(&self.data.as_slice()[index])
    }
}

impl<T> PartialEq for Weights<T>
where
    T: WeightValue + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.default == other.default
            && self.len() == other.len()
            && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}
