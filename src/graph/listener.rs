//! Notifications of index compaction.

/// Which index space an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Vertex,
    Edge,
}

/// A change of an index space caused by a removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexEvent {
    /// The element at `to` was removed and the last element, previously at `from`, now lives at `to`.
    Swap { from: usize, to: usize },
    /// The last element, at `index`, was removed and nothing moved.
    RemoveLast { index: usize },
    /// All elements were removed.
    Clear,
}

/// Handle returned on registration, used to unregister a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

type Callback = Box<dyn FnMut(IndexEvent) + Send + Sync>;

/// Listeners of one index space, called in registration order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: usize,
    callbacks: Vec<(ListenerId, Callback)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, f: Callback) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, f));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(x, _)| *x != id);
        before != self.callbacks.len()
    }

    pub fn fire(&mut self, event: IndexEvent) {
        for (_, f) in self.callbacks.iter_mut() {
            f(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn fire_in_registration_order() {
        let log = Arc::new(Mutex::new(vec![]));
        let mut listeners = Listeners::new();
        let l0 = log.clone();
        let first = listeners.add(Box::new(move |ev| l0.lock().unwrap().push((0, ev))));
        let l1 = log.clone();
        listeners.add(Box::new(move |ev| l1.lock().unwrap().push((1, ev))));
        listeners.fire(IndexEvent::Swap { from: 3, to: 1 });
        assert!(listeners.remove(first));
        assert!(!listeners.remove(first));
        listeners.fire(IndexEvent::RemoveLast { index: 2 });
        assert_eq!(listeners.len(), 1);
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                (0, IndexEvent::Swap { from: 3, to: 1 }),
                (1, IndexEvent::Swap { from: 3, to: 1 }),
                (1, IndexEvent::RemoveLast { index: 2 }),
            ]
        );
    }
}
