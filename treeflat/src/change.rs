//! Collection change notifications.
//!
//! Every mutation fed into a flattener is republished as one or more
//! [`CollectionChange`] values, delivered to subscribers in call order.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::flattener::TreeFlattener;

/// Kind of change to the flat sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    /// Items were inserted at `start_index`.
    Add,
    /// Items were removed starting at `start_index`.
    Remove,
}

/// A single change notification.
///
/// Batch notifications carry every affected node; per-node notifications
/// carry exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionChange<N> {
    /// What happened.
    pub action: ChangeAction,
    /// Flat-relative index of the first affected item.
    pub start_index: usize,
    /// Affected nodes, in flat order.
    pub items: Vec<N>,
}

impl<N> CollectionChange<N> {
    /// An add notification.
    pub fn add(start_index: usize, items: Vec<N>) -> Self {
        Self {
            action: ChangeAction::Add,
            start_index,
            items,
        }
    }

    /// A remove notification.
    pub fn remove(start_index: usize, items: Vec<N>) -> Self {
        Self {
            action: ChangeAction::Remove,
            start_index,
            items,
        }
    }

    /// Number of affected items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the notification carries no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Handle returned by [`TreeFlattener::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

impl SubscriptionId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

type Handler<N> = Box<dyn FnMut(&TreeFlattener<N>, &CollectionChange<N>)>;

/// Ordered list of change handlers.
pub(crate) struct Listeners<N> {
    handlers: Vec<(SubscriptionId, Handler<N>)>,
}

impl<N> Default for Listeners<N> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<N> Listeners<N> {
    pub(crate) fn push(&mut self, handler: Handler<N>) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.handlers.push((id, handler));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub, _)| *sub != id);
        self.handlers.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }

    pub(crate) fn dispatch(&mut self, source: &TreeFlattener<N>, change: &CollectionChange<N>) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(source, change);
        }
    }
}
