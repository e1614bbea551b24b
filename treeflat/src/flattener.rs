//! The flat view over a tree.

use std::cell::RefCell;
use std::collections::HashMap;

use log::{debug, trace};

use crate::change::{ChangeAction, CollectionChange, Listeners, SubscriptionId};
use crate::config::FlattenerConfig;
use crate::error::FlattenError;
use crate::node::{ListNode, NodeSplice, ProjectorId};

/// A read-only, indexable projection of a tree's visible nodes.
///
/// `TreeFlattener` attaches to the linear-list root of the node it is created
/// from and maps flat indices to nodes:
/// - Random access by flat index, memoized until the next mutation
/// - Reverse lookup of a node's flat index
/// - Change notifications translated from tree-relative positions
///
/// When the root is hidden, flat index 0 is tree position 1.
///
/// The flattener performs no tree mutation itself. The owner of the tree
/// reports each mutation through [`nodes_inserted`](Self::nodes_inserted),
/// [`nodes_removed`](Self::nodes_removed) and their per-node forms.
///
/// # Reentrancy
///
/// Handlers registered with [`subscribe`](Self::subscribe) may read the view
/// but must not mutate the tree, report further mutations, or subscribe and
/// unsubscribe while a notification is being delivered.
pub struct TreeFlattener<N> {
    /// Unique identifier, registered on the root while attached.
    id: ProjectorId,
    /// Linear-list root the view is attached to.
    root: N,
    /// Fixed configuration.
    config: FlattenerConfig,
    /// Flat index -> node. Cleared on every change notification.
    cache: RefCell<HashMap<usize, N>>,
    /// Change handlers, in subscription order.
    listeners: RefCell<Listeners<N>>,
}

impl<N: ListNode> TreeFlattener<N> {
    /// Attach a flattener to the list root of `start`.
    ///
    /// # Panics
    ///
    /// Panics if another flattener is already attached to that root.
    pub fn new(start: &N, include_root: bool) -> Self {
        Self::with_config(start, FlattenerConfig::default().include_root(include_root))
    }

    /// Attach a flattener with an explicit configuration.
    ///
    /// # Panics
    ///
    /// Panics if another flattener is already attached to the list root.
    pub fn with_config(start: &N, config: FlattenerConfig) -> Self {
        let root = start.list_root();
        let id = ProjectorId::new();

        if let Some(existing) = root.attached_projector() {
            panic!(
                "cannot attach '{}': list root already has flattener {} attached",
                config.name, existing
            );
        }
        root.set_attached_projector(Some(id));
        debug!(
            "{} '{}' attached (include_root: {})",
            id, config.name, config.include_root
        );

        Self {
            id,
            root,
            config,
            cache: RefCell::new(HashMap::new()),
            listeners: RefCell::new(Listeners::default()),
        }
    }

    /// Get the unique ID.
    pub fn id(&self) -> ProjectorId {
        self.id
    }

    /// The list root this flattener is attached to.
    pub fn root(&self) -> &N {
        &self.root
    }

    /// Whether the root occupies flat index 0.
    pub fn include_root(&self) -> bool {
        self.config.include_root
    }

    /// Get the configuration.
    pub fn config(&self) -> &FlattenerConfig {
        &self.config
    }

    /// Detach from the list root.
    ///
    /// The flattener is inert afterward; its cache is left as is.
    ///
    /// # Panics
    ///
    /// Panics if this flattener is not the one registered on its root, which
    /// happens when it is stopped twice or was replaced.
    pub fn stop(&self) {
        let attached = self.root.attached_projector();
        assert!(
            attached == Some(self.id),
            "cannot stop {} '{}': root has {:?} attached",
            self.id,
            self.config.name,
            attached
        );
        self.root.set_attached_projector(None);
        debug!("{} '{}' detached", self.id, self.config.name);
    }

    // -------------------------------------------------------------------------
    // Change notifications
    // -------------------------------------------------------------------------

    /// Register a change handler. Handlers run in subscription order.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&TreeFlattener<N>, &CollectionChange<N>) + 'static,
    {
        self.listeners.borrow_mut().push(Box::new(handler))
    }

    /// Remove a change handler. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().remove(id)
    }

    /// Number of registered handlers.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// A contiguous batch was inserted at tree-relative `index`.
    pub fn nodes_inserted(&self, index: usize, nodes: Vec<N>) {
        let index = self.to_flat(index);
        self.raise(CollectionChange::add(index, nodes));
    }

    /// Nodes were inserted one after another starting at tree-relative `index`.
    ///
    /// Emits one add per node at increasing flat indices.
    pub fn nodes_inserted_each<I>(&self, index: usize, nodes: I)
    where
        I: IntoIterator<Item = N>,
    {
        let mut index = self.to_flat(index);
        for node in nodes {
            self.raise(CollectionChange::add(index, vec![node]));
            index += 1;
        }
    }

    /// A contiguous batch was removed from tree-relative `index`.
    pub fn nodes_removed(&self, index: usize, nodes: Vec<N>) {
        let index = self.to_flat(index);
        self.raise(CollectionChange::remove(index, nodes));
    }

    /// Nodes were removed one after another starting at tree-relative `index`.
    ///
    /// Emits one remove per node, all at the same flat index: each removal
    /// shifts the next node down into the vacated slot.
    pub fn nodes_removed_each<I>(&self, index: usize, nodes: I)
    where
        I: IntoIterator<Item = N>,
    {
        let index = self.to_flat(index);
        for node in nodes {
            self.raise(CollectionChange::remove(index, vec![node]));
        }
    }

    /// Report a splice as a single batch notification.
    pub fn apply(&self, splice: NodeSplice<N>) {
        match splice.action {
            ChangeAction::Add => self.nodes_inserted(splice.index, splice.nodes),
            ChangeAction::Remove => self.nodes_removed(splice.index, splice.nodes),
        }
    }

    fn to_flat(&self, index: usize) -> usize {
        debug_assert!(
            self.config.include_root || index > 0,
            "hidden root cannot change at tree position 0"
        );
        index.saturating_sub(self.config.root_offset())
    }

    fn raise(&self, change: CollectionChange<N>) {
        self.cache.borrow_mut().clear();
        trace!(
            "{} {:?} at {} ({} items)",
            self.id,
            change.action,
            change.start_index,
            change.len()
        );
        self.listeners.borrow_mut().dispatch(self, &change);
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// Number of nodes in the flat view.
    pub fn len(&self) -> usize {
        self.root
            .total_list_length()
            .saturating_sub(self.config.root_offset())
    }

    /// Check if the flat view is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the node at flat `index`.
    pub fn get(&self, index: usize) -> Result<N, FlattenError> {
        let len = self.len();
        if index >= len {
            return Err(FlattenError::IndexOutOfRange { index, len });
        }

        if let Some(node) = self.cache.borrow().get(&index).cloned() {
            return Ok(node);
        }

        let position = index + self.config.root_offset();
        let node = N::node_at_visible_index(&self.root, position)
            .ok_or(FlattenError::IndexOutOfRange { index, len })?;
        trace!("{} cache miss at {}", self.id, index);
        self.cache.borrow_mut().insert(index, node.clone());
        Ok(node)
    }

    /// Flat index of `node`, or `None` if it is hidden or belongs to another list.
    ///
    /// A hidden root has no flat index.
    pub fn index_of(&self, node: &N) -> Option<usize> {
        if !node.is_visible() || node.list_root() != self.root {
            return None;
        }
        node.visible_index().checked_sub(self.config.root_offset())
    }

    /// Check if `node` is part of the flat view.
    pub fn contains(&self, node: &N) -> bool {
        self.index_of(node).is_some()
    }

    /// Copy every node into `buf`, starting at `offset`.
    pub fn copy_to(&self, buf: &mut [N], offset: usize) -> Result<(), FlattenError> {
        let needed = self.len();
        let available = buf.len().saturating_sub(offset);
        if available < needed {
            return Err(FlattenError::BufferTooSmall { needed, available });
        }
        if needed == 0 {
            return Ok(());
        }
        for (i, slot) in buf[offset..offset + needed].iter_mut().enumerate() {
            *slot = self.get(i)?;
        }
        Ok(())
    }

    /// Iterate over the nodes in flat order.
    ///
    /// The length is re-read on every step.
    pub fn iter(&self) -> Iter<'_, N> {
        Iter {
            flattener: self,
            next: 0,
        }
    }

    /// Number of memoized index lookups.
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<N> std::fmt::Debug for TreeFlattener<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeFlattener")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("cached", &self.cache.borrow().len())
            .field(
                "subscribers",
                &self.listeners.try_borrow().map(|l| l.len()).ok(),
            )
            .finish()
    }
}

/// Iterator over a [`TreeFlattener`], created by [`TreeFlattener::iter`].
pub struct Iter<'a, N> {
    flattener: &'a TreeFlattener<N>,
    next: usize,
}

impl<N: ListNode> Iterator for Iter<'_, N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let node = self.flattener.get(self.next).ok()?;
        self.next += 1;
        Some(node)
    }
}

impl<'a, N: ListNode> IntoIterator for &'a TreeFlattener<N> {
    type Item = N;
    type IntoIter = Iter<'a, N>;

    fn into_iter(self) -> Iter<'a, N> {
        self.iter()
    }
}
