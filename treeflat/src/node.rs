//! The tree contract a flattener projects.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::change::ChangeAction;

/// Unique identifier for a flattener instance.
///
/// A tree root stores this id as its back-reference to the attached
/// flattener. It does not keep the flattener alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectorId(usize);

impl ProjectorId {
    pub(crate) fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for ProjectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__flattener_{}", self.0)
    }
}

/// Trait for tree nodes that can be projected into a flat list.
///
/// Positions are tree-relative: position 0 is the list root itself, followed
/// by its visible descendants in depth-first order. Implementations are
/// expected to resolve positions faster than a linear walk, but the
/// flattener only relies on the results.
///
/// `PartialEq` must be identity: two handles are equal iff they refer to the
/// same node.
pub trait ListNode: Clone + PartialEq {
    /// The enclosing list this node belongs to, or `None` for a list root.
    fn list_parent(&self) -> Option<Self>;

    /// Follow [`list_parent`](Self::list_parent) to the top.
    fn list_root(&self) -> Self {
        let mut node = self.clone();
        while let Some(parent) = node.list_parent() {
            node = parent;
        }
        node
    }

    /// Whether the node currently occupies a position in its list.
    fn is_visible(&self) -> bool;

    /// Positions occupied by this node and its visible descendants (at least 1).
    fn total_list_length(&self) -> usize;

    /// The node at tree-relative `position` under `root`, or `None` when
    /// `position` is outside `[0, root.total_list_length())`.
    fn node_at_visible_index(root: &Self, position: usize) -> Option<Self>;

    /// Tree-relative position of this visible node within its list root.
    fn visible_index(&self) -> usize;

    /// The flattener currently attached to this root.
    fn attached_projector(&self) -> Option<ProjectorId>;

    /// Register or clear the attached flattener.
    fn set_attached_projector(&self, projector: Option<ProjectorId>);
}

/// A contiguous run of nodes that entered or left the visible sequence.
///
/// `index` is tree-relative: it counts the list root as position 0.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSplice<N> {
    /// Whether the nodes were added or removed.
    pub action: ChangeAction,
    /// Tree-relative position of the first node.
    pub index: usize,
    /// The nodes, in depth-first order.
    pub nodes: Vec<N>,
}

impl<N> NodeSplice<N> {
    pub fn added(index: usize, nodes: Vec<N>) -> Self {
        Self {
            action: ChangeAction::Add,
            index,
            nodes,
        }
    }

    pub fn removed(index: usize, nodes: Vec<N>) -> Self {
        Self {
            action: ChangeAction::Remove,
            index,
            nodes,
        }
    }
}
