//! Tree node handle.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::node::{ListNode, NodeSplice, ProjectorId};

#[derive(Debug)]
struct NodeData {
    label: String,
    expanded: bool,
    parent: Weak<RefCell<NodeData>>,
    children: Vec<TreeNode>,
    flattener: Option<ProjectorId>,
}

/// A node in an expandable tree.
///
/// Cloning yields another handle to the same node; equality is identity.
/// Children are visible when every ancestor up to the root is expanded.
/// The root itself is always visible.
#[derive(Clone)]
pub struct TreeNode(Rc<RefCell<NodeData>>);

impl TreeNode {
    /// Create a detached, collapsed node.
    pub fn new(label: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            label: label.into(),
            expanded: false,
            parent: Weak::new(),
            children: Vec::new(),
            flattener: None,
        })))
    }

    /// Get the label.
    pub fn label(&self) -> String {
        self.0.borrow().label.clone()
    }

    /// Get the parent node.
    pub fn parent(&self) -> Option<TreeNode> {
        self.0.borrow().parent.upgrade().map(TreeNode)
    }

    /// Get the child nodes.
    pub fn children(&self) -> Vec<TreeNode> {
        self.0.borrow().children.clone()
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// Whether children are shown.
    pub fn is_expanded(&self) -> bool {
        self.0.borrow().expanded
    }

    /// Distance from the root (root = 0).
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self.parent();
        while let Some(parent) = node {
            depth += 1;
            node = parent.parent();
        }
        depth
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Append a child. See [`insert_child`](Self::insert_child).
    pub fn add_child(&self, child: TreeNode) -> Option<NodeSplice<TreeNode>> {
        self.insert_child(self.child_count(), child)
    }

    /// Insert `child` (with its subtree) at `index` among the children.
    ///
    /// Returns the added splice when the child became visible.
    ///
    /// # Panics
    ///
    /// Panics if `index > child_count()` or if `child` already has a parent.
    pub fn insert_child(&self, index: usize, child: TreeNode) -> Option<NodeSplice<TreeNode>> {
        assert!(child.parent().is_none(), "child is already attached");
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.insert(index, child.clone());

        if !self.shows_children() {
            return None;
        }
        Some(NodeSplice::added(child.visible_index(), child.visible_subtree()))
    }

    /// Remove the child at `index`, detaching its subtree.
    ///
    /// Returns the child and, when it was visible, the removed splice.
    ///
    /// # Panics
    ///
    /// Panics if `index >= child_count()`.
    pub fn remove_child(&self, index: usize) -> (TreeNode, Option<NodeSplice<TreeNode>>) {
        let child = self.0.borrow().children[index].clone();
        let splice = self
            .shows_children()
            .then(|| NodeSplice::removed(child.visible_index(), child.visible_subtree()));

        self.0.borrow_mut().children.remove(index);
        child.0.borrow_mut().parent = Weak::new();
        (child, splice)
    }

    /// Show the children. Returns the added splice if any node became visible.
    pub fn expand(&self) -> Option<NodeSplice<TreeNode>> {
        if self.is_expanded() {
            return None;
        }
        self.0.borrow_mut().expanded = true;

        if !self.is_visible() {
            return None;
        }
        let nodes = self.visible_descendants();
        if nodes.is_empty() {
            return None;
        }
        Some(NodeSplice::added(self.visible_index() + 1, nodes))
    }

    /// Hide the children. Returns the removed splice if any node was hidden.
    pub fn collapse(&self) -> Option<NodeSplice<TreeNode>> {
        if !self.is_expanded() {
            return None;
        }
        let splice = if self.is_visible() {
            let nodes = self.visible_descendants();
            (!nodes.is_empty()).then(|| NodeSplice::removed(self.visible_index() + 1, nodes))
        } else {
            None
        };
        self.0.borrow_mut().expanded = false;
        splice
    }

    /// Descendants shown under this node, in depth-first order.
    pub fn visible_descendants(&self) -> Vec<TreeNode> {
        let mut nodes = Vec::new();
        self.collect_visible_descendants(&mut nodes);
        nodes
    }

    fn collect_visible_descendants(&self, out: &mut Vec<TreeNode>) {
        if !self.is_expanded() {
            return;
        }
        for child in self.children() {
            out.push(child.clone());
            child.collect_visible_descendants(out);
        }
    }

    /// This node followed by its visible descendants.
    fn visible_subtree(&self) -> Vec<TreeNode> {
        let mut nodes = vec![self.clone()];
        self.collect_visible_descendants(&mut nodes);
        nodes
    }

    fn shows_children(&self) -> bool {
        self.is_expanded() && self.is_visible()
    }
}

impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TreeNode {}

impl std::fmt::Debug for TreeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("TreeNode")
            .field("label", &data.label)
            .field("expanded", &data.expanded)
            .field("children", &data.children.len())
            .finish()
    }
}

impl ListNode for TreeNode {
    fn list_parent(&self) -> Option<Self> {
        self.parent()
    }

    fn is_visible(&self) -> bool {
        let mut node = self.parent();
        while let Some(parent) = node {
            if !parent.is_expanded() {
                return false;
            }
            node = parent.parent();
        }
        true
    }

    fn total_list_length(&self) -> usize {
        if !self.is_expanded() {
            return 1;
        }
        1 + self
            .children()
            .iter()
            .map(TreeNode::total_list_length)
            .sum::<usize>()
    }

    fn node_at_visible_index(root: &Self, position: usize) -> Option<Self> {
        let mut node = root.clone();
        let mut remaining = position;
        loop {
            if remaining == 0 {
                return Some(node);
            }
            if !node.is_expanded() {
                return None;
            }
            remaining -= 1;

            let mut next = None;
            for child in node.children() {
                let len = child.total_list_length();
                if remaining < len {
                    next = Some(child);
                    break;
                }
                remaining -= len;
            }
            node = next?;
        }
    }

    fn visible_index(&self) -> usize {
        let mut index = 0;
        let mut node = self.clone();
        while let Some(parent) = node.parent() {
            index += 1;
            for sibling in parent.children() {
                if sibling == node {
                    break;
                }
                index += sibling.total_list_length();
            }
            node = parent;
        }
        index
    }

    fn attached_projector(&self) -> Option<ProjectorId> {
        self.0.borrow().flattener
    }

    fn set_attached_projector(&self, projector: Option<ProjectorId>) {
        self.0.borrow_mut().flattener = projector;
    }
}
