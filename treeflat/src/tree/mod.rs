//! A simple expandable tree implementing [`ListNode`](crate::ListNode).
//!
//! Nodes are shared handles; a child's visible position is found by summing
//! sibling subtree sizes on the way up, and lookups by position descend the
//! same way.
//!
//! # Example
//!
//! ```
//! use treeflat::{TreeFlattener, TreeNode};
//!
//! let root = TreeNode::new("root");
//! root.expand();
//! let view = TreeFlattener::new(&root, false);
//!
//! // Mutations return the visible splice; feed it to the view.
//! if let Some(splice) = root.add_child(TreeNode::new("docs")) {
//!     view.apply(splice);
//! }
//! assert_eq!(view.len(), 1);
//! ```

mod node;

pub use node::TreeNode;
