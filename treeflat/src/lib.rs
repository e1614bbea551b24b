//! Flat, indexable projection of a tree's visible nodes.
//!
//! A [`TreeFlattener`] attaches to the linear-list root of a tree and exposes
//! the visible nodes in depth-first order as a read-only list, suitable for
//! driving a virtualized list control. Tree mutations are fed in through the
//! `nodes_inserted*` / `nodes_removed*` entry points and republished to
//! subscribers as [`CollectionChange`] notifications.
//!
//! # Example
//!
//! ```
//! use treeflat::{TreeFlattener, TreeNode};
//!
//! let root = TreeNode::new("root");
//! root.add_child(TreeNode::new("a"));
//! root.add_child(TreeNode::new("b"));
//! root.expand();
//!
//! let view = TreeFlattener::new(&root, false);
//! assert_eq!(view.len(), 2);
//! assert_eq!(view.get(1).unwrap().label(), "b");
//! view.stop();
//! ```

pub mod change;
pub mod config;
pub mod error;
pub mod flattener;
pub mod node;
pub mod tree;
pub mod view;

pub use change::{ChangeAction, CollectionChange, SubscriptionId};
pub use config::FlattenerConfig;
pub use error::FlattenError;
pub use flattener::{Iter, TreeFlattener};
pub use node::{ListNode, NodeSplice, ProjectorId};
pub use tree::TreeNode;
pub use view::ListView;
