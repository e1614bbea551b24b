use std::cell::RefCell;
use std::rc::Rc;

use treeflat::{
    ChangeAction, CollectionChange, FlattenError, FlattenerConfig, ListNode, ListView,
    TreeFlattener, TreeNode,
};

/// Expanded root with `count` leaf children labelled `c0`, `c1`, ...
fn root_with_children(count: usize) -> TreeNode {
    let root = TreeNode::new("root");
    root.expand();
    for i in 0..count {
        root.add_child(TreeNode::new(format!("c{i}")));
    }
    root
}

type Log = Rc<RefCell<Vec<CollectionChange<TreeNode>>>>;

fn record(view: &TreeFlattener<TreeNode>) -> Log {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    view.subscribe(move |_, change| sink.borrow_mut().push(change.clone()));
    log
}

fn labels(view: &TreeFlattener<TreeNode>) -> Vec<String> {
    view.iter().map(|n| n.label()).collect()
}

// ============================================================================
// Attachment
// ============================================================================

#[test]
fn test_attaches_to_list_root() {
    let root = root_with_children(2);
    let child = root.children()[1].clone();

    let view = TreeFlattener::new(&child, false);
    assert_eq!(view.root(), &root);
    assert_eq!(root.attached_projector(), Some(view.id()));
    assert_eq!(child.attached_projector(), None);
}

#[test]
fn test_stop_clears_registration() {
    let root = root_with_children(1);
    let view = TreeFlattener::new(&root, false);
    view.stop();
    assert_eq!(root.attached_projector(), None);

    // A new flattener can attach once the old one is gone.
    let next = TreeFlattener::new(&root, true);
    assert_eq!(root.attached_projector(), Some(next.id()));
}

#[test]
#[should_panic(expected = "cannot stop")]
fn test_stop_twice_panics() {
    let root = root_with_children(1);
    let view = TreeFlattener::new(&root, false);
    view.stop();
    view.stop();
}

#[test]
#[should_panic(expected = "cannot stop")]
fn test_stop_replaced_flattener_panics() {
    let root = root_with_children(1);
    let first = TreeFlattener::new(&root, false);
    first.stop();
    let _second = TreeFlattener::new(&root, false);
    first.stop();
}

#[test]
#[should_panic(expected = "already has flattener")]
fn test_second_attachment_panics() {
    let root = root_with_children(1);
    let _first = TreeFlattener::new(&root, false);
    let _second = TreeFlattener::new(&root, true);
}

#[test]
fn test_config_is_kept() {
    let root = root_with_children(1);
    let view = TreeFlattener::with_config(&root, FlattenerConfig::new("outline").show_root());
    assert!(view.include_root());
    assert_eq!(view.config().name, "outline");
}

// ============================================================================
// Count and indexed access
// ============================================================================

#[test]
fn test_len_hidden_root() {
    let root = root_with_children(5);
    let view = TreeFlattener::new(&root, false);
    assert_eq!(view.len(), root.total_list_length() - 1);
    assert_eq!(view.len(), 5);
    assert_eq!(labels(&view), ["c0", "c1", "c2", "c3", "c4"]);
}

#[test]
fn test_len_shown_root() {
    let root = root_with_children(3);
    let view = TreeFlattener::new(&root, true);
    assert_eq!(view.len(), root.total_list_length());
    assert_eq!(labels(&view), ["root", "c0", "c1", "c2"]);
}

#[test]
fn test_empty_view_with_hidden_root() {
    let root = TreeNode::new("root");
    let view = TreeFlattener::new(&root, false);
    assert!(view.is_empty());
    assert_eq!(view.iter().count(), 0);
}

#[test]
fn test_get_out_of_range() {
    let root = root_with_children(3);
    let view = TreeFlattener::new(&root, false);

    assert_eq!(
        view.get(3),
        Err(FlattenError::IndexOutOfRange { index: 3, len: 3 })
    );
    assert_eq!(
        view.get(usize::MAX),
        Err(FlattenError::IndexOutOfRange {
            index: usize::MAX,
            len: 3
        })
    );
    assert_eq!(view.cached_len(), 0);
}

#[test]
fn test_get_memoizes_lookups() {
    let root = root_with_children(3);
    let view = TreeFlattener::new(&root, false);

    let first = view.get(1).unwrap();
    let again = view.get(1).unwrap();
    assert_eq!(first, again);
    assert_eq!(view.cached_len(), 1);
}

#[test]
fn test_index_of_round_trips() {
    for include_root in [false, true] {
        let root = root_with_children(3);
        let inner = root.children()[1].clone();
        inner.add_child(TreeNode::new("leaf"));
        inner.expand();

        let view = TreeFlattener::new(&root, include_root);
        for i in 0..view.len() {
            let node = view.get(i).unwrap();
            assert_eq!(view.index_of(&node), Some(i));
            assert!(view.contains(&node));
        }
    }
}

#[test]
fn test_index_of_foreign_or_hidden() {
    let root = root_with_children(2);
    let collapsed = root.children()[0].clone();
    let hidden = TreeNode::new("hidden");
    collapsed.add_child(hidden.clone());
    let stranger = TreeNode::new("stranger");

    let view = TreeFlattener::new(&root, false);
    assert_eq!(view.index_of(&hidden), None);
    assert!(!view.contains(&hidden));
    assert_eq!(view.index_of(&stranger), None);
    assert!(!view.contains(&stranger));
    // The hidden root itself has no flat index.
    assert_eq!(view.index_of(&root), None);
}

#[test]
fn test_index_of_shown_root() {
    let root = root_with_children(2);
    let view = TreeFlattener::new(&root, true);
    assert_eq!(view.index_of(&root), Some(0));
}

// ============================================================================
// Change notifications
// ============================================================================

#[test]
fn test_batch_insert_hidden_root() {
    let root = root_with_children(5);
    let view = TreeFlattener::new(&root, false);
    let log = record(&view);

    let x = TreeNode::new("x");
    let y = TreeNode::new("y");
    root.insert_child(2, x.clone());
    root.insert_child(3, y.clone());
    view.nodes_inserted(3, vec![x.clone(), y.clone()]);

    let log = log.borrow();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].action, ChangeAction::Add);
    assert_eq!(log[0].start_index, 2);
    assert_eq!(log[0].items, vec![x.clone(), y.clone()]);

    assert_eq!(view.len(), 7);
    assert_eq!(view.get(2).unwrap(), x);
    assert_eq!(view.get(3).unwrap(), y);
}

#[test]
fn test_batch_insert_shown_root_keeps_index() {
    let root = root_with_children(2);
    let view = TreeFlattener::new(&root, true);
    let log = record(&view);

    let x = TreeNode::new("x");
    root.insert_child(1, x.clone());
    view.nodes_inserted(2, vec![x]);

    assert_eq!(log.borrow()[0].start_index, 2);
}

#[test]
fn test_insert_each_advances_index() {
    let root = root_with_children(2);
    let view = TreeFlattener::new(&root, false);
    let log = record(&view);

    let nodes: Vec<_> = ["x", "y", "z"].into_iter().map(TreeNode::new).collect();
    for (i, node) in nodes.iter().enumerate() {
        root.insert_child(1 + i, node.clone());
    }
    view.nodes_inserted_each(2, nodes.clone());

    let log = log.borrow();
    assert_eq!(log.len(), 3);
    for (i, change) in log.iter().enumerate() {
        assert_eq!(change.action, ChangeAction::Add);
        assert_eq!(change.start_index, 1 + i);
        assert_eq!(change.items, vec![nodes[i].clone()]);
    }
}

#[test]
fn test_batch_remove_hidden_root() {
    let root = root_with_children(5);
    let view = TreeFlattener::new(&root, false);
    let log = record(&view);

    let (removed, _) = root.remove_child(1);
    view.nodes_removed(2, vec![removed.clone()]);

    let log = log.borrow();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].action, ChangeAction::Remove);
    assert_eq!(log[0].start_index, 1);
    assert_eq!(log[0].items, vec![removed]);
    assert_eq!(view.len(), 4);
}

#[test]
fn test_remove_each_keeps_index() {
    let root = root_with_children(5);
    let view = TreeFlattener::new(&root, false);
    let log = record(&view);

    let mut removed = Vec::new();
    for _ in 0..3 {
        let (node, _) = root.remove_child(2);
        removed.push(node);
    }
    view.nodes_removed_each(3, removed.clone());

    let log = log.borrow();
    assert_eq!(log.len(), 3);
    for (i, change) in log.iter().enumerate() {
        assert_eq!(change.action, ChangeAction::Remove);
        assert_eq!(change.start_index, 2);
        assert_eq!(change.items, vec![removed[i].clone()]);
    }
    assert_eq!(labels(&view), ["c0", "c1"]);
}

#[test]
fn test_notification_clears_cache() {
    let root = root_with_children(3);
    let view = TreeFlattener::new(&root, false);

    let before = view.get(1).unwrap();
    assert_eq!(before.label(), "c1");

    let x = TreeNode::new("x");
    root.insert_child(1, x.clone());
    view.nodes_inserted(2, vec![x.clone()]);
    assert_eq!(view.cached_len(), 0);

    let after = view.get(1).unwrap();
    assert_eq!(after, x);
    assert_eq!(after, TreeNode::node_at_visible_index(&root, 2).unwrap());
}

#[test]
fn test_handler_reads_current_view() {
    let root = root_with_children(2);
    let view = TreeFlattener::new(&root, false);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    view.subscribe(move |view, change| {
        let node = view.get(change.start_index).unwrap();
        sink.borrow_mut().push((view.len(), node.label()));
    });

    let x = TreeNode::new("x");
    root.add_child(x.clone());
    view.nodes_inserted(3, vec![x]);

    assert_eq!(*seen.borrow(), vec![(3, "x".to_string())]);
}

#[test]
fn test_handlers_run_in_subscription_order() {
    let root = root_with_children(1);
    let view = TreeFlattener::new(&root, false);
    let order = Rc::new(RefCell::new(Vec::new()));

    for tag in ["first", "second"] {
        let sink = order.clone();
        view.subscribe(move |_, _| sink.borrow_mut().push(tag));
    }

    let x = TreeNode::new("x");
    root.add_child(x.clone());
    view.nodes_inserted(2, vec![x]);
    assert_eq!(*order.borrow(), ["first", "second"]);
}

#[test]
fn test_unsubscribe() {
    let root = root_with_children(1);
    let view = TreeFlattener::new(&root, false);
    let log = record(&view);
    let id = view.subscribe(|_, _| panic!("unsubscribed handler ran"));
    assert_eq!(view.subscriber_count(), 2);

    assert!(view.unsubscribe(id));
    assert!(!view.unsubscribe(id));

    let x = TreeNode::new("x");
    root.add_child(x.clone());
    view.nodes_inserted(2, vec![x]);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_apply_tree_splices() {
    let root = root_with_children(2);
    let folder = root.children()[0].clone();
    folder.add_child(TreeNode::new("f0"));
    folder.add_child(TreeNode::new("f1"));

    let view = TreeFlattener::new(&root, false);
    let log = record(&view);

    view.apply(folder.expand().unwrap());
    assert_eq!(labels(&view), ["c0", "f0", "f1", "c1"]);

    view.apply(folder.collapse().unwrap());
    assert_eq!(labels(&view), ["c0", "c1"]);

    let log = log.borrow();
    assert_eq!(log[0], CollectionChange::add(1, folder.children()));
    assert_eq!(log[1], CollectionChange::remove(1, folder.children()));
}

// ============================================================================
// Read-only contract
// ============================================================================

#[test]
fn test_writes_are_unsupported() {
    let root = root_with_children(3);
    let mut view = TreeFlattener::new(&root, false);
    view.get(0).unwrap();
    let node = TreeNode::new("x");

    assert!(view.is_read_only());
    assert_eq!(
        view.insert(0, node.clone()),
        Err(FlattenError::Unsupported("insert"))
    );
    assert_eq!(view.clear(), Err(FlattenError::Unsupported("clear")));
    assert_eq!(
        view.set(0, node.clone()),
        Err(FlattenError::Unsupported("set"))
    );
    assert_eq!(view.remove_at(0), Err(FlattenError::Unsupported("remove_at")));
    assert_eq!(
        view.push(node.clone()),
        Err(FlattenError::Unsupported("push"))
    );
    assert_eq!(view.remove(&node), Err(FlattenError::Unsupported("remove")));

    assert_eq!(view.len(), 3);
    assert_eq!(view.cached_len(), 1);
}

#[test]
fn test_copy_to_with_offset() {
    let root = root_with_children(3);
    let view = TreeFlattener::new(&root, false);
    let filler = TreeNode::new("filler");
    let mut buf = vec![filler.clone(); 5];

    view.copy_to(&mut buf, 1).unwrap();
    let got: Vec<_> = buf.iter().map(|n| n.label()).collect();
    assert_eq!(got, ["filler", "c0", "c1", "c2", "filler"]);
}

#[test]
fn test_copy_to_short_buffer() {
    let root = root_with_children(3);
    let view = TreeFlattener::new(&root, false);
    let mut buf = vec![TreeNode::new("filler"); 3];

    assert_eq!(
        view.copy_to(&mut buf, 1),
        Err(FlattenError::BufferTooSmall {
            needed: 3,
            available: 2
        })
    );
}

#[test]
fn test_iteration_is_restartable() {
    let root = root_with_children(2);
    let view = TreeFlattener::new(&root, false);
    assert_eq!(labels(&view), ["c0", "c1"]);

    let x = TreeNode::new("x");
    root.add_child(x.clone());
    view.nodes_inserted(3, vec![x]);

    let again: Vec<_> = (&view).into_iter().map(|n| n.label()).collect();
    assert_eq!(again, ["c0", "c1", "x"]);
}

#[test]
fn test_list_view_reads_delegate() {
    let root = root_with_children(2);
    let view = TreeFlattener::new(&root, false);
    let list: &dyn ListView<TreeNode> = &view;

    assert_eq!(list.len(), 2);
    assert!(!list.is_empty());
    let node = list.get(1).unwrap();
    assert_eq!(list.index_of(&node), Some(1));
    assert!(list.contains(&node));
}
