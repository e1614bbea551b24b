use std::fs::File;

use simplelog::{Config, LevelFilter, WriteLogger};
use treeflat::{ChangeAction, FlattenerConfig, TreeFlattener, TreeNode};

fn main() -> std::io::Result<()> {
    // Set up file logging
    let log_file = File::create("outline.log")?;
    WriteLogger::init(LevelFilter::Trace, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let root = TreeNode::new("workspace");
    let src = TreeNode::new("src");
    for name in ["lib.rs", "flattener.rs", "view.rs"] {
        src.add_child(TreeNode::new(name));
    }
    root.add_child(src.clone());
    root.add_child(TreeNode::new("Cargo.toml"));
    root.expand();

    let view = TreeFlattener::with_config(&root, FlattenerConfig::new("outline").hide_root());
    view.subscribe(|view, change| {
        let verb = match change.action {
            ChangeAction::Add => "added",
            ChangeAction::Remove => "removed",
        };
        println!(
            "-- {} {} row(s) at {}, now {} rows",
            verb,
            change.len(),
            change.start_index,
            view.len()
        );
    });

    print_rows(&view);
    if let Some(splice) = src.expand() {
        view.apply(splice);
    }
    print_rows(&view);
    if let Some(splice) = src.collapse() {
        view.nodes_removed_each(splice.index, splice.nodes);
    }
    print_rows(&view);

    view.stop();
    Ok(())
}

fn print_rows(view: &TreeFlattener<TreeNode>) {
    for (row, node) in view.iter().enumerate() {
        let indent = "  ".repeat(node.depth().saturating_sub(1));
        let icon = if node.child_count() == 0 {
            "  "
        } else if node.is_expanded() {
            "▼ "
        } else {
            "▶ "
        };
        println!("{:>2} {}{}{}", row, indent, icon, node.label());
    }
}
