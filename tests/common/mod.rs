#![allow(dead_code)]

use tclscan::{Node, Root, build};

/// Build a source and assert it parsed without errors.
pub fn build_clean(input: &str) -> Root {
    let root = build(input, "test.tcl");
    assert!(
        !root.had_error,
        "unexpected errors:\n--- source ---\n{input}\n--- errors ---\n{:#?}",
        root.errors
    );
    root
}

/// The `kind_name` of every top-level node, in order.
pub fn child_kinds(root: &Root) -> Vec<&'static str> {
    root.children.iter().map(Node::kind_name).collect()
}

/// Assert every child range lies within its parent's range, recursively.
pub fn assert_range_containment(node: &Node) {
    for child in node.children() {
        assert!(
            node.range().contains(&child.range()),
            "child range {:?} escapes parent range {:?}",
            child.range(),
            node.range()
        );
        assert_range_containment(child);
    }
}
