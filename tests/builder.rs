//! AST builder tests: construct coverage, recursion, error degradation,
//! and range bookkeeping.

mod common;

use common::{assert_range_containment, build_clean, child_kinds};
use tclscan::{ErrorKind, NamespaceKind, Node, Pos, build};

#[test]
fn proc_with_params_and_nested_set() {
    let root = build_clean("proc foo {a b} { set a 1 }");
    assert_eq!(root.children.len(), 1);

    let Node::Proc {
        name, params, body, ..
    } = &root.children[0]
    else {
        panic!("expected proc, got {:?}", root.children[0]);
    };
    assert_eq!(name, "foo");
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].name, "a");
    assert_eq!(params[1].name, "b");

    assert_eq!(body.len(), 1);
    let Node::Set { var_name, value, .. } = &body[0] else {
        panic!("expected set, got {:?}", body[0]);
    };
    assert_eq!(var_name, "a");
    assert_eq!(value.as_deref(), Some("1"));
}

#[test]
fn two_levels_of_namespace_nesting() {
    let root =
        build_clean("namespace eval outer { namespace eval inner { proc p {} {} } }");
    assert_eq!(root.children.len(), 1);

    let Node::Namespace {
        kind: NamespaceKind::Eval { name, body },
        ..
    } = &root.children[0]
    else {
        panic!("expected namespace eval");
    };
    assert_eq!(name, "outer");
    assert_eq!(body.len(), 1);

    let Node::Namespace {
        kind: NamespaceKind::Eval { name, body },
        ..
    } = &body[0]
    else {
        panic!("expected inner namespace eval");
    };
    assert_eq!(name, "inner");
    assert_eq!(body.len(), 1);

    let Node::Proc { name, .. } = &body[0] else {
        panic!("expected proc");
    };
    assert_eq!(name, "p");
}

#[test]
fn proc_inside_namespace_across_lines() {
    let source = "\
namespace eval util {
    proc double {x} {
        expr {$x * 2}
    }
}
";
    let root = build_clean(source);
    let Node::Namespace {
        kind: NamespaceKind::Eval { body, .. },
        ..
    } = &root.children[0]
    else {
        panic!("expected namespace eval");
    };
    let Node::Proc { name, body, .. } = &body[0] else {
        panic!("expected proc");
    };
    assert_eq!(name, "double");
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].kind_name(), "expr");
}

#[test]
fn control_flow_bodies_stay_opaque() {
    let source = "\
while {$i < 10} {
    set i [expr {$i + 1}]
}
";
    let root = build_clean(source);
    let Node::While { condition, body, .. } = &root.children[0] else {
        panic!("expected while");
    };
    assert_eq!(condition, "$i < 10");
    assert!(body.contains("set i"));
    // the body is literal text, not parsed children
    assert!(root.children[0].children().is_empty());
}

#[test]
fn if_elseif_else_branches() {
    let root = build_clean("if {$a} { x } elseif {$b} { y } else { z }");
    let Node::If {
        condition,
        then_body,
        elseif_branches,
        else_body,
        ..
    } = &root.children[0]
    else {
        panic!("expected if");
    };
    assert_eq!(condition, "$a");
    assert_eq!(then_body, " x ");
    assert_eq!(elseif_branches.len(), 1);
    assert_eq!(elseif_branches[0].condition, "$b");
    assert_eq!(else_body.as_deref(), Some(" z "));
}

#[test]
fn for_and_foreach() {
    let root = build_clean(
        "for {set i 0} {$i < 3} {incr i} { puts $i }\nforeach {k v} $pairs { puts $k }\n",
    );
    assert_eq!(child_kinds(&root), vec!["for", "foreach"]);

    let Node::For { init, condition, next, .. } = &root.children[0] else {
        panic!("expected for");
    };
    assert_eq!(init, "set i 0");
    assert_eq!(condition, "$i < 3");
    assert_eq!(next, "incr i");

    let Node::Foreach {
        var_list, list_expr, ..
    } = &root.children[1]
    else {
        panic!("expected foreach");
    };
    assert_eq!(var_list, "k v");
    assert_eq!(list_expr, "$pairs");
}

#[test]
fn declaration_forms() {
    let source = "\
variable count 0
global env tcl_platform
upvar 1 caller local
array set config {a 1 b 2}
lappend names alice bob
list one two three
";
    let root = build_clean(source);
    assert_eq!(
        child_kinds(&root),
        vec!["variable", "global", "upvar", "array", "lappend", "list"]
    );

    let Node::Global { var_names, .. } = &root.children[1] else {
        panic!("expected global");
    };
    assert_eq!(var_names, &["env", "tcl_platform"]);

    let Node::Array {
        operation,
        var_name,
        value,
        ..
    } = &root.children[3]
    else {
        panic!("expected array");
    };
    assert_eq!(operation, "set");
    assert_eq!(var_name, "config");
    assert_eq!(value.as_deref(), Some("{a 1 b 2}"));

    let Node::Lappend { var_name, values, .. } = &root.children[4] else {
        panic!("expected lappend");
    };
    assert_eq!(var_name, "names");
    assert_eq!(values, &["alice", "bob"]);
}

#[test]
fn package_and_namespace_forms() {
    let source = "\
package require Tk 8.6
package provide mylib 1.0
namespace import -force ::util::*
namespace export double triple
";
    let root = build_clean(source);
    assert_eq!(
        child_kinds(&root),
        vec!["package_require", "package_provide", "namespace", "namespace"]
    );

    let Node::PackageRequire { name, version, .. } = &root.children[0] else {
        panic!("expected package_require");
    };
    assert_eq!(name, "Tk");
    assert_eq!(version.as_deref(), Some("8.6"));

    let Node::Namespace {
        kind: NamespaceKind::Import { force, patterns },
        ..
    } = &root.children[2]
    else {
        panic!("expected namespace import");
    };
    assert!(force);
    assert_eq!(patterns, &["::util::*"]);

    let Node::Namespace {
        kind: NamespaceKind::Export { clear, patterns },
        ..
    } = &root.children[3]
    else {
        panic!("expected namespace export");
    };
    assert!(!clear);
    assert_eq!(patterns.len(), 2);
}

#[test]
fn switch_cases() {
    let source = "\
switch $mode {
    read { set fd r }
    write { set fd w }
    default { set fd r+ }
}
";
    let root = build_clean(source);
    let Node::Switch { value, cases, .. } = &root.children[0] else {
        panic!("expected switch");
    };
    assert_eq!(value, "$mode");
    assert_eq!(cases.len(), 3);
    assert_eq!(cases[0].pattern, "read");
    assert_eq!(cases[2].pattern, "default");
    assert!(cases[2].body.contains("r+"));
}

#[test]
fn unrecognized_commands_are_omitted() {
    let root = build_clean("string length $x\nexec rm -rf /\nset ok 1\n");
    assert_eq!(child_kinds(&root), vec!["set"]);
}

#[test]
fn arity_error_is_local_to_the_construct() {
    let root = build("set\nset a 1\n", "arity.tcl");
    assert!(root.had_error);
    assert_eq!(child_kinds(&root), vec!["error", "set"]);
    assert_eq!(root.errors.len(), 1);

    let diagnostic = root.errors[0].as_diagnostic().expect("diagnostic");
    assert_eq!(
        diagnostic.kind,
        ErrorKind::Arity {
            construct: "set".to_string(),
            expected: 2,
            found: 1,
        }
    );
}

#[test]
fn unbalanced_source_is_fatal() {
    let root = build("proc f {} {", "broken.tcl");
    assert!(root.had_error);
    assert!(root.children.is_empty());
    assert_eq!(root.errors.len(), 1);
    assert_eq!(
        root.errors[0].as_diagnostic().expect("diagnostic").kind,
        ErrorKind::IncompleteSource
    );
}

#[test]
fn comments_are_extracted_with_line_numbers() {
    let source = "# top\nset a 1\n# middle\nset b 2\n";
    let root = build_clean(source);
    assert_eq!(root.comments.len(), 2);
    assert_eq!(root.comments[0].line, 1);
    assert_eq!(root.comments[1].line, 3);
    assert_eq!(root.comments[1].text, "# middle");
}

#[test]
fn ranges_track_source_lines() {
    let source = "set a 1\nproc f {} {\n    set b 2\n}\n";
    let root = build_clean(source);

    let set_range = root.children[0].range();
    assert_eq!(set_range.start, Pos { line: 1, column: 1 });
    assert_eq!(set_range.end, Pos { line: 1, column: 8 });

    let proc_range = root.children[1].range();
    assert_eq!(proc_range.start.line, 2);
    assert_eq!(proc_range.end.line, 4);

    let nested = &root.children[1].children()[0];
    assert_eq!(nested.range().start.line, 3);
    assert_eq!(nested.range().end.line, 3);
}

#[test]
fn child_ranges_are_contained_in_parent_ranges() {
    let source = "\
namespace eval app {
    variable version 1.0

    proc start {argv} {
        set count [llength $argv]
        puts $count
    }
}
";
    let root = build_clean(source);
    for child in &root.children {
        assert_range_containment(child);
    }
}

#[test]
fn builder_is_reentrant_across_threads() {
    let source = "namespace eval a { proc p {} { set x 1 } }";
    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(move || {
                let root = build(source, "thread.tcl");
                assert!(!root.had_error);
                root.children.len()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().expect("thread"), 1);
    }
}
