//! Root builder: the analyzer's only entry point.
//!
//! Runs the fixed pipeline completeness check, position map, comments,
//! top-level commands, per-command dispatch, assembly. An incomplete
//! source short-circuits to a synthetic error root; a complete one is
//! parsed command by command, with parse failures degrading to local
//! error nodes rather than aborting siblings.

use crate::ast::{Diagnostic, ErrorKind, Node, Pos, Range, Root};
use crate::commands::{extract_comments, is_complete};
use crate::constructs::{ParseCtx, parse_block};
use crate::position::LineTable;
use crate::scope::ScopeStack;

/// Build an AST from a full source string.
///
/// Pure and synchronous: no I/O, no shared state, no panics on any
/// input. `filepath` is recorded for diagnostics only; reading files
/// and caching results belong to the caller.
#[must_use]
pub fn build(source: &str, filepath: &str) -> Root {
    if !is_complete(source) {
        return incomplete_root(source, filepath);
    }

    let lines = LineTable::new(source);
    let ctx = ParseCtx {
        lines: &lines,
        scope: ScopeStack::root(),
    };
    let children = parse_block(&ctx, source, 1);

    let mut errors = Vec::new();
    for child in &children {
        child.collect_errors(&mut errors);
    }

    Root {
        filepath: filepath.to_string(),
        comments: extract_comments(source),
        had_error: !errors.is_empty(),
        children,
        errors,
    }
}

/// Terminal state for unbalanced input: no children, no comments, one
/// synthetic error node spanning the whole source.
fn incomplete_root(source: &str, filepath: &str) -> Root {
    let lines = LineTable::new(source);
    let range = Range {
        start: Pos { line: 1, column: 1 },
        end: lines.end_of(lines.line_count()),
    };
    let diagnostic = Diagnostic {
        kind: ErrorKind::IncompleteSource,
        range,
        context: "::".to_string(),
    };

    Root {
        filepath: filepath.to_string(),
        comments: Vec::new(),
        children: Vec::new(),
        had_error: true,
        errors: vec![Node::Error(diagnostic)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_is_a_clean_root() {
        let root = build("", "empty.tcl");
        assert!(!root.had_error);
        assert!(root.children.is_empty());
        assert!(root.comments.is_empty());
        assert!(root.errors.is_empty());
        assert_eq!(root.filepath, "empty.tcl");
    }

    #[test]
    fn incomplete_source_yields_synthetic_error_root() {
        let root = build("proc f {} {", "broken.tcl");
        assert!(root.had_error);
        assert!(root.children.is_empty());
        assert!(root.comments.is_empty());
        assert_eq!(root.errors.len(), 1);
        let diagnostic = root.errors[0].as_diagnostic().expect("diagnostic");
        assert_eq!(diagnostic.kind, ErrorKind::IncompleteSource);
        assert_eq!(diagnostic.range.start, Pos { line: 1, column: 1 });
    }

    #[test]
    fn comments_are_not_extracted_on_the_incomplete_path() {
        let root = build("# a comment\nproc f {} {", "broken.tcl");
        assert!(root.comments.is_empty());
    }

    #[test]
    fn local_errors_do_not_abort_siblings() {
        let root = build("proc foo\nset a 1\n", "partial.tcl");
        assert!(root.had_error);
        assert_eq!(root.children.len(), 2);
        assert!(root.children[0].is_error());
        assert_eq!(root.children[0].kind_name(), "error");
        assert_eq!(root.children[1].kind_name(), "set");
        assert_eq!(root.errors.len(), 1);
    }

    #[test]
    fn nested_errors_are_collected_into_the_flat_list() {
        let source = "namespace eval ns {\n    proc broken\n}\nset ok 1\n";
        let root = build(source, "nested.tcl");
        assert!(root.had_error);
        assert_eq!(root.children.len(), 2);
        assert!(!root.children[0].is_error());
        assert_eq!(root.errors.len(), 1);
        assert_eq!(
            root.errors[0].as_diagnostic().expect("diagnostic").context,
            "::ns"
        );
    }

    #[test]
    fn unrecognized_commands_leave_no_trace() {
        let root = build("string length abc\nputs done\n", "skip.tcl");
        assert!(!root.had_error);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].kind_name(), "puts");
    }
}
