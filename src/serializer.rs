//! AST serialization to a JSON-shaped value.
//!
//! Recursively renders a node tree for cross-boundary consumption:
//! objects for nodes, arrays for ordered lists, scalars for leaf
//! fields. Empty child lists render as empty arrays, never as a missing
//! key, so consumers can iterate unconditionally.

use serde_json::{Value, json};

use crate::ast::{Comment, NamespaceKind, Node, Root};

/// Render a root to its JSON-shaped value.
#[must_use]
pub fn to_value(root: &Root) -> Value {
    json!({
        "type": "root",
        "filepath": root.filepath,
        "comments": root.comments.iter().map(comment_value).collect::<Vec<_>>(),
        "children": root.children.iter().map(node_value).collect::<Vec<_>>(),
        "had_error": root.had_error,
        "errors": root.errors.iter().map(node_value).collect::<Vec<_>>(),
    })
}

/// Render a root to a compact JSON string.
#[must_use]
pub fn to_json(root: &Root) -> String {
    to_value(root).to_string()
}

/// Render a root to an indented JSON string.
#[must_use]
pub fn to_json_pretty(root: &Root) -> String {
    serde_json::to_string_pretty(&to_value(root)).unwrap_or_default()
}

fn comment_value(comment: &Comment) -> Value {
    json!({
        "type": "comment",
        "text": comment.text,
        "line": comment.line,
    })
}

fn node_value(node: &Node) -> Value {
    let range = node.range();
    match node {
        Node::Proc {
            name, params, body, ..
        } => json!({
            "type": "proc",
            "range": range,
            "name": name,
            "params": params,
            "body": body.iter().map(node_value).collect::<Vec<_>>(),
        }),
        Node::Set {
            var_name, value, ..
        } => json!({
            "type": "set",
            "range": range,
            "var_name": var_name,
            "value": value,
        }),
        Node::VarDecl {
            var_name, value, ..
        } => json!({
            "type": "variable",
            "range": range,
            "var_name": var_name,
            "value": value,
        }),
        Node::Global { var_names, .. } => json!({
            "type": "global",
            "range": range,
            "var_names": var_names,
        }),
        Node::Upvar {
            level, bindings, ..
        } => json!({
            "type": "upvar",
            "range": range,
            "level": level,
            "bindings": bindings,
        }),
        Node::Array {
            operation,
            var_name,
            value,
            ..
        } => json!({
            "type": "array",
            "range": range,
            "operation": operation,
            "var_name": var_name,
            "value": value,
        }),
        Node::Namespace { kind, .. } => namespace_value(range, kind),
        Node::PackageRequire { name, version, .. } => json!({
            "type": "package_require",
            "range": range,
            "name": name,
            "version": version,
        }),
        Node::PackageProvide { name, version, .. } => json!({
            "type": "package_provide",
            "range": range,
            "name": name,
            "version": version,
        }),
        Node::If {
            condition,
            then_body,
            elseif_branches,
            else_body,
            ..
        } => json!({
            "type": "if",
            "range": range,
            "condition": condition,
            "then_body": then_body,
            "elseif_branches": elseif_branches,
            "else_body": else_body,
        }),
        Node::While {
            condition, body, ..
        } => json!({
            "type": "while",
            "range": range,
            "condition": condition,
            "body": body,
        }),
        Node::For {
            init,
            condition,
            next,
            body,
            ..
        } => json!({
            "type": "for",
            "range": range,
            "init": init,
            "condition": condition,
            "next": next,
            "body": body,
        }),
        Node::Foreach {
            var_list,
            list_expr,
            body,
            ..
        } => json!({
            "type": "foreach",
            "range": range,
            "var_list": var_list,
            "list_expr": list_expr,
            "body": body,
        }),
        Node::Switch { value, cases, .. } => json!({
            "type": "switch",
            "range": range,
            "value": value,
            "cases": cases,
        }),
        Node::Expr { expression, .. } => json!({
            "type": "expr",
            "range": range,
            "expression": expression,
        }),
        Node::ListCmd { elements, .. } => json!({
            "type": "list",
            "range": range,
            "elements": elements,
        }),
        Node::Lappend {
            var_name, values, ..
        } => json!({
            "type": "lappend",
            "range": range,
            "var_name": var_name,
            "values": values,
        }),
        Node::Puts {
            newline,
            channel,
            text,
            ..
        } => json!({
            "type": "puts",
            "range": range,
            "newline": newline,
            "channel": channel,
            "text": text,
        }),
        Node::Error(diagnostic) => json!({
            "type": "error",
            "range": range,
            "kind": diagnostic.kind.wire_name(),
            "message": diagnostic.kind.to_string(),
            "context": diagnostic.context,
        }),
    }
}

fn namespace_value(range: crate::ast::Range, kind: &NamespaceKind) -> Value {
    match kind {
        NamespaceKind::Eval { name, body } => json!({
            "type": "namespace",
            "range": range,
            "subcommand": "eval",
            "name": name,
            "body": body.iter().map(node_value).collect::<Vec<_>>(),
        }),
        NamespaceKind::Import { force, patterns } => json!({
            "type": "namespace",
            "range": range,
            "subcommand": "import",
            "force": force,
            "patterns": patterns,
        }),
        NamespaceKind::Export { clear, patterns } => json!({
            "type": "namespace",
            "range": range,
            "subcommand": "export",
            "clear": clear,
            "patterns": patterns,
        }),
    }
}
