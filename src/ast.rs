use std::fmt;

use serde::Serialize;

/// 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

/// Source span covered by a node, derived from the exact text it was
/// parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: Pos,
    #[serde(rename = "end_pos")]
    pub end: Pos,
}

impl Range {
    /// Whether `other` lies entirely within this range.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        let starts_before = (self.start.line, self.start.column) <= (other.start.line, other.start.column);
        let ends_after = (other.end.line, other.end.column) <= (self.end.line, self.end.column);
        starts_before && ends_after
    }
}

/// A standalone comment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub line: usize,
}

/// One procedure parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    pub default: Option<String>,
    pub is_varargs: bool,
}

/// One `elseif` arm of an `if` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElseifBranch {
    pub condition: String,
    pub body: String,
}

/// One `pattern body` pair of a `switch` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchCase {
    pub pattern: String,
    pub body: String,
}

/// One `other local` pair of an `upvar` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpvarBinding {
    pub other: String,
    pub local: String,
}

/// Subcommand payload of a `namespace` node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceKind {
    Eval { name: String, body: Vec<Node> },
    Import { force: bool, patterns: Vec<String> },
    Export { clear: bool, patterns: Vec<String> },
}

/// Classifies a parse problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unbalanced quotes, braces, or brackets at end of input.
    /// Fatal for the whole parse.
    IncompleteSource,
    /// A recognized construct keyword with too few words. Local to the
    /// construct; sibling parsing continues.
    Arity {
        construct: String,
        expected: usize,
        found: usize,
    },
}

impl ErrorKind {
    /// Stable kind name used in the serialized form.
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::IncompleteSource => "incomplete_source",
            Self::Arity { .. } => "arity_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompleteSource => {
                write!(f, "missing closing delimiter")
            }
            Self::Arity {
                construct,
                expected,
                found,
            } => {
                write!(
                    f,
                    "wrong number of words for '{construct}': \
                     expected at least {expected}, found {found}"
                )
            }
        }
    }
}

/// A located parse problem, carried by an error node.
///
/// Diagnostics are values, never raised: no parse function aborts
/// across the builder boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", range.start.line, range.start.column)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub range: Range,
    /// Qualified name of the enclosing scope, `::` at top level.
    pub context: String,
}

/// A parsed construct. Each node owns its children outright; nested
/// declarations live inside `Proc` and `Namespace(Eval)` bodies, never
/// flattened into the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Proc {
        range: Range,
        name: String,
        params: Vec<Param>,
        body: Vec<Node>,
    },
    Set {
        range: Range,
        var_name: String,
        value: Option<String>,
    },
    /// The `variable` declaration form.
    VarDecl {
        range: Range,
        var_name: String,
        value: Option<String>,
    },
    Global {
        range: Range,
        var_names: Vec<String>,
    },
    Upvar {
        range: Range,
        level: Option<String>,
        bindings: Vec<UpvarBinding>,
    },
    Array {
        range: Range,
        operation: String,
        var_name: String,
        value: Option<String>,
    },
    Namespace {
        range: Range,
        kind: NamespaceKind,
    },
    PackageRequire {
        range: Range,
        name: String,
        version: Option<String>,
    },
    PackageProvide {
        range: Range,
        name: String,
        version: Option<String>,
    },
    If {
        range: Range,
        condition: String,
        then_body: String,
        elseif_branches: Vec<ElseifBranch>,
        else_body: Option<String>,
    },
    While {
        range: Range,
        condition: String,
        body: String,
    },
    For {
        range: Range,
        init: String,
        condition: String,
        next: String,
        body: String,
    },
    Foreach {
        range: Range,
        var_list: String,
        list_expr: String,
        body: String,
    },
    Switch {
        range: Range,
        value: String,
        cases: Vec<SwitchCase>,
    },
    Expr {
        range: Range,
        expression: String,
    },
    ListCmd {
        range: Range,
        elements: Vec<String>,
    },
    Lappend {
        range: Range,
        var_name: String,
        values: Vec<String>,
    },
    Puts {
        range: Range,
        newline: bool,
        channel: Option<String>,
        text: String,
    },
    Error(Diagnostic),
}

impl Node {
    /// Source span this node was parsed from.
    #[must_use]
    pub const fn range(&self) -> Range {
        match self {
            Self::Proc { range, .. }
            | Self::Set { range, .. }
            | Self::VarDecl { range, .. }
            | Self::Global { range, .. }
            | Self::Upvar { range, .. }
            | Self::Array { range, .. }
            | Self::Namespace { range, .. }
            | Self::PackageRequire { range, .. }
            | Self::PackageProvide { range, .. }
            | Self::If { range, .. }
            | Self::While { range, .. }
            | Self::For { range, .. }
            | Self::Foreach { range, .. }
            | Self::Switch { range, .. }
            | Self::Expr { range, .. }
            | Self::ListCmd { range, .. }
            | Self::Lappend { range, .. }
            | Self::Puts { range, .. } => *range,
            Self::Error(diagnostic) => diagnostic.range,
        }
    }

    /// Serialized `"type"` value for this node.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Proc { .. } => "proc",
            Self::Set { .. } => "set",
            Self::VarDecl { .. } => "variable",
            Self::Global { .. } => "global",
            Self::Upvar { .. } => "upvar",
            Self::Array { .. } => "array",
            Self::Namespace { .. } => "namespace",
            Self::PackageRequire { .. } => "package_require",
            Self::PackageProvide { .. } => "package_provide",
            Self::If { .. } => "if",
            Self::While { .. } => "while",
            Self::For { .. } => "for",
            Self::Foreach { .. } => "foreach",
            Self::Switch { .. } => "switch",
            Self::Expr { .. } => "expr",
            Self::ListCmd { .. } => "list",
            Self::Lappend { .. } => "lappend",
            Self::Puts { .. } => "puts",
            Self::Error(_) => "error",
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The diagnostic carried by an error node.
    #[must_use]
    pub const fn as_diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Error(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }

    /// Nested child nodes, for the two constructs that own any.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Proc { body, .. } => body,
            Self::Namespace {
                kind: NamespaceKind::Eval { body, .. },
                ..
            } => body,
            _ => &[],
        }
    }

    /// Copy every error node in this subtree into `out`, depth first.
    pub fn collect_errors(&self, out: &mut Vec<Self>) {
        if self.is_error() {
            out.push(self.clone());
        }
        for child in self.children() {
            child.collect_errors(out);
        }
    }
}

/// Root of one parsed source. `children` holds top-level nodes only;
/// `errors` holds a flat copy of every error node in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    pub filepath: String,
    pub comments: Vec<Comment>,
    pub children: Vec<Node>,
    pub had_error: bool,
    pub errors: Vec<Node>,
}
