//! Construct dispatch and per-construct parsers.
//!
//! Token 0 of each extracted command is the construct keyword. A
//! registry maps keywords to parser functions, so adding a construct
//! means registering an entry rather than editing a central dispatcher.
//! Unrecognized keywords are skipped without a node: only constructs
//! relevant to symbol indexing and navigation are modeled.
//!
//! Parsers extract literal fields by token position and never evaluate
//! anything. On a shortfall of words they return an error node in place
//! of the construct; sibling parsing continues unaffected.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::ast::{
    Diagnostic, ElseifBranch, ErrorKind, NamespaceKind, Node, Param, Pos, Range, SwitchCase,
    UpvarBinding,
};
use crate::commands::{RawCommand, extract_commands};
use crate::position::LineTable;
use crate::scope::{Frame, ScopeStack};
use crate::token::{Token, TokenKind};
use crate::tokenizer::tokenize;

/// Shared parse state for one nesting level. Carries no mutable
/// globals: recursion pushes a new scope value instead.
pub(crate) struct ParseCtx<'a> {
    pub lines: &'a LineTable,
    pub scope: ScopeStack,
}

impl<'a> ParseCtx<'a> {
    fn child(&self, frame: Frame) -> ParseCtx<'a> {
        ParseCtx {
            lines: self.lines,
            scope: self.scope.push(frame),
        }
    }
}

/// Whether a construct's body is recursively parsed or captured as
/// opaque literal text. Only `proc` and `namespace eval` introduce
/// declarations that matter to symbol consumers, so only they recurse;
/// the flag keeps the other choice selectable per construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BodyPolicy {
    Parse,
    Opaque,
}

type ParseFn = fn(&ParseCtx<'_>, &RawCommand, &[Token], BodyPolicy) -> Option<Node>;

struct Entry {
    min_tokens: usize,
    body: BodyPolicy,
    parse: ParseFn,
}

static REGISTRY: Lazy<HashMap<&'static str, Entry>> = Lazy::new(|| {
    let mut m = HashMap::new();
    let mut register = |keyword, min_tokens, body, parse| {
        m.insert(
            keyword,
            Entry {
                min_tokens,
                body,
                parse,
            },
        );
    };

    register("proc", 4, BodyPolicy::Parse, parse_proc as ParseFn);
    register("set", 2, BodyPolicy::Opaque, parse_set);
    register("variable", 2, BodyPolicy::Opaque, parse_variable);
    register("global", 2, BodyPolicy::Opaque, parse_global);
    register("upvar", 3, BodyPolicy::Opaque, parse_upvar);
    register("array", 3, BodyPolicy::Opaque, parse_array);
    register("namespace", 2, BodyPolicy::Parse, parse_namespace);
    register("package", 3, BodyPolicy::Opaque, parse_package);
    register("if", 3, BodyPolicy::Opaque, parse_if);
    register("while", 3, BodyPolicy::Opaque, parse_while);
    register("for", 5, BodyPolicy::Opaque, parse_for);
    register("foreach", 4, BodyPolicy::Opaque, parse_foreach);
    register("switch", 3, BodyPolicy::Opaque, parse_switch);
    register("expr", 2, BodyPolicy::Opaque, parse_expr);
    register("list", 1, BodyPolicy::Opaque, parse_list);
    register("lappend", 2, BodyPolicy::Opaque, parse_lappend);
    register("puts", 2, BodyPolicy::Opaque, parse_puts);

    m
});

/// Parse one extracted command into a node, or `None` for keywords the
/// analyzer does not model.
pub(crate) fn parse_command(ctx: &ParseCtx<'_>, cmd: &RawCommand) -> Option<Node> {
    let tokens = tokenize(&cmd.text);
    let first = tokens.first()?;
    let entry = REGISTRY.get(first.text.as_str())?;

    if tokens.len() < entry.min_tokens {
        return Some(arity_error(
            ctx,
            cmd,
            &first.text,
            entry.min_tokens,
            tokens.len(),
        ));
    }

    (entry.parse)(ctx, cmd, &tokens, entry.body)
}

/// Split a block into commands and parse each, keeping the order.
pub(crate) fn parse_block(ctx: &ParseCtx<'_>, text: &str, start_line: usize) -> Vec<Node> {
    extract_commands(text, start_line)
        .iter()
        .filter_map(|cmd| parse_command(ctx, cmd))
        .collect()
}

/// Line-granular range of a command, end column taken from the source
/// line's length.
fn command_range(ctx: &ParseCtx<'_>, cmd: &RawCommand) -> Range {
    Range {
        start: Pos {
            line: cmd.start_line,
            column: 1,
        },
        end: ctx.lines.end_of(cmd.end_line),
    }
}

fn arity_error(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    construct: &str,
    expected: usize,
    found: usize,
) -> Node {
    Node::Error(Diagnostic {
        kind: ErrorKind::Arity {
            construct: construct.to_string(),
            expected,
            found,
        },
        range: command_range(ctx, cmd),
        context: ctx.scope.qualified(),
    })
}

/// Re-invoke the command extractor and dispatcher on a body token's
/// content, one nesting level deeper, with the body's own line numbers.
fn nested_body(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    token: &Token,
    frame: Frame,
) -> Vec<Node> {
    let content = token.inner();
    let stripped = content.len() != token.text.len();
    let content_offset = token.offset + usize::from(stripped);
    let newlines = cmd.text.as_bytes()[..content_offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count();
    let start_line = cmd.start_line + newlines;

    let inner = ctx.child(frame);
    parse_block(&inner, content, start_line)
}

// -- Construct parsers --

fn parse_proc(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    policy: BodyPolicy,
) -> Option<Node> {
    let name = tokens[1].text.clone();
    let params = parse_params(&tokens[2]);
    let body = match policy {
        BodyPolicy::Parse => nested_body(ctx, cmd, &tokens[3], Frame::proc(&name)),
        BodyPolicy::Opaque => Vec::new(),
    };

    Some(Node::Proc {
        range: command_range(ctx, cmd),
        name,
        params,
        body,
    })
}

/// Parse a `proc` parameter token: bare names, `{name default}` pairs,
/// and the trailing `args` varargs sentinel.
fn parse_params(token: &Token) -> Vec<Param> {
    let entries = tokenize(token.inner());
    let count = entries.len();

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            if entry.kind == TokenKind::Braced {
                let parts = tokenize(entry.inner());
                let name = parts.first().map_or_else(String::new, |p| p.text.clone());
                let default = parts.get(1).map(|p| p.inner().to_string());
                Param {
                    name,
                    default,
                    is_varargs: false,
                }
            } else {
                let name = entry.text.clone();
                let is_varargs = name == "args" && i + 1 == count;
                Param {
                    name,
                    default: None,
                    is_varargs,
                }
            }
        })
        .collect()
}

fn parse_set(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    _policy: BodyPolicy,
) -> Option<Node> {
    Some(Node::Set {
        range: command_range(ctx, cmd),
        var_name: tokens[1].text.clone(),
        value: tokens.get(2).map(|t| t.text.clone()),
    })
}

fn parse_variable(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    _policy: BodyPolicy,
) -> Option<Node> {
    Some(Node::VarDecl {
        range: command_range(ctx, cmd),
        var_name: tokens[1].text.clone(),
        value: tokens.get(2).map(|t| t.text.clone()),
    })
}

fn parse_global(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    _policy: BodyPolicy,
) -> Option<Node> {
    Some(Node::Global {
        range: command_range(ctx, cmd),
        var_names: tokens[1..].iter().map(|t| t.text.clone()).collect(),
    })
}

fn parse_upvar(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    _policy: BodyPolicy,
) -> Option<Node> {
    let mut rest = &tokens[1..];
    let level = rest
        .first()
        .filter(|t| looks_like_level(&t.text))
        .map(|t| t.text.clone());
    if level.is_some() {
        rest = &rest[1..];
    }

    let bindings = rest
        .chunks_exact(2)
        .map(|pair| UpvarBinding {
            other: pair[0].text.clone(),
            local: pair[1].text.clone(),
        })
        .collect();

    Some(Node::Upvar {
        range: command_range(ctx, cmd),
        level,
        bindings,
    })
}

/// `#0`-style or integer frame references.
fn looks_like_level(text: &str) -> bool {
    text.strip_prefix('#').map_or_else(
        || !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()),
        |rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()),
    )
}

fn parse_array(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    _policy: BodyPolicy,
) -> Option<Node> {
    Some(Node::Array {
        range: command_range(ctx, cmd),
        operation: tokens[1].text.clone(),
        var_name: tokens[2].text.clone(),
        value: tokens.get(3).map(|t| t.text.clone()),
    })
}

fn parse_namespace(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    policy: BodyPolicy,
) -> Option<Node> {
    let range = command_range(ctx, cmd);

    match tokens[1].text.as_str() {
        "eval" => {
            if tokens.len() < 4 {
                return Some(arity_error(ctx, cmd, "namespace eval", 4, tokens.len()));
            }
            let name = tokens[2].text.clone();
            let body = match policy {
                BodyPolicy::Parse => {
                    nested_body(ctx, cmd, &tokens[3], Frame::namespace(&name))
                }
                BodyPolicy::Opaque => Vec::new(),
            };
            Some(Node::Namespace {
                range,
                kind: NamespaceKind::Eval { name, body },
            })
        }
        "import" => {
            if tokens.len() < 3 {
                return Some(arity_error(ctx, cmd, "namespace import", 3, tokens.len()));
            }
            let mut rest = &tokens[2..];
            let force = rest.first().is_some_and(|t| t.text == "-force");
            if force {
                rest = &rest[1..];
            }
            Some(Node::Namespace {
                range,
                kind: NamespaceKind::Import {
                    force,
                    patterns: rest.iter().map(|t| t.text.clone()).collect(),
                },
            })
        }
        "export" => {
            if tokens.len() < 3 {
                return Some(arity_error(ctx, cmd, "namespace export", 3, tokens.len()));
            }
            let mut rest = &tokens[2..];
            let clear = rest.first().is_some_and(|t| t.text == "-clear");
            if clear {
                rest = &rest[1..];
            }
            Some(Node::Namespace {
                range,
                kind: NamespaceKind::Export {
                    clear,
                    patterns: rest.iter().map(|t| t.text.clone()).collect(),
                },
            })
        }
        _ => None,
    }
}

fn parse_package(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    _policy: BodyPolicy,
) -> Option<Node> {
    let range = command_range(ctx, cmd);

    match tokens[1].text.as_str() {
        "require" => {
            let mut idx = 2;
            if tokens[idx].text == "-exact" {
                idx += 1;
            }
            let Some(name) = tokens.get(idx) else {
                return Some(arity_error(ctx, cmd, "package require", idx + 1, tokens.len()));
            };
            Some(Node::PackageRequire {
                range,
                name: name.text.clone(),
                version: tokens.get(idx + 1).map(|t| t.text.clone()),
            })
        }
        "provide" => Some(Node::PackageProvide {
            range,
            name: tokens[2].text.clone(),
            version: tokens.get(3).map(|t| t.text.clone()),
        }),
        _ => None,
    }
}

fn parse_if(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    _policy: BodyPolicy,
) -> Option<Node> {
    let mut idx = 1;
    let condition = tokens[idx].inner().to_string();
    idx += 1;

    // optional `then` noise word
    if tokens.get(idx).is_some_and(|t| t.text == "then") {
        idx += 1;
    }

    let Some(then_tok) = tokens.get(idx) else {
        return Some(arity_error(ctx, cmd, "if", idx + 1, tokens.len()));
    };
    let then_body = then_tok.inner().to_string();
    idx += 1;

    let mut elseif_branches = Vec::new();
    let mut else_body = None;

    while let Some(tok) = tokens.get(idx) {
        match tok.text.as_str() {
            "elseif" => {
                let (Some(cond), Some(body)) = (tokens.get(idx + 1), tokens.get(idx + 2))
                else {
                    return Some(arity_error(ctx, cmd, "elseif", idx + 3, tokens.len()));
                };
                elseif_branches.push(ElseifBranch {
                    condition: cond.inner().to_string(),
                    body: body.inner().to_string(),
                });
                idx += 3;
            }
            "else" => {
                let Some(body) = tokens.get(idx + 1) else {
                    return Some(arity_error(ctx, cmd, "else", idx + 2, tokens.len()));
                };
                else_body = Some(body.inner().to_string());
                idx += 2;
            }
            _ => break,
        }
    }

    Some(Node::If {
        range: command_range(ctx, cmd),
        condition,
        then_body,
        elseif_branches,
        else_body,
    })
}

fn parse_while(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    _policy: BodyPolicy,
) -> Option<Node> {
    Some(Node::While {
        range: command_range(ctx, cmd),
        condition: tokens[1].inner().to_string(),
        body: tokens[2].inner().to_string(),
    })
}

fn parse_for(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    _policy: BodyPolicy,
) -> Option<Node> {
    Some(Node::For {
        range: command_range(ctx, cmd),
        init: tokens[1].inner().to_string(),
        condition: tokens[2].inner().to_string(),
        next: tokens[3].inner().to_string(),
        body: tokens[4].inner().to_string(),
    })
}

fn parse_foreach(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    _policy: BodyPolicy,
) -> Option<Node> {
    Some(Node::Foreach {
        range: command_range(ctx, cmd),
        var_list: tokens[1].inner().to_string(),
        list_expr: tokens[2].text.clone(),
        body: tokens[3].inner().to_string(),
    })
}

fn parse_switch(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    _policy: BodyPolicy,
) -> Option<Node> {
    let mut idx = 1;
    while let Some(tok) = tokens.get(idx) {
        if tok.text == "--" {
            idx += 1;
            break;
        }
        if tok.kind == TokenKind::Word && tok.text.starts_with('-') {
            idx += 1;
        } else {
            break;
        }
    }

    let Some(value_tok) = tokens.get(idx) else {
        return Some(arity_error(ctx, cmd, "switch", idx + 1, tokens.len()));
    };
    let value = value_tok.text.clone();
    idx += 1;

    // either one braced token holding the pairs, or flat trailing pairs
    let case_tokens: Vec<Token> =
        if tokens.len() == idx + 1 && tokens[idx].kind == TokenKind::Braced {
            tokenize(tokens[idx].inner())
        } else {
            tokens[idx..].to_vec()
        };

    let cases = case_tokens
        .chunks_exact(2)
        .map(|pair| SwitchCase {
            pattern: pair[0].text.clone(),
            body: pair[1].inner().to_string(),
        })
        .collect();

    Some(Node::Switch {
        range: command_range(ctx, cmd),
        value,
        cases,
    })
}

fn parse_expr(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    _policy: BodyPolicy,
) -> Option<Node> {
    let expression = if tokens.len() == 2 {
        tokens[1].inner().to_string()
    } else {
        // multi-word form: keep the exact source tail
        cmd.text[tokens[1].offset..].trim_end().to_string()
    };

    Some(Node::Expr {
        range: command_range(ctx, cmd),
        expression,
    })
}

fn parse_list(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    _policy: BodyPolicy,
) -> Option<Node> {
    Some(Node::ListCmd {
        range: command_range(ctx, cmd),
        elements: tokens[1..].iter().map(|t| t.text.clone()).collect(),
    })
}

fn parse_lappend(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    _policy: BodyPolicy,
) -> Option<Node> {
    Some(Node::Lappend {
        range: command_range(ctx, cmd),
        var_name: tokens[1].text.clone(),
        values: tokens[2..].iter().map(|t| t.text.clone()).collect(),
    })
}

fn parse_puts(
    ctx: &ParseCtx<'_>,
    cmd: &RawCommand,
    tokens: &[Token],
    _policy: BodyPolicy,
) -> Option<Node> {
    let mut idx = 1;
    let mut newline = true;
    if tokens[idx].text == "-nonewline" {
        newline = false;
        idx += 1;
    }

    let remaining = tokens.len() - idx;
    if remaining == 0 {
        return Some(arity_error(ctx, cmd, "puts", idx + 1, tokens.len()));
    }

    let (channel, text) = if remaining == 1 {
        (None, tokens[idx].text.clone())
    } else {
        (Some(tokens[idx].text.clone()), tokens[idx + 1].text.clone())
    };

    Some(Node::Puts {
        range: command_range(ctx, cmd),
        newline,
        channel,
        text,
    })
}
