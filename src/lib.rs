//! Non-evaluating tokenizer and AST builder for Tcl source.
//!
//! Tcl's syntax is runtime substitution: quotes, braces, bracketed
//! sub-commands, and `$` sigils only acquire meaning when a command
//! runs. This crate reconstructs program structure from raw text
//! without ever executing any of it, so editors and indexers can
//! analyze untrusted scripts safely. Tokens are exact literal
//! substrings of the source, delimiters included; parse failures
//! degrade to error nodes instead of aborting the build.
//!
//! # Quick start
//!
//! ## Build and inspect an AST
//!
//! ```
//! use tclscan::build;
//!
//! let source = "proc greet {name} {\n    puts $name\n}\n";
//! let root = build(source, "greet.tcl");
//! assert!(!root.had_error);
//! assert_eq!(root.children.len(), 1);
//! assert_eq!(root.children[0].kind_name(), "proc");
//! ```
//!
//! ## Tokenize one command
//!
//! ```
//! use tclscan::tokenize;
//!
//! let tokens = tokenize("set x {a {b} c}");
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[2].text, "{a {b} c}");
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod builder;
pub mod commands;
mod constructs;
pub mod position;
pub mod scope;
pub mod serializer;
pub mod token;
pub mod tokenizer;

pub use ast::{
    Comment, Diagnostic, ElseifBranch, ErrorKind, NamespaceKind, Node, Param, Pos, Range, Root,
    SwitchCase, UpvarBinding,
};
pub use builder::build;
pub use commands::{RawCommand, extract_commands, extract_comments, is_complete};
pub use position::LineTable;
pub use scope::{Frame, FrameKind, ScopeStack};
pub use serializer::{to_json, to_json_pretty, to_value};
pub use token::{Token, TokenKind};
pub use tokenizer::{count_tokens, get_token, tokenize};
