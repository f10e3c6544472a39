//! Command and comment extraction.
//!
//! Splits a source block into ordered top-level command texts by
//! line-oriented scanning with brace-depth counting and a balance check.
//! Nothing here ever evaluates the analyzed code.

use crate::ast::Comment;

/// One extracted command: its raw accumulated text and 1-based line range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommand {
    pub text: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// Split a source block into ordered commands.
///
/// `start_line` is the 1-based source line the block begins on, so
/// nested blocks report positions in the coordinates of the whole file.
///
/// Blank lines and standalone comment lines between commands are
/// skipped; inside an accumulating command they are part of its text. A
/// trailing unterminated accumulation is still emitted as a final
/// command so the dispatcher can turn it into a diagnostic instead of
/// silently dropping input.
#[must_use]
pub fn extract_commands(block: &str, start_line: usize) -> Vec<RawCommand> {
    let lines: Vec<&str> = block.lines().collect();
    let mut commands = Vec::new();
    let mut buffer = String::new();
    let mut buffer_start = start_line;
    let mut depth = 0i64;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let line_no = start_line + i;

        if buffer.is_empty() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                i += 1;
                continue;
            }
            if trimmed.starts_with('#') {
                // comment, possibly continued by a trailing backslash
                while i < lines.len() && ends_with_continuation(lines[i]) {
                    i += 1;
                }
                i += 1;
                continue;
            }
            buffer_start = line_no;
        } else {
            buffer.push('\n');
        }

        buffer.push_str(line);
        depth += brace_delta(line);

        if depth <= 0 && is_complete(&buffer) {
            commands.push(RawCommand {
                text: std::mem::take(&mut buffer),
                start_line: buffer_start,
                end_line: line_no,
            });
            depth = 0;
        }

        i += 1;
    }

    if !buffer.is_empty() {
        let end_line = start_line + lines.len().saturating_sub(1);
        commands.push(RawCommand {
            text: buffer,
            start_line: buffer_start,
            end_line,
        });
    }

    commands
}

/// Pull standalone comment lines out of a source, independent of
/// command parsing. A trailing backslash folds the next line into the
/// same comment entry.
#[must_use]
pub fn extract_comments(source: &str) -> Vec<Comment> {
    let lines: Vec<&str> = source.lines().collect();
    let mut comments = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let trimmed = lines[i].trim();
        if trimmed.starts_with('#') {
            let line_no = i + 1;
            let mut text = trimmed.to_string();
            while ends_with_continuation(lines[i]) && i + 1 < lines.len() {
                i += 1;
                text.push('\n');
                text.push_str(lines[i].trim());
            }
            comments.push(Comment {
                text,
                line: line_no,
            });
        }
        i += 1;
    }

    comments
}

/// Balance test over quotes, braces, and brackets: does this text form
/// one or more whole commands?
///
/// Mirrors the tokenizer's boundary rules: quotes toggle only outside
/// braces, brace interiors are opaque, brackets count only outside both,
/// and a backslash escapes the next character. A trailing line
/// continuation also leaves the text incomplete.
#[must_use]
pub fn is_complete(text: &str) -> bool {
    if ends_with_continuation(text) {
        return false;
    }

    let bytes = text.as_bytes();
    let mut brace = 0i64;
    let mut bracket = 0i64;
    let mut in_quote = false;

    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if brace == 0 => {
                i += 1;
            }
            b'"' if brace == 0 => in_quote = !in_quote,
            b'{' if !in_quote => brace += 1,
            b'}' if !in_quote => brace -= 1,
            b'[' if !in_quote && brace == 0 => bracket += 1,
            b']' if !in_quote && brace == 0 => bracket -= 1,
            _ => {}
        }
        i += 1;
    }

    brace == 0 && bracket == 0 && !in_quote
}

/// Net brace depth change over one raw line. Backslash-escaped braces
/// do not count; quotes intentionally do, matching the coarse
/// accumulation rule (the balance check has the final say).
fn brace_delta(line: &str) -> i64 {
    let bytes = line.as_bytes();
    let mut delta = 0i64;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'{' => delta += 1,
            b'}' => delta -= 1,
            _ => {}
        }
        i += 1;
    }
    delta
}

/// An odd run of trailing backslashes continues the line.
fn ends_with_continuation(line: &str) -> bool {
    let mut count = 0;
    for &b in line.as_bytes().iter().rev() {
        if b == b'\\' {
            count += 1;
        } else {
            break;
        }
    }
    count % 2 == 1
}
