//! Line/offset bookkeeping for one source text.
//!
//! The table is built once per parse in a single linear pass; node
//! construction itself tracks line numbers incrementally while scanning
//! and only consults the table for line lengths and offset lookups.

use crate::ast::Pos;

/// Byte extent of one line, newline excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub offset: usize,
    pub length: usize,
}

/// Maps 1-based line numbers to byte spans and byte offsets to positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTable {
    lines: Vec<LineSpan>,
}

impl LineTable {
    /// Build the table in one pass over the source.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut lines = Vec::new();
        let mut line_start = 0;

        for (i, &b) in bytes.iter().enumerate() {
            if b == b'\n' {
                lines.push(LineSpan {
                    offset: line_start,
                    length: i - line_start,
                });
                line_start = i + 1;
            }
        }
        if line_start < bytes.len() || lines.is_empty() {
            lines.push(LineSpan {
                offset: line_start,
                length: bytes.len() - line_start,
            });
        }

        Self { lines }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Byte span of a 1-based line number.
    #[must_use]
    pub fn line_span(&self, line: usize) -> Option<LineSpan> {
        self.lines.get(line.checked_sub(1)?).copied()
    }

    /// Convert a byte offset into a 1-based line/column position.
    /// Offsets past the end clamp to the last line's end.
    #[must_use]
    pub fn position_at(&self, offset: usize) -> Pos {
        let idx = match self
            .lines
            .binary_search_by(|span| span.offset.cmp(&offset))
        {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) => i - 1,
        };
        let span = self.lines[idx];
        let column = offset.saturating_sub(span.offset).min(span.length) + 1;
        Pos {
            line: idx + 1,
            column,
        }
    }

    /// Position one past the last character of a 1-based line.
    #[must_use]
    pub fn end_of(&self, line: usize) -> Pos {
        self.line_span(line).map_or(
            Pos { line, column: 1 },
            |span| Pos {
                line,
                column: span.length + 1,
            },
        )
    }
}
