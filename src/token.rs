use std::fmt;

/// Token kinds produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare word.
    Word,
    /// Double-quoted word (`"..."`).
    Quoted,
    /// Brace-delimited word (`{...}`).
    Braced,
    /// Command substitution (`[...]`).
    CommandSub,
    /// Variable reference (`$name` or `${name}`).
    VarRef,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Word => "word",
            Self::Quoted => "quoted",
            Self::Braced => "braced",
            Self::CommandSub => "command_sub",
            Self::VarRef => "var_ref",
        };
        f.write_str(name)
    }
}

/// A single token: one word of a command, stored as the exact literal
/// substring of the source including its delimiters. Tokens are never
/// unescaped or substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Byte offset of the token within the text it was scanned from.
    pub offset: usize,
}

impl Token {
    /// The token text with one layer of quoting stripped.
    ///
    /// Braced and quoted tokens lose their delimiters; everything else
    /// (including unterminated partial tokens) is returned verbatim.
    #[must_use]
    pub fn inner(&self) -> &str {
        match self.kind {
            TokenKind::Braced if self.text.len() >= 2 && self.text.ends_with('}') => {
                &self.text[1..self.text.len() - 1]
            }
            TokenKind::Quoted if self.text.len() >= 2 && self.text.ends_with('"') => {
                &self.text[1..self.text.len() - 1]
            }
            _ => &self.text,
        }
    }
}
