//! Literal tokenizer for one command's text.
//!
//! Splits a command into words by scanning characters, never by handing
//! the text to a Tcl interpreter. Every token is returned exactly as it
//! appears in the source, delimiters included, so no substitution can
//! ever run as a side effect of analysis.

use crate::token::{Token, TokenKind};

/// Tokenize a command's text into a sequence of literal tokens.
///
/// Total on arbitrary input: unterminated quotes, braces, or brackets
/// yield a best-effort partial token covering the rest of the text
/// rather than an error.
#[must_use]
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(text);
    let mut tokens = Vec::new();
    while let Some(token) = scanner.next_token() {
        tokens.push(token);
    }
    tokens
}

/// Scan up to the token at `index` and return it, without collecting
/// the earlier ones.
#[must_use]
pub fn get_token(text: &str, index: usize) -> Option<Token> {
    let mut scanner = Scanner::new(text);
    let mut current = 0;
    while let Some(token) = scanner.next_token() {
        if current == index {
            return Some(token);
        }
        current += 1;
    }
    None
}

/// Count the tokens in a command's text.
#[must_use]
pub fn count_tokens(text: &str) -> usize {
    let mut scanner = Scanner::new(text);
    let mut count = 0;
    while scanner.next_token().is_some() {
        count += 1;
    }
    count
}

struct Scanner<'a> {
    src: &'a str,
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    const fn new(src: &'a str) -> Self {
        Self {
            src,
            input: src.as_bytes(),
            pos: 0,
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        self.skip_separators();
        let start = self.pos;
        let ch = *self.input.get(self.pos)?;

        let token = match ch {
            b'"' => self.read_quoted(),
            b'{' => self.read_braced(),
            b'[' => self.read_command_sub(),
            b'$' => self.read_var_ref(),
            b'}' | b']' => {
                // stray closer: a one-byte word keeps the scan moving
                self.pos += 1;
                self.token(TokenKind::Word, start)
            }
            _ => self.read_word(),
        };
        Some(token)
    }

    /// Whitespace and `;` both end a word and carry no token of their own.
    fn skip_separators(&mut self) {
        while let Some(&ch) = self.input.get(self.pos) {
            match ch {
                b' ' | b'\t' | b'\r' | b'\n' | b';' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            text: self.src[start..self.pos].to_string(),
            offset: start,
        }
    }

    /// `"..."`: scan to the next unescaped quote. A backslash makes the
    /// following character literal, including an escaped quote.
    fn read_quoted(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;

        while let Some(&ch) = self.input.get(self.pos) {
            match ch {
                b'\\' => {
                    self.pos += 1;
                    if self.pos < self.input.len() {
                        self.pos += 1;
                    }
                }
                b'"' => {
                    self.pos += 1;
                    return self.token(TokenKind::Quoted, start);
                }
                _ => self.pos += 1,
            }
        }

        // no closing quote: best-effort partial token
        self.token(TokenKind::Quoted, start)
    }

    /// `{...}`: balanced-depth scan. Brace contents are opaque; quotes
    /// and escapes inside do not matter, only the depth counter does.
    fn read_braced(&mut self) -> Token {
        let start = self.pos;
        let mut depth = 0usize;

        while let Some(&ch) = self.input.get(self.pos) {
            match ch {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return self.token(TokenKind::Braced, start);
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }

        self.token(TokenKind::Braced, start)
    }

    /// `[...]`: balanced bracket scan. Brace depth and an in-quote flag
    /// are tracked inside the bracket because an inner `{`/`}` or `"`
    /// changes whether a `]` counts toward the substitution boundary.
    fn read_command_sub(&mut self) -> Token {
        let start = self.pos;
        let mut bracket_depth = 0usize;
        let mut brace_depth = 0usize;
        let mut in_quote = false;

        while let Some(&ch) = self.input.get(self.pos) {
            match ch {
                b'\\' if brace_depth == 0 => {
                    // escaped character, even inside quotes
                    self.pos += 1;
                    if self.pos < self.input.len() {
                        self.pos += 1;
                    }
                    continue;
                }
                b'"' if brace_depth == 0 => in_quote = !in_quote,
                b'{' if !in_quote => brace_depth += 1,
                b'}' if !in_quote && brace_depth > 0 => brace_depth -= 1,
                b'[' if !in_quote && brace_depth == 0 => bracket_depth += 1,
                b']' if !in_quote && brace_depth == 0 => {
                    bracket_depth -= 1;
                    if bracket_depth == 0 {
                        self.pos += 1;
                        return self.token(TokenKind::CommandSub, start);
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }

        self.token(TokenKind::CommandSub, start)
    }

    /// `$name`, `$ns::name`, or `${...}` scanned to its own close brace.
    fn read_var_ref(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;

        if self.input.get(self.pos) == Some(&b'{') {
            let mut depth = 0usize;
            while let Some(&ch) = self.input.get(self.pos) {
                match ch {
                    b'{' => depth += 1,
                    b'}' => {
                        depth -= 1;
                        if depth == 0 {
                            self.pos += 1;
                            return self.token(TokenKind::VarRef, start);
                        }
                    }
                    _ => {}
                }
                self.pos += 1;
            }
            return self.token(TokenKind::VarRef, start);
        }

        let name_start = self.pos;
        while let Some(&ch) = self.input.get(self.pos) {
            if ch.is_ascii_alphanumeric() || ch == b'_' || ch == b':' {
                self.pos += 1;
            } else {
                break;
            }
        }

        if self.pos == name_start {
            // a lone `$` is just a one-byte word
            return self.token(TokenKind::Word, start);
        }

        self.token(TokenKind::VarRef, start)
    }

    /// Bare word: consume until whitespace or a delimiter character.
    /// A backslash escapes the next character into the word.
    fn read_word(&mut self) -> Token {
        let start = self.pos;

        while let Some(&ch) = self.input.get(self.pos) {
            match ch {
                b' ' | b'\t' | b'\r' | b'\n' | b';' | b'{' | b'}' | b'[' | b']' | b'"'
                | b'$' => break,
                b'\\' => {
                    self.pos += 1;
                    if self.pos < self.input.len() {
                        self.pos += 1;
                    }
                }
                _ => self.pos += 1,
            }
        }

        self.token(TokenKind::Word, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_words() {
        let tokens = tokenize("set greeting hello");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "set");
        assert_eq!(tokens[1].text, "greeting");
        assert_eq!(tokens[2].text, "hello");
    }

    #[test]
    fn nested_braces_are_one_token() {
        let tokens = tokenize("{a {b} c}");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Braced);
        assert_eq!(tokens[0].text, "{a {b} c}");
    }

    #[test]
    fn bracket_with_internal_braces_and_quotes() {
        let tokens = tokenize("[cmd {x} \"y\"]");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::CommandSub);
        assert_eq!(tokens[0].text, "[cmd {x} \"y\"]");
    }

    #[test]
    fn bracket_boundary_ignores_bracket_inside_quotes() {
        let tokens = tokenize(r#"[string match "]" $x]"#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, r#"[string match "]" $x]"#);
    }

    #[test]
    fn bracket_boundary_ignores_bracket_inside_braces() {
        let tokens = tokenize("[lindex {a ] b} 0]");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "[lindex {a ] b} 0]");
    }

    #[test]
    fn quoted_token_keeps_delimiters_and_escapes() {
        let tokens = tokenize(r#"puts "a \"b\" c""#);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Quoted);
        assert_eq!(tokens[1].text, r#""a \"b\" c""#);
    }

    #[test]
    fn unterminated_quote_is_partial_not_error() {
        let tokens = tokenize("set x \"unterminated");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].text, "x");
        assert_eq!(tokens[2].kind, TokenKind::Quoted);
        assert_eq!(tokens[2].text, "\"unterminated");
    }

    #[test]
    fn unterminated_brace_is_partial() {
        let tokens = tokenize("{abc");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "{abc");
    }

    #[test]
    fn variable_references() {
        let tokens = tokenize("puts $name$other");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::VarRef);
        assert_eq!(tokens[1].text, "$name");
        assert_eq!(tokens[2].text, "$other");
    }

    #[test]
    fn namespaced_variable() {
        let tokens = tokenize("$::ns::var");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::VarRef);
        assert_eq!(tokens[0].text, "$::ns::var");
    }

    #[test]
    fn braced_variable() {
        let tokens = tokenize("${a b}");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::VarRef);
        assert_eq!(tokens[0].text, "${a b}");
    }

    #[test]
    fn lone_dollar_is_a_word() {
        let tokens = tokenize("$ x");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Word);
        assert_eq!(tokens[0].text, "$");
    }

    #[test]
    fn word_with_escaped_space() {
        let tokens = tokenize(r"a\ b c");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, r"a\ b");
        assert_eq!(tokens[1].text, "c");
    }

    #[test]
    fn semicolon_separates_words() {
        let tokens = tokenize("set a 1; set b 2");
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[3].text, "set");
    }

    #[test]
    fn stray_closers_become_words() {
        let tokens = tokenize("} ]");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "}");
        assert_eq!(tokens[1].text, "]");
    }

    #[test]
    fn get_token_matches_tokenize() {
        let text = "proc foo {a b} { set a 1 }";
        let all = tokenize(text);
        for (i, token) in all.iter().enumerate() {
            assert_eq!(get_token(text, i).as_ref(), Some(token));
        }
        assert_eq!(get_token(text, all.len()), None);
    }

    #[test]
    fn count_tokens_matches_tokenize() {
        let text = "if {$a > 1} { puts yes } else { puts no }";
        assert_eq!(count_tokens(text), tokenize(text).len());
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n").is_empty());
        assert_eq!(count_tokens(""), 0);
        assert_eq!(get_token("", 0), None);
    }

    #[test]
    fn offsets_index_into_source() {
        let text = "set  x {a b}";
        for token in tokenize(text) {
            assert_eq!(&text[token.offset..token.offset + token.text.len()], token.text);
        }
    }
}
