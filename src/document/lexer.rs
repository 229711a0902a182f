//! Byte-level scanner for config documents.
//!
//! The scanner is a four-state machine. Structural characters (`{`, `}`, `:`
//! and friends) are only recognised in [`ScanState::Normal`]; everything inside
//! strings and comments is opaque. Every byte value has a defined transition,
//! so any input either tokenizes or yields a positioned parse error.

use crate::error::{AssetError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Normal,
    InSingleLineString,
    InMultiLineString,
    InComment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Colon,
    Comma,
    Newline,
    /// Text after `//`, trailing whitespace removed.
    Comment(String),
    /// Decoded contents of a single- or triple-quoted string.
    Str(String),
    /// Any other run of non-delimiter bytes (identifiers, numbers, operators).
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first byte of the token.
    pub start: usize,
    /// Byte offset one past the last byte of the token.
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

const TRIPLE_QUOTE: &[u8] = b"\"\"\"";

pub fn tokenize(src: &str) -> Result<Vec<Token>> {
    Lexer::new(src).run()
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    line_start: usize,
    state: ScanState,
    token_start: usize,
    token_line: usize,
    token_column: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            line_start: 0,
            state: ScanState::Normal,
            token_start: 0,
            token_line: 1,
            token_column: 1,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>> {
        while self.pos < self.bytes.len() {
            match self.state {
                ScanState::Normal => self.step_normal(),
                ScanState::InSingleLineString => self.step_string()?,
                ScanState::InMultiLineString => self.step_multiline(),
                ScanState::InComment => self.step_comment(),
            }
        }

        match self.state {
            ScanState::Normal => {}
            ScanState::InComment => self.finish_comment(),
            ScanState::InSingleLineString => {
                return Err(self.error_at_token("unterminated string"));
            }
            ScanState::InMultiLineString => {
                return Err(self.error_at_token("unterminated multi-line string"));
            }
        }

        Ok(self.tokens)
    }

    fn column(&self) -> usize {
        self.pos - self.line_start + 1
    }

    fn begin_token(&mut self) {
        self.token_start = self.pos;
        self.token_line = self.line;
        self.token_column = self.column();
    }

    fn push(&mut self, kind: TokenKind) {
        self.tokens.push(Token {
            kind,
            start: self.token_start,
            end: self.pos,
            line: self.token_line,
            column: self.token_column,
        });
    }

    fn push_single(&mut self, kind: TokenKind) {
        self.begin_token();
        self.pos += 1;
        self.push(kind);
    }

    fn error_at_token(&self, message: &str) -> AssetError {
        AssetError::parse(self.token_line, self.token_column, message)
    }

    fn starts_comment(&self, at: usize) -> bool {
        self.bytes.get(at) == Some(&b'/') && self.bytes.get(at + 1) == Some(&b'/')
    }

    fn step_normal(&mut self) {
        let b = self.bytes[self.pos];
        match b {
            b'\n' => {
                self.push_single(TokenKind::Newline);
                self.line += 1;
                self.line_start = self.pos;
            }
            b' ' | b'\t' | b'\r' => self.pos += 1,
            b'"' => {
                self.begin_token();
                if self.bytes[self.pos..].starts_with(TRIPLE_QUOTE) {
                    self.pos += TRIPLE_QUOTE.len();
                    self.state = ScanState::InMultiLineString;
                } else {
                    self.pos += 1;
                    self.state = ScanState::InSingleLineString;
                }
            }
            b'/' if self.starts_comment(self.pos) => {
                self.begin_token();
                self.pos += 2;
                self.state = ScanState::InComment;
            }
            b'{' => self.push_single(TokenKind::LBrace),
            b'}' => self.push_single(TokenKind::RBrace),
            b'[' => self.push_single(TokenKind::LBracket),
            b']' => self.push_single(TokenKind::RBracket),
            b'(' => self.push_single(TokenKind::LParen),
            b')' => self.push_single(TokenKind::RParen),
            b':' => self.push_single(TokenKind::Colon),
            b',' => self.push_single(TokenKind::Comma),
            _ => {
                self.begin_token();
                while self.pos < self.bytes.len()
                    && !is_delimiter(self.bytes[self.pos])
                    && !self.starts_comment(self.pos)
                {
                    self.pos += 1;
                }
                self.push(TokenKind::Word);
            }
        }
    }

    fn step_string(&mut self) -> Result<()> {
        match self.bytes[self.pos] {
            b'\\' => {
                // Escape pair: the next byte never closes the string.
                if self.bytes.get(self.pos + 1) == Some(&b'\n') {
                    return Err(self.error_at_token("unterminated string"));
                }
                self.pos = (self.pos + 2).min(self.bytes.len());
            }
            b'"' => {
                self.pos += 1;
                let raw = &self.src[self.token_start + 1..self.pos - 1];
                let decoded = unescape(raw);
                self.push(TokenKind::Str(decoded));
                self.state = ScanState::Normal;
            }
            b'\n' => return Err(self.error_at_token("unterminated string")),
            _ => self.pos += 1,
        }
        Ok(())
    }

    fn step_multiline(&mut self) {
        if self.bytes[self.pos..].starts_with(TRIPLE_QUOTE) {
            let body_start = self.token_start + TRIPLE_QUOTE.len();
            let raw = &self.src[body_start..self.pos];
            let decoded = dedent_multiline(raw);
            self.pos += TRIPLE_QUOTE.len();
            self.push(TokenKind::Str(decoded));
            self.state = ScanState::Normal;
            return;
        }
        if self.bytes[self.pos] == b'\n' {
            self.line += 1;
            self.line_start = self.pos + 1;
        }
        self.pos += 1;
    }

    fn step_comment(&mut self) {
        if self.bytes[self.pos] == b'\n' {
            // The newline itself is left for Normal so it still separates fields.
            self.finish_comment();
        } else {
            self.pos += 1;
        }
    }

    fn finish_comment(&mut self) {
        let text = self.src[self.token_start + 2..self.pos].trim_end().to_string();
        self.push(TokenKind::Comment(text));
        self.state = ScanState::Normal;
    }
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b' ' | b'\t'
            | b'\r'
            | b'\n'
            | b'"'
            | b'{'
            | b'}'
            | b'['
            | b']'
            | b'('
            | b')'
            | b':'
            | b','
    )
}

/// Decode backslash escapes. Unknown escapes are kept literally.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('/') => out.push('/'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                let decoded = if hex.chars().count() == 4 && hex.chars().all(|h| h.is_ascii_hexdigit())
                {
                    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
                } else {
                    None
                };
                match decoded {
                    Some(ch) => {
                        out.push(ch);
                        for _ in 0..4 {
                            chars.next();
                        }
                    }
                    None => out.push_str("\\u"),
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Strip the opening newline and the closing line's indentation from a
/// triple-quoted body.
fn dedent_multiline(raw: &str) -> String {
    let Some(body) = raw.strip_prefix('\n').or_else(|| raw.strip_prefix("\r\n")) else {
        return raw.to_string();
    };

    let Some(last_newline) = body.rfind('\n') else {
        if body.chars().all(|c| c == ' ' || c == '\t') {
            return String::new();
        }
        return body.to_string();
    };

    let indent = &body[last_newline + 1..];
    if !indent.chars().all(|c| c == ' ' || c == '\t') {
        return body.to_string();
    }

    let content = &body[..last_newline];
    content
        .split('\n')
        .map(|line| match line.strip_prefix(indent) {
            Some(rest) => rest,
            None if line.trim().is_empty() => "",
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_braces_inside_strings_are_not_structural() {
        let tokens = kinds(r#"a: "x { y } // z""#);
        assert_eq!(
            tokens,
            vec![
                TokenKind::Word,
                TokenKind::Colon,
                TokenKind::Str("x { y } // z".to_string()),
            ]
        );
    }

    #[test]
    fn test_escaped_quote_stays_in_string() {
        let tokens = kinds(r#""say \"hi\" }""#);
        assert_eq!(tokens, vec![TokenKind::Str("say \"hi\" }".to_string())]);
    }

    #[test]
    fn test_comment_runs_to_newline() {
        let tokens = kinds("// { not a brace\n}");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Comment(" { not a brace".to_string()),
                TokenKind::Newline,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_comment_at_eof_is_accepted() {
        let tokens = kinds("a // trailing");
        assert_eq!(
            tokens,
            vec![TokenKind::Word, TokenKind::Comment(" trailing".to_string())]
        );
    }

    #[test]
    fn test_multiline_string_is_dedented() {
        let src = "p: \"\"\"\n\t\tline one\n\t\t  indented\n\n\t\tlast\n\t\t\"\"\"";
        let tokens = kinds(src);
        assert_eq!(
            tokens[2],
            TokenKind::Str("line one\n  indented\n\nlast".to_string())
        );
    }

    #[test]
    fn test_multiline_string_keeps_single_quotes_and_braces() {
        let src = "p: \"\"\"\n  say \"hi\" {\n  \"\"\"";
        let tokens = kinds(src);
        assert_eq!(tokens[2], TokenKind::Str("say \"hi\" {".to_string()));
    }

    #[test]
    fn test_unterminated_string_reports_position() {
        let err = tokenize("a: 1\nb: \"open").unwrap_err();
        match err {
            AssetError::Parse { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_newline_in_single_line_string_is_error() {
        assert!(tokenize("a: \"one\ntwo\"").is_err());
    }

    #[test]
    fn test_unterminated_multiline_string() {
        assert!(tokenize("a: \"\"\"\nabc\n").is_err());
    }

    #[test]
    fn test_trailing_backslash_at_eof() {
        assert!(tokenize("a: \"abc\\").is_err());
    }

    #[test]
    fn test_unescape_sequences() {
        assert_eq!(unescape(r"a\nb\tc"), "a\nb\tc");
        assert_eq!(unescape(r"é"), "é");
        assert_eq!(unescape(r"\S+\d"), r"\S+\d");
        assert_eq!(unescape(r"\uZZZZ"), r"\uZZZZ");
    }

    #[test]
    fn test_word_spans_non_ascii() {
        let tokens = tokenize("clé: 1").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Word);
        assert_eq!(&"clé: 1"[tokens[0].start..tokens[0].end], "clé");
    }
}
