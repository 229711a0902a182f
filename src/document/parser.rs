//! Recursive-descent parser from tokens to a [`Document`].

use super::editor::Document;
use super::lexer::{tokenize, Token, TokenKind};
use super::value::{Field, FieldValue, Member, StructValue};
use crate::error::{AssetError, Result};

/// Nesting level at which category entries live (`agents: { "name": {...} }`).
const ENTRY_DEPTH: usize = 1;

/// Deepest struct or list nesting accepted before parsing is abandoned.
pub const MAX_DEPTH: usize = 128;

pub fn parse(src: &str) -> Result<Document> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        src,
        tokens,
        pos: 0,
    };
    let members = parser.parse_body(None, 0)?;
    Ok(Document { members })
}

pub fn parse_bytes(bytes: &[u8]) -> Result<Document> {
    match std::str::from_utf8(bytes) {
        Ok(src) => parse(src),
        Err(e) => {
            let valid = &bytes[..e.valid_up_to()];
            let line = valid.iter().filter(|b| **b == b'\n').count() + 1;
            let line_start = valid
                .iter()
                .rposition(|b| *b == b'\n')
                .map(|i| i + 1)
                .unwrap_or(0);
            Err(AssetError::parse(
                line,
                valid.len() - line_start + 1,
                "invalid UTF-8",
            ))
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind_at(&self, index: usize) -> Option<&TokenKind> {
        self.tokens.get(index).map(|t| &t.kind)
    }

    fn text(&self, token: &Token) -> &'a str {
        &self.src[token.start..token.end]
    }

    fn at_terminator(&self) -> bool {
        match self.peek() {
            None => true,
            Some(tok) => matches!(
                tok.kind,
                TokenKind::Newline
                    | TokenKind::Comma
                    | TokenKind::Comment(_)
                    | TokenKind::RBrace
                    | TokenKind::RBracket
                    | TokenKind::RParen
            ),
        }
    }

    /// Parse struct members until the matching `}` (or EOF at top level).
    fn parse_body(&mut self, open: Option<&Token>, depth: usize) -> Result<Vec<Member>> {
        let mut members: Vec<Member> = Vec::new();
        let mut newlines = 0usize;

        loop {
            let Some(tok) = self.peek().cloned() else {
                if let Some(open) = open {
                    return Err(AssetError::parse(open.line, open.column, "unclosed '{'"));
                }
                break;
            };

            match &tok.kind {
                TokenKind::Newline => {
                    newlines += 1;
                    self.pos += 1;
                    continue;
                }
                TokenKind::Comma => {
                    self.pos += 1;
                    continue;
                }
                TokenKind::RBrace => {
                    if open.is_none() {
                        return Err(AssetError::parse(tok.line, tok.column, "unexpected '}'"));
                    }
                    self.pos += 1;
                    break;
                }
                TokenKind::RBracket | TokenKind::RParen => {
                    return Err(AssetError::parse(
                        tok.line,
                        tok.column,
                        format!("unexpected '{}'", self.text(&tok)),
                    ));
                }
                _ => {}
            }

            // An empty line separated this member from the previous one.
            if newlines >= 2 && !members.is_empty() {
                members.push(Member::Blank);
            }
            newlines = 0;

            let member = match &tok.kind {
                TokenKind::Comment(text) => {
                    self.pos += 1;
                    Member::Comment(text.clone())
                }
                TokenKind::Str(_) | TokenKind::Word
                    if self.peek_kind_at(self.pos + 1) == Some(&TokenKind::Colon) =>
                {
                    let field = self.parse_field(&tok, depth)?;
                    if depth == ENTRY_DEPTH && members.iter().any(
                        |m| matches!(m, Member::Field(existing) if existing.key == field.key),
                    ) {
                        return Err(AssetError::parse(
                            tok.line,
                            tok.column,
                            format!("duplicate entry \"{}\"", field.key),
                        ));
                    }
                    Member::Field(field)
                }
                _ => Member::Raw(self.capture_raw()?),
            };
            members.push(member);
        }

        if matches!(members.last(), Some(Member::Blank)) {
            members.pop();
        }
        Ok(members)
    }

    fn parse_field(&mut self, key_token: &Token, depth: usize) -> Result<Field> {
        let key = match &key_token.kind {
            TokenKind::Str(s) => s.clone(),
            _ => self.text(key_token).to_string(),
        };
        // key + colon
        self.pos += 2;

        let value = self.parse_value(depth + 1)?;

        let comment = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Comment(text)) => {
                let text = text.clone();
                self.pos += 1;
                Some(text)
            }
            _ => None,
        };

        Ok(Field {
            key,
            value,
            comment,
        })
    }

    /// Parse one value. Recognised forms must be followed by a terminator;
    /// anything else is re-read verbatim as a passthrough.
    fn parse_value(&mut self, depth: usize) -> Result<FieldValue> {
        let start = self.pos;
        let Some(tok) = self.peek().cloned() else {
            let (line, column) = self.eof_position();
            return Err(AssetError::parse(line, column, "expected value"));
        };
        if depth > MAX_DEPTH {
            return Err(AssetError::parse(tok.line, tok.column, "nesting too deep"));
        }

        let recognised = match &tok.kind {
            TokenKind::Str(s) => {
                self.pos += 1;
                Some(FieldValue::String(s.clone()))
            }
            TokenKind::Word => match self.text(&tok) {
                "true" => {
                    self.pos += 1;
                    Some(FieldValue::Bool(true))
                }
                "false" => {
                    self.pos += 1;
                    Some(FieldValue::Bool(false))
                }
                _ => None,
            },
            TokenKind::LBrace => {
                self.pos += 1;
                let members = self.parse_body(Some(&tok), depth)?;
                Some(FieldValue::Struct(StructValue { members }))
            }
            TokenKind::LBracket => Some(FieldValue::List(self.parse_list(&tok, depth)?)),
            TokenKind::Newline
            | TokenKind::Comma
            | TokenKind::Comment(_)
            | TokenKind::RBrace
            | TokenKind::RBracket
            | TokenKind::RParen => {
                return Err(AssetError::parse(tok.line, tok.column, "expected value"));
            }
            _ => None,
        };

        if let Some(value) = recognised {
            if self.at_terminator() {
                return Ok(value);
            }
        }

        self.pos = start;
        Ok(FieldValue::Passthrough(self.capture_raw()?))
    }

    fn parse_list(&mut self, open: &Token, depth: usize) -> Result<Vec<FieldValue>> {
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            let Some(tok) = self.peek().cloned() else {
                return Err(AssetError::parse(open.line, open.column, "unclosed '['"));
            };
            match tok.kind {
                TokenKind::Newline | TokenKind::Comma | TokenKind::Comment(_) => self.pos += 1,
                TokenKind::RBracket => {
                    self.pos += 1;
                    return Ok(items);
                }
                TokenKind::RBrace | TokenKind::RParen => {
                    return Err(AssetError::parse(
                        tok.line,
                        tok.column,
                        format!("unexpected '{}'", self.text(&tok)),
                    ));
                }
                _ => items.push(self.parse_value(depth + 1)?),
            }
        }
    }

    /// Consume tokens up to the end of the current item at bracket depth 0 and
    /// return the covered source text.
    fn capture_raw(&mut self) -> Result<String> {
        let first = self.pos;
        let mut open: Vec<Token> = Vec::new();

        while let Some(tok) = self.peek().cloned() {
            match tok.kind {
                TokenKind::LBrace | TokenKind::LBracket | TokenKind::LParen => open.push(tok),
                TokenKind::RBrace | TokenKind::RBracket | TokenKind::RParen => {
                    let Some(opener) = open.pop() else {
                        break;
                    };
                    if !closes(&opener.kind, &tok.kind) {
                        return Err(AssetError::parse(
                            tok.line,
                            tok.column,
                            format!(
                                "'{}' does not match '{}' at line {}",
                                self.text(&tok),
                                self.text(&opener),
                                opener.line
                            ),
                        ));
                    }
                }
                TokenKind::Newline | TokenKind::Comma | TokenKind::Comment(_)
                    if open.is_empty() =>
                {
                    break;
                }
                _ => {}
            }
            self.pos += 1;
        }

        if let Some(opener) = open.last() {
            return Err(AssetError::parse(
                opener.line,
                opener.column,
                format!("unclosed '{}'", self.text(opener)),
            ));
        }
        if self.pos == first {
            let (line, column) = match self.peek() {
                Some(tok) => (tok.line, tok.column),
                None => self.eof_position(),
            };
            return Err(AssetError::parse(line, column, "expected value"));
        }

        let start = self.tokens[first].start;
        let end = self.tokens[self.pos - 1].end;
        Ok(self.src[start..end].to_string())
    }

    fn eof_position(&self) -> (usize, usize) {
        let line = self.src.matches('\n').count() + 1;
        let column = self
            .src
            .rfind('\n')
            .map(|i| self.src.len() - i)
            .unwrap_or(self.src.len() + 1);
        (line, column)
    }
}

fn closes(open: &TokenKind, close: &TokenKind) -> bool {
    matches!(
        (open, close),
        (TokenKind::LBrace, TokenKind::RBrace)
            | (TokenKind::LBracket, TokenKind::RBracket)
            | (TokenKind::LParen, TokenKind::RParen)
    )
}
