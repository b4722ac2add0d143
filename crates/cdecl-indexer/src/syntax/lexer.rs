use crate::syntax::token::{Token, TokenKind};

/// Tokenizer over an immutable source buffer.
///
/// Tokens borrow the buffer and carry the 1-based line they start on.
/// The lexer is `Clone`, which is how every multi-token decision is made:
/// save a copy, scan ahead, and either keep the copy's position or throw
/// it away. The lexer knows nothing about the grammar above it; the
/// declaration extractor and the compile-log extractor both run it as-is.
#[derive(Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Jump to an absolute byte offset.
    ///
    /// The line counter is not recomputed; callers that seek (the
    /// compile-log scanner) derive line numbers from the text itself.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.source.len());
    }

    /// Advance to the next `\n` without consuming it.
    pub fn skip_to_line_end(&mut self) {
        let bytes = self.source.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    fn skip_trivia(&mut self) {
        let bytes = self.source.as_bytes();
        loop {
            match bytes.get(self.pos) {
                Some(b'\n') => {
                    self.line += 1;
                    self.pos += 1;
                }
                // `\` is the preprocessor line continuation; treating it as
                // whitespace keeps multi-line macro definitions scannable.
                Some(b' ' | b'\t' | b'\r' | b'\\') => self.pos += 1,
                Some(b'/') if bytes.get(self.pos + 1) == Some(&b'/') => {
                    self.pos += 2;
                    while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                Some(b'/') if bytes.get(self.pos + 1) == Some(&b'*') => {
                    self.pos += 2;
                    while self.pos < bytes.len() {
                        if bytes[self.pos] == b'\n' {
                            self.line += 1;
                        }
                        if bytes[self.pos] == b'*' && bytes.get(self.pos + 1) == Some(&b'/') {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    pub fn next_token(&mut self) -> Token<'a> {
        self.skip_trivia();

        let bytes = self.source.as_bytes();
        let start = self.pos;
        let line = self.line;

        let Some(&c) = bytes.get(self.pos) else {
            return Token {
                kind: TokenKind::EndOfStream,
                text: "",
                start,
                line,
            };
        };
        self.pos += 1;

        let kind = match c {
            b'(' => TokenKind::OpenParen,
            b')' => TokenKind::CloseParen,
            b'[' => TokenKind::OpenBracket,
            b']' => TokenKind::CloseBracket,
            b'{' => TokenKind::OpenBrace,
            b'}' => TokenKind::CloseBrace,
            b'*' => TokenKind::Asterisk,
            b';' => TokenKind::Semicolon,
            b',' => TokenKind::Comma,
            b':' => TokenKind::Colon,
            b'=' => TokenKind::Equals,

            // `#` plus the directive name is one token: `#define`, `#include`.
            b'#' => {
                while self.pos < bytes.len() && bytes[self.pos].is_ascii_alphabetic() {
                    self.pos += 1;
                }
                TokenKind::Preprocessor
            }

            b'\'' => return self.char_literal(line),
            b'"' => return self.string_literal(line),

            _ if c.is_ascii_alphabetic() || c == b'_' => {
                while self.pos < bytes.len() && is_identifier_byte(bytes[self.pos]) {
                    self.pos += 1;
                }
                TokenKind::Identifier
            }

            _ if c.is_ascii_digit() => {
                self.number_continuation();
                TokenKind::Number
            }

            _ => TokenKind::Unknown,
        };

        Token {
            kind,
            text: &self.source[start..self.pos],
            start,
            line,
        }
    }

    /// Digits, then either a `.`/`b` continuation of more digits or an `x`
    /// continuation of hex digits (`0x1F`, `0b101`, `3.14`).
    fn number_continuation(&mut self) {
        let bytes = self.source.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        match bytes.get(self.pos) {
            Some(b'.' | b'b') => {
                self.pos += 1;
                while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                    self.pos += 1;
                }
            }
            Some(b'x') => {
                self.pos += 1;
                while self.pos < bytes.len() && bytes[self.pos].is_ascii_alphanumeric() {
                    self.pos += 1;
                }
            }
            _ => {}
        }
    }

    /// Character literal; the token text excludes the quotes. A backslash
    /// escapes the delimiter, so `'\''` does not end at the escaped quote.
    fn char_literal(&mut self, line: u32) -> Token<'a> {
        let bytes = self.source.as_bytes();
        let start = self.pos;
        if bytes.get(self.pos) == Some(&b'\\') && self.pos + 1 < bytes.len() {
            self.pos += 1;
        }
        if self.pos < bytes.len() {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        if bytes.get(self.pos) == Some(&b'\'') {
            self.pos += 1;
        }
        Token {
            kind: TokenKind::Char,
            text,
            start,
            line,
        }
    }

    /// String literal; the token text excludes the quotes and escaped
    /// delimiters do not terminate the literal.
    fn string_literal(&mut self, line: u32) -> Token<'a> {
        let bytes = self.source.as_bytes();
        let start = self.pos;
        while self.pos < bytes.len() && bytes[self.pos] != b'"' {
            if bytes[self.pos] == b'\\' && self.pos + 1 < bytes.len() {
                self.pos += 1;
            }
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        if bytes.get(self.pos) == Some(&b'"') {
            self.pos += 1;
        }
        Token {
            kind: TokenKind::Str,
            text,
            start,
            line,
        }
    }
}

fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}
