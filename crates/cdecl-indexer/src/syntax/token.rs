/// A lexed token. `text` borrows the source buffer; nothing is copied
/// during tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of `text` within the source buffer.
    pub start: usize,
    /// 1-based source line the token starts on.
    pub line: u32,
}

impl<'a> Token<'a> {
    /// Byte offset one past the end of `text`.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn equals(&self, text: &str) -> bool {
        self.text == text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Asterisk,
    Semicolon,
    Comma,
    Colon,
    Equals,
    Preprocessor,

    Identifier,
    Number,
    Str,
    Char,

    Unknown,
    EndOfStream,
}
