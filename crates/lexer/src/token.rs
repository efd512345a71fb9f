use std::ops::Range;

use crate::location::Location;

/// Classification of a single lexical token.
///
/// `Invalid` is terminal: a consumer that sees it must reject the input
/// rather than try to recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Invalid,
    Eof,
    Eol,
    Assign,
    Namespace,
    BlockOpen,
    BlockClose,
    Semicolon,
    Comment,
    Backslash,
    Identifier,
    Null,
    Text,
    Binary,
    Number,
    Boolean,
    DateTime,
    Date,
    Duration,
}

impl TokenKind {
    /// Whether this token kind carries a decodable scalar value.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            TokenKind::Null
                | TokenKind::Text
                | TokenKind::Binary
                | TokenKind::Number
                | TokenKind::Boolean
                | TokenKind::DateTime
                | TokenKind::Date
                | TokenKind::Duration
        )
    }

    /// The fixed phrase used to describe this kind in "Unexpected X, expected
    /// Y" diagnostics, for kinds that are not rendered via their literal
    /// text or identifier name.
    pub fn expected_phrase(self) -> &'static str {
        match self {
            TokenKind::Invalid => "malformed token",
            TokenKind::Eof => "end of file",
            TokenKind::Eol => "end of line",
            TokenKind::Assign => "'='",
            TokenKind::Namespace => "':'",
            TokenKind::BlockOpen => "'{'",
            TokenKind::BlockClose => "'}'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comment => "comment",
            TokenKind::Backslash => "'\\'",
            TokenKind::Identifier => "identifier",
            TokenKind::Null => "'null'",
            TokenKind::Text => "string",
            TokenKind::Binary => "binary data",
            TokenKind::Number => "number",
            TokenKind::Boolean => "Boolean value",
            TokenKind::DateTime => "date/time value",
            TokenKind::Date => "date value",
            TokenKind::Duration => "duration value",
        }
    }
}

/// A single lexical token: a type tag plus the byte ranges of its
/// whitespace prefix and its own text, both views over the original input
/// The lexer never decodes values; it only classifies and delimits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
    pub whitespace_prefix: Range<usize>,
    pub text: Range<usize>,
}

impl Token {
    /// The token's own text, sliced out of `source`. `source` must be the
    /// same byte slice the originating [`crate::Lexer`] was constructed
    /// with.
    pub fn text<'source>(&self, source: &'source [u8]) -> &'source [u8] {
        &source[self.text.clone()]
    }

    /// The run of spaces/tabs immediately preceding this token, sliced out
    /// of `source`.
    pub fn whitespace_prefix<'source>(&self, source: &'source [u8]) -> &'source [u8] {
        &source[self.whitespace_prefix.clone()]
    }
}
