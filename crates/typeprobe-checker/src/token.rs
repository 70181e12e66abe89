//! Tokens of the case-file language
//!
//! Type keywords (`number`, `never`, ...) are plain identifiers; only the
//! words that change the shape of the grammar are keywords.

use std::fmt;

/// A token in a case file
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    /// `type`
    Type,
    /// `export`
    Export,
    /// `readonly`
    Readonly,

    // Identifiers and literals
    /// Type keyword, alias or relation name
    Identifier(String),
    /// Unsigned number literal
    NumberLiteral(f64),
    /// Decimal digits of a bigint literal, without the `n` suffix
    BigIntLiteral(String),
    /// Unescaped string literal contents
    StringLiteral(String),

    // Punctuation
    /// `|`
    Pipe,
    /// `&`
    Amp,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `=`
    Equal,
    /// `-`
    Minus,
    /// `?`
    Question,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,

    /// End of input
    Eof,
}

/// Source location of a token or syntax node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// 1-based line of `start`
    pub line: u32,
    /// 1-based column of `start`
    pub column: u32,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers nothing
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The source text under this span
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Smallest span covering both
    pub fn merge(&self, other: &Span) -> Span {
        let (line, column) = if self.start <= other.start {
            (self.line, self.column)
        } else {
            (other.line, other.column)
        };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line,
            column,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Type => write!(f, "type"),
            Token::Export => write!(f, "export"),
            Token::Readonly => write!(f, "readonly"),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::NumberLiteral(n) => write!(f, "{}", n),
            Token::BigIntLiteral(digits) => write!(f, "{}n", digits),
            Token::StringLiteral(s) => write!(f, "'{}'", s),
            Token::Pipe => write!(f, "|"),
            Token::Amp => write!(f, "&"),
            Token::Less => write!(f, "<"),
            Token::Greater => write!(f, ">"),
            Token::Equal => write!(f, "="),
            Token::Minus => write!(f, "-"),
            Token::Question => write!(f, "?"),
            Token::Colon => write!(f, ":"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::Eof => write!(f, "end of file"),
        }
    }
}
