//! Lexer for case files
//!
//! Built on logos. Whitespace and comments are skipped by the token rules;
//! the driver only converts tokens and attaches line/column information.

use logos::Logos;
use thiserror::Error;

use crate::token::{Span, Token};

/// Logos-based token enum for lexing.
///
/// Converted to [`Token`] after lexing.
#[derive(Logos, Debug, Clone, PartialEq)]
enum LogosToken {
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Whitespace,

    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[token("/*", lex_block_comment)]
    BlockComment,

    // Keywords (must come before identifiers)
    #[token("type")]
    Type,

    #[token("export")]
    Export,

    #[token("readonly")]
    Readonly,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[regex(r"[0-9]+(_[0-9]+)*n", parse_bigint)]
    BigIntLiteral(String),

    #[regex(r"0[xX][0-9a-fA-F]+(_[0-9a-fA-F]+)*", parse_hex)]
    #[regex(r"[0-9]+(_[0-9]+)*(\.[0-9]+(_[0-9]+)*)?([eE][+-]?[0-9]+)?", parse_number)]
    #[regex(r"\.[0-9]+(_[0-9]+)*([eE][+-]?[0-9]+)?", parse_number)]
    NumberLiteral(f64),

    #[regex(r#""([^"\\\n]|\\.)*""#, parse_string)]
    #[regex(r"'([^'\\\n]|\\.)*'", parse_string)]
    StringLiteral(String),

    #[token("|")]
    Pipe,

    #[token("&")]
    Amp,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token("=")]
    Equal,

    #[token("-")]
    Minus,

    #[token("?")]
    Question,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[token("[")]
    LeftBracket,

    #[token("]")]
    RightBracket,
}

fn lex_block_comment(lex: &mut logos::Lexer<LogosToken>) -> logos::Skip {
    // "/*" is consumed; an unterminated comment runs to the end of input
    let remainder = lex.remainder();
    match remainder.find("*/") {
        Some(end) => lex.bump(end + 2),
        None => lex.bump(remainder.len()),
    }
    logos::Skip
}

fn parse_bigint(lex: &mut logos::Lexer<LogosToken>) -> Option<String> {
    let s = lex.slice();
    Some(s[..s.len() - 1].replace('_', ""))
}

fn parse_hex(lex: &mut logos::Lexer<LogosToken>) -> Option<f64> {
    let s = lex.slice()[2..].replace('_', "");
    u64::from_str_radix(&s, 16).ok().map(|n| n as f64)
}

fn parse_number(lex: &mut logos::Lexer<LogosToken>) -> Option<f64> {
    lex.slice().replace('_', "").parse().ok()
}

fn parse_string(lex: &mut logos::Lexer<LogosToken>) -> Option<String> {
    let s = lex.slice();
    Some(unescape_string(&s[1..s.len() - 1]))
}

fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('0') => result.push('\0'),
            Some('u') => {
                let braced = chars.peek() == Some(&'{');
                if braced {
                    chars.next();
                }
                let mut hex = String::new();
                while let Some(&ch) = chars.peek() {
                    if !ch.is_ascii_hexdigit() || (!braced && hex.len() == 4) {
                        break;
                    }
                    hex.push(ch);
                    chars.next();
                }
                if braced && chars.peek() == Some(&'}') {
                    chars.next();
                }
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) => result.push(ch),
                    // Invalid escape, keep as written
                    None => {
                        result.push_str("\\u");
                        result.push_str(&hex);
                    }
                }
            }
            Some(other) => result.push(other),
            None => break,
        }
    }

    result
}

/// Lexer error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// A character no token starts with
    #[error("Unexpected character '{char}'")]
    UnexpectedCharacter {
        /// The offending character
        char: char,
        /// Where it occurs
        span: Span,
    },

    /// A string literal missing its closing quote on the same line
    #[error("Unterminated string literal")]
    UnterminatedString {
        /// From the opening quote
        span: Span,
    },

    /// A numeric literal that does not fit a number
    #[error("Invalid number literal '{text}'")]
    InvalidNumber {
        /// Source text of the literal
        text: String,
        /// Where it occurs
        span: Span,
    },
}

impl LexError {
    /// Location of the error
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::InvalidNumber { span, .. } => *span,
        }
    }
}

/// Main lexer structure.
pub struct Lexer<'a> {
    source: &'a str,
    /// Byte offset of the start of every line
    line_starts: Vec<usize>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `source`
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Tokenize the whole source, ending with [`Token::Eof`]
    ///
    /// Lexing continues past errors so every bad character is reported.
    pub fn tokenize(self) -> Result<Vec<(Token, Span)>, Vec<LexError>> {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        let mut lexer = LogosToken::lexer(self.source);

        while let Some(result) = lexer.next() {
            let range = lexer.span();
            let span = self.span(range.start, range.end);

            match result {
                Ok(logos_token) => tokens.push((convert_token(logos_token), span)),
                Err(()) => errors.push(self.classify_error(lexer.slice(), span)),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let end = self.source.len();
        tokens.push((Token::Eof, self.span(end, end)));
        Ok(tokens)
    }

    fn classify_error(&self, slice: &str, span: Span) -> LexError {
        match slice.chars().next() {
            Some('"' | '\'') => LexError::UnterminatedString { span },
            Some(c) if c.is_ascii_digit() => LexError::InvalidNumber {
                text: slice.to_string(),
                span,
            },
            Some(c) => LexError::UnexpectedCharacter { char: c, span },
            None => LexError::UnexpectedCharacter { char: '\0', span },
        }
    }

    fn span(&self, start: usize, end: usize) -> Span {
        let line = match self.line_starts.binary_search(&start) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = self.source[line_start..start].chars().count() + 1;
        Span::new(start, end, line as u32 + 1, column as u32)
    }
}

fn convert_token(logos_token: LogosToken) -> Token {
    match logos_token {
        LogosToken::Type => Token::Type,
        LogosToken::Export => Token::Export,
        LogosToken::Readonly => Token::Readonly,
        LogosToken::Identifier(s) => Token::Identifier(s),
        LogosToken::BigIntLiteral(s) => Token::BigIntLiteral(s),
        LogosToken::NumberLiteral(n) => Token::NumberLiteral(n),
        LogosToken::StringLiteral(s) => Token::StringLiteral(s),
        LogosToken::Pipe => Token::Pipe,
        LogosToken::Amp => Token::Amp,
        LogosToken::Less => Token::Less,
        LogosToken::Greater => Token::Greater,
        LogosToken::Equal => Token::Equal,
        LogosToken::Minus => Token::Minus,
        LogosToken::Question => Token::Question,
        LogosToken::Colon => Token::Colon,
        LogosToken::Semicolon => Token::Semicolon,
        LogosToken::Comma => Token::Comma,
        LogosToken::LeftParen => Token::LeftParen,
        LogosToken::RightParen => Token::RightParen,
        LogosToken::LeftBrace => Token::LeftBrace,
        LogosToken::RightBrace => Token::RightBrace,
        LogosToken::LeftBracket => Token::LeftBracket,
        LogosToken::RightBracket => Token::RightBracket,
        LogosToken::Whitespace | LogosToken::LineComment | LogosToken::BlockComment => {
            unreachable!("Whitespace and comments should be skipped")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn test_alias() {
        assert_eq!(
            lex("export type A = readonly [1n, 'a'];"),
            vec![
                Token::Export,
                Token::Type,
                Token::Identifier("A".to_string()),
                Token::Equal,
                Token::Readonly,
                Token::LeftBracket,
                Token::BigIntLiteral("1".to_string()),
                Token::Comma,
                Token::StringLiteral("a".to_string()),
                Token::RightBracket,
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_nested_generics_close_separately() {
        assert_eq!(
            lex("Expect<Equal<1, 1>>"),
            vec![
                Token::Identifier("Expect".to_string()),
                Token::Less,
                Token::Identifier("Equal".to_string()),
                Token::Less,
                Token::NumberLiteral(1.0),
                Token::Comma,
                Token::NumberLiteral(1.0),
                Token::Greater,
                Token::Greater,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            lex("1_000 0x10 1.5e3 .5 10n"),
            vec![
                Token::NumberLiteral(1000.0),
                Token::NumberLiteral(16.0),
                Token::NumberLiteral(1500.0),
                Token::NumberLiteral(0.5),
                Token::BigIntLiteral("10".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            lex("// line\n/* block\n comment */ never"),
            vec![Token::Identifier("never".to_string()), Token::Eof]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            lex(r#""a\"b" 'it\'s' 'A\u{1F600}'"#),
            vec![
                Token::StringLiteral("a\"b".to_string()),
                Token::StringLiteral("it's".to_string()),
                Token::StringLiteral("A\u{1F600}".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_spans_track_lines() {
        let tokens = Lexer::new("type A =\n  1;").tokenize().unwrap();
        let (token, span) = &tokens[3];
        assert_eq!(token, &Token::NumberLiteral(1.0));
        assert_eq!((span.line, span.column), (2, 3));
        assert_eq!(span.slice("type A =\n  1;"), "1");
    }

    #[test]
    fn test_errors() {
        let errors = Lexer::new("type A = #;\n'open").tokenize().unwrap_err();
        assert!(matches!(errors[0], LexError::UnexpectedCharacter { char: '#', .. }));
        assert!(matches!(errors[1], LexError::UnterminatedString { .. }));
        assert_eq!(errors[1].span().line, 2);
    }
}
