//! Parser for case files
//!
//! Recursive descent over a pre-tokenized input. A syntax error skips to the
//! next item boundary so later items still parse and report.

use thiserror::Error;

use crate::ast::*;
use crate::lexer::{LexError, Lexer};
use crate::token::{Span, Token};

/// Maximum nesting depth of type expressions
pub const MAX_PARSE_DEPTH: usize = 64;

/// A syntax error with its location
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Tokenization failed
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Unexpected token found
    #[error("Expected {expected}, found '{found}'")]
    UnexpectedToken {
        /// What the grammar allows here
        expected: String,
        /// What was there instead
        found: Token,
        /// Location of the found token
        span: Span,
    },

    /// Unexpected end of file
    #[error("Unexpected end of file, expected {expected}")]
    UnexpectedEof {
        /// What the grammar allows here
        expected: String,
        /// End of the input
        span: Span,
    },

    /// Well-tokenized input the grammar rejects
    #[error("{reason}")]
    InvalidSyntax {
        /// Human-readable reason
        reason: String,
        /// Location
        span: Span,
    },

    /// Nesting exceeded [`MAX_PARSE_DEPTH`]
    #[error("Maximum nesting depth ({limit}) exceeded")]
    TooDeep {
        /// Depth limit
        limit: usize,
        /// Where the limit was hit
        span: Span,
    },
}

impl ParseError {
    /// Location of the error
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(err) => err.span(),
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEof { span, .. }
            | ParseError::InvalidSyntax { span, .. }
            | ParseError::TooDeep { span, .. } => *span,
        }
    }
}

/// Parse a whole case file, reporting lexer and parser errors alike
pub fn parse_case_file(source: &str) -> Result<CaseFile, Vec<ParseError>> {
    let parser = Parser::new(source)
        .map_err(|errors| errors.into_iter().map(ParseError::from).collect::<Vec<_>>())?;
    parser.parse()
}

/// Parser state
pub struct Parser {
    /// Pre-tokenized input, always ending with [`Token::Eof`]
    tokens: Vec<(Token, Span)>,

    /// Current position in token stream
    pos: usize,

    /// Current expression nesting
    depth: usize,

    /// Accumulated parse errors (allows continuing after errors)
    errors: Vec<ParseError>,
}

impl Parser {
    /// Create a new parser from source code.
    pub fn new(source: &str) -> Result<Self, Vec<LexError>> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self {
            tokens,
            pos: 0,
            depth: 0,
            errors: Vec::new(),
        })
    }

    /// Parse the entire source into a [`CaseFile`].
    ///
    /// Returns all accumulated errors on failure.
    pub fn parse(mut self) -> Result<CaseFile, Vec<ParseError>> {
        let mut items = Vec::new();

        while !self.at_eof() {
            match self.parse_item() {
                Ok(item) => items.push(item),
                Err(err) => {
                    self.errors.push(err);
                    self.sync_to_item_boundary();
                }
            }
        }

        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        Ok(CaseFile { items })
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    #[inline]
    fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    #[inline]
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|(tok, _)| tok)
    }

    /// Span of the most recently consumed token
    fn previous_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].1
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].0.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    #[inline]
    fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(expected)
    }

    #[inline]
    fn at_eof(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    /// Consume the current token if it matches, reporting whether it did
    fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<Span, ParseError> {
        if self.check(&expected) {
            let span = self.current_span();
            self.advance();
            Ok(span)
        } else {
            Err(self.unexpected(&format!("'{}'", expected)))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let span = self.current_span();
        if self.at_eof() {
            ParseError::UnexpectedEof {
                expected: expected.to_string(),
                span,
            }
        } else {
            ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.current().clone(),
                span,
            }
        }
    }

    /// Skip to just past the next `;`, or to the next `type`/`export`.
    fn sync_to_item_boundary(&mut self) {
        self.depth = 0;
        while !self.at_eof() {
            match self.current() {
                Token::Semicolon => {
                    self.advance();
                    return;
                }
                Token::Type | Token::Export => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ========================================================================
    // Items
    // ========================================================================

    fn parse_item(&mut self) -> Result<Item, ParseError> {
        let item = match self.current() {
            Token::Type | Token::Export => Item::Alias(self.parse_alias()?),
            _ => Item::Expr(self.parse_type()?),
        };
        self.end_item()?;
        Ok(item)
    }

    fn parse_alias(&mut self) -> Result<TypeAlias, ParseError> {
        let start = self.current_span();
        let exported = self.eat(&Token::Export);
        self.expect(Token::Type)?;

        let name_span = self.current_span();
        let name = match self.current() {
            Token::Identifier(name) => name.clone(),
            _ => return Err(self.unexpected("type alias name")),
        };
        self.advance();

        if self.check(&Token::Less) {
            return Err(ParseError::InvalidSyntax {
                reason: format!("Type alias '{}' cannot declare type parameters", name),
                span: self.current_span(),
            });
        }

        self.expect(Token::Equal)?;
        let value = self.parse_type()?;
        let span = start.merge(&value.span);

        Ok(TypeAlias {
            name,
            name_span,
            exported,
            value,
            span,
        })
    }

    /// `;`, which may be left out before a line break, another alias or the
    /// end of input
    fn end_item(&mut self) -> Result<(), ParseError> {
        match self.current() {
            Token::Semicolon => {
                self.advance();
                Ok(())
            }
            Token::Type | Token::Export | Token::Eof => Ok(()),
            _ if self.current_span().line > self.previous_span().line => Ok(()),
            _ => Err(self.unexpected("';'")),
        }
    }

    // ========================================================================
    // Type Expressions
    // ========================================================================

    /// Parse a full type expression (union level).
    pub fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        self.nested(Self::parse_union)
    }

    /// Run `parse` one nesting level deeper, failing past [`MAX_PARSE_DEPTH`]
    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<TypeExpr, ParseError>,
    ) -> Result<TypeExpr, ParseError> {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            self.depth -= 1;
            return Err(ParseError::TooDeep {
                limit: MAX_PARSE_DEPTH,
                span: self.current_span(),
            });
        }

        let result = parse(self);

        self.depth -= 1;
        result
    }

    fn parse_union(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current_span();
        // Leading `|` is allowed: `| A | B`
        let leading = self.eat(&Token::Pipe);

        let mut members = vec![self.parse_intersection()?];
        while self.eat(&Token::Pipe) {
            members.push(self.parse_intersection()?);
        }

        if members.len() == 1 {
            let mut only = members.remove(0);
            if leading {
                only.span = start.merge(&only.span);
            }
            return Ok(only);
        }

        let span = start.merge(&self.previous_span());
        Ok(TypeExpr {
            kind: TypeExprKind::Union(members),
            span,
        })
    }

    fn parse_intersection(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current_span();
        let mut members = vec![self.parse_postfix()?];
        while self.eat(&Token::Amp) {
            members.push(self.parse_postfix()?);
        }

        if members.len() == 1 {
            return Ok(members.remove(0));
        }

        let span = start.merge(&self.previous_span());
        Ok(TypeExpr {
            kind: TypeExprKind::Intersection(members),
            span,
        })
    }

    /// Primary followed by any number of `[]`
    fn parse_postfix(&mut self) -> Result<TypeExpr, ParseError> {
        let mut ty = self.parse_primary()?;

        while self.check(&Token::LeftBracket) && matches!(self.peek(), Some(Token::RightBracket)) {
            self.advance();
            let end = self.current_span();
            self.advance();
            let span = ty.span.merge(&end);
            ty = TypeExpr {
                kind: TypeExprKind::Array {
                    element: Box::new(ty),
                    readonly: false,
                },
                span,
            };
        }

        Ok(ty)
    }

    fn parse_primary(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current_span();

        let kind = match self.current().clone() {
            Token::Identifier(name) => {
                self.advance();
                let args = if self.check(&Token::Less) {
                    self.parse_type_args()?
                } else {
                    Vec::new()
                };
                TypeExprKind::Named { name, args }
            }
            Token::NumberLiteral(value) => {
                self.advance();
                TypeExprKind::Number(value)
            }
            Token::BigIntLiteral(digits) => {
                self.advance();
                TypeExprKind::BigInt(digits)
            }
            Token::StringLiteral(value) => {
                self.advance();
                TypeExprKind::String(value)
            }
            Token::Minus => {
                self.advance();
                match self.current().clone() {
                    Token::NumberLiteral(value) => {
                        self.advance();
                        TypeExprKind::Number(-value)
                    }
                    Token::BigIntLiteral(digits) => {
                        self.advance();
                        TypeExprKind::BigInt(format!("-{}", digits))
                    }
                    _ => return Err(self.unexpected("numeric literal after '-'")),
                }
            }
            Token::Readonly => return self.parse_readonly(),
            Token::LeftBracket => return self.parse_tuple(),
            Token::LeftBrace => return self.parse_object(),
            Token::LeftParen => {
                self.advance();
                let inner = self.parse_type()?;
                let end = self.expect(Token::RightParen)?;
                return Ok(TypeExpr {
                    kind: inner.kind,
                    span: start.merge(&end),
                });
            }
            _ => return Err(self.unexpected("type")),
        };

        Ok(TypeExpr {
            kind,
            span: start.merge(&self.previous_span()),
        })
    }

    /// `<A, B, ...>`
    fn parse_type_args(&mut self) -> Result<Vec<TypeExpr>, ParseError> {
        self.expect(Token::Less)?;
        let mut args = vec![self.parse_type()?];
        while self.eat(&Token::Comma) {
            if self.check(&Token::Greater) {
                break;
            }
            args.push(self.parse_type()?);
        }
        self.expect(Token::Greater)?;
        Ok(args)
    }

    /// `readonly T[]` or `readonly [A, B]`
    fn parse_readonly(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.expect(Token::Readonly)?;
        let inner = self.nested(Self::parse_postfix)?;
        let span = start.merge(&inner.span);

        let kind = match inner.kind {
            TypeExprKind::Array { element, .. } => TypeExprKind::Array {
                element,
                readonly: true,
            },
            TypeExprKind::Tuple { elements, .. } => TypeExprKind::Tuple {
                elements,
                readonly: true,
            },
            _ => {
                return Err(ParseError::InvalidSyntax {
                    reason: "'readonly' type modifier is only permitted on array and tuple types"
                        .to_string(),
                    span,
                })
            }
        };

        Ok(TypeExpr { kind, span })
    }

    /// `[A, B, ...]` with an optional trailing comma
    fn parse_tuple(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.expect(Token::LeftBracket)?;
        let mut elements = Vec::new();

        while !self.check(&Token::RightBracket) {
            elements.push(self.parse_type()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }

        let end = self.expect(Token::RightBracket)?;
        Ok(TypeExpr {
            kind: TypeExprKind::Tuple {
                elements,
                readonly: false,
            },
            span: start.merge(&end),
        })
    }

    /// `{ a: A; readonly b?: B, }`
    fn parse_object(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.expect(Token::LeftBrace)?;
        let mut properties = Vec::new();

        while !self.check(&Token::RightBrace) {
            properties.push(self.parse_property()?);
            if !self.eat(&Token::Comma) && !self.eat(&Token::Semicolon) {
                break;
            }
        }

        let end = self.expect(Token::RightBrace)?;
        Ok(TypeExpr {
            kind: TypeExprKind::Object(properties),
            span: start.merge(&end),
        })
    }

    fn parse_property(&mut self) -> Result<PropertyExpr, ParseError> {
        let start = self.current_span();

        // `readonly` is a modifier unless it is the property name itself
        let readonly = self.check(&Token::Readonly)
            && !matches!(self.peek(), Some(Token::Colon | Token::Question));
        if readonly {
            self.advance();
        }

        let name = match self.current() {
            Token::Identifier(name) | Token::StringLiteral(name) => name.clone(),
            Token::Type => "type".to_string(),
            Token::Export => "export".to_string(),
            Token::Readonly => "readonly".to_string(),
            _ => return Err(self.unexpected("property name")),
        };
        self.advance();

        let optional = self.eat(&Token::Question);
        self.expect(Token::Colon)?;
        let ty = self.parse_type()?;
        let span = start.merge(&ty.span);

        Ok(PropertyExpr {
            name,
            ty,
            optional,
            readonly,
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> CaseFile {
        parse_case_file(source).unwrap()
    }

    fn single_expr(source: &str) -> TypeExprKind {
        match parse(source).items.remove(0) {
            Item::Expr(expr) => expr.kind,
            other => panic!("expected expression, got {:?}", other),
        }
    }

    fn named(name: &str) -> TypeExprKind {
        TypeExprKind::Named {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    #[test]
    fn test_alias() {
        let file = parse("export type T = Expect<Equal<1, 1>>;");
        let Item::Alias(alias) = &file.items[0] else {
            panic!("expected alias");
        };
        assert_eq!(alias.name, "T");
        assert!(alias.exported);
        let TypeExprKind::Named { name, args } = &alias.value.kind else {
            panic!("expected invocation");
        };
        assert_eq!(name, "Expect");
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_union_and_intersection_precedence() {
        let TypeExprKind::Union(members) = single_expr("| 1 & number | string") else {
            panic!("expected union");
        };
        assert_eq!(members.len(), 2);
        assert!(matches!(members[0].kind, TypeExprKind::Intersection(ref m) if m.len() == 2));
        assert_eq!(members[1].kind, named("string"));
    }

    #[test]
    fn test_readonly_sequences() {
        assert!(matches!(
            single_expr("readonly [1, 2,]"),
            TypeExprKind::Tuple { ref elements, readonly: true } if elements.len() == 2
        ));
        assert!(matches!(
            single_expr("readonly true[]"),
            TypeExprKind::Array { readonly: true, .. }
        ));

        let errors = parse_case_file("readonly string;").unwrap_err();
        assert!(matches!(errors[0], ParseError::InvalidSyntax { .. }));
    }

    #[test]
    fn test_object_members() {
        let TypeExprKind::Object(props) = single_expr("{ readonly a?: 1; 'b c': 2, readonly: 3 }")
        else {
            panic!("expected object");
        };
        assert_eq!(props.len(), 3);
        assert!(props[0].readonly && props[0].optional);
        assert_eq!(props[1].name, "b c");
        assert_eq!(props[2].name, "readonly");
        assert!(!props[2].readonly);
    }

    #[test]
    fn test_negative_literals() {
        assert_eq!(single_expr("-1"), TypeExprKind::Number(-1.0));
        assert_eq!(single_expr("-5n"), TypeExprKind::BigInt("-5".to_string()));
    }

    #[test]
    fn test_semicolon_optional_before_item() {
        let file = parse("type A = 1\ntype B = A\nExpect<Equal<A, B>>");
        assert_eq!(file.items.len(), 3);
    }

    #[test]
    fn test_recovery_reports_every_item() {
        let errors = parse_case_file("type A = ;\ntype B = 1 2;\ntype C = 3;").unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].span().line, 1);
        assert_eq!(errors[1].span().line, 2);
    }

    #[test]
    fn test_generic_alias_rejected() {
        let errors = parse_case_file("type Id<T> = T;").unwrap_err();
        assert!(matches!(errors[0], ParseError::InvalidSyntax { .. }));
    }

    #[test]
    fn test_depth_limit() {
        let source = format!("{}1{}", "[".repeat(100), "]".repeat(100));
        let errors = parse_case_file(&source).unwrap_err();
        assert!(matches!(errors[0], ParseError::TooDeep { .. }));
    }

    #[test]
    fn test_depth_limit_on_readonly_chain() {
        let source = format!("type A = {}number[];", "readonly ".repeat(200_000));
        let errors = parse_case_file(&source).unwrap_err();
        assert!(matches!(errors[0], ParseError::TooDeep { limit: MAX_PARSE_DEPTH, .. }));
    }

    #[test]
    fn test_semicolon_required_within_a_line() {
        let errors = parse_case_file("type A = 1 Expect<A>").unwrap_err();
        assert!(matches!(errors[0], ParseError::UnexpectedToken { .. }));
    }
}
