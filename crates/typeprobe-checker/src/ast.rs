//! Syntax tree of a case file

use crate::token::Span;

/// A parsed case file
#[derive(Debug, Clone, PartialEq)]
pub struct CaseFile {
    /// Items in source order
    pub items: Vec<Item>,
}

/// Top-level item
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// `type Name = ...;`
    Alias(TypeAlias),
    /// A bare type expression, evaluated for its errors and value
    Expr(TypeExpr),
}

impl Item {
    /// Get the span of this item
    pub fn span(&self) -> Span {
        match self {
            Item::Alias(alias) => alias.span,
            Item::Expr(expr) => expr.span,
        }
    }
}

/// Type alias declaration
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    /// Alias name
    pub name: String,
    /// Span of the name alone
    pub name_span: Span,
    /// Declared with `export`
    pub exported: bool,
    /// Right-hand side
    pub value: TypeExpr,
    /// Whole declaration, `export` through the value
    pub span: Span,
}

/// Type expression with its location
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    /// What the expression is
    pub kind: TypeExprKind,
    /// Where it is
    pub span: Span,
}

/// Type expression kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExprKind {
    /// Keyword, alias or relation invocation: `never`, `Cases`, `Equal<A, B>`
    Named {
        /// Name as written
        name: String,
        /// Type arguments, empty without `<...>`
        args: Vec<TypeExpr>,
    },
    /// Number literal (sign folded in)
    Number(f64),
    /// Bigint literal digits with optional leading `-`
    BigInt(String),
    /// String literal
    String(String),
    /// `A | B | ...`
    Union(Vec<TypeExpr>),
    /// `A & B & ...`
    Intersection(Vec<TypeExpr>),
    /// `T[]` / `readonly T[]`
    Array {
        /// Element type
        element: Box<TypeExpr>,
        /// Prefixed with `readonly`
        readonly: bool,
    },
    /// `[A, B]` / `readonly [A, B]`
    Tuple {
        /// Element types, in order
        elements: Vec<TypeExpr>,
        /// Prefixed with `readonly`
        readonly: bool,
    },
    /// `{ a: A; readonly b?: B }`
    Object(Vec<PropertyExpr>),
}

/// Property of an object type expression
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyExpr {
    /// Property name, unquoted
    pub name: String,
    /// Declared type
    pub ty: TypeExpr,
    /// Declared with `?`
    pub optional: bool,
    /// Declared with `readonly`
    pub readonly: bool,
    /// Whole member
    pub span: Span,
}
