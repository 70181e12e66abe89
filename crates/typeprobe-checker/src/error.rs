//! Error types for checking case files
//!
//! Every error carries the span it is reported at, so a whole file can be
//! checked in one pass and each failure located.

use thiserror::Error;
use typeprobe_types::TypeError;

use crate::parser::ParseError;
use crate::token::Span;

/// Errors that can occur while checking a case file
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CheckError {
    /// Lexer or parser error
    #[error("{message}")]
    Syntax {
        /// Error message
        message: String,
        /// Location of the offending token
        span: Span,
    },

    /// Wrong number of type arguments
    #[error("Generic type '{name}' requires {expected} type argument(s), got {actual}")]
    ArityMismatch {
        /// Invoked name
        name: String,
        /// Declared arity (0 for keywords and aliases)
        expected: usize,
        /// Arguments given
        actual: usize,
        /// Location of the invocation
        span: Span,
    },

    /// Name that is neither a keyword, an alias nor a relation
    #[error("Cannot find name '{name}'")]
    UndefinedName {
        /// The unresolved name
        name: String,
        /// Location where it was referenced
        span: Span,
    },

    /// Alias declared more than once
    #[error("Duplicate identifier '{name}'")]
    DuplicateAlias {
        /// Alias name
        name: String,
        /// Location of the duplicate declaration
        span: Span,
        /// Location of the first declaration
        original: Span,
    },

    /// `Expect` / `ExpectFalse` argument is not its literal
    #[error("Type '{actual}' does not satisfy the constraint '{expected}'")]
    Assertion {
        /// Required literal
        expected: String,
        /// Offending argument
        actual: String,
        /// Location of the argument
        span: Span,
    },

    /// `TrueCases` / `FalseCases` argument is not all target literals
    #[error("Type '{actual}' does not satisfy the constraint '{expected}'")]
    AggregateAssertion {
        /// Required sequence shape
        expected: String,
        /// The whole offending sequence
        actual: String,
        /// Location of the argument
        span: Span,
    },

    /// Any other lattice error
    #[error("{error}")]
    Type {
        /// Underlying error
        error: TypeError,
        /// Location of the expression that raised it
        span: Span,
    },
}

impl CheckError {
    /// Get the span associated with this error
    pub fn span(&self) -> Span {
        match self {
            CheckError::Syntax { span, .. } => *span,
            CheckError::ArityMismatch { span, .. } => *span,
            CheckError::UndefinedName { span, .. } => *span,
            CheckError::DuplicateAlias { span, .. } => *span,
            CheckError::Assertion { span, .. } => *span,
            CheckError::AggregateAssertion { span, .. } => *span,
            CheckError::Type { span, .. } => *span,
        }
    }

    /// Locate a lattice error, keeping assertion failures distinct
    pub fn from_type_error(error: TypeError, span: Span) -> Self {
        match error {
            TypeError::AssertionFailed { expected, actual } => CheckError::Assertion {
                expected,
                actual,
                span,
            },
            TypeError::AggregateAssertionFailed { expected, actual } => {
                CheckError::AggregateAssertion {
                    expected,
                    actual,
                    span,
                }
            }
            TypeError::InvalidTypeArgCount {
                name,
                expected,
                actual,
            } => CheckError::ArityMismatch {
                name,
                expected,
                actual,
                span,
            },
            error => CheckError::Type { error, span },
        }
    }
}

impl From<ParseError> for CheckError {
    fn from(error: ParseError) -> Self {
        CheckError::Syntax {
            message: error.to_string(),
            span: error.span(),
        }
    }
}
