//! typeprobe case-file checker
//!
//! Checks files of type aliases and relation invocations against the
//! typeprobe lattice, reporting every failed assertion with its location.
//!
//! This crate provides:
//! - A logos-based lexer and a recursive descent parser for case files
//! - Name resolution for keywords, aliases and relations
//! - Eager relation evaluation with located errors
//! - codespan diagnostics with stable error codes
//!
//! # Usage
//!
//! ```ignore
//! use typeprobe_checker::{check_source, render_errors};
//!
//! let source = "type T = Expect<Equal<1, 1>>;";
//! let result = check_source(source);
//! if !result.is_ok() {
//!     eprint!("{}", render_errors("cases.ts", source, &result.errors)?);
//! }
//! ```

#![warn(missing_docs)]

pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;
pub mod error;
pub mod checker;
pub mod diagnostic;

// Re-export main types
pub use token::{Span, Token};
pub use lexer::{LexError, Lexer};
pub use ast::{CaseFile, Item, TypeAlias, TypeExpr, TypeExprKind};
pub use parser::{parse_case_file, ParseError, Parser};
pub use error::CheckError;
pub use checker::{check_source, check_source_with_config, CaseChecker, CheckResult};
pub use diagnostic::{create_files, error_code, render_errors, Diagnostic, ErrorCode};
