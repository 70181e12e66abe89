//! Relations over the type lattice
//!
//! Each relation is a free function over a [`TypeContext`](crate::TypeContext)
//! returning an [`Outcome`](crate::Outcome). Only [`equal`] and [`not_equal`]
//! (and everything built on them) are guaranteed to be strict; [`extends`] and
//! [`simple_equal`] distribute over unions and may yield `never` or `boolean`.

pub mod assert;
pub mod cases;
pub mod equal;
pub mod extends;
pub mod predicates;

pub use assert::{assertion_constraint, expect, expect_false};
pub use cases::{cases_constraint, false_cases, false_cases_of, fold_cases, true_cases, true_cases_of};
pub use equal::{equal, not_equal, simple_equal, InvariantProbe};
pub use extends::extends;
pub use predicates::{is_any, is_never, is_tuple, is_union, is_unknown};
