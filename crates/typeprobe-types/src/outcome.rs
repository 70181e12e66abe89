//! Relation outcomes
//!
//! A relation evaluated over the lattice does not always resolve to a single
//! boolean: distribution over a union can reach both branches, and
//! distribution over `never` reaches none. An [`Outcome`] records which
//! branches were reached.

use std::fmt;
use std::ops::Not;

use crate::context::TypeContext;
use crate::ty::{Type, TypeId};

/// The set of branches a relation reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// No branch: the question does not resolve to an answer at all
    Never,
    /// Only the true branch
    True,
    /// Only the false branch
    False,
    /// Both branches (`true | false`)
    Boolean,
}

impl Outcome {
    /// Strict outcome from a plain boolean
    pub const fn from_bool(value: bool) -> Self {
        if value {
            Outcome::True
        } else {
            Outcome::False
        }
    }

    /// Whether exactly one branch was reached
    pub const fn is_strict(self) -> bool {
        matches!(self, Outcome::True | Outcome::False)
    }

    /// The boolean value of a strict outcome
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Outcome::True => Some(true),
            Outcome::False => Some(false),
            Outcome::Never | Outcome::Boolean => None,
        }
    }

    /// Whether the true branch was reached
    pub const fn reaches_true(self) -> bool {
        matches!(self, Outcome::True | Outcome::Boolean)
    }

    /// Whether the false branch was reached
    pub const fn reaches_false(self) -> bool {
        matches!(self, Outcome::False | Outcome::Boolean)
    }

    /// Union of the branches reached by two evaluations
    pub const fn union(self, other: Outcome) -> Outcome {
        Self::from_branches(
            self.reaches_true() || other.reaches_true(),
            self.reaches_false() || other.reaches_false(),
        )
    }

    const fn from_branches(reaches_true: bool, reaches_false: bool) -> Outcome {
        match (reaches_true, reaches_false) {
            (false, false) => Outcome::Never,
            (true, false) => Outcome::True,
            (false, true) => Outcome::False,
            (true, true) => Outcome::Boolean,
        }
    }

    /// Lower the outcome into the lattice
    pub fn into_type(self, ctx: &TypeContext) -> TypeId {
        match self {
            Outcome::Never => ctx.never_type(),
            Outcome::True => ctx.boolean_literal(true),
            Outcome::False => ctx.boolean_literal(false),
            Outcome::Boolean => ctx.boolean_type(),
        }
    }

    /// Read an outcome back out of the lattice
    ///
    /// Returns `None` for types that are not boolean-valued.
    pub fn from_type(ctx: &TypeContext, ty: TypeId) -> Option<Outcome> {
        match ctx.get(ty)? {
            Type::Never => Some(Outcome::Never),
            _ if ty == TypeContext::TRUE => Some(Outcome::True),
            _ if ty == TypeContext::FALSE => Some(Outcome::False),
            _ if ty == TypeContext::BOOLEAN => Some(Outcome::Boolean),
            _ => None,
        }
    }
}

impl FromIterator<Outcome> for Outcome {
    /// Fold per-alternative outcomes of a distributed relation
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        iter.into_iter().fold(Outcome::Never, Outcome::union)
    }
}

impl From<bool> for Outcome {
    fn from(value: bool) -> Self {
        Outcome::from_bool(value)
    }
}

impl Not for Outcome {
    type Output = Outcome;

    /// Swap the branches; `never` and `boolean` are their own complement
    fn not(self) -> Outcome {
        match self {
            Outcome::True => Outcome::False,
            Outcome::False => Outcome::True,
            other => other,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Never => write!(f, "never"),
            Outcome::True => write!(f, "true"),
            Outcome::False => write!(f, "false"),
            Outcome::Boolean => write!(f, "boolean"),
        }
    }
}
