//! Type lattice and relation errors

use thiserror::Error;

/// Errors raised while building types or evaluating relations
///
/// Relation hazards (`never` or `boolean` results from `Extends` and
/// `SimpleEqual`) are values, not errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TypeError {
    /// A single-case assertion received something other than its literal
    #[error("Type '{actual}' does not satisfy the constraint '{expected}'")]
    AssertionFailed {
        /// The literal the assertion requires (`true` or `false`)
        expected: String,
        /// The offending argument
        actual: String,
    },

    /// A batch aggregator received a sequence that is not all target literals
    #[error("Type '{actual}' does not satisfy the constraint '{expected}'")]
    AggregateAssertionFailed {
        /// The required sequence shape (`readonly true[]` or `readonly false[]`)
        expected: String,
        /// The whole offending sequence
        actual: String,
    },

    /// Invalid type argument count
    #[error("Generic type '{name}' requires {expected} type argument(s), got {actual}")]
    InvalidTypeArgCount {
        /// Relation name
        name: String,
        /// Expected count
        expected: usize,
        /// Actual count
        actual: usize,
    },

    /// A literal value that has no literal type
    #[error("Invalid literal type: {reason}")]
    InvalidLiteral {
        /// Reason for invalidity
        reason: String,
    },

    /// An object shape declared the same property twice
    #[error("Duplicate property '{name}' in object type")]
    DuplicateProperty {
        /// Property name
        name: String,
    },

    /// Distributing an intersection would produce an oversized union
    #[error("Expression produces a union type that is too complex to represent ({size} > {limit})")]
    UnionTooComplex {
        /// Number of alternatives the distribution would produce
        size: usize,
        /// Configured limit
        limit: usize,
    },

    /// Configuration could not be parsed or failed validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Reason for rejection
        reason: String,
    },
}
