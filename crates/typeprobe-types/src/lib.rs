//! typeprobe type lattice
//!
//! Type representation, normalization and the relations used to test
//! type-level computations: category predicates, `Extends`, `Equal`,
//! `SimpleEqual`, single-case assertions and batch aggregators.

#![warn(missing_docs)]

pub mod ty;
pub mod context;
pub mod config;
pub mod error;
pub mod assignability;
pub mod normalize;
pub mod outcome;
pub mod relations;
pub mod catalog;

pub use ty::{Literal, PrimitiveType, PropertySignature, Type, TypeId};
pub use context::TypeContext;
pub use config::ProbeConfig;
pub use error::TypeError;
pub use assignability::AssignabilityContext;
pub use outcome::Outcome;
pub use catalog::{Declaration, DeclarationKind};

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize a tracing subscriber writing through the test harness
    ///
    /// Honors `RUST_LOG`, defaulting to `debug`.
    pub fn init_test_logging() {
        use tracing_subscriber::{fmt, EnvFilter};

        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
