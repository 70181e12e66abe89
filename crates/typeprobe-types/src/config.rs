//! Lattice configuration (`typeprobe.toml` contents)
//!
//! Configuration is accepted as an in-memory TOML string; reading the file is
//! the caller's business.

use serde::Deserialize;

use crate::error::TypeError;

/// Default ceiling for the number of alternatives an intersection may
/// distribute into.
pub const DEFAULT_MAX_UNION_SIZE: usize = 100_000;

/// Options that change lattice semantics
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProbeConfig {
    /// When false, `null` and `undefined` are assignable to every type
    pub strict_null_checks: bool,

    /// Largest union an intersection may distribute into
    pub max_union_size: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            strict_null_checks: true,
            max_union_size: DEFAULT_MAX_UNION_SIZE,
        }
    }
}

impl ProbeConfig {
    /// Parse a configuration from a TOML string
    ///
    /// Accepts either bare keys or a `[probe]` table.
    pub fn from_str(content: &str) -> Result<Self, TypeError> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Wrapped {
            probe: ProbeConfig,
        }

        let config = match toml::from_str::<Wrapped>(content) {
            Ok(wrapped) => wrapped.probe,
            Err(_) => toml::from_str::<ProbeConfig>(content).map_err(|e| {
                TypeError::InvalidConfig {
                    reason: e.message().to_string(),
                }
            })?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate option ranges
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.max_union_size < 2 {
            return Err(TypeError::InvalidConfig {
                reason: format!(
                    "max-union-size must be at least 2, got {}",
                    self.max_union_size
                ),
            });
        }
        Ok(())
    }
}
