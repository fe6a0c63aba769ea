//! Configuration for building an [`LruMap`](crate::LruMap) and for log output.
//!
//! A map is configured with an optional maximum entry count. The bound may be
//! given in code or loaded from TOML:
//!
//! ```toml
//! maximum_size = 512
//! ```
//!
//! Omitting `maximum_size` yields an unbounded map. A bound of `0` is rejected
//! rather than interpreted as "always empty".

use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, Result};

/// Construction settings for an [`LruMap`](crate::LruMap).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LruMapConfig {
    /// Upper bound on the number of entries. `None` means unbounded.
    pub maximum_size: Option<usize>,
}

impl LruMapConfig {
    /// Configuration for a map without an entry bound.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { maximum_size: None }
    }

    /// Configuration for a map holding at most `maximum_size` entries.
    #[must_use]
    pub const fn bounded(maximum_size: usize) -> Self {
        Self {
            maximum_size: Some(maximum_size),
        }
    }

    /// Check the bound and return it in the form the map stores.
    pub fn validate(&self) -> std::result::Result<Option<NonZeroUsize>, ConfigError> {
        match self.maximum_size {
            None => Ok(None),
            Some(value) => match NonZeroUsize::new(value) {
                Some(bound) => Ok(Some(bound)),
                None => {
                    warn!(maximum_size = value, "Rejected non-positive maximum size");
                    Err(ConfigError::InvalidMaximumSize { value })
                }
            },
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, colored output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!(
                "unknown log format: {s}. Expected one of: pretty, json"
            )),
        }
    }
}
