//! Error types for lru-map

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the library's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for lru-map
///
/// Lookups and removals of absent keys are not errors; they return `None`.
/// A failing `try_put_if_absent` callback hands back the caller's own error.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A maximum size of zero was requested
    #[error("invalid maximum size {value}: expected a positive entry count or no bound")]
    InvalidMaximumSize { value: usize },

    /// TOML could not be parsed into a configuration
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file could not be read
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
