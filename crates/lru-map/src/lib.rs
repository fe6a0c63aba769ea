//! lru-map: a bounded, recency-ordered associative container.
//!
//! [`LruMap`] pairs a hash index with an explicit most-recently-used →
//! least-recently-used ordering and evicts from the LRU end whenever the
//! configured maximum size would be exceeded.
//!
//! # Modules
//!
//! - `lru_map`: the map engine and its statistics
//! - `iter`: non-promoting iterators over entries, keys and values
//! - `config`: construction and logging configuration (TOML/serde)
//! - `error`: error types
//! - `logging`: `tracing` subscriber setup for embedding binaries and tests
//!
//! # Safety
//!
//! This crate forbids unsafe code.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod iter;
pub mod logging;
pub mod lru_map;

pub use config::{LogFormat, LruMapConfig};
pub use error::{ConfigError, Error, Result};
pub use lru_map::{LruMap, MapStats};
