//! Command result caching with TTL and LRU eviction.
//!
//! This crate provides the caching layer that sits in front of every upstream
//! lookup, so that repeated chat commands do not repeat API calls.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod config;

pub use cache::{CacheEntry, CacheStats, ResponseCache};
pub use config::{CacheConfig, CacheConfigBuilder, CacheConfigBuilderError};
