//! Cache sizing and lifetime configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one response cache.
///
/// # Example
///
/// ```
/// use bgpbot_cache::CacheConfigBuilder;
///
/// let config = CacheConfigBuilder::default()
///     .capacity(20)
///     .ttl_secs(60)
///     .build()
///     .unwrap();
/// assert_eq!(config.ttl().as_secs(), 60);
///
/// // A cache must be able to hold at least one entry.
/// assert!(CacheConfigBuilder::default().capacity(0).build().is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(build_fn(validate = "Self::validate"))]
pub struct CacheConfig {
    /// Maximum number of entries kept before LRU eviction
    #[serde(default = "default_capacity")]
    #[builder(default = "default_capacity()")]
    capacity: usize,

    /// Time-to-live, written as whole seconds (`ttl_secs`); zero disables
    /// caching
    #[serde(rename = "ttl_secs", with = "ttl_secs", default = "default_ttl")]
    #[builder(default = "default_ttl()")]
    #[getter(skip)]
    ttl: Duration,
}

fn default_capacity() -> usize {
    20
}

fn default_ttl() -> Duration {
    Duration::from_secs(60)
}

mod ttl_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        // A partial second rounds up so a nonzero TTL never reads back as zero.
        let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
        serializer.serialize_u64(secs)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

impl CacheConfig {
    /// Create a configuration from capacity and TTL.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self { capacity, ttl }
    }

    /// Time-to-live of each entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether entries are stored at all.
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }
}

impl CacheConfigBuilder {
    /// Set the TTL in whole seconds, as written in config files.
    pub fn ttl_secs(&mut self, secs: u64) -> &mut Self {
        self.ttl(Duration::from_secs(secs))
    }

    fn validate(&self) -> Result<(), String> {
        if self.capacity == Some(0) {
            return Err("capacity must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            ttl: default_ttl(),
        }
    }
}
