//! Upstream endpoint configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where and how to reach the data API.
///
/// ```toml
/// [upstream]
/// base_url = "https://bgpstuff.net"
/// timeout_secs = 10
/// max_retries = 2
/// retry_backoff_ms = 250
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct UpstreamConfig {
    /// API base URL, without trailing slash
    #[serde(default = "default_base_url")]
    base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,

    /// Extra attempts after a transport failure or timeout
    #[serde(default = "default_max_retries")]
    max_retries: usize,

    /// Initial backoff between attempts in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    retry_backoff_ms: u64,
}

fn default_base_url() -> String {
    "https://bgpstuff.net".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> usize {
    2
}

fn default_retry_backoff_ms() -> u64 {
    250
}

impl UpstreamConfig {
    /// Configuration pointing at a different base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}
