//! Layered bot configuration.

use bgpbot_client::UpstreamConfig;
use bgpbot_commands::{CacheTable, DEFAULT_MAX_BLOCK_LEN, UnknownCommandPolicy};
use bgpbot_error::{BgpBotResult, ConfigError};
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../bgpbot.toml");

/// Blocks shorter than this cannot hold a fenced marker plus any text.
const MIN_BLOCK_LEN: usize = 16;

/// Outbound transport settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TransportConfig {
    /// Largest block sent in one message, in characters
    #[serde(default = "default_max_block_len")]
    max_block_len: usize,
}

fn default_max_block_len() -> usize {
    DEFAULT_MAX_BLOCK_LEN
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_block_len: DEFAULT_MAX_BLOCK_LEN,
        }
    }
}

/// Everything the bot reads at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct BotConfig {
    /// Prefix marking a message as a command
    #[serde(default = "default_alert_marker")]
    alert_marker: String,

    /// Reply policy for unknown keywords
    #[serde(default)]
    unknown_command: UnknownCommandPolicy,

    /// Data API endpoint
    #[serde(default)]
    upstream: UpstreamConfig,

    /// Messaging transport limits
    #[serde(default)]
    transport: TransportConfig,

    /// Per-command cache sizing
    #[serde(default)]
    cache: CacheTable,
}

fn default_alert_marker() -> String {
    "%".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            alert_marker: default_alert_marker(),
            unknown_command: UnknownCommandPolicy::default(),
            upstream: UpstreamConfig::default(),
            transport: TransportConfig::default(),
            cache: CacheTable::default(),
        }
    }
}

impl BotConfig {
    /// Load configuration with precedence (later sources override earlier):
    /// 1. Bundled defaults
    /// 2. `~/.config/bgpbot/bgpbot.toml`
    /// 3. `./bgpbot.toml`
    /// 4. `explicit`, if given (must exist)
    /// 5. `BGPBOT__*` environment variables, e.g. `BGPBOT__UPSTREAM__TIMEOUT_SECS`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a source cannot be read, parsed or
    /// fails validation.
    #[instrument(skip(explicit), fields(explicit = ?explicit))]
    pub fn load(explicit: Option<&Path>) -> BgpBotResult<Self> {
        debug!("Loading configuration");
        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/bgpbot/bgpbot.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }
        builder = builder.add_source(File::with_name("bgpbot").required(false));
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix("BGPBOT")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    /// Load bundled defaults overridden by a single file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read, parsed or
    /// fails validation.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> BgpBotResult<Self> {
        debug!("Loading configuration from file");
        Self::finish(Self::defaults().add_source(File::from(path.as_ref())))
    }

    /// Check values that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alert_marker.is_empty() {
            return Err(ConfigError::new("alert_marker must not be empty"));
        }
        if self.alert_marker.chars().any(char::is_whitespace) {
            return Err(ConfigError::new(format!(
                "alert_marker {:?} must not contain whitespace",
                self.alert_marker
            )));
        }
        if self.transport.max_block_len < MIN_BLOCK_LEN {
            return Err(ConfigError::new(format!(
                "transport.max_block_len must be at least {}, got {}",
                MIN_BLOCK_LEN, self.transport.max_block_len
            )));
        }
        if self.upstream.base_url().is_empty() {
            return Err(ConfigError::new("upstream.base_url must not be empty"));
        }
        Ok(())
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> BgpBotResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        debug!(
            alert_marker = %config.alert_marker,
            unknown_command = %config.unknown_command,
            base_url = %config.upstream.base_url(),
            "Configuration loaded"
        );
        Ok(config)
    }
}
