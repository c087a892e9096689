//! bgpbot - BGP and RPKI lookups from chat
//!
//! bgpbot answers short chat commands such as `%route 1.1.1.1` or
//! `%invalids 13335` with data from the read-only bgpstuff.net API. Replies
//! are classified (found, not found, failed), cached per command, and split
//! into blocks that fit the chat transport.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use bgpbot::{BotConfig, build_router, upstream_client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BotConfig::load(None)?;
//!     let router = build_router(&config, upstream_client(&config)?);
//!
//!     for block in router.dispatch("%totals").await.blocks() {
//!         println!("{}", block);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `discord` (default) - Discord gateway transport used by `bgpbot run`
//!
//! # Architecture
//!
//! - `bgpbot_error` - Error types
//! - `bgpbot_cache` - Per-command TTL + LRU response cache
//! - `bgpbot_client` - `BgpLookup` trait and the bgpstuff.net HTTP client
//! - `bgpbot_commands` - Validation, handlers, formatting and routing
//!
//! This crate adds configuration loading, tracing setup and the transport,
//! and re-exports the rest for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bootstrap;
mod config;
#[cfg(feature = "discord")]
mod discord;
mod telemetry;

pub use bootstrap::{build_router, upstream_client};
pub use config::{BotConfig, TransportConfig};
#[cfg(feature = "discord")]
pub use discord::{DISCORD_MAX_MESSAGE_LEN, DiscordBot, DiscordSink, RelayHandler};
pub use telemetry::init_tracing;

pub use bgpbot_cache::{CacheConfig, CacheConfigBuilder, CacheStats, ResponseCache};
pub use bgpbot_client::{
    BgpLookup, BgpStuffClient, GeoLocation, InvalidsByOrigin, Totals, UpstreamConfig,
    UpstreamReply, Vrp,
};
pub use bgpbot_commands::{
    CacheTable, ClassifiedResult, CommandHandlers, CommandKind, InboundEvent, LookupContext,
    Reply, ReplySink, ResultFormatter, Router, RouterState, Severity, UnknownCommandPolicy,
};
pub use bgpbot_error::{
    BgpBotError, BgpBotErrorKind, BgpBotResult, ConfigError, TransportError, TransportErrorKind,
    UpstreamError, UpstreamErrorKind,
};
