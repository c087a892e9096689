//! Wiring configuration into a ready router.

use crate::BotConfig;
use bgpbot_client::{BgpLookup, BgpStuffClient};
use bgpbot_commands::{CommandHandlers, LookupContext, ResultFormatter, Router};
use bgpbot_error::BgpBotResult;
use std::sync::Arc;
use tracing::{info, instrument};

/// Build the HTTP upstream client from configuration.
///
/// # Errors
///
/// Returns an upstream error if the HTTP client cannot be created.
pub fn upstream_client(config: &BotConfig) -> BgpBotResult<Arc<dyn BgpLookup>> {
    let client = BgpStuffClient::new(config.upstream().clone())?;
    Ok(Arc::new(client))
}

/// Build the router: one cache per command around `client`.
#[instrument(skip_all, fields(alert_marker = %config.alert_marker()))]
pub fn build_router(config: &BotConfig, client: Arc<dyn BgpLookup>) -> Router {
    let context = LookupContext::new(client, config.cache());
    let handlers = CommandHandlers::new(Arc::new(context));
    info!(
        unknown_command = %config.unknown_command(),
        max_block_len = config.transport().max_block_len(),
        "Router ready"
    );
    Router::new(handlers, config.alert_marker().clone())
        .with_unknown_policy(*config.unknown_command())
        .with_formatter(ResultFormatter::new(*config.transport().max_block_len()))
}
