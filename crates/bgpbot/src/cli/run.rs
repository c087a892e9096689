//! Command handlers for the bgpbot binary.

use bgpbot::{BgpBotResult, BotConfig, Reply, build_router, upstream_client};
use tracing::{info, instrument};

/// Resolve one command line against the live upstream and print the blocks.
#[instrument(skip(config))]
pub async fn run_query(config: &BotConfig, line: &str) -> BgpBotResult<()> {
    let router = build_router(config, upstream_client(config)?);

    let line = line.trim();
    let line = if line.starts_with(config.alert_marker().as_str()) {
        line.to_string()
    } else {
        format!("{}{}", config.alert_marker(), line)
    };

    match router.dispatch(&line).await {
        Reply::Ignored => {
            info!("Unknown command ignored; set unknown_command = \"help\" to list commands");
        }
        reply => {
            for block in reply.blocks() {
                println!("{}", block);
            }
        }
    }
    Ok(())
}

/// Connect to Discord and relay commands until the connection ends.
#[cfg(feature = "discord")]
#[instrument(skip(config))]
pub async fn run_bot(config: &BotConfig) -> BgpBotResult<()> {
    use bgpbot::{ConfigError, DiscordBot};
    use std::sync::Arc;

    let token = std::env::var("DISCORD_TOKEN")
        .map_err(|_| ConfigError::new("DISCORD_TOKEN is not set"))?;

    let router = Arc::new(build_router(config, upstream_client(config)?));
    let mut bot = DiscordBot::new(&token, router, *config.transport().max_block_len()).await?;
    bot.start().await?;
    Ok(())
}
