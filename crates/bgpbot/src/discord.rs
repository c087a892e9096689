//! Discord transport over serenity.
//!
//! [`RelayHandler`] forwards every gateway message to the [`Router`];
//! [`DiscordSink`] delivers reply blocks to the originating channel.

use async_trait::async_trait;
use bgpbot_commands::{InboundEvent, Reply, ReplySink, Router};
use bgpbot_error::{TransportError, TransportErrorKind};
use serenity::Client;
use serenity::all::{ChannelId, Http, Message, Ready, UserId};
use serenity::client::{Context, EventHandler};
use serenity::model::gateway::GatewayIntents;
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info, instrument, warn};

/// Longest message Discord accepts, in characters.
pub const DISCORD_MAX_MESSAGE_LEN: usize = 2000;

/// Sends blocks to Discord channels.
pub struct DiscordSink {
    http: Arc<Http>,
    own_id: Option<UserId>,
    max_block_len: usize,
}

impl DiscordSink {
    /// Sink over `http`; `own_id` is the bot's user, once known.
    pub fn new(http: Arc<Http>, own_id: Option<UserId>) -> Self {
        Self {
            http,
            own_id,
            max_block_len: DISCORD_MAX_MESSAGE_LEN,
        }
    }

    /// Lower the block ceiling below Discord's own limit.
    pub fn with_max_block_len(mut self, max_block_len: usize) -> Self {
        self.max_block_len = max_block_len.min(DISCORD_MAX_MESSAGE_LEN);
        self
    }
}

#[async_trait]
impl ReplySink for DiscordSink {
    fn own_identity(&self) -> Option<String> {
        self.own_id.map(|id| id.to_string())
    }

    fn max_block_len(&self) -> usize {
        self.max_block_len
    }

    async fn send(&self, destination: &str, block: &str) -> Result<(), TransportError> {
        let channel = destination
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .map(ChannelId::new)
            .ok_or_else(|| {
                TransportError::new(TransportErrorKind::InvalidDestination(
                    destination.to_string(),
                ))
            })?;

        channel.say(self.http.as_ref(), block).await.map_err(|e| {
            TransportError::new(TransportErrorKind::MessageSendFailed(format!(
                "channel {}: {}",
                destination, e
            )))
        })?;
        Ok(())
    }
}

/// Serenity event handler relaying messages through the router.
pub struct RelayHandler {
    router: Arc<Router>,
    max_block_len: usize,
    own_id: OnceLock<UserId>,
}

impl RelayHandler {
    /// Handler dispatching through `router`, sending blocks of at most
    /// `max_block_len` characters.
    pub fn new(router: Arc<Router>, max_block_len: usize) -> Self {
        Self {
            router,
            max_block_len,
            own_id: OnceLock::new(),
        }
    }

    /// Gateway intents the bot needs to read commands.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }
}

#[serenity::async_trait]
impl EventHandler for RelayHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, user_id = %ready.user.id, "Connected to Discord");
        if self.own_id.set(ready.user.id).is_err() {
            debug!("Bot identity already recorded");
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if !msg.content.starts_with(self.router.alert_marker()) {
            return;
        }

        let sink = DiscordSink::new(ctx.http.clone(), self.own_id.get().copied())
            .with_max_block_len(self.max_block_len);
        let event = InboundEvent::new(
            msg.author.id.to_string(),
            msg.channel_id.to_string(),
            msg.content.clone(),
        );

        match self.router.handle(&event, &sink).await {
            Ok(Reply::Answer { command, blocks }) => {
                debug!(%command, blocks = blocks.len(), "Answered command");
            }
            Ok(_) => {}
            Err(e) => error!(error = %e, channel = %msg.channel_id, "Failed to deliver reply"),
        }
    }
}

/// Discord client running the relay.
pub struct DiscordBot {
    client: Client,
}

impl DiscordBot {
    /// Connect-ready client for `token`.
    ///
    /// # Errors
    ///
    /// Returns a connection error if serenity rejects the token or fails to
    /// build the client.
    #[instrument(skip(token, router), fields(token_len = token.len()))]
    pub async fn new(
        token: &str,
        router: Arc<Router>,
        max_block_len: usize,
    ) -> Result<Self, TransportError> {
        info!("Building Discord client");
        let handler = RelayHandler::new(router, max_block_len);
        let client = Client::builder(token, RelayHandler::intents())
            .event_handler(handler)
            .await
            .map_err(|e| {
                TransportError::new(TransportErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;
        Ok(Self { client })
    }

    /// Run until the gateway connection ends.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the client stops with a fatal error.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<(), TransportError> {
        info!("Starting Discord gateway connection");
        self.client.start().await.map_err(|e| {
            warn!(error = %e, "Discord client stopped");
            TransportError::new(TransportErrorKind::ConnectionFailed(format!(
                "Client error: {}",
                e
            )))
        })
    }
}
