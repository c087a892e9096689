//! Request/response cycle from a chat line to sent blocks.

use crate::{ClassifiedResult, CommandHandlers, CommandKind, ResultFormatter, help_text};
use async_trait::async_trait;
use bgpbot_error::TransportError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error, info, instrument};

/// A chat message as seen by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Identity of the author
    pub sender: String,
    /// Where replies go (channel id)
    pub destination: String,
    /// Raw message text
    pub content: String,
}

impl InboundEvent {
    /// Create an event.
    pub fn new(
        sender: impl Into<String>,
        destination: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            destination: destination.into(),
            content: content.into(),
        }
    }
}

/// Outbound side of a messaging transport.
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// The bot's own identity; events from it are ignored.
    fn own_identity(&self) -> Option<String>;

    /// Largest block the transport accepts, in characters.
    fn max_block_len(&self) -> usize;

    /// Deliver one block to `destination`.
    async fn send(&self, destination: &str, block: &str) -> Result<(), TransportError>;
}

/// What the router decided for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Not addressed to the bot, self-authored, or an ignored keyword.
    Ignored,
    /// Help text blocks.
    Help(Vec<String>),
    /// Formatted answer to a recognized command.
    Answer {
        /// The command that was resolved
        command: CommandKind,
        /// Blocks in send order
        blocks: Vec<String>,
    },
}

impl Reply {
    /// Blocks to send, in order. Empty for [`Reply::Ignored`].
    pub fn blocks(&self) -> &[String] {
        match self {
            Reply::Ignored => &[],
            Reply::Help(blocks) | Reply::Answer { blocks, .. } => blocks,
        }
    }
}

/// How to answer a keyword that is not in the command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UnknownCommandPolicy {
    /// Stay silent.
    #[default]
    Ignore,
    /// Reply with the help text.
    Help,
}

/// Whether the router is resolving anything right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum RouterState {
    /// Waiting for input
    Idle,
    /// Resolving at least one command
    Dispatching,
}

type SendLock = Arc<tokio::sync::Mutex<()>>;

/// Maps alert-marked lines to command handlers.
///
/// Each event is resolved independently; the router keeps no per-command
/// state besides an in-flight count and one send lock per destination, which
/// keeps the blocks of one reply together. Handlers are never retried.
pub struct Router {
    alert_marker: String,
    unknown_policy: UnknownCommandPolicy,
    handlers: CommandHandlers,
    formatter: ResultFormatter,
    in_flight: AtomicUsize,
    send_locks: Mutex<HashMap<String, SendLock>>,
}

impl Router {
    /// Router answering lines that start with `alert_marker`.
    pub fn new(handlers: CommandHandlers, alert_marker: impl Into<String>) -> Self {
        Self {
            alert_marker: alert_marker.into(),
            unknown_policy: UnknownCommandPolicy::default(),
            handlers,
            formatter: ResultFormatter::default(),
            in_flight: AtomicUsize::new(0),
            send_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Set the unknown keyword policy.
    pub fn with_unknown_policy(mut self, policy: UnknownCommandPolicy) -> Self {
        self.unknown_policy = policy;
        self
    }

    /// Set the formatter used by [`dispatch`](Self::dispatch).
    pub fn with_formatter(mut self, formatter: ResultFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// The alert marker.
    pub fn alert_marker(&self) -> &str {
        &self.alert_marker
    }

    /// The unknown keyword policy.
    pub fn unknown_policy(&self) -> UnknownCommandPolicy {
        self.unknown_policy
    }

    /// Current state.
    pub fn state(&self) -> RouterState {
        if self.in_flight.load(Ordering::SeqCst) == 0 {
            RouterState::Idle
        } else {
            RouterState::Dispatching
        }
    }

    /// Resolve one line to a reply without sending anything.
    pub async fn dispatch(&self, line: &str) -> Reply {
        self.dispatch_with(line, self.formatter).await
    }

    /// Resolve `event` and send every block to its destination.
    ///
    /// # Errors
    ///
    /// Returns the first transport failure; later blocks of the same reply
    /// are not sent.
    #[instrument(
        skip(self, event, sink),
        fields(destination = %event.destination, sender = %event.sender)
    )]
    pub async fn handle(
        &self,
        event: &InboundEvent,
        sink: &dyn ReplySink,
    ) -> Result<Reply, TransportError> {
        if sink.own_identity().as_deref() == Some(event.sender.as_str()) {
            debug!("Ignoring self-authored event");
            return Ok(Reply::Ignored);
        }

        let max_block_len = sink.max_block_len().min(self.formatter.max_block_len());
        let formatter = ResultFormatter::new(max_block_len)
            .capped_at(self.formatter.lines_per_block());
        let reply = self.dispatch_with(&event.content, formatter).await;
        if reply.blocks().is_empty() {
            return Ok(reply);
        }

        let claim = SendClaim::acquire(self, &event.destination);
        let _guard = claim.lock().await;
        for block in reply.blocks() {
            if let Err(e) = sink.send(&event.destination, block).await {
                error!(error = %e, "Failed to send reply block");
                return Err(e);
            }
        }
        debug!(blocks = reply.blocks().len(), "Reply sent");
        Ok(reply)
    }

    async fn dispatch_with(&self, line: &str, formatter: ResultFormatter) -> Reply {
        let Some(request) = line.strip_prefix(self.alert_marker.as_str()) else {
            return Reply::Ignored;
        };

        let _in_flight = InFlight::enter(&self.in_flight);
        let mut tokens = request.split_whitespace();
        let Some(keyword) = tokens.next() else {
            debug!("Bare alert marker, sending help");
            return self.help(formatter);
        };
        if keyword.eq_ignore_ascii_case("help") {
            return self.help(formatter);
        }

        let Some(kind) = CommandKind::from_keyword(keyword) else {
            debug!(keyword, policy = %self.unknown_policy, "Unknown command keyword");
            return match self.unknown_policy {
                UnknownCommandPolicy::Ignore => Reply::Ignored,
                UnknownCommandPolicy::Help => self.help(formatter),
            };
        };

        let args: Vec<&str> = tokens.collect();
        if args.len() < kind.command().arity() {
            debug!(command = %kind, "Missing argument, sending help");
            return self.help(formatter);
        }

        info!(command = %kind, args = ?args, "Dispatching command");
        let result = self.handlers.handle(kind, &args).await;
        Reply::Answer {
            command: kind,
            blocks: formatter.format(&result),
        }
    }

    fn help(&self, formatter: ResultFormatter) -> Reply {
        Reply::Help(formatter.format(&ClassifiedResult::plain(help_text(&self.alert_marker))))
    }

    /// Destinations with a reply currently being sent or waiting to be sent.
    pub fn busy_destinations(&self) -> usize {
        self.send_locks.lock().len()
    }
}

/// Claim on one destination's send lock.
///
/// The map entry is removed by whichever claim drops last.
struct SendClaim<'a> {
    router: &'a Router,
    destination: String,
    lock: SendLock,
}

impl<'a> SendClaim<'a> {
    fn acquire(router: &'a Router, destination: &str) -> Self {
        let lock = router
            .send_locks
            .lock()
            .entry(destination.to_string())
            .or_default()
            .clone();
        Self {
            router,
            destination: destination.to_string(),
            lock,
        }
    }

    async fn lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for SendClaim<'_> {
    fn drop(&mut self) {
        let mut locks = self.router.send_locks.lock();
        // One reference is held by the map, one by this claim.
        if Arc::strong_count(&self.lock) <= 2
            && locks
                .get(&self.destination)
                .is_some_and(|current| Arc::ptr_eq(current, &self.lock))
        {
            locks.remove(&self.destination);
        }
    }
}

/// Counts a dispatch for as long as it lives.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
