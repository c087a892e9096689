//! Command resolution and response caching for bgpbot.
//!
//! A chat line such as `%route 1.1.1.1` flows through this crate as follows:
//! - [`Router`] recognizes the alert marker and splits keyword and arguments
//! - [`validate`] normalizes the argument for the command's [`ArgumentKind`]
//! - [`CommandHandlers`] looks the answer up through the command's
//!   [`ResponseCache`](bgpbot_cache::ResponseCache), calling the upstream
//!   [`BgpLookup`](bgpbot_client::BgpLookup) only on a miss
//! - [`ResultFormatter`] turns the [`ClassifiedResult`] into chat-sized blocks
//!
//! All shared state lives in a [`LookupContext`] built once at startup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod config;
mod context;
mod error;
mod formatter;
mod handlers;
mod result;
mod router;
mod validator;

pub use command::{Command, CommandKind, help_text};
pub use config::CacheTable;
pub use context::LookupContext;
pub use error::{CommandError, CommandErrorKind, CommandResult};
pub use formatter::{DEFAULT_MAX_BLOCK_LEN, LINES_PER_BLOCK, ResultFormatter, decorate};
pub use handlers::{CommandHandlers, INTERNAL_ERROR, UPSTREAM_UNAVAILABLE};
pub use result::{ClassifiedResult, Severity};
pub use router::{InboundEvent, Reply, ReplySink, Router, RouterState, UnknownCommandPolicy};
pub use validator::{Argument, ArgumentKind, cache_key, is_public_asn, validate};
