//! Shared lookup state built once at startup.

use crate::{
    CacheTable, ClassifiedResult, CommandError, CommandErrorKind, CommandKind, CommandResult,
};
use bgpbot_cache::ResponseCache;
use bgpbot_client::{BgpLookup, InvalidsByOrigin};
use std::collections::HashMap;
use std::sync::Arc;
use strum::IntoEnumIterator;

/// Upstream client plus one response cache per command.
///
/// This is the only shared mutable state in the command layer. It is built
/// explicitly and handed to [`CommandHandlers`](crate::CommandHandlers), so
/// tests can construct one around a stub client.
pub struct LookupContext {
    client: Arc<dyn BgpLookup>,
    caches: HashMap<CommandKind, ResponseCache<String, ClassifiedResult>>,
    invalids_bulk: ResponseCache<String, Arc<InvalidsByOrigin>>,
}

impl LookupContext {
    /// Build every cache from `table` around `client`.
    pub fn new(client: Arc<dyn BgpLookup>, table: &CacheTable) -> Self {
        let caches = CommandKind::iter()
            .map(|kind| {
                let cache = ResponseCache::new(kind.to_string(), table.for_command(kind));
                (kind, cache)
            })
            .collect();
        tracing::info!(commands = CommandKind::iter().count(), "Built lookup context");
        Self {
            client,
            caches,
            invalids_bulk: ResponseCache::new("invalids_bulk", table.invalids_bulk),
        }
    }

    /// The upstream client.
    pub fn client(&self) -> &dyn BgpLookup {
        self.client.as_ref()
    }

    /// The result cache for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandErrorKind::InternalInconsistency`] if no cache was
    /// built for the kind.
    pub fn cache(
        &self,
        kind: CommandKind,
    ) -> CommandResult<&ResponseCache<String, ClassifiedResult>> {
        self.caches.get(&kind).ok_or_else(|| {
            CommandError::new(CommandErrorKind::InternalInconsistency(format!(
                "no cache registered for {}",
                kind
            )))
        })
    }

    /// The cache holding the bulk invalids table.
    pub fn invalids_bulk(&self) -> &ResponseCache<String, Arc<InvalidsByOrigin>> {
        &self.invalids_bulk
    }
}
