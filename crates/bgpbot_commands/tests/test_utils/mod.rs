//! Test utilities for bgpbot_commands tests.
//!
//! Provides a call-counting [`MockLookup`] and a recording [`RecordingSink`].

#![allow(dead_code)]

use async_trait::async_trait;
use bgpbot_client::{
    BgpLookup, GeoLocation, InvalidsByOrigin, Totals, UpstreamReply, Vrp, validate_prefix,
};
use bgpbot_commands::{CacheTable, CommandHandlers, LookupContext, ReplySink};
use bgpbot_error::{
    TransportError, TransportErrorKind, UpstreamError, UpstreamErrorKind, UpstreamResult,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Canned upstream with per-operation call counts.
///
/// Unconfigured operations answer "missing". Prefix operations reject
/// malformed addresses the same way the HTTP client does.
#[derive(Default)]
pub struct MockLookup {
    route: Option<UpstreamReply<String>>,
    origin: Option<UpstreamReply<u32>>,
    as_path: Option<UpstreamReply<Vec<u32>>>,
    roa: Option<UpstreamReply<String>>,
    as_name: Option<UpstreamReply<String>>,
    invalids: Option<UpstreamReply<InvalidsByOrigin>>,
    vrps: Option<UpstreamReply<Vec<Vrp>>>,
    sourced: Option<UpstreamReply<Vec<String>>>,
    totals: Option<UpstreamReply<Totals>>,
    geo_ip: Option<UpstreamReply<GeoLocation>>,
    failure: Option<UpstreamErrorKind>,
    failures_left: AtomicUsize,
    latency: Option<Duration>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, reply: UpstreamReply<String>) -> Self {
        self.route = Some(reply);
        self
    }

    pub fn with_origin(mut self, reply: UpstreamReply<u32>) -> Self {
        self.origin = Some(reply);
        self
    }

    pub fn with_as_path(mut self, reply: UpstreamReply<Vec<u32>>) -> Self {
        self.as_path = Some(reply);
        self
    }

    pub fn with_roa(mut self, reply: UpstreamReply<String>) -> Self {
        self.roa = Some(reply);
        self
    }

    pub fn with_as_name(mut self, reply: UpstreamReply<String>) -> Self {
        self.as_name = Some(reply);
        self
    }

    pub fn with_invalids(mut self, reply: UpstreamReply<InvalidsByOrigin>) -> Self {
        self.invalids = Some(reply);
        self
    }

    pub fn with_vrps(mut self, reply: UpstreamReply<Vec<Vrp>>) -> Self {
        self.vrps = Some(reply);
        self
    }

    pub fn with_sourced(mut self, reply: UpstreamReply<Vec<String>>) -> Self {
        self.sourced = Some(reply);
        self
    }

    pub fn with_totals(mut self, reply: UpstreamReply<Totals>) -> Self {
        self.totals = Some(reply);
        self
    }

    pub fn with_geo_ip(mut self, reply: UpstreamReply<GeoLocation>) -> Self {
        self.geo_ip = Some(reply);
        self
    }

    /// Every operation fails with `kind`.
    pub fn failing(self, kind: UpstreamErrorKind) -> Self {
        self.failing_first(kind, usize::MAX)
    }

    /// The first `times` calls fail with `kind`, later calls answer normally.
    pub fn failing_first(mut self, kind: UpstreamErrorKind, times: usize) -> Self {
        self.failure = Some(kind);
        self.failures_left = AtomicUsize::new(times);
        self
    }

    /// Each call sleeps for `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Calls made to one operation.
    pub fn call_count(&self, operation: &str) -> usize {
        self.calls.lock().get(operation).copied().unwrap_or(0)
    }

    /// Calls made to any operation.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    async fn answer<T: Clone>(
        &self,
        operation: &'static str,
        reply: &Option<UpstreamReply<T>>,
    ) -> UpstreamResult<UpstreamReply<T>> {
        *self.calls.lock().entry(operation).or_default() += 1;
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(kind) = &self.failure {
            let failed = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok();
            if failed {
                return Err(UpstreamError::new(kind.clone()));
            }
        }
        Ok(reply.clone().unwrap_or_else(UpstreamReply::missing))
    }

    async fn answer_prefix<T: Clone>(
        &self,
        operation: &'static str,
        prefix: &str,
        reply: &Option<UpstreamReply<T>>,
    ) -> UpstreamResult<UpstreamReply<T>> {
        validate_prefix(prefix)?;
        self.answer(operation, reply).await
    }
}

#[async_trait]
impl BgpLookup for MockLookup {
    async fn route(&self, prefix: &str) -> UpstreamResult<UpstreamReply<String>> {
        self.answer_prefix("route", prefix, &self.route).await
    }

    async fn origin(&self, prefix: &str) -> UpstreamResult<UpstreamReply<u32>> {
        self.answer_prefix("origin", prefix, &self.origin).await
    }

    async fn as_path(&self, prefix: &str) -> UpstreamResult<UpstreamReply<Vec<u32>>> {
        self.answer_prefix("as_path", prefix, &self.as_path).await
    }

    async fn roa(&self, prefix: &str) -> UpstreamResult<UpstreamReply<String>> {
        self.answer_prefix("roa", prefix, &self.roa).await
    }

    async fn as_name(&self, _asn: u32) -> UpstreamResult<UpstreamReply<String>> {
        self.answer("as_name", &self.as_name).await
    }

    async fn invalids(&self) -> UpstreamResult<UpstreamReply<InvalidsByOrigin>> {
        self.answer("invalids", &self.invalids).await
    }

    async fn vrps(&self, _asn: u32) -> UpstreamResult<UpstreamReply<Vec<Vrp>>> {
        self.answer("vrps", &self.vrps).await
    }

    async fn sourced(&self, _asn: u32) -> UpstreamResult<UpstreamReply<Vec<String>>> {
        self.answer("sourced", &self.sourced).await
    }

    async fn totals(&self) -> UpstreamResult<UpstreamReply<Totals>> {
        self.answer("totals", &self.totals).await
    }

    async fn geo_ip(&self, prefix: &str) -> UpstreamResult<UpstreamReply<GeoLocation>> {
        self.answer_prefix("geo_ip", prefix, &self.geo_ip).await
    }
}

/// Handlers over `mock` with the default cache table.
pub fn handlers_for(mock: Arc<MockLookup>) -> CommandHandlers {
    let context = LookupContext::new(mock, &CacheTable::default());
    CommandHandlers::new(Arc::new(context))
}

/// Sink that records every block it is asked to send.
pub struct RecordingSink {
    identity: Option<String>,
    max_block_len: usize,
    fail_sends: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    pub fn new(identity: &str) -> Self {
        Self {
            identity: Some(identity.to_string()),
            max_block_len: 2000,
            fail_sends: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_max_block_len(mut self, max_block_len: usize) -> Self {
        self.max_block_len = max_block_len;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    /// `(destination, block)` pairs in send order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl ReplySink for RecordingSink {
    fn own_identity(&self) -> Option<String> {
        self.identity.clone()
    }

    fn max_block_len(&self) -> usize {
        self.max_block_len
    }

    async fn send(&self, destination: &str, block: &str) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError::new(TransportErrorKind::MessageSendFailed(
                "channel closed".to_string(),
            )));
        }
        self.sent
            .lock()
            .push((destination.to_string(), block.to_string()));
        Ok(())
    }
}
