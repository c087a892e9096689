//! HTTP implementation of [`BgpLookup`] against bgpstuff.net.

use crate::payload::{
    AsNameData, AsPathData, Envelope, GeoIpData, InvalidsData, OriginData, RoaData, RouteData,
    SourcedData, VrpsData,
};
use crate::{
    BgpLookup, GeoLocation, InvalidsByOrigin, Totals, UpstreamConfig, UpstreamReply, Vrp,
    validate_prefix,
};
use async_trait::async_trait;
use bgpbot_error::{UpstreamError, UpstreamErrorKind, UpstreamResult};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

/// bgpstuff.net client.
///
/// Every request is bounded by the configured timeout. Transport failures and
/// timeouts are retried with exponential backoff and jitter; a non-200 status
/// is returned to the caller as-is inside the [`UpstreamReply`].
#[derive(Debug, Clone)]
pub struct BgpStuffClient {
    config: UpstreamConfig,
    http: reqwest::Client,
}

impl BgpStuffClient {
    /// Create a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built.
    #[instrument(skip(config), fields(base_url = %config.base_url()))]
    pub fn new(config: UpstreamConfig) -> UpstreamResult<Self> {
        debug!("Creating bgpstuff client");
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("bgpbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                UpstreamError::new(UpstreamErrorKind::Transport(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;
        Ok(Self { config, http })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// GET `path` and decode the envelope, retrying transient failures.
    #[instrument(skip(self), fields(base_url = %self.config.base_url()))]
    async fn fetch<D>(&self, path: &str) -> UpstreamResult<UpstreamReply<D>>
    where
        D: DeserializeOwned,
    {
        let url = format!("{}/{}", self.config.base_url().trim_end_matches('/'), path);

        let strategy = ExponentialBackoff::from_millis(*self.config.retry_backoff_ms())
            .factor(2)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(*self.config.max_retries());

        let client = self;
        let url = &url;
        Retry::spawn(strategy, move || async move {
            match client.fetch_once::<D>(url).await {
                Ok(reply) => Ok(reply),
                Err(e) if e.kind.is_retryable() => {
                    warn!(error = %e, "Upstream request failed, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => Err(RetryError::Permanent(e)),
            }
        })
        .await
    }

    async fn fetch_once<D>(&self, url: &str) -> UpstreamResult<UpstreamReply<D>>
    where
        D: DeserializeOwned,
    {
        debug!(url, "Querying upstream");
        let response = self.http.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Upstream returned non-success status");
            return Ok(UpstreamReply::with_status(status.as_u16()));
        }

        let envelope: Envelope<D> = response.json().await.map_err(|e| {
            if e.is_timeout() {
                request_error(e)
            } else {
                UpstreamError::new(UpstreamErrorKind::Decode(e.to_string()))
            }
        })?;

        debug!(action = %envelope.action, exists = envelope.exists, "Upstream replied");
        Ok(UpstreamReply::new(
            status.as_u16(),
            envelope.exists,
            envelope.data,
        ))
    }

    async fn fetch_prefix<D>(
        &self,
        endpoint: &str,
        prefix: &str,
    ) -> UpstreamResult<UpstreamReply<D>>
    where
        D: DeserializeOwned,
    {
        let prefix = validate_prefix(prefix)?;
        self.fetch(&format!("{}/{}", endpoint, prefix)).await
    }
}

fn request_error(e: reqwest::Error) -> UpstreamError {
    if e.is_timeout() {
        UpstreamError::new(UpstreamErrorKind::Timeout(e.to_string()))
    } else {
        UpstreamError::new(UpstreamErrorKind::Transport(e.to_string()))
    }
}

#[async_trait]
impl BgpLookup for BgpStuffClient {
    async fn route(&self, prefix: &str) -> UpstreamResult<UpstreamReply<String>> {
        let reply = self.fetch_prefix::<RouteData>("route", prefix).await?;
        Ok(reply.map(|d| d.route))
    }

    async fn origin(&self, prefix: &str) -> UpstreamResult<UpstreamReply<u32>> {
        let reply = self.fetch_prefix::<OriginData>("origin", prefix).await?;
        Ok(reply.map(|d| d.origin))
    }

    async fn as_path(&self, prefix: &str) -> UpstreamResult<UpstreamReply<Vec<u32>>> {
        let reply = self.fetch_prefix::<AsPathData>("aspath", prefix).await?;
        Ok(reply.map(|d| d.as_path))
    }

    async fn roa(&self, prefix: &str) -> UpstreamResult<UpstreamReply<String>> {
        let reply = self.fetch_prefix::<RoaData>("roa", prefix).await?;
        Ok(reply.map(|d| d.roa))
    }

    async fn as_name(&self, asn: u32) -> UpstreamResult<UpstreamReply<String>> {
        let reply = self.fetch::<AsNameData>(&format!("asname/{}", asn)).await?;
        Ok(reply.map(|d| d.as_name))
    }

    async fn invalids(&self) -> UpstreamResult<UpstreamReply<InvalidsByOrigin>> {
        let reply = self.fetch::<InvalidsData>("invalids").await?;
        Ok(reply.map(InvalidsByOrigin::from))
    }

    async fn vrps(&self, asn: u32) -> UpstreamResult<UpstreamReply<Vec<Vrp>>> {
        let reply = self.fetch::<VrpsData>(&format!("vrps/{}", asn)).await?;
        Ok(reply.map(|d| d.vrps))
    }

    async fn sourced(&self, asn: u32) -> UpstreamResult<UpstreamReply<Vec<String>>> {
        let reply = self.fetch::<SourcedData>(&format!("sourced/{}", asn)).await?;
        Ok(reply.map(|d| d.sourced))
    }

    async fn totals(&self) -> UpstreamResult<UpstreamReply<Totals>> {
        self.fetch::<Totals>("totals").await
    }

    async fn geo_ip(&self, prefix: &str) -> UpstreamResult<UpstreamReply<GeoLocation>> {
        let reply = self.fetch_prefix::<GeoIpData>("geoip", prefix).await?;
        Ok(reply.map(|d| d.geo_ip))
    }
}
