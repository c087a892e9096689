//! Upstream collaborator seam.

use crate::{GeoLocation, InvalidsByOrigin, Totals, Vrp};
use async_trait::async_trait;
use bgpbot_error::UpstreamResult;
use derive_getters::Getters;

/// One answer from the data API.
///
/// `status` is the HTTP status; `exists` reports whether the queried entity is
/// present in the dataset. `data` is only meaningful when both indicate
/// success.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct UpstreamReply<T> {
    status: u16,
    exists: bool,
    data: Option<T>,
}

impl<T> UpstreamReply<T> {
    /// Create a reply from its parts.
    pub fn new(status: u16, exists: bool, data: Option<T>) -> Self {
        Self {
            status,
            exists,
            data,
        }
    }

    /// Successful reply carrying `data`.
    pub fn found(data: T) -> Self {
        Self::new(200, true, Some(data))
    }

    /// Successful reply for an entity absent from the dataset.
    pub fn missing() -> Self {
        Self::new(200, false, None)
    }

    /// Reply that only carries a non-success status.
    pub fn with_status(status: u16) -> Self {
        Self::new(status, false, None)
    }

    /// Whether the upstream answered with HTTP 200.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Take the payload.
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Transform the payload, keeping status and existence.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> UpstreamReply<U> {
        UpstreamReply {
            status: self.status,
            exists: self.exists,
            data: self.data.map(f),
        }
    }
}

/// Read-only BGP data lookups.
///
/// One operation per chat command, plus the bulk invalids fetch. Prefix
/// arguments are the caller's raw token; implementations reject malformed
/// ones with [`bgpbot_error::UpstreamErrorKind::Rejected`]. AS numbers are
/// already validated.
///
/// Implementations own any retry or backoff policy. Callers never retry.
#[async_trait]
pub trait BgpLookup: Send + Sync {
    /// Active RIB entry covering an address.
    async fn route(&self, prefix: &str) -> UpstreamResult<UpstreamReply<String>>;

    /// Origin AS of the route covering an address.
    async fn origin(&self, prefix: &str) -> UpstreamResult<UpstreamReply<u32>>;

    /// AS path toward an address.
    async fn as_path(&self, prefix: &str) -> UpstreamResult<UpstreamReply<Vec<u32>>>;

    /// RPKI status of the route covering an address.
    async fn roa(&self, prefix: &str) -> UpstreamResult<UpstreamReply<String>>;

    /// Registered name of an AS.
    async fn as_name(&self, asn: u32) -> UpstreamResult<UpstreamReply<String>>;

    /// Every RPKI-invalid announcement, grouped by origin.
    async fn invalids(&self) -> UpstreamResult<UpstreamReply<InvalidsByOrigin>>;

    /// Validated ROA payloads for an AS.
    async fn vrps(&self, asn: u32) -> UpstreamResult<UpstreamReply<Vec<Vrp>>>;

    /// Prefixes originated by an AS.
    async fn sourced(&self, asn: u32) -> UpstreamResult<UpstreamReply<Vec<String>>>;

    /// Active IPv4 and IPv6 prefix counts.
    async fn totals(&self) -> UpstreamResult<UpstreamReply<Totals>>;

    /// Approximate location of an address.
    async fn geo_ip(&self, prefix: &str) -> UpstreamResult<UpstreamReply<GeoLocation>>;
}
