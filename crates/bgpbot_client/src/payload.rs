//! Typed payloads returned by the data API.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Active prefix counts across the routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Active IPv4 prefixes
    #[serde(rename = "Total4")]
    pub ipv4: u64,
    /// Active IPv6 prefixes
    #[serde(rename = "Total6")]
    pub ipv6: u64,
}

/// Approximate location of an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// City name
    #[serde(rename = "City")]
    pub city: String,
    /// Country name
    #[serde(rename = "Country")]
    pub country: String,
}

/// Validated ROA payload authorizing an origin to announce a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[display("{} max /{}", prefix, max_length)]
pub struct Vrp {
    /// Authorized prefix
    #[serde(rename = "Prefix")]
    pub prefix: String,
    /// Longest prefix length the ROA covers
    #[serde(rename = "MaxLen")]
    pub max_length: u8,
}

/// RPKI-invalid prefixes grouped by the origin AS announcing them.
pub type InvalidsByOrigin = HashMap<u32, Vec<String>>;

/// Common response envelope.
///
/// ```json
/// {"Action": "route", "Exists": true, "Data": {"Route": "1.1.1.0/24"}}
/// ```
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<D> {
    #[serde(rename = "Action", default)]
    pub action: String,
    #[serde(rename = "Exists", default)]
    pub exists: bool,
    #[serde(rename = "Data")]
    pub data: Option<D>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RouteData {
    #[serde(rename = "Route")]
    pub route: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OriginData {
    #[serde(rename = "Origin")]
    pub origin: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AsPathData {
    #[serde(rename = "ASPath")]
    pub as_path: Vec<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoaData {
    #[serde(rename = "ROA")]
    pub roa: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AsNameData {
    #[serde(rename = "ASName")]
    pub as_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvalidOrigin {
    #[serde(rename = "ASN")]
    pub asn: u32,
    #[serde(rename = "Prefixes", default)]
    pub prefixes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvalidsData {
    #[serde(rename = "Invalids", default)]
    pub invalids: Vec<InvalidOrigin>,
}

impl From<InvalidsData> for InvalidsByOrigin {
    fn from(data: InvalidsData) -> Self {
        let mut by_origin = InvalidsByOrigin::new();
        for origin in data.invalids {
            by_origin
                .entry(origin.asn)
                .or_default()
                .extend(origin.prefixes);
        }
        by_origin
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct VrpsData {
    #[serde(rename = "VRPs", default)]
    pub vrps: Vec<Vrp>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SourcedData {
    #[serde(rename = "Sourced", default)]
    pub sourced: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeoIpData {
    #[serde(rename = "GeoIP")]
    pub geo_ip: GeoLocation,
}
