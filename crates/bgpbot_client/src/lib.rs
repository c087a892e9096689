//! Client for the bgpstuff.net read-only BGP data API.
//!
//! The rest of the workspace only talks to the [`BgpLookup`] trait, so the
//! HTTP implementation in [`BgpStuffClient`] can be replaced by a stub in
//! tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use bgpbot_client::{BgpLookup, BgpStuffClient, UpstreamConfig};
//!
//! let client = BgpStuffClient::new(UpstreamConfig::default())?;
//! let reply = client.route("1.1.1.1").await?;
//! if *reply.exists() {
//!     println!("route: {:?}", reply.data());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod lookup;
mod payload;
mod prefix;

pub use client::BgpStuffClient;
pub use config::UpstreamConfig;
pub use lookup::{BgpLookup, UpstreamReply};
pub use payload::{GeoLocation, InvalidsByOrigin, Totals, Vrp};
pub use prefix::validate_prefix;
