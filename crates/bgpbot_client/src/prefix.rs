//! Local syntax check for IP address and prefix arguments.

use bgpbot_error::{UpstreamError, UpstreamErrorKind, UpstreamResult};
use std::net::IpAddr;

/// Check that `raw` is an IP address or an address/length prefix.
///
/// Returns the trimmed token unchanged so that cache keys and reply text keep
/// the caller's spelling.
///
/// # Errors
///
/// Returns [`UpstreamErrorKind::Rejected`] with a caller-facing reason.
///
/// ```
/// use bgpbot_client::validate_prefix;
///
/// assert_eq!(validate_prefix("203.0.113.0/24").unwrap(), "203.0.113.0/24");
/// assert!(validate_prefix("2001:db8::/129").is_err());
/// ```
pub fn validate_prefix(raw: &str) -> UpstreamResult<String> {
    let token = raw.trim();
    let reject = || {
        UpstreamError::new(UpstreamErrorKind::Rejected(format!(
            "{} is not a valid IP address or prefix",
            token
        )))
    };

    let (address, length) = match token.split_once('/') {
        Some((address, length)) => (address, Some(length)),
        None => (token, None),
    };

    let address: IpAddr = address.parse().map_err(|_| reject())?;
    if let Some(length) = length {
        let length: u8 = length.parse().map_err(|_| reject())?;
        let max = if address.is_ipv4() { 32 } else { 128 };
        if length > max {
            return Err(reject());
        }
    }

    Ok(token.to_string())
}
