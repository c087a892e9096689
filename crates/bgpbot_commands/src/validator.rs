//! Argument normalization.

use crate::{CommandError, CommandErrorKind, CommandKind, CommandResult};
use std::ops::RangeInclusive;

/// What a command's first argument must be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentKind {
    /// An IP address or prefix, checked by the upstream client
    Prefix,
    /// A public autonomous system number
    AsNumber,
    /// No argument; anything supplied is ignored
    None,
}

/// A validated argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Argument {
    /// Address or prefix token as typed
    #[display("{}", _0)]
    Prefix(String),
    /// Public AS number
    #[display("{}", _0)]
    AsNumber(u32),
    /// No argument
    #[display("*")]
    None,
}

/// AS numbers that never appear as a public origin: 0, AS_TRANS, the
/// documentation/private/reserved block and the 32-bit private range.
const NON_PUBLIC_ASNS: &[RangeInclusive<u64>] = &[
    0..=0,
    23456..=23456,
    64496..=131071,
    4_200_000_000..=4_294_967_295,
];

/// Whether `asn` may appear as a public origin AS.
///
/// ```
/// use bgpbot_commands::is_public_asn;
///
/// assert!(is_public_asn(13335));
/// assert!(!is_public_asn(0));
/// assert!(!is_public_asn(64512));
/// assert!(!is_public_asn(u64::from(u32::MAX) + 1));
/// ```
pub fn is_public_asn(asn: u64) -> bool {
    asn <= u64::from(u32::MAX) && !NON_PUBLIC_ASNS.iter().any(|range| range.contains(&asn))
}

/// Validate the raw first argument for `kind`.
///
/// # Errors
///
/// Returns [`CommandErrorKind::InvalidArgument`] with a reason fit for the
/// caller.
pub fn validate(kind: ArgumentKind, raw: Option<&str>) -> CommandResult<Argument> {
    let raw = raw.map(str::trim).filter(|token| !token.is_empty());
    match kind {
        ArgumentKind::None => Ok(Argument::None),
        ArgumentKind::Prefix => raw
            .map(|token| Argument::Prefix(token.to_string()))
            .ok_or_else(|| invalid("An IP address or prefix is required".to_string())),
        ArgumentKind::AsNumber => {
            let token = raw.ok_or_else(|| invalid("An AS number is required".to_string()))?;
            let digits = token
                .strip_prefix("AS")
                .or_else(|| token.strip_prefix("as"))
                .or_else(|| token.strip_prefix("As"))
                .unwrap_or(token);
            let number: i128 = digits
                .parse()
                .map_err(|_| invalid(format!("{} is not an integer", token)))?;
            match u32::try_from(number) {
                Ok(asn) if is_public_asn(u64::from(asn)) => Ok(Argument::AsNumber(asn)),
                _ => Err(invalid(format!("{} is not a valid ASN", token))),
            }
        }
    }
}

/// Canonical cache key for a command and its validated argument.
pub fn cache_key(kind: CommandKind, argument: &Argument) -> String {
    format!("{}:{}", kind, argument)
}

#[track_caller]
fn invalid(reason: String) -> CommandError {
    CommandError::new(CommandErrorKind::InvalidArgument(reason))
}
