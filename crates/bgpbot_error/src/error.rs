//! Top-level error wrapper types.

use crate::{ConfigError, TransportError, UpstreamError};

/// Every error a bgpbot process can surface to its entry point.
///
/// # Examples
///
/// ```
/// use bgpbot_error::{BgpBotError, ConfigError};
///
/// let err: BgpBotError = ConfigError::new("Missing field").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum BgpBotErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Upstream data API error
    #[from(UpstreamError)]
    Upstream(UpstreamError),
    /// Messaging transport error
    #[from(TransportError)]
    Transport(TransportError),
}

/// bgpbot error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("bgpbot Error: {}", _0)]
pub struct BgpBotError(Box<BgpBotErrorKind>);

impl BgpBotError {
    /// Create a new error from a kind.
    pub fn new(kind: BgpBotErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BgpBotErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to BgpBotErrorKind
impl<T> From<T> for BgpBotError
where
    T: Into<BgpBotErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for bgpbot operations.
pub type BgpBotResult<T> = std::result::Result<T, BgpBotError>;
