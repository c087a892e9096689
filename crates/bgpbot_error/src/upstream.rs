//! Errors raised at the upstream data API boundary.

/// Upstream failure conditions.
///
/// `Rejected` means the upstream refused the argument itself and the reason
/// may be shown to the caller. Every other kind is an availability problem
/// whose detail stays in the logs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum UpstreamErrorKind {
    /// The argument was refused before or by the upstream.
    #[display("{}", _0)]
    Rejected(String),

    /// Connection, TLS or protocol failure.
    #[display("Transport failure: {}", _0)]
    Transport(String),

    /// The request did not complete in time.
    #[display("Request timed out: {}", _0)]
    Timeout(String),

    /// The response body did not have the expected shape.
    #[display("Unexpected response shape: {}", _0)]
    Decode(String),
}

impl UpstreamErrorKind {
    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

/// Upstream error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upstream Error: {} at line {} in {}", kind, line, file)]
pub struct UpstreamError {
    /// The error kind
    pub kind: UpstreamErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl UpstreamError {
    /// Create a new UpstreamError with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgpbot_error::{UpstreamError, UpstreamErrorKind};
    ///
    /// let err = UpstreamError::new(UpstreamErrorKind::Rejected(
    ///     "foo is not a valid IP address".to_string(),
    /// ));
    /// assert!(!err.kind.is_retryable());
    /// ```
    #[track_caller]
    pub fn new(kind: UpstreamErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &UpstreamErrorKind {
        &self.kind
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
