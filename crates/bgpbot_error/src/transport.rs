//! Messaging transport error types.

/// Transport error variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum TransportErrorKind {
    /// Connection to the chat gateway failed.
    #[display("Connection failed: {_0}")]
    ConnectionFailed(String),

    /// A reply block could not be delivered.
    #[display("Message send failed: {_0}")]
    MessageSendFailed(String),

    /// Destination identifier could not be parsed.
    #[display("Invalid destination: {_0}")]
    InvalidDestination(String),
}

/// Transport error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Transport Error: {} at line {} in {}", kind, line, file)]
pub struct TransportError {
    /// The error kind
    pub kind: TransportErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl TransportError {
    /// Create a new TransportError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TransportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
