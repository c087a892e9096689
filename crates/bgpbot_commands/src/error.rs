//! Command error taxonomy.

use crate::{ClassifiedResult, INTERNAL_ERROR, UPSTREAM_UNAVAILABLE};
use bgpbot_error::{UpstreamError, UpstreamErrorKind};
use derive_more::{Display, Error};

/// Result type for command operations.
pub type CommandResult<T> = Result<T, CommandError>;

/// Specific command error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum CommandErrorKind {
    /// User input malformed or outside policy.
    #[display("{}", _0)]
    InvalidArgument(String),

    /// Valid input with no matching dataset entry.
    #[display("{}", _0)]
    NotFound(String),

    /// The upstream refused the argument.
    #[display("{}", _0)]
    UpstreamRejected(String),

    /// Transport, status, timeout or response-shape failure.
    #[display("Upstream unavailable: {}", _0)]
    UpstreamUnavailable(String),

    /// A cache or routing invariant did not hold.
    #[display("Internal inconsistency: {}", _0)]
    InternalInconsistency(String),
}

/// Command error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Command Error: {} at line {} in {}", kind, line, file)]
pub struct CommandError {
    /// The error kind
    pub kind: CommandErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl CommandError {
    /// Create a new CommandError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CommandErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the error is an incident worth logging at error level.
    pub fn is_incident(&self) -> bool {
        matches!(
            self.kind,
            CommandErrorKind::UpstreamUnavailable(_) | CommandErrorKind::InternalInconsistency(_)
        )
    }
}

impl From<UpstreamError> for CommandError {
    #[track_caller]
    fn from(err: UpstreamError) -> Self {
        let kind = match err.kind {
            UpstreamErrorKind::Rejected(reason) => CommandErrorKind::UpstreamRejected(reason),
            ref other => CommandErrorKind::UpstreamUnavailable(other.to_string()),
        };
        CommandError::new(kind)
    }
}

/// What the caller sees for each error.
///
/// Upstream and internal failures get a fixed message; their detail is only
/// logged.
impl From<&CommandError> for ClassifiedResult {
    fn from(err: &CommandError) -> Self {
        match &err.kind {
            CommandErrorKind::InvalidArgument(reason)
            | CommandErrorKind::UpstreamRejected(reason) => ClassifiedResult::failure(reason),
            CommandErrorKind::NotFound(text) => ClassifiedResult::warning(text),
            CommandErrorKind::UpstreamUnavailable(_) => {
                ClassifiedResult::failure(UPSTREAM_UNAVAILABLE)
            }
            CommandErrorKind::InternalInconsistency(_) => ClassifiedResult::failure(INTERNAL_ERROR),
        }
    }
}
