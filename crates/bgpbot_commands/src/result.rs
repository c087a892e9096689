//! Classified command outcomes.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// How a reply should be presented.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Severity {
    /// The lookup found what was asked for.
    Success,
    /// The lookup worked but the answer is absent or noteworthy.
    Warning,
    /// The command could not be answered.
    Failure,
    /// Informational text such as help.
    Plain,
}

impl Severity {
    /// Visual marker placed in front of the first block, if any.
    pub fn marker(&self) -> Option<&'static str> {
        match self {
            Severity::Success => Some("🟢"),
            Severity::Warning => Some("🟡"),
            Severity::Failure => Some("🔴"),
            Severity::Plain => None,
        }
    }
}

/// The one outcome produced for a recognized command.
///
/// Immutable once built; the cache and formatter only ever read it.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ClassifiedResult {
    text: String,
    severity: Severity,
}

impl ClassifiedResult {
    /// Create a result.
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }

    /// A [`Severity::Success`] result.
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(Severity::Success, text)
    }

    /// A [`Severity::Warning`] result.
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Severity::Warning, text)
    }

    /// A [`Severity::Failure`] result.
    pub fn failure(text: impl Into<String>) -> Self {
        Self::new(Severity::Failure, text)
    }

    /// A [`Severity::Plain`] result.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(Severity::Plain, text)
    }
}
