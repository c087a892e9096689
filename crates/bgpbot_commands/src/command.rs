//! The routing table: command kinds and their descriptors.

use crate::ArgumentKind;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Every lookup the bot answers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CommandKind {
    /// Active RIB entry for an address
    Route,
    /// Origin AS for an address
    Origin,
    /// AS path toward an address
    AsPath,
    /// RPKI status for an address
    Roa,
    /// Registered name of an AS
    AsName,
    /// RPKI-invalid prefixes originated by an AS
    Invalids,
    /// Validated ROA payloads of an AS
    Vrps,
    /// Prefixes originated by an AS
    Sourced,
    /// Active prefix counts
    Totals,
    /// Approximate location of an address
    GeoIp,
}

/// Immutable descriptor of one routable command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    kind: CommandKind,
    keyword: &'static str,
    arity: usize,
    argument: ArgumentKind,
    summary: &'static str,
}

impl Command {
    /// The command kind.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Keyword typed after the alert marker, matched case-insensitively.
    pub fn keyword(&self) -> &'static str {
        self.keyword
    }

    /// Minimum number of arguments.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// How the first argument is validated.
    pub fn argument(&self) -> ArgumentKind {
        self.argument
    }

    /// One-line description for the help text.
    pub fn summary(&self) -> &'static str {
        self.summary
    }
}

impl CommandKind {
    /// Descriptor for this kind.
    pub fn command(self) -> Command {
        let (keyword, argument, summary) = match self {
            CommandKind::Route => (
                "route",
                ArgumentKind::Prefix,
                "Returns the active RIB entry for the passed in IP address",
            ),
            CommandKind::Origin => (
                "origin",
                ArgumentKind::Prefix,
                "Returns the origin AS number for the passed in IP address",
            ),
            CommandKind::AsPath => (
                "aspath",
                ArgumentKind::Prefix,
                "Returns the AS path I see to get to the passed in IP address",
            ),
            CommandKind::Roa => (
                "roa",
                ArgumentKind::Prefix,
                "Returns the ROA status of the passed in IP address",
            ),
            CommandKind::AsName => (
                "asname",
                ArgumentKind::AsNumber,
                "Returns the AS name from the passed in AS number",
            ),
            CommandKind::GeoIp => (
                "geoip",
                ArgumentKind::Prefix,
                "Returns a guesstimate of where the IP is geo located",
            ),
            CommandKind::Invalids => (
                "invalids",
                ArgumentKind::AsNumber,
                "Returns all RPKI invalid prefixes advertised from the passed in AS number",
            ),
            CommandKind::Vrps => (
                "vrps",
                ArgumentKind::AsNumber,
                "Returns all Validated ROA Payloads for the passed in AS number",
            ),
            CommandKind::Sourced => (
                "sourced",
                ArgumentKind::AsNumber,
                "Returns all prefixes originated from the passed in AS number",
            ),
            CommandKind::Totals => (
                "totals",
                ArgumentKind::None,
                "Returns the current IPv4 and IPv6 active prefix count",
            ),
        };
        let arity = match argument {
            ArgumentKind::None => 0,
            ArgumentKind::Prefix | ArgumentKind::AsNumber => 1,
        };
        Command {
            kind: self,
            keyword,
            arity,
            argument,
            summary,
        }
    }

    /// Resolve a typed keyword, ignoring case.
    ///
    /// ```
    /// use bgpbot_commands::CommandKind;
    ///
    /// assert_eq!(CommandKind::from_keyword("ASPath"), Some(CommandKind::AsPath));
    /// assert_eq!(CommandKind::from_keyword("help"), None);
    /// ```
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        CommandKind::iter().find(|kind| kind.command().keyword().eq_ignore_ascii_case(keyword))
    }
}

/// Help text listing every command behind `marker`.
pub fn help_text(marker: &str) -> String {
    let mut text = String::from("\nbgpstuff.net help.\n\nCommands:\n");
    for kind in CommandKind::iter() {
        let command = kind.command();
        text.push_str(&format!(
            "  {} {} - {}\n",
            marker,
            command.keyword(),
            command.summary()
        ));
    }
    text
}
