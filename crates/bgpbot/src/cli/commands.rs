//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bgpbot - BGP and RPKI lookups from chat, backed by bgpstuff.net
#[derive(Parser, Debug)]
#[command(name = "bgpbot")]
#[command(about = "BGP and RPKI lookups from chat, backed by bgpstuff.net", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to Discord and answer commands (needs DISCORD_TOKEN)
    #[cfg(feature = "discord")]
    Run,

    /// Resolve one command line and print the reply blocks
    Query {
        /// Command line, e.g. "%route 1.1.1.1"; the alert marker is optional
        line: String,
    },
}
