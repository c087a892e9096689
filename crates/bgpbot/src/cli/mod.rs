//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the bgpbot binary.

mod commands;
mod run;

pub use commands::{Cli, Commands};
#[cfg(feature = "discord")]
pub use run::run_bot;
pub use run::run_query;
