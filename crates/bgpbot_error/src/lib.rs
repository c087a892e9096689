//! Error types for bgpbot.
//!
//! This crate provides the error types shared across the bgpbot workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use bgpbot_error::{BgpBotResult, UpstreamError, UpstreamErrorKind};
//!
//! fn fetch_route() -> BgpBotResult<String> {
//!     Err(UpstreamError::new(UpstreamErrorKind::Transport(
//!         "connection refused".to_string(),
//!     )))?
//! }
//!
//! match fetch_route() {
//!     Ok(route) => println!("Got: {}", route),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod transport;
mod upstream;

pub use config::ConfigError;
pub use error::{BgpBotError, BgpBotErrorKind, BgpBotResult};
pub use transport::{TransportError, TransportErrorKind};
pub use upstream::{UpstreamError, UpstreamErrorKind, UpstreamResult};
