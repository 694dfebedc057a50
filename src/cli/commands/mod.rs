//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Exit codes
//!
//! - `0` - the command succeeded
//! - `1` - any error (bad settings, decode or compile failure, IO)
//! - `2` - the template resolved nowhere

pub mod candidates;
pub mod dispatcher;
pub mod resolve;

pub use dispatcher::{Command, CommandDispatcher, CommandResult, EXIT_NOT_FOUND};
