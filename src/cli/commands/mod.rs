//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`stagecraft run`, `stagecraft library`)
//! - Shared configuration loading
//! - Consistent global flag handling

pub mod completions;
pub mod diff;
pub mod dispatcher;
pub mod library;
pub mod run;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
