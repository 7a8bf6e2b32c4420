//! Command-line interface for gemlibs.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{BatchArgs, Cli, Commands, GenerateArgs, SelectionArgs, ShowArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
