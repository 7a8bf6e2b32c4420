//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed by [`CommandDispatcher`].

pub mod batch;
pub mod cache;
pub mod context;
pub mod dispatcher;
pub mod generate;
pub mod report;
pub mod show;

pub use context::CommandContext;
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
