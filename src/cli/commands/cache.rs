//! Cache command implementation.
//!
//! Provides `gemlibs cache list`, `gemlibs cache clear`, and
//! `gemlibs cache stats`.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cache::{format_age, CacheStore};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::CommandContext;

/// Arguments for the cache command.
#[derive(Debug, Clone, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

/// Cache subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum CacheSubcommand {
    /// List cached archives.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Remove every cached archive.
    Clear,
    /// Show cache statistics.
    Stats,
}

/// The cache command implementation.
pub struct CacheCommand {
    context: CommandContext,
    args: CacheArgs,
}

impl CacheCommand {
    /// Create a new cache command.
    pub fn new(context: CommandContext, args: CacheArgs) -> Self {
        Self { context, args }
    }
}

impl Command for CacheCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> crate::error::Result<CommandResult> {
        let store = CacheStore::new(&self.context.settings().cache_dir);

        match &self.args.command {
            CacheSubcommand::List { json } => list_cache(&store, *json, ui)?,
            CacheSubcommand::Clear => clear_cache(&store, ui)?,
            CacheSubcommand::Stats => show_stats(&store, ui)?,
        }

        Ok(CommandResult::success())
    }
}

fn list_cache(store: &CacheStore, json: bool, ui: &mut dyn UserInterface) -> Result<()> {
    let entries = store.list()?;

    if json {
        ui.message(&serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        ui.message("Cache is empty");
        return Ok(());
    }

    ui.message(&format!("{} cached archives:\n", entries.len()));

    for entry in entries {
        ui.message(&format!(
            "  {} ({} bytes, {} old)",
            entry.key,
            entry.size_bytes,
            format_age(entry.age())
        ));
        ui.detail(&format!("    sha256: {}", entry.sha256));
        ui.detail(&format!("    path: {}", entry.content_path.display()));
    }

    Ok(())
}

fn clear_cache(store: &CacheStore, ui: &mut dyn UserInterface) -> Result<()> {
    let cleared = store.clear()?;
    if cleared == 0 {
        ui.message("Cache is already empty");
    } else {
        ui.success(&format!("Cleared {} archives", cleared));
    }
    Ok(())
}

fn show_stats(store: &CacheStore, ui: &mut dyn UserInterface) -> Result<()> {
    let entries = store.list()?;
    let total_size = store.total_size()?;

    ui.message("Cache Statistics:\n");
    ui.message(&format!("  Archives: {}", entries.len()));
    ui.message(&format!("  Total size: {} bytes", total_size));
    if let Some(oldest) = entries.last() {
        ui.message(&format!("  Oldest: {} old", format_age(oldest.age())));
    }
    ui.message(&format!("  Location: {}", store.root().display()));

    Ok(())
}
