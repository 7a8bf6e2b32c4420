//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::orchestrator::{RunOptions, VersionSelection};

use super::commands::cache::CacheArgs;

/// gemlibs - Detect the native libraries RubyGems packages depend on.
#[derive(Debug, Parser)]
#[command(name = "gemlibs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to settings file (overrides ./gemlibs.yml)
    #[arg(short, long, global = true, env = "GEMLIBS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory records are written to
    #[arg(short, long, global = true, env = "GEMLIBS_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory gem archives are cached in
    #[arg(long, global = true, env = "GEMLIBS_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Matcher rules file
    #[arg(long, global = true, env = "GEMLIBS_RULES")]
    pub rules: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate dependency records for one gem
    Generate(GenerateArgs),

    /// Generate records for every gem listed in a file
    Batch(BatchArgs),

    /// Print a stored record
    Show(ShowArgs),

    /// Manage the gem archive cache
    Cache(CacheArgs),
}

/// Version selection and overwrite flags shared by `generate` and `batch`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SelectionArgs {
    /// Process every published version
    #[arg(long, conflicts_with = "limit")]
    pub all_versions: bool,

    /// Process the newest N versions
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Regenerate records that already exist
    #[arg(long)]
    pub overwrite: bool,
}

impl SelectionArgs {
    /// Run options for these flags, with an optional exact version.
    pub fn run_options(&self, exact: Option<&str>) -> RunOptions {
        let selection = match (exact, self.all_versions, self.limit) {
            (Some(version), _, _) => VersionSelection::Exact(version.to_string()),
            (None, true, _) => VersionSelection::All,
            (None, false, Some(n)) => VersionSelection::Limit(n),
            (None, false, None) => VersionSelection::Latest,
        };

        RunOptions {
            selection,
            overwrite: self.overwrite,
        }
    }
}

/// Arguments for the `generate` command.
#[derive(Debug, Clone, clap::Args)]
pub struct GenerateArgs {
    /// Gem name
    pub gem: String,

    /// Process only this version
    #[arg(long, conflicts_with_all = ["all_versions", "limit"])]
    pub version: Option<String>,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

impl GenerateArgs {
    pub fn run_options(&self) -> RunOptions {
        self.selection.run_options(self.version.as_deref())
    }
}

/// Arguments for the `batch` command.
#[derive(Debug, Clone, clap::Args)]
pub struct BatchArgs {
    /// File with one gem name per line, or `-` for stdin
    pub file: PathBuf,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Arguments for the `show` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ShowArgs {
    /// Gem name
    pub gem: String,

    /// Gem version
    pub version: String,
}
