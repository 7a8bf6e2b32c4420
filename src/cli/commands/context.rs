//! Settings resolved for one CLI invocation.

use std::path::{Path, PathBuf};

use crate::cli::args::Cli;
use crate::config::{load_settings, Settings};
use crate::error::Result;
use crate::fetch::RubyGemsFetcher;
use crate::matcher::DependencyMatcher;
use crate::orchestrator::Orchestrator;
use crate::record::RecordStore;

/// Settings with command-line overrides applied.
#[derive(Debug, Clone)]
pub struct CommandContext {
    settings: Settings,
    rules_path: PathBuf,
}

impl CommandContext {
    /// Load settings from `working_dir` and apply the global flags.
    pub fn from_cli(cli: &Cli, working_dir: &Path) -> Result<Self> {
        let mut settings = load_settings(working_dir, cli.config.as_deref())?;

        if let Some(dir) = &cli.output_dir {
            settings.output_dir = dir.clone();
        }
        if let Some(dir) = &cli.cache_dir {
            settings.cache_dir = dir.clone();
        }

        let rules_path = cli
            .rules
            .clone()
            .unwrap_or_else(|| settings.rules_path.clone());

        Ok(Self {
            settings,
            rules_path,
        })
    }

    /// Wrap settings as-is.
    pub fn from_settings(settings: Settings) -> Self {
        let rules_path = settings.rules_path.clone();
        Self {
            settings,
            rules_path,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn rules_path(&self) -> &Path {
        &self.rules_path
    }

    pub fn record_store(&self) -> RecordStore {
        RecordStore::new(&self.settings.output_dir)
    }

    /// A missing or broken rules file falls back to the built-in rules with a warning.
    pub fn matcher(&self) -> DependencyMatcher {
        DependencyMatcher::from_rules_file(Some(self.rules_path()))
    }

    /// Build the full pipeline against the configured RubyGems server.
    pub fn orchestrator(&self) -> Result<Orchestrator<RubyGemsFetcher>> {
        let fetcher = RubyGemsFetcher::from_settings(&self.settings)?;
        Ok(Orchestrator::new(
            fetcher,
            self.matcher(),
            self.record_store(),
        ))
    }
}
