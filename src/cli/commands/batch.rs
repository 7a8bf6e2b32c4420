//! `gemlibs batch` command.

use std::io::Read;
use std::path::Path;

use crate::cli::args::BatchArgs;
use crate::error::Result;
use crate::fetch::PackageSource;
use crate::orchestrator::{BatchSummary, Orchestrator, RunOptions};
use crate::ui::UserInterface;

use super::report::{report_summary, report_version};
use super::{Command, CommandContext, CommandResult};

/// Parse a gem list: one name per line, `#` starts a comment.
///
/// Duplicates are dropped, keeping the first occurrence.
pub fn parse_gem_list(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for line in content.lines() {
        let name = line.split('#').next().unwrap_or("").trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

fn read_gem_list(path: &Path) -> Result<Vec<String>> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(parse_gem_list(&content))
}

/// Run every gem through the pipeline with a progress bar.
pub fn run_batch<S: PackageSource>(
    orchestrator: &Orchestrator<S>,
    names: &[String],
    options: &RunOptions,
    ui: &mut dyn UserInterface,
) -> BatchSummary {
    let progress = ui.start_progress(names.len() as u64);
    let mut summary = BatchSummary::default();

    for name in names {
        progress.set_message(name);
        let package_summary = orchestrator.process_package(name, options);
        for report in &package_summary.reports {
            report_version(ui, report);
        }
        summary.merge(package_summary);
        progress.inc();
    }

    progress.finish();
    summary
}

/// Generates records for every gem in a list.
pub struct BatchCommand {
    context: CommandContext,
    args: BatchArgs,
}

impl BatchCommand {
    pub fn new(context: CommandContext, args: BatchArgs) -> Self {
        Self { context, args }
    }
}

impl Command for BatchCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let names = read_gem_list(&self.args.file)?;
        if names.is_empty() {
            ui.warning("No gem names given");
            return Ok(CommandResult::success());
        }

        let orchestrator = self.context.orchestrator()?;
        let options = self.args.selection.run_options(None);

        ui.show_header(&format!("Processing {} gems", names.len()));
        let summary = run_batch(&orchestrator, &names, &options, ui);
        report_summary(ui, &summary);

        Ok(CommandResult::from_failures(!summary.is_success()))
    }
}
