//! Shared result reporting for `generate` and `batch`.

use crate::orchestrator::{BatchSummary, VersionOutcome, VersionReport};
use crate::ui::UserInterface;

/// Report one version's outcome.
pub fn report_version(ui: &mut dyn UserInterface, report: &VersionReport) {
    match &report.outcome {
        VersionOutcome::Generated {
            path,
            dependencies,
            confidence,
        } => {
            let deps = if dependencies.is_empty() {
                "no native dependencies".to_string()
            } else {
                dependencies.join(", ")
            };
            ui.success(&format!("{}: {} ({})", report.package, deps, confidence));
            ui.detail(&format!("  wrote {}", path.display()));
        }
        VersionOutcome::Skipped => {
            ui.skipped(&format!("{}: already generated", report.package));
        }
        VersionOutcome::Failed(message) => {
            ui.error(&format!("{}: {}", report.package, message));
        }
    }
}

/// Report the totals line.
pub fn report_summary(ui: &mut dyn UserInterface, summary: &BatchSummary) {
    ui.message(&format!(
        "{} succeeded ({} skipped), {} failed",
        summary.succeeded, summary.skipped, summary.failed
    ));
}
