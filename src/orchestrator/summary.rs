//! Per-version outcomes and run totals.

use std::path::PathBuf;

use crate::record::{Confidence, PackageIdentity};

/// What happened to one version.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionOutcome {
    /// A record was generated and written.
    Generated {
        path: PathBuf,
        dependencies: Vec<String>,
        confidence: Confidence,
    },
    /// A record already existed and overwrite was off.
    Skipped,
    /// Processing failed with the given message.
    Failed(String),
}

/// The outcome for one gem version.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionReport {
    pub package: PackageIdentity,
    pub outcome: VersionOutcome,
}

impl VersionReport {
    pub fn new(package: PackageIdentity, outcome: VersionOutcome) -> Self {
        Self { package, outcome }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, VersionOutcome::Failed(_))
    }
}

/// Totals for a run.
///
/// Skipped versions count as succeeded; `skipped` tracks how many of the
/// successes were skips.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub reports: Vec<VersionReport>,
}

impl BatchSummary {
    /// Add one version's report to the totals.
    pub fn record(&mut self, report: VersionReport) {
        match report.outcome {
            VersionOutcome::Generated { .. } => self.succeeded += 1,
            VersionOutcome::Skipped => {
                self.succeeded += 1;
                self.skipped += 1;
            }
            VersionOutcome::Failed(_) => self.failed += 1,
        }
        self.reports.push(report);
    }

    /// Fold another summary into this one.
    pub fn merge(&mut self, other: BatchSummary) {
        for report in other.reports {
            self.record(report);
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// True when no version failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &VersionReport> {
        self.reports.iter().filter(|r| r.is_failure())
    }
}
