//! Pipeline orchestration.
//!
//! The [`Orchestrator`] drives one gem version at a time through
//! fetch → extract → match → generate → persist. Failures are isolated per
//! version: one bad gem never aborts a batch.

pub mod summary;

pub use summary::{BatchSummary, VersionOutcome, VersionReport};

use crate::error::{GemlibsError, Result};
use crate::extract::{BuildConfigExtractor, FreeTextExtractor, HintExtractor, HintSet};
use crate::fetch::{PackageSource, RawArtifact};
use crate::matcher::DependencyMatcher;
use crate::record::{DependencyRecord, PackageIdentity, RecordStore};

/// Which versions of a gem to process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionSelection {
    /// Only the newest version.
    #[default]
    Latest,
    /// Every published version.
    All,
    /// The newest `n` versions.
    Limit(usize),
    /// One specific version.
    Exact(String),
}

/// Options for a run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Which versions to process.
    pub selection: VersionSelection,
    /// Regenerate records that already exist.
    pub overwrite: bool,
}

/// Drives the detection pipeline against a package source.
pub struct Orchestrator<S: PackageSource> {
    source: S,
    matcher: DependencyMatcher,
    store: RecordStore,
    free_text: FreeTextExtractor,
    build_config: BuildConfigExtractor,
}

impl<S: PackageSource> Orchestrator<S> {
    /// Create an orchestrator.
    pub fn new(source: S, matcher: DependencyMatcher, store: RecordStore) -> Self {
        Self {
            source,
            matcher,
            store,
            free_text: FreeTextExtractor::new(),
            build_config: BuildConfigExtractor::new(),
        }
    }

    /// The package source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The record store.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Extract and union hints from every text in an artifact.
    pub fn collect_hints(&self, artifact: &RawArtifact) -> HintSet {
        let mut hints = HintSet::new();

        if let Some(doc) = artifact.documentation_text.as_deref() {
            hints.extend(self.free_text.extract(doc));
        }
        for requirement in &artifact.requirements {
            hints.extend(self.free_text.extract(requirement));
        }
        if let Some(build) = artifact.build_config_text.as_deref() {
            hints.extend(self.build_config.extract(build));
        }

        hints
    }

    /// Turn an artifact into a record without persisting it.
    pub fn analyze(&self, package: PackageIdentity, artifact: &RawArtifact) -> DependencyRecord {
        let hints = self.collect_hints(artifact);
        tracing::debug!("{}: hints {:?}", package, hints.sorted());

        let dependencies = self.matcher.match_hints(&hints);
        let notes = provenance_notes(artifact, hints.len());
        DependencyRecord::generate(package, dependencies, Some(notes))
    }

    /// Process one version: skip if persisted, else run the full pipeline.
    pub fn process_version(
        &self,
        package: &PackageIdentity,
        overwrite: bool,
    ) -> Result<VersionOutcome> {
        package.validate()?;
        if !overwrite && self.store.exists(package) {
            return Ok(VersionOutcome::Skipped);
        }

        let artifact = self.source.fetch(package)?;
        let record = self.analyze(package.clone(), &artifact);
        let path = self.store.save(&record)?;

        Ok(VersionOutcome::Generated {
            path,
            dependencies: record.dependencies().iter().cloned().collect(),
            confidence: record.confidence(),
        })
    }

    /// Resolve the versions a run should cover.
    fn select_versions(&self, name: &str, selection: &VersionSelection) -> Result<Vec<String>> {
        let versions = self.source.list_versions(name)?;

        let selected = match selection {
            VersionSelection::Latest => versions.into_iter().take(1).collect(),
            VersionSelection::All => versions,
            VersionSelection::Limit(n) => versions.into_iter().take(*n).collect(),
            VersionSelection::Exact(version) => {
                if !versions.contains(version) {
                    return Err(GemlibsError::NotFound {
                        what: format!("version {} of gem '{}'", version, name),
                    });
                }
                vec![version.clone()]
            }
        };

        Ok(selected)
    }

    /// Process every selected version of one gem.
    pub fn process_package(&self, name: &str, options: &RunOptions) -> BatchSummary {
        let mut summary = BatchSummary::default();

        let requested = match &options.selection {
            VersionSelection::Exact(version) => PackageIdentity::new(name, version.clone()),
            _ => PackageIdentity::new(name, "*"),
        };
        if let Err(e) = requested.validate() {
            tracing::debug!("{}: {}", requested, e);
            summary.record(VersionReport::new(requested, VersionOutcome::Failed(e.to_string())));
            return summary;
        }

        // A persisted exact version needs no network access at all.
        if let VersionSelection::Exact(version) = &options.selection {
            let package = PackageIdentity::new(name, version.clone());
            if !options.overwrite && self.store.exists(&package) {
                tracing::debug!("{}: already generated, skipping", package);
                summary.record(VersionReport::new(package, VersionOutcome::Skipped));
                return summary;
            }
        }

        let versions = match self.select_versions(name, &options.selection) {
            Ok(versions) => versions,
            Err(e) => {
                tracing::debug!("{}: {}", name, e);
                summary.record(VersionReport::new(
                    requested,
                    VersionOutcome::Failed(e.to_string()),
                ));
                return summary;
            }
        };

        for version in versions {
            let package = PackageIdentity::new(name, version);
            let outcome = match self.process_version(&package, options.overwrite) {
                Ok(outcome) => outcome,
                Err(e) => VersionOutcome::Failed(e.to_string()),
            };

            match &outcome {
                VersionOutcome::Generated {
                    dependencies,
                    confidence,
                    ..
                } => tracing::debug!(
                    "{}: {} dependencies ({}) [{}]",
                    package,
                    dependencies.len(),
                    confidence,
                    dependencies.join(", ")
                ),
                VersionOutcome::Skipped => {
                    tracing::debug!("{}: already generated, skipping", package)
                }
                VersionOutcome::Failed(message) => tracing::debug!("{}: {}", package, message),
            }

            summary.record(VersionReport::new(package, outcome));
        }

        summary
    }

    /// Process several gems, continuing past failures.
    pub fn process_batch<I, N>(&self, names: I, options: &RunOptions) -> BatchSummary
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let mut summary = BatchSummary::default();
        for name in names {
            summary.merge(self.process_package(name.as_ref(), options));
        }
        summary
    }
}

/// Deterministic provenance text for a record.
fn provenance_notes(artifact: &RawArtifact, hint_count: usize) -> String {
    let mut sources = artifact.sources.clone();
    if !artifact.requirements.is_empty() {
        sources.push("gemspec requirements".to_string());
    }

    if sources.is_empty() {
        return "No documentation or build configuration found".to_string();
    }

    format!(
        "Detected from {} ({} hint{})",
        sources.join(", "),
        hint_count,
        if hint_count == 1 { "" } else { "s" }
    )
}
