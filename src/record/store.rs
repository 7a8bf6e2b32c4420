//! Record persistence.

use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{DependencyRecord, PackageIdentity, RecordDocument};
use crate::error::Result;

/// Storage for persisted dependency records.
///
/// Each record lives at `{root}/{gem}/{version}.json`.
#[derive(Debug, Clone)]
pub struct RecordStore {
    root: PathBuf,
}

impl RecordStore {
    /// Create a record store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the output root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record for a package version.
    pub fn record_path(&self, package: &PackageIdentity) -> PathBuf {
        self.root
            .join(&package.name)
            .join(format!("{}.json", package.version))
    }

    /// Whether a record has already been persisted.
    pub fn exists(&self, package: &PackageIdentity) -> bool {
        package.validate().is_ok() && self.record_path(package).is_file()
    }

    /// Persist a record, replacing any previous file.
    ///
    /// The JSON is written to a temporary file in the target directory and
    /// renamed into place.
    pub fn save(&self, record: &DependencyRecord) -> Result<PathBuf> {
        record.package().validate()?;
        let path = self.record_path(record.package());
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {:?}", dir))?;

        let mut json = serde_json::to_string_pretty(&record.to_document())?;
        json.push('\n');

        let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
        temp.write_all(json.as_bytes())?;
        temp.persist(&path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to write record {:?}", path))?;

        Ok(path)
    }

    /// Load a persisted record, if present.
    pub fn load(&self, package: &PackageIdentity) -> Result<Option<RecordDocument>> {
        package.validate()?;
        let path = self.record_path(package);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }
}
