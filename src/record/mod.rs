//! Dependency records.
//!
//! A [`DependencyRecord`] is the final output for one gem version: the
//! sorted set of native dependency categories with a count-derived
//! [`Confidence`]. Records are persisted as JSON by [`RecordStore`].

pub mod store;

pub use store::RecordStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{GemlibsError, Result};

/// Identifier written into every persisted record.
pub const GENERATOR: &str = "gemlibs";

/// A gem name and version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageIdentity {
    pub name: String,
    pub version: String,
}

impl PackageIdentity {
    /// Create a package identity.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Cache and log key (`name-version`).
    pub fn key(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// Check that name and version are each a single path component.
    ///
    /// Both end up in record and cache file names.
    pub fn validate(&self) -> Result<()> {
        for value in [&self.name, &self.version] {
            if !is_path_component(value) {
                return Err(GemlibsError::InvalidIdentity {
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Whether `value` names exactly one file inside a directory.
pub fn is_path_component(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains(['/', '\\', '\0'])
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// How many dependencies were detected, as a coarse triage signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Unknown,
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Confidence for a dependency count.
    ///
    /// 0 is unknown, 1-2 low, 3-5 medium, 6 or more high.
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Self::Unknown,
            1..=2 => Self::Low,
            3..=5 => Self::Medium,
            _ => Self::High,
        }
    }

    /// Lowercase name as persisted.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The detected native dependencies of one gem version.
///
/// Confidence is derived from the dependency count when the record is
/// generated and cannot be set separately.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyRecord {
    package: PackageIdentity,
    dependencies: BTreeSet<String>,
    confidence: Confidence,
    generated_at: DateTime<Utc>,
    notes: Option<String>,
}

impl DependencyRecord {
    /// Generate a record, stamping it with the current time.
    ///
    /// # Example
    ///
    /// ```
    /// use gemlibs::record::{Confidence, DependencyRecord, PackageIdentity};
    ///
    /// let record = DependencyRecord::generate(
    ///     PackageIdentity::new("pg", "1.5.4"),
    ///     ["postgresql", "postgresql"],
    ///     None,
    /// );
    /// assert_eq!(record.dependencies().len(), 1);
    /// assert_eq!(record.confidence(), Confidence::Low);
    /// ```
    pub fn generate<I, S>(package: PackageIdentity, dependencies: I, notes: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::generate_at(package, dependencies, notes, Utc::now())
    }

    /// Generate a record with an explicit timestamp.
    pub fn generate_at<I, S>(
        package: PackageIdentity,
        dependencies: I,
        notes: Option<String>,
        generated_at: DateTime<Utc>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dependencies: BTreeSet<String> = dependencies.into_iter().map(Into::into).collect();
        let confidence = Confidence::from_count(dependencies.len());

        Self {
            package,
            dependencies,
            confidence,
            generated_at,
            notes,
        }
    }

    pub fn package(&self) -> &PackageIdentity {
        &self.package
    }

    /// Dependencies in ascending order.
    pub fn dependencies(&self) -> &BTreeSet<String> {
        &self.dependencies
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// The persisted JSON shape of this record.
    pub fn to_document(&self) -> RecordDocument {
        RecordDocument {
            gem: self.package.name.clone(),
            version: self.package.version.clone(),
            dependencies: self.dependencies.iter().cloned().collect(),
            generated_at: self.generated_at,
            generator: GENERATOR.to_string(),
            confidence: self.confidence,
            notes: self.notes.clone(),
        }
    }
}

/// A record as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDocument {
    pub gem: String,
    pub version: String,
    pub dependencies: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub generator: String,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
