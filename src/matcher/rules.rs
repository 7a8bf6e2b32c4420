//! Rule set loading and built-in defaults.
//!
//! Rules come from a YAML file with two top-level keys:
//!
//! ```yaml
//! mappings:
//!   libpq: postgresql
//! patterns:
//!   - pattern: '\bpostgres'
//!     category: postgresql
//! ```
//!
//! Pattern order is significant: the first matching pattern wins.

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GemlibsError, Result};

/// Built-in direct mappings as (hint, category).
pub const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    ("libpq", "postgresql"),
    ("pg", "postgresql"),
    ("mysql2", "mysql"),
    ("libmysqlclient", "mysql"),
    ("mariadb", "mysql"),
    ("sqlite", "sqlite3"),
    ("libxml", "libxml2"),
    ("ssl", "openssl"),
    ("libssl", "openssl"),
    ("magick", "imagemagick"),
    ("rmagick", "imagemagick"),
    ("libcurl", "curl"),
    ("ffi", "libffi"),
    ("hiredis", "redis"),
    ("mongo", "mongodb"),
    ("libavcodec", "ffmpeg"),
];

/// Built-in pattern rules as (pattern, category), in evaluation order.
pub const DEFAULT_PATTERNS: &[(&str, &str)] = &[
    (r"\bpostgres", "postgresql"),
    (r"mysql|mariadb", "mysql"),
    (r"sqlite", "sqlite3"),
    (r"libxml", "libxml2"),
    (r"xslt", "libxslt"),
    (r"\bzlib", "zlib"),
    (r"openssl|\bssl\b", "openssl"),
    (r"magick", "imagemagick"),
    (r"curl", "curl"),
    (r"ffi\b", "libffi"),
    (r"redis", "redis"),
    (r"mongo", "mongodb"),
    (r"ffmpeg|libav", "ffmpeg"),
];

/// Where a rule set was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    /// Loaded from a rules file.
    File(PathBuf),
    /// Built-in defaults.
    BuiltIn,
}

/// An ordered pattern rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Case-insensitive regex tested against the hint.
    pub regex: Regex,
    /// Category assigned when the regex matches.
    pub category: String,
}

/// Immutable rule set shared by all matching calls.
#[derive(Debug, Clone)]
pub struct RuleSet {
    mappings: HashMap<String, String>,
    patterns: Vec<PatternRule>,
    source: RuleSource,
}

/// On-disk rules file shape.
#[derive(Debug, Deserialize)]
struct RulesFile {
    #[serde(default)]
    mappings: BTreeMap<String, String>,
    #[serde(default)]
    patterns: Vec<PatternEntry>,
}

#[derive(Debug, Deserialize)]
struct PatternEntry {
    pattern: String,
    category: String,
}

fn compile_pattern(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

impl RuleSet {
    /// The built-in default rule set.
    pub fn builtin() -> Self {
        let mappings = DEFAULT_MAPPINGS
            .iter()
            .map(|(hint, category)| (hint.to_string(), category.to_string()))
            .collect();

        let patterns = DEFAULT_PATTERNS
            .iter()
            .map(|(pattern, category)| PatternRule {
                regex: compile_pattern(pattern).unwrap(),
                category: category.to_string(),
            })
            .collect();

        Self {
            mappings,
            patterns,
            source: RuleSource::BuiltIn,
        }
    }

    /// Parse a rule set from YAML content.
    ///
    /// `path` is used for error messages and as the recorded source.
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self> {
        let parse_error = |message: String| GemlibsError::ConfigParseError {
            path: path.to_path_buf(),
            message,
        };

        let file: RulesFile =
            serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;

        let patterns = file
            .patterns
            .into_iter()
            .map(|entry| {
                compile_pattern(&entry.pattern)
                    .map(|regex| PatternRule {
                        regex,
                        category: entry.category,
                    })
                    .map_err(|e| parse_error(format!("invalid pattern '{}': {}", entry.pattern, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            mappings: file.mappings.into_iter().collect(),
            patterns,
            source: RuleSource::File(path.to_path_buf()),
        })
    }

    /// Load a rule set from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if the file doesn't exist.
    /// Returns `ConfigParseError` if the YAML or a pattern is invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GemlibsError::ConfigNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                GemlibsError::Io(e)
            }
        })?;

        Self::from_yaml(&content, path)
    }

    /// Load a rule set, substituting the built-in defaults on any failure.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No rules file configured, using built-in rules");
            return Self::builtin();
        };

        match Self::load(path) {
            Ok(rules) => {
                tracing::debug!(
                    "Loaded {} mappings and {} patterns from {}",
                    rules.mappings.len(),
                    rules.patterns.len(),
                    path.display()
                );
                rules
            }
            Err(e) => {
                tracing::warn!("{}; using built-in rules", e);
                Self::builtin()
            }
        }
    }

    /// Look up a direct mapping.
    pub fn direct(&self, hint: &str) -> Option<&str> {
        self.mappings.get(hint).map(String::as_str)
    }

    /// Pattern rules in evaluation order.
    pub fn patterns(&self) -> &[PatternRule] {
        &self.patterns
    }

    /// Number of direct mappings.
    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    /// Where these rules came from.
    pub fn source(&self) -> &RuleSource {
        &self.source
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}
