//! Settings file discovery and loading.

use crate::config::schema::Settings;
use crate::error::{GemlibsError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file looked up in the working directory.
pub const SETTINGS_FILE_NAME: &str = "gemlibs.yml";

/// Find `gemlibs.yml` in the given directory.
pub fn find_settings_file(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(SETTINGS_FILE_NAME);
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Parse YAML content into Settings.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_settings(content: &str, source_path: &Path) -> Result<Settings> {
    // An empty file is valid and means "all defaults".
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }

    serde_yaml::from_str(content).map_err(|e| GemlibsError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a single settings file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GemlibsError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            GemlibsError::Io(e)
        }
    })?;

    parse_settings(&content, path)
}

/// Load settings with optional path override.
///
/// An explicit path must exist. Otherwise `gemlibs.yml` in `working_dir` is
/// used if present, and defaults if not.
pub fn load_settings(working_dir: &Path, config_override: Option<&Path>) -> Result<Settings> {
    if let Some(path) = config_override {
        return load_settings_file(path);
    }

    match find_settings_file(working_dir) {
        Some(path) => {
            tracing::debug!("Loading settings from {}", path.display());
            load_settings_file(&path)
        }
        None => Ok(Settings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn discover_finds_settings_file() {
        let temp = TempDir::new().unwrap();
        assert!(find_settings_file(temp.path()).is_none());

        fs::write(temp.path().join(SETTINGS_FILE_NAME), "max_retries: 0").unwrap();
        assert!(find_settings_file(temp.path()).is_some());
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = load_settings(temp.path(), None).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_discovered_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(SETTINGS_FILE_NAME),
            "api_url: http://localhost:9292\n",
        )
        .unwrap();

        let settings = load_settings(temp.path(), None).unwrap();
        assert_eq!(settings.api_url, "http://localhost:9292");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = load_settings(temp.path(), Some(&temp.path().join("nope.yml"))).unwrap_err();
        assert!(matches!(err, GemlibsError::ConfigNotFound { .. }));
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let err = parse_settings("max_retries: [", Path::new("/etc/gemlibs.yml")).unwrap_err();
        match err {
            GemlibsError::ConfigParseError { path, .. } => {
                assert_eq!(path, PathBuf::from("/etc/gemlibs.yml"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_file_means_defaults() {
        let settings = parse_settings("\n", Path::new("gemlibs.yml")).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
