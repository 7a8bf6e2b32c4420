//! Settings schema for `gemlibs.yml`.
//!
//! Every key is optional; missing keys take their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::RetryPolicy;

fn default_api_url() -> String {
    "https://rubygems.org".to_string()
}

fn default_cache_dir() -> PathBuf {
    crate::cache::default_cache_dir()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("gems")
}

fn default_rules_path() -> PathBuf {
    PathBuf::from("rules.yml")
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    500
}

fn default_timeout_secs() -> u64 {
    30
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Base URL of the RubyGems API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL gem archives are downloaded from.
    #[serde(default = "default_api_url")]
    pub download_url: String,

    /// Directory for cached gem archives.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Directory records are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Matcher rules file.
    #[serde(default = "default_rules_path")]
    pub rules_path: PathBuf,

    /// Retries for transient fetch failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff unit between retries, in milliseconds.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            download_url: default_api_url(),
            cache_dir: default_cache_dir(),
            output_dir: default_output_dir(),
            rules_path: default_rules_path(),
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Settings {
    /// Retry policy for HTTP fetches.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.backoff_ms))
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api_url, "https://rubygems.org");
        assert_eq!(settings.output_dir, PathBuf::from("gems"));
        assert_eq!(settings.rules_path, PathBuf::from("rules.yml"));
        assert_eq!(settings.retry_policy(), RetryPolicy::default());
        assert_eq!(settings.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let settings: Settings = serde_yaml::from_str("output_dir: out\nmax_retries: 1\n").unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("out"));
        assert_eq!(settings.max_retries, 1);
        assert_eq!(settings.backoff_ms, 500);
        assert_eq!(settings.api_url, "https://rubygems.org");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<Settings, _> = serde_yaml::from_str("outptu_dir: typo\n");
        assert!(result.is_err());
    }
}
