//! Cache entry type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A cached gem archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Cache key (`name-version`).
    pub key: String,
    /// Path to the cached archive.
    pub content_path: PathBuf,
    /// When this entry was cached.
    pub cached_at: DateTime<Utc>,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Hex-encoded SHA-256 of the archive.
    pub sha256: String,
}

impl CacheEntry {
    /// Create a new cache entry stamped with the current time.
    pub fn new(
        key: impl Into<String>,
        content_path: impl Into<PathBuf>,
        size_bytes: u64,
        sha256: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            content_path: content_path.into(),
            cached_at: Utc::now(),
            size_bytes,
            sha256: sha256.into(),
        }
    }

    /// Get the age of this entry.
    pub fn age(&self) -> chrono::Duration {
        Utc::now().signed_duration_since(self.cached_at)
    }
}
