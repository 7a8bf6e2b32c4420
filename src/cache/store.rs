//! Cache storage implementation.

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::entry::CacheEntry;
use crate::record::is_path_component;

/// Storage for cached gem archives.
pub struct CacheStore {
    /// Root directory for cache.
    root: PathBuf,
}

/// Hex-encoded SHA-256 of some bytes.
pub fn checksum(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    hex::encode(&hash[..])
}

impl CacheStore {
    /// Create a new cache store.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensure the cache directory exists.
    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create cache directory {:?}", self.root))
    }

    /// Reject keys that would resolve outside the cache root.
    fn check_key(key: &str) -> Result<()> {
        if !is_path_component(key) {
            bail!("Invalid cache key {:?}", key);
        }
        Ok(())
    }

    /// Get the path for storing an archive.
    pub fn content_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.gem", key))
    }

    /// Get the metadata file path for an entry.
    fn metadata_path(&self, key: &str) -> PathBuf {
        self.content_path(key).with_extension("meta.json")
    }

    /// Write bytes to `path` via a temporary file in the cache root.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let mut temp = tempfile::NamedTempFile::new_in(&self.root)?;
        temp.write_all(bytes)?;
        temp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to write cache file {:?}", path))?;
        Ok(())
    }

    /// Store an archive and return its cache entry.
    pub fn store(&self, key: &str, bytes: &[u8]) -> Result<CacheEntry> {
        Self::check_key(key)?;
        self.ensure_dir()?;

        let content_path = self.content_path(key);
        self.write_atomic(&content_path, bytes)?;

        let entry = CacheEntry::new(key, &content_path, bytes.len() as u64, checksum(bytes));
        let json = serde_json::to_string_pretty(&entry)?;
        self.write_atomic(&self.metadata_path(key), json.as_bytes())?;

        Ok(entry)
    }

    /// Load a cached entry's metadata.
    pub fn load(&self, key: &str) -> Result<Option<CacheEntry>> {
        Self::check_key(key)?;
        let meta_path = self.metadata_path(key);

        if !meta_path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&meta_path)?;
        let entry: CacheEntry = serde_json::from_str(&json)
            .with_context(|| format!("Corrupt cache metadata {:?}", meta_path))?;

        Ok(Some(entry))
    }

    /// Read a cached archive, verifying its checksum.
    ///
    /// Returns `None` when the content is missing or no longer matches the
    /// recorded checksum.
    pub fn read_verified(&self, entry: &CacheEntry) -> Result<Option<Vec<u8>>> {
        if !entry.content_path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&entry.content_path).with_context(|| {
            format!(
                "Failed to read cached archive from {:?}",
                entry.content_path
            )
        })?;

        if checksum(&bytes) != entry.sha256 {
            tracing::warn!("Cached archive {} is corrupt, discarding", entry.key);
            return Ok(None);
        }

        Ok(Some(bytes))
    }

    /// Get a cached archive by key, if present and intact.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.load(key)? {
            Some(entry) => self.read_verified(&entry),
            None => Ok(None),
        }
    }

    /// Remove a cached entry.
    pub fn remove(&self, key: &str) -> Result<bool> {
        Self::check_key(key)?;
        let content_path = self.content_path(key);
        let meta_path = self.metadata_path(key);

        let mut removed = false;

        if content_path.exists() {
            fs::remove_file(&content_path)?;
            removed = true;
        }

        if meta_path.exists() {
            fs::remove_file(&meta_path)?;
            removed = true;
        }

        Ok(removed)
    }

    /// List all cached entries, newest first.
    pub fn list(&self) -> Result<Vec<CacheEntry>> {
        self.ensure_dir()?;

        let mut entries = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().is_some_and(|e| e == "json") {
                if let Ok(json) = fs::read_to_string(&path) {
                    if let Ok(cache_entry) = serde_json::from_str::<CacheEntry>(&json) {
                        entries.push(cache_entry);
                    }
                }
            }
        }

        entries.sort_by(|a, b| b.cached_at.cmp(&a.cached_at));
        Ok(entries)
    }

    /// Clear all cached entries.
    pub fn clear(&self) -> Result<usize> {
        let entries = self.list()?;
        let count = entries.len();

        for entry in entries {
            let _ = self.remove(&entry.key);
        }

        Ok(count)
    }

    /// Get total cache size in bytes.
    pub fn total_size(&self) -> Result<u64> {
        let entries = self.list()?;
        Ok(entries.iter().map(|e| e.size_bytes).sum())
    }
}
