//! Gem archive caching.
//!
//! Downloaded `.gem` archives are immutable per name and version, so they are
//! cached on disk under a `name-version` key and reused on later runs. Each
//! archive has a JSON sidecar recording its size and SHA-256 checksum.

pub mod entry;
pub mod store;

pub use entry::CacheEntry;
pub use store::CacheStore;

/// Get the default cache directory.
pub fn default_cache_dir() -> std::path::PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("gemlibs")
        .join("gems")
}

/// Format a duration as a short human-readable age (e.g., "3h", "2d").
pub fn format_age(duration: chrono::Duration) -> String {
    let secs = duration.num_seconds().max(0);
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86400)
    }
}
