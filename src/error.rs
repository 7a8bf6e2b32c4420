//! Error types for gemlibs operations.
//!
//! This module defines [`GemlibsError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Fetch errors are split into [`GemlibsError::TransientFetch`] (retried)
//!   and [`GemlibsError::NotFound`] (surfaced immediately)
//! - Rule configuration problems never surface; the matcher falls back to
//!   built-in rules instead
//! - Use `anyhow::Error` (via `GemlibsError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for gemlibs operations.
#[derive(Debug, Error)]
pub enum GemlibsError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Network or HTTP failure that may succeed on retry.
    #[error("Fetching {url} failed: {message}")]
    TransientFetch { url: String, message: String },

    /// The gem, its version list, or the requested archive does not exist.
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// A gem name or version that cannot name a file.
    #[error("Invalid gem name or version: '{value}'")]
    InvalidIdentity { value: String },

    /// A gem archive could not be read by any extraction method.
    #[error("Could not extract archive: {message}")]
    Extraction { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GemlibsError {
    /// Whether retrying the operation could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, GemlibsError::TransientFetch { .. })
    }
}

/// Result type alias for gemlibs operations.
pub type Result<T> = std::result::Result<T, GemlibsError>;
