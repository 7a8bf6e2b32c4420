//! Application settings.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! Matcher rules live in their own file and are loaded by
//! [`crate::matcher::RuleSet`].
//!
//! # Example
//!
//! ```
//! use gemlibs::config::load_settings;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("gemlibs.yml"), "output_dir: records").unwrap();
//!
//! let settings = load_settings(temp.path(), None).unwrap();
//! assert_eq!(settings.output_dir, std::path::PathBuf::from("records"));
//! ```

pub mod loader;
pub mod schema;

pub use loader::{
    find_settings_file, load_settings, load_settings_file, parse_settings, SETTINGS_FILE_NAME,
};
pub use schema::Settings;
