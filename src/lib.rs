//! gemlibs - Native dependency detection for RubyGems packages.
//!
//! gemlibs downloads gem archives, reads their README, `extconf.rb`, and
//! gemspec requirements, and writes one JSON record per gem version naming
//! the system libraries the gem needs to build.
//!
//! # Modules
//!
//! - [`cache`] - On-disk gem archive cache
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings loading
//! - [`error`] - Error types and result aliases
//! - [`extract`] - Hint extraction from documentation and build scripts
//! - [`fetch`] - Version listing, archive download, and archive reading
//! - [`matcher`] - Hint to dependency category matching
//! - [`orchestrator`] - Per-version pipeline and batch runs
//! - [`record`] - Dependency records and their JSON store
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use gemlibs::extract::{BuildConfigExtractor, FreeTextExtractor, HintExtractor};
//! use gemlibs::matcher::DependencyMatcher;
//! use gemlibs::record::{Confidence, DependencyRecord, PackageIdentity};
//!
//! let mut hints = FreeTextExtractor::new().extract("Requires libxml2 and libxslt.");
//! hints.extend(BuildConfigExtractor::new().extract("have_library('pq')"));
//!
//! let deps = DependencyMatcher::builtin().match_hints(&hints);
//! let record = DependencyRecord::generate(PackageIdentity::new("demo", "1.0.0"), deps, None);
//!
//! let names: Vec<&str> = record.dependencies().iter().map(String::as_str).collect();
//! assert_eq!(names, ["libxml2", "libxslt", "postgresql"]);
//! assert_eq!(record.confidence(), Confidence::Medium);
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod matcher;
pub mod orchestrator;
pub mod record;
pub mod ui;

pub use error::{GemlibsError, Result};
