//! Artifact fetching.
//!
//! This module retrieves gem version lists and archives from a RubyGems
//! server and turns an archive into a [`RawArtifact`]:
//!
//! - [`HttpFetcher`] - blocking HTTP with retry and linear backoff
//! - [`archive`] - gem container reading with a layered-walk fallback
//! - [`RubyGemsFetcher`] - the [`PackageSource`] backed by the two, with an
//!   on-disk archive cache

pub mod archive;
pub mod http;
pub mod rubygems;

pub use http::{HttpFetcher, RetryPolicy};
pub use rubygems::RubyGemsFetcher;

use crate::error::Result;
use crate::record::PackageIdentity;

/// The raw texts retrieved for one gem version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArtifact {
    /// README contents, if the archive has one.
    pub documentation_text: Option<String>,
    /// `extconf.rb` contents, if the archive has one.
    pub build_config_text: Option<String>,
    /// The gemspec `requirements` entries.
    pub requirements: Vec<String>,
    /// Archive paths the texts were read from.
    pub sources: Vec<String>,
}

impl RawArtifact {
    /// Whether nothing was found.
    pub fn is_empty(&self) -> bool {
        self.documentation_text.is_none()
            && self.build_config_text.is_none()
            && self.requirements.is_empty()
    }
}

/// A source of gem versions and artifacts.
pub trait PackageSource {
    /// Available versions of a gem, newest first.
    fn list_versions(&self, name: &str) -> Result<Vec<String>>;

    /// Retrieve the artifact texts for one gem version.
    fn fetch(&self, package: &PackageIdentity) -> Result<RawArtifact>;
}
