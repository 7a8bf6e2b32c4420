//! RubyGems-backed package source.

use serde::Deserialize;

use super::archive::read_artifact;
use super::{HttpFetcher, PackageSource, RawArtifact};
use crate::cache::CacheStore;
use crate::config::Settings;
use crate::error::{GemlibsError, Result};
use crate::record::PackageIdentity;

/// One entry of the versions API response.
#[derive(Debug, Deserialize)]
struct VersionEntry {
    number: String,
}

/// Fetches version lists and gem archives from a RubyGems server.
///
/// Archives are cached by `name-version` and reused on later calls.
pub struct RubyGemsFetcher {
    http: HttpFetcher,
    cache: CacheStore,
    api_url: String,
    download_url: String,
}

impl RubyGemsFetcher {
    /// Create a fetcher.
    pub fn new(
        http: HttpFetcher,
        cache: CacheStore,
        api_url: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            cache,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            download_url: download_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a fetcher from application settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let http = HttpFetcher::with_options(settings.timeout(), settings.retry_policy())?;
        Ok(Self::new(
            http,
            CacheStore::new(&settings.cache_dir),
            &settings.api_url,
            &settings.download_url,
        ))
    }

    /// URL of the versions endpoint for a gem.
    pub fn versions_url(&self, name: &str) -> String {
        format!("{}/api/v1/versions/{}.json", self.api_url, name)
    }

    /// URL of the archive for a gem version.
    pub fn archive_url(&self, package: &PackageIdentity) -> String {
        format!("{}/gems/{}.gem", self.download_url, package.key())
    }

    /// The archive cache.
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Get a gem archive, from cache when possible.
    ///
    /// An unreadable cache entry is dropped and the archive downloaded again.
    pub fn download(&self, package: &PackageIdentity) -> Result<Vec<u8>> {
        package.validate()?;
        let key = package.key();
        match self.cache.get(&key) {
            Ok(Some(bytes)) => {
                tracing::debug!("Using cached archive for {}", key);
                return Ok(bytes);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Discarding cached archive {}: {:#}", key, e);
                if let Err(e) = self.cache.remove(&key) {
                    tracing::warn!("Could not remove cached archive {}: {}", key, e);
                }
            }
        }

        let url = self.archive_url(package);
        tracing::debug!("Downloading {}", url);
        let bytes = self.http.get_bytes(&url).map_err(|e| match e {
            GemlibsError::NotFound { .. } => GemlibsError::NotFound {
                what: format!("archive for {}", package),
            },
            other => other,
        })?;

        if let Err(e) = self.cache.store(&key, &bytes) {
            tracing::warn!("Could not cache archive {}: {}", key, e);
        }
        Ok(bytes)
    }
}

impl PackageSource for RubyGemsFetcher {
    fn list_versions(&self, name: &str) -> Result<Vec<String>> {
        let entries: Vec<VersionEntry> =
            self.http.get_json(&self.versions_url(name)).map_err(|e| match e {
                GemlibsError::NotFound { .. } => GemlibsError::NotFound {
                    what: format!("gem '{}'", name),
                },
                other => other,
            })?;

        // Platform builds repeat a version number; keep the first of each.
        let mut versions: Vec<String> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !versions.contains(&entry.number) {
                versions.push(entry.number);
            }
        }

        if versions.is_empty() {
            return Err(GemlibsError::NotFound {
                what: format!("versions for gem '{}'", name),
            });
        }
        Ok(versions)
    }

    fn fetch(&self, package: &PackageIdentity) -> Result<RawArtifact> {
        let bytes = self.download(package)?;
        Ok(read_artifact(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::archive::tests::gem_bytes;
    use crate::fetch::RetryPolicy;
    use httpmock::prelude::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn fetcher(server: &MockServer, cache_dir: &std::path::Path) -> RubyGemsFetcher {
        let http = HttpFetcher::with_options(
            Duration::from_secs(5),
            RetryPolicy::new(3, Duration::from_millis(1)),
        )
        .unwrap();
        RubyGemsFetcher::new(
            http,
            CacheStore::new(cache_dir),
            server.base_url(),
            server.base_url(),
        )
    }

    #[test]
    fn urls_follow_rubygems_layout() {
        let temp = TempDir::new().unwrap();
        let fetcher = RubyGemsFetcher::new(
            HttpFetcher::new().unwrap(),
            CacheStore::new(temp.path()),
            "https://rubygems.org/",
            "https://rubygems.org",
        );
        assert_eq!(
            fetcher.versions_url("pg"),
            "https://rubygems.org/api/v1/versions/pg.json"
        );
        assert_eq!(
            fetcher.archive_url(&PackageIdentity::new("pg", "1.5.4")),
            "https://rubygems.org/gems/pg-1.5.4.gem"
        );
    }

    #[test]
    fn lists_versions_in_upstream_order() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/versions/nokogiri.json");
            then.status(200).body(
                r#"[
                    {"number": "1.16.0", "platform": "x86_64-linux"},
                    {"number": "1.16.0", "platform": "ruby"},
                    {"number": "1.15.5", "platform": "ruby"}
                ]"#,
            );
        });

        let temp = TempDir::new().unwrap();
        let versions = fetcher(&server, temp.path())
            .list_versions("nokogiri")
            .unwrap();
        assert_eq!(versions, vec!["1.16.0", "1.15.5"]);
    }

    #[test]
    fn empty_version_list_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/versions/ghost.json");
            then.status(200).body("[]");
        });

        let temp = TempDir::new().unwrap();
        let err = fetcher(&server, temp.path())
            .list_versions("ghost")
            .unwrap_err();
        assert!(matches!(err, GemlibsError::NotFound { .. }));
    }

    #[test]
    fn fetch_reads_archive_and_caches_it() {
        let server = MockServer::start();
        let gem = gem_bytes("--- {}\n", &[("ext/pg/extconf.rb", b"have_library('pq')")]);
        let mock = server.mock(|when, then| {
            when.method(GET).path("/gems/pg-1.5.4.gem");
            then.status(200).body(gem.clone());
        });

        let temp = TempDir::new().unwrap();
        let fetcher = fetcher(&server, temp.path());
        let package = PackageIdentity::new("pg", "1.5.4");

        let artifact = fetcher.fetch(&package).unwrap();
        assert_eq!(artifact.build_config_text.as_deref(), Some("have_library('pq')"));

        let again = fetcher.fetch(&package).unwrap();
        assert_eq!(again, artifact);
        mock.assert_calls(1);
        assert!(temp.path().join("pg-1.5.4.gem").is_file());
    }

    #[test]
    fn corrupt_cache_metadata_triggers_a_fresh_download() {
        let server = MockServer::start();
        let gem = gem_bytes("--- {}\n", &[("ext/pg/extconf.rb", b"have_library('pq')")]);
        let mock = server.mock(|when, then| {
            when.method(GET).path("/gems/pg-1.0.0.gem");
            then.status(200).body(gem.clone());
        });

        let temp = TempDir::new().unwrap();
        let fetcher = fetcher(&server, temp.path());
        fetcher.cache().store("pg-1.0.0", b"stale").unwrap();
        std::fs::write(temp.path().join("pg-1.0.0.meta.json"), "{ truncated").unwrap();

        let artifact = fetcher.fetch(&PackageIdentity::new("pg", "1.0.0")).unwrap();
        assert_eq!(artifact.build_config_text.as_deref(), Some("have_library('pq')"));
        mock.assert_calls(1);

        // The re-downloaded archive replaced the broken entry.
        assert_eq!(fetcher.cache().get("pg-1.0.0").unwrap(), Some(gem));
    }

    #[test]
    fn unsafe_identity_is_rejected_before_download() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET);
            then.status(200);
        });

        let temp = TempDir::new().unwrap();
        let err = fetcher(&server, temp.path())
            .fetch(&PackageIdentity::new("pg", "../../escaped"))
            .unwrap_err();
        assert!(matches!(err, GemlibsError::InvalidIdentity { .. }));
        mock.assert_calls(0);
    }

    #[test]
    fn missing_archive_is_not_found() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/gems/pg-0.0.0.gem");
            then.status(404);
        });

        let temp = TempDir::new().unwrap();
        let err = fetcher(&server, temp.path())
            .fetch(&PackageIdentity::new("pg", "0.0.0"))
            .unwrap_err();
        assert!(err.to_string().contains("pg 0.0.0"));
        mock.assert_calls(1);
    }
}
