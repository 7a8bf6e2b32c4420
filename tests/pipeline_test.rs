//! End-to-end pipeline tests against a mock RubyGems server.

mod common;

use common::{gem_bytes, gemspec, gzip, tar_bytes};
use gemlibs::cache::CacheStore;
use gemlibs::fetch::{HttpFetcher, RetryPolicy, RubyGemsFetcher};
use gemlibs::matcher::DependencyMatcher;
use gemlibs::orchestrator::{Orchestrator, RunOptions, VersionSelection};
use gemlibs::record::{PackageIdentity, RecordStore};
use httpmock::prelude::*;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

const NOKOGIRI_README: &[u8] =
    b"This gem requires libxml2 and libxslt. Run apt-get install libpq-dev.\n";

fn orchestrator(
    server: &MockServer,
    temp: &TempDir,
    rules: Option<&Path>,
) -> Orchestrator<RubyGemsFetcher> {
    let http = HttpFetcher::with_options(
        Duration::from_secs(5),
        RetryPolicy::new(1, Duration::from_millis(1)),
    )
    .unwrap();
    let fetcher = RubyGemsFetcher::new(
        http,
        CacheStore::new(temp.path().join("cache")),
        server.base_url(),
        server.base_url(),
    );
    Orchestrator::new(
        fetcher,
        DependencyMatcher::from_rules_file(rules),
        RecordStore::new(temp.path().join("gems")),
    )
}

fn mock_versions(server: &MockServer, name: &str, versions: &[&str]) {
    let body = serde_json::to_string(
        &versions
            .iter()
            .map(|v| serde_json::json!({ "number": v, "platform": "ruby" }))
            .collect::<Vec<_>>(),
    )
    .unwrap();
    let path = format!("/api/v1/versions/{}.json", name);
    server.mock(|when, then| {
        when.method(GET).path(path.as_str());
        then.status(200).body(body);
    });
}

fn read_record(temp: &TempDir, name: &str, version: &str) -> serde_json::Value {
    let path = temp
        .path()
        .join("gems")
        .join(name)
        .join(format!("{}.json", version));
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn readme_hints_become_a_record() {
    let server = MockServer::start();
    mock_versions(&server, "demo", &["1.0.0"]);
    let archive = server.mock(|when, then| {
        when.method(GET).path("/gems/demo-1.0.0.gem");
        then.status(200).body(gem_bytes(
            &gemspec("demo", "1.0.0", &[]),
            &[("README.md", NOKOGIRI_README), ("lib/demo.rb", b"module Demo; end")],
        ));
    });

    let temp = TempDir::new().unwrap();
    let orch = orchestrator(&server, &temp, None);
    let summary = orch.process_package("demo", &RunOptions::default());

    assert!(summary.is_success());
    archive.assert_calls(1);

    let record = read_record(&temp, "demo", "1.0.0");
    assert_eq!(record["gem"], "demo");
    assert_eq!(record["version"], "1.0.0");
    assert_eq!(
        record["dependencies"],
        serde_json::json!(["libxml2", "libxslt", "postgresql"])
    );
    assert_eq!(record["confidence"], "medium");
    assert_eq!(record["generator"], "gemlibs");
    assert!(record["generated_at"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn second_run_skips_existing_records() {
    let server = MockServer::start();
    mock_versions(&server, "pg", &["1.5.4"]);
    let archive = server.mock(|when, then| {
        when.method(GET).path("/gems/pg-1.5.4.gem");
        then.status(200).body(gem_bytes(
            &gemspec("pg", "1.5.4", &[]),
            &[("ext/pg/extconf.rb", b"have_library('pq')\nhave_header('zlib.h')\n")],
        ));
    });

    let temp = TempDir::new().unwrap();
    let orch = orchestrator(&server, &temp, None);

    let first = orch.process_package("pg", &RunOptions::default());
    assert_eq!((first.succeeded, first.skipped), (1, 0));
    let written = std::fs::read_to_string(temp.path().join("gems/pg/1.5.4.json")).unwrap();

    let second = orch.process_package("pg", &RunOptions::default());
    assert_eq!((second.succeeded, second.skipped), (1, 1));
    archive.assert_calls(1);

    let unchanged = std::fs::read_to_string(temp.path().join("gems/pg/1.5.4.json")).unwrap();
    assert_eq!(written, unchanged);
    assert_eq!(
        read_record(&temp, "pg", "1.5.4")["dependencies"],
        serde_json::json!(["postgresql", "zlib"])
    );
}

#[test]
fn one_broken_archive_does_not_stop_other_versions() {
    let server = MockServer::start();
    mock_versions(&server, "demo", &["2.0.0", "1.0.0"]);
    let broken = server.mock(|when, then| {
        when.method(GET).path("/gems/demo-2.0.0.gem");
        then.status(500);
    });
    server.mock(|when, then| {
        when.method(GET).path("/gems/demo-1.0.0.gem");
        then.status(200).body(gem_bytes(
            &gemspec("demo", "1.0.0", &[]),
            &[("README.md", NOKOGIRI_README)],
        ));
    });

    let temp = TempDir::new().unwrap();
    let orch = orchestrator(&server, &temp, None);
    let options = RunOptions {
        selection: VersionSelection::All,
        overwrite: false,
    };
    let summary = orch.process_package("demo", &options);

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    // One retry after the first attempt.
    broken.assert_calls(2);

    let failure = summary.failures().next().unwrap();
    assert_eq!(failure.package, PackageIdentity::new("demo", "2.0.0"));
    assert!(!temp.path().join("gems/demo/2.0.0.json").exists());
    assert!(temp.path().join("gems/demo/1.0.0.json").exists());
}

#[test]
fn six_build_libraries_give_high_confidence() {
    let server = MockServer::start();
    mock_versions(&server, "kitchen-sink", &["0.1.0"]);
    let extconf = b"require 'mkmf'\n\
        have_library('pq')\n\
        have_library('xml2')\n\
        have_library('xslt')\n\
        have_library('ssl')\n\
        have_library('z')\n\
        have_library('ffi')\n\
        create_makefile('kitchen_sink')\n";
    server.mock(|when, then| {
        when.method(GET).path("/gems/kitchen-sink-0.1.0.gem");
        then.status(200).body(gem_bytes(
            &gemspec("kitchen-sink", "0.1.0", &[]),
            &[("ext/kitchen_sink/extconf.rb", extconf.as_slice())],
        ));
    });

    let temp = TempDir::new().unwrap();
    orchestrator(&server, &temp, None).process_package("kitchen-sink", &RunOptions::default());

    let record = read_record(&temp, "kitchen-sink", "0.1.0");
    assert_eq!(
        record["dependencies"],
        serde_json::json!(["libffi", "libxml2", "libxslt", "openssl", "postgresql", "zlib"])
    );
    assert_eq!(record["confidence"], "high");
}

#[test]
fn gemspec_requirements_are_used() {
    let server = MockServer::start();
    mock_versions(&server, "rmagick", &["5.3.0"]);
    server.mock(|when, then| {
        when.method(GET).path("/gems/rmagick-5.3.0.gem");
        then.status(200).body(gem_bytes(
            &gemspec("rmagick", "5.3.0", &["ImageMagick 6.4.9 or later"]),
            &[("lib/rmagick.rb", b"require 'RMagick2.so'")],
        ));
    });

    let temp = TempDir::new().unwrap();
    orchestrator(&server, &temp, None).process_package("rmagick", &RunOptions::default());

    let record = read_record(&temp, "rmagick", "5.3.0");
    assert_eq!(record["dependencies"], serde_json::json!(["imagemagick"]));
    assert_eq!(record["confidence"], "low");
}

#[test]
fn pure_ruby_gem_is_unknown() {
    let server = MockServer::start();
    mock_versions(&server, "rake", &["13.1.0"]);
    server.mock(|when, then| {
        when.method(GET).path("/gems/rake-13.1.0.gem");
        then.status(200).body(gem_bytes(
            &gemspec("rake", "13.1.0", &[]),
            &[("lib/rake.rb", b"module Rake; end")],
        ));
    });

    let temp = TempDir::new().unwrap();
    orchestrator(&server, &temp, None).process_package("rake", &RunOptions::default());

    let record = read_record(&temp, "rake", "13.1.0");
    assert_eq!(record["dependencies"], serde_json::json!([]));
    assert_eq!(record["confidence"], "unknown");
}

#[test]
fn plain_tarball_falls_back_to_layered_walk() {
    let server = MockServer::start();
    mock_versions(&server, "legacy", &["0.9.0"]);
    let inner = gzip(&tar_bytes(&[(
        "legacy-0.9.0/ext/extconf.rb",
        b"have_library('sqlite3')",
    )]));
    server.mock(|when, then| {
        when.method(GET).path("/gems/legacy-0.9.0.gem");
        then.status(200).body(inner);
    });

    let temp = TempDir::new().unwrap();
    orchestrator(&server, &temp, None).process_package("legacy", &RunOptions::default());

    assert_eq!(
        read_record(&temp, "legacy", "0.9.0")["dependencies"],
        serde_json::json!(["sqlite3"])
    );
}

#[test]
fn custom_rules_file_replaces_defaults() {
    let server = MockServer::start();
    mock_versions(&server, "demo", &["1.0.0"]);
    server.mock(|when, then| {
        when.method(GET).path("/gems/demo-1.0.0.gem");
        then.status(200).body(gem_bytes(
            &gemspec("demo", "1.0.0", &[]),
            &[("README.md", NOKOGIRI_README)],
        ));
    });

    let temp = TempDir::new().unwrap();
    let rules = temp.path().join("rules.yml");
    std::fs::write(&rules, "mappings:\n  libxml2: xml-stack\n").unwrap();

    orchestrator(&server, &temp, Some(&rules)).process_package("demo", &RunOptions::default());

    // postgresql has no rule and no "lib" substring, so it is dropped.
    assert_eq!(
        read_record(&temp, "demo", "1.0.0")["dependencies"],
        serde_json::json!(["libxslt", "xml-stack"])
    );
}

#[test]
fn malformed_rules_file_falls_back_to_defaults() {
    let server = MockServer::start();
    mock_versions(&server, "demo", &["1.0.0"]);
    server.mock(|when, then| {
        when.method(GET).path("/gems/demo-1.0.0.gem");
        then.status(200).body(gem_bytes(
            &gemspec("demo", "1.0.0", &[]),
            &[("README.md", NOKOGIRI_README)],
        ));
    });

    let temp = TempDir::new().unwrap();
    let rules = temp.path().join("rules.yml");
    std::fs::write(&rules, "patterns:\n  - pattern: '('\n    category: broken\n").unwrap();

    orchestrator(&server, &temp, Some(&rules)).process_package("demo", &RunOptions::default());

    assert_eq!(
        read_record(&temp, "demo", "1.0.0")["dependencies"],
        serde_json::json!(["libxml2", "libxslt", "postgresql"])
    );
}

#[test]
fn batch_counts_across_gems() {
    let server = MockServer::start();
    mock_versions(&server, "rake", &["13.1.0"]);
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/versions/ghost.json");
        then.status(404);
    });
    server.mock(|when, then| {
        when.method(GET).path("/gems/rake-13.1.0.gem");
        then.status(200)
            .body(gem_bytes(&gemspec("rake", "13.1.0", &[]), &[]));
    });

    let temp = TempDir::new().unwrap();
    let summary = orchestrator(&server, &temp, None)
        .process_batch(["ghost", "rake"], &RunOptions::default());

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.total(), 2);
}
