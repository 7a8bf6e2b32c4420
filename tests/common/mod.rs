//! Shared fixtures for integration tests.

#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

pub fn tar_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, path, *data).unwrap();
    }
    builder.into_inner().unwrap()
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// A `.gem` container: `metadata.gz` plus `data.tar.gz`.
pub fn gem_bytes(metadata: &str, files: &[(&str, &[u8])]) -> Vec<u8> {
    let data = gzip(&tar_bytes(files));
    let meta = gzip(metadata.as_bytes());
    tar_bytes(&[("metadata.gz", &meta), ("data.tar.gz", &data)])
}

pub fn gemspec(name: &str, version: &str, requirements: &[&str]) -> String {
    let mut spec = format!(
        "--- !ruby/object:Gem::Specification\nname: {}\nversion: !ruby/object:Gem::Version\n  version: {}\n",
        name, version
    );
    if requirements.is_empty() {
        spec.push_str("requirements: []\n");
    } else {
        spec.push_str("requirements:\n");
        for requirement in requirements {
            spec.push_str(&format!("- {}\n", requirement));
        }
    }
    spec
}
