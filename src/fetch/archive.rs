//! Gem archive reading.
//!
//! A `.gem` file is a tar archive holding `metadata.gz` (a gzipped YAML
//! gemspec) and `data.tar.gz` (the packaged files). Reading tries that layout
//! first. If the outer container is not a gem, a layered walk decompresses
//! gzip layers and descends into nested tarballs instead. When both fail the
//! artifact is empty.

use flate2::read::GzDecoder;
use std::io::Read;
use std::path::Path;

use super::RawArtifact;
use crate::error::{GemlibsError, Result};

/// Maximum nesting depth for the layered walk.
pub const MAX_LAYER_DEPTH: usize = 4;

/// Largest decompressed layer or nested archive the walk will buffer.
pub const MAX_LAYER_BYTES: u64 = 64 * 1024 * 1024;

/// README, `extconf.rb` and gemspec texts are cut off at this size.
pub const MAX_TEXT_BYTES: u64 = 1024 * 1024;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

fn extraction_error(message: impl std::fmt::Display) -> GemlibsError {
    GemlibsError::Extraction {
        message: message.to_string(),
    }
}

/// Buffer a whole layer, failing if it is larger than `limit`.
fn read_layer(reader: impl Read, limit: u64) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut bytes)
        .map_err(extraction_error)?;
    if bytes.len() as u64 > limit {
        return Err(extraction_error(format!("layer larger than {} bytes", limit)));
    }
    Ok(bytes)
}

/// Whether an archive path is a README at the root or one directory deep.
fn is_documentation(path: &Path) -> bool {
    path.components().count() <= 2
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.to_lowercase().starts_with("readme"))
}

fn is_build_config(path: &Path) -> bool {
    path.file_name().is_some_and(|n| n == "extconf.rb")
}

fn is_metadata(path: &Path) -> bool {
    path.file_name().is_some_and(|n| n == "metadata.gz")
}

fn is_nested_archive(path: &Path) -> bool {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_lowercase();
    name.ends_with(".tar") || name.ends_with(".tar.gz") || name.ends_with(".tgz")
}

/// Pull the `requirements` list out of a YAML gemspec.
///
/// Gemspecs are tagged (`!ruby/object:Gem::Specification`); tags are
/// unwrapped before lookup. Anything unexpected yields an empty list.
pub fn parse_requirements(yaml: &str) -> Vec<String> {
    fn untag(value: &serde_yaml::Value) -> &serde_yaml::Value {
        match value {
            serde_yaml::Value::Tagged(tagged) => untag(&tagged.value),
            other => other,
        }
    }

    let value: serde_yaml::Value = match serde_yaml::from_str(yaml) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Unreadable gemspec metadata: {}", e);
            return Vec::new();
        }
    };

    untag(&value)
        .get("requirements")
        .map(untag)
        .and_then(|r| r.as_sequence())
        .map(|seq| {
            seq.iter()
                .filter_map(|item| untag(item).as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Accumulates artifact texts until both have been found.
#[derive(Debug, Default)]
struct Collector {
    artifact: RawArtifact,
}

impl Collector {
    fn is_complete(&self) -> bool {
        self.artifact.documentation_text.is_some() && self.artifact.build_config_text.is_some()
    }

    /// Offer an archive entry. Returns `true` if it was consumed.
    fn offer(&mut self, path: &Path, reader: &mut impl Read) -> Result<bool> {
        let wants_doc = self.artifact.documentation_text.is_none() && is_documentation(path);
        let wants_build = self.artifact.build_config_text.is_none() && is_build_config(path);
        if !wants_doc && !wants_build {
            return Ok(false);
        }

        let mut bytes = Vec::new();
        reader.take(MAX_TEXT_BYTES).read_to_end(&mut bytes)?;
        let text = String::from_utf8_lossy(&bytes).into_owned();

        if wants_doc {
            self.artifact.documentation_text = Some(text);
        } else {
            self.artifact.build_config_text = Some(text);
        }
        self.artifact.sources.push(path.display().to_string());
        Ok(true)
    }

    fn offer_metadata(&mut self, reader: impl Read) {
        let mut yaml = Vec::new();
        match GzDecoder::new(reader)
            .take(MAX_TEXT_BYTES)
            .read_to_end(&mut yaml)
        {
            Ok(_) => {
                self.artifact.requirements = parse_requirements(&String::from_utf8_lossy(&yaml))
            }
            Err(e) => tracing::debug!("Unreadable metadata.gz: {}", e),
        }
    }
}

/// Scan a tar stream, offering each entry to the collector.
fn scan_tar(reader: impl Read, collector: &mut Collector) -> Result<()> {
    let mut archive = tar::Archive::new(reader);
    for entry in archive.entries().map_err(extraction_error)? {
        let mut entry = entry.map_err(extraction_error)?;
        let path = entry.path().map_err(extraction_error)?.into_owned();
        collector.offer(&path, &mut entry)?;
        if collector.is_complete() {
            break;
        }
    }
    Ok(())
}

/// Primary method: a gem container with `data.tar.gz`.
fn read_gem_container(bytes: &[u8]) -> Result<RawArtifact> {
    let mut collector = Collector::default();
    let mut archive = tar::Archive::new(bytes);
    let mut found_data = false;

    for entry in archive.entries().map_err(extraction_error)? {
        let mut entry = entry.map_err(extraction_error)?;
        let path = entry.path().map_err(extraction_error)?.into_owned();

        if path == Path::new("metadata.gz") {
            collector.offer_metadata(&mut entry);
        } else if path == Path::new("data.tar.gz") {
            found_data = true;
            scan_tar(GzDecoder::new(&mut entry), &mut collector)?;
            break;
        }
    }

    if !found_data {
        return Err(extraction_error("no data.tar.gz in gem container"));
    }
    Ok(collector.artifact)
}

/// Secondary method: walk gzip and tar layers wherever they lead.
fn walk_layers(bytes: &[u8], collector: &mut Collector, depth: usize) -> Result<()> {
    if depth > MAX_LAYER_DEPTH {
        return Ok(());
    }

    if bytes.starts_with(&GZIP_MAGIC) {
        let inflated = read_layer(GzDecoder::new(bytes), MAX_LAYER_BYTES)?;
        return walk_layers(&inflated, collector, depth + 1);
    }

    let mut archive = tar::Archive::new(bytes);
    let mut saw_entry = false;

    for entry in archive.entries().map_err(extraction_error)? {
        let mut entry = entry.map_err(extraction_error)?;
        saw_entry = true;
        let path = entry.path().map_err(extraction_error)?.into_owned();

        if is_metadata(&path) {
            collector.offer_metadata(&mut entry);
        } else if !collector.offer(&path, &mut entry)? && is_nested_archive(&path) {
            let walked = read_layer(&mut entry, MAX_LAYER_BYTES)
                .and_then(|nested| walk_layers(&nested, collector, depth + 1));
            if let Err(e) = walked {
                tracing::debug!("Skipping nested archive {}: {}", path.display(), e);
            }
        }

        if collector.is_complete() {
            break;
        }
    }

    if !saw_entry {
        return Err(extraction_error("not a tar archive"));
    }
    Ok(())
}

fn read_layered(bytes: &[u8]) -> Result<RawArtifact> {
    let mut collector = Collector::default();
    walk_layers(bytes, &mut collector, 0)?;
    Ok(collector.artifact)
}

/// Read the documentation and build-config texts from an archive.
///
/// Never fails: an archive neither method can read yields an empty artifact.
pub fn read_artifact(bytes: &[u8]) -> RawArtifact {
    let result = read_gem_container(bytes).or_else(|primary| {
        tracing::debug!("Not a gem container ({}), walking layers", primary);
        read_layered(bytes)
    });

    match result {
        Ok(artifact) => artifact,
        Err(e) => {
            tracing::warn!("{}; treating archive as empty", e);
            RawArtifact::default()
        }
    }
}
