//! Hint extraction from `extconf.rb` build scripts.
//!
//! mkmf calls name their libraries in string literals. Each rule anchors on a
//! call's literal argument: `have_library('pq')`, `pkg_config("libxml-2.0")`,
//! `$libs << " -lssl"`, and so on.

use regex::Regex;
use std::sync::LazyLock;

use super::{lazy_regex, lookup, HintExtractor, HintSet};

/// Library-name rules as (name, regex_pattern).
pub const LIBRARY_RULES: &[(&str, &str)] = &[
    ("have_library", r#"\bhave_library\s*\(?\s*['"]([^'"]+)['"]"#),
    ("find_library", r#"\bfind_library\s*\(?\s*['"]([^'"]+)['"]"#),
    ("pkg_config", r#"\bpkg_config\s*\(?\s*['"]([^'"]+)['"]"#),
    ("dir_config", r#"\bdir_config\s*\(?\s*['"]([^'"]+)['"]"#),
    ("linker_flag", r#"(?:['"]|\s)-l([A-Za-z][A-Za-z0-9_+-]*)"#),
    (
        "linker_append",
        r#"\$(?:libs|LIBS|local_libs|LOCAL_LIBS)\s*(?:<<|\+=)\s*['"]\s*-l([A-Za-z0-9_+-]+)"#,
    ),
];

/// Library aliases, keyed by name with any `lib` prefix removed.
pub const LIBRARY_ALIASES: &[(&str, &'static str)] = &[
    ("pq", "postgresql"),
    ("pg", "postgresql"),
    ("ssl", "openssl"),
    ("crypto", "openssl"),
    ("openssl", "openssl"),
    ("z", "zlib"),
    ("zlib", "zlib"),
    ("xml2", "libxml2"),
    ("xml-2.0", "libxml2"),
    ("xslt", "libxslt"),
    ("exslt", "libxslt"),
    ("sqlite3", "sqlite3"),
    ("mysqlclient", "mysql"),
    ("mysql", "mysql"),
    ("curl", "curl"),
    ("ffi", "libffi"),
    ("magickwand", "imagemagick"),
    ("magickcore", "imagemagick"),
    ("hiredis", "redis"),
    ("mongoc-1.0", "mongodb"),
    ("avcodec", "ffmpeg"),
    ("avformat", "ffmpeg"),
    ("avutil", "ffmpeg"),
    ("swscale", "ffmpeg"),
];

/// Known header files and the dependency each implies.
pub const HEADER_MAPPINGS: &[(&str, &'static str)] = &[
    ("libpq-fe.h", "postgresql"),
    ("pg_config.h", "postgresql"),
    ("postgres.h", "postgresql"),
    ("mysql.h", "mysql"),
    ("mysql/mysql.h", "mysql"),
    ("sqlite3.h", "sqlite3"),
    ("zlib.h", "zlib"),
    ("openssl/ssl.h", "openssl"),
    ("openssl/evp.h", "openssl"),
    ("openssl/crypto.h", "openssl"),
    ("libxml/parser.h", "libxml2"),
    ("libxml/tree.h", "libxml2"),
    ("libxml/xmlversion.h", "libxml2"),
    ("libxslt/xslt.h", "libxslt"),
    ("libxslt/transform.h", "libxslt"),
    ("libexslt/exslt.h", "libxslt"),
    ("ffi.h", "libffi"),
    ("curl/curl.h", "curl"),
    ("yaml.h", "libyaml"),
    ("magickwand/magickwand.h", "imagemagick"),
    ("wand/magickwand.h", "imagemagick"),
    ("hiredis/hiredis.h", "redis"),
    ("libavcodec/avcodec.h", "ffmpeg"),
    ("libavformat/avformat.h", "ffmpeg"),
];

lazy_regex!(
    RE_HEADER_CHECK,
    r#"\b(?:have_header|find_header|check_header)\s*\(?\s*['"]([^'"]+)['"]"#
);
lazy_regex!(RE_VALID_LIBRARY, r"^[a-z0-9_-]{2,}$");

static COMPILED_RULES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    LIBRARY_RULES
        .iter()
        .map(|(name, pattern)| (*name, Regex::new(pattern).unwrap()))
        .collect()
});

/// Normalize a library name from a build-config call.
///
/// # Example
///
/// ```
/// use gemlibs::extract::build_config::normalize_library;
///
/// assert_eq!(normalize_library("pq"), Some("postgresql".to_string()));
/// assert_eq!(normalize_library("libgmp"), Some("libgmp".to_string()));
/// assert_eq!(normalize_library("glib-2.0"), None);
/// ```
pub fn normalize_library(name: &str) -> Option<String> {
    let lower = name.trim().to_lowercase();
    let bare = lower.strip_prefix("lib").unwrap_or(&lower);

    if let Some(alias) = lookup(LIBRARY_ALIASES, bare) {
        return Some(alias.to_string());
    }

    let prefixed = format!("lib{}", bare);
    RE_VALID_LIBRARY.is_match(&prefixed).then_some(prefixed)
}

/// Map a header path to a dependency name.
///
/// Known headers use [`HEADER_MAPPINGS`]. Unknown headers inside a directory
/// whose name starts with `lib` yield that directory name.
pub fn header_dependency(header: &str) -> Option<String> {
    let header = header.trim().to_lowercase();

    if let Some(dep) = lookup(HEADER_MAPPINGS, &header) {
        return Some(dep.to_string());
    }

    let (leading, _) = header.split_once('/')?;
    (leading.starts_with("lib") && RE_VALID_LIBRARY.is_match(leading)).then(|| leading.to_string())
}

/// Extracts hints from `extconf.rb` build scripts.
#[derive(Debug, Clone, Default)]
pub struct BuildConfigExtractor;

impl BuildConfigExtractor {
    /// Create a build-config extractor.
    pub fn new() -> Self {
        Self
    }
}

impl HintExtractor for BuildConfigExtractor {
    fn name(&self) -> &str {
        "build-config"
    }

    fn extract(&self, text: &str) -> HintSet {
        let mut hints = HintSet::new();
        if text.trim().is_empty() {
            return hints;
        }

        for (rule, regex) in COMPILED_RULES.iter() {
            for caps in regex.captures_iter(text) {
                let Some(name) = caps.get(1) else {
                    continue;
                };
                match normalize_library(name.as_str()) {
                    Some(hint) => {
                        if hints.insert(hint.clone()) {
                            tracing::trace!("{} matched '{}' -> {}", rule, name.as_str(), hint);
                        }
                    }
                    None => tracing::trace!("{} discarded '{}'", rule, name.as_str()),
                }
            }
        }

        for caps in RE_HEADER_CHECK.captures_iter(text) {
            let Some(header) = caps.get(1) else {
                continue;
            };
            match header_dependency(header.as_str()) {
                Some(hint) => {
                    hints.insert(hint);
                }
                None => tracing::trace!("unknown header '{}'", header.as_str()),
            }
        }

        hints
    }
}
