//! Hint extraction from free-text documentation.
//!
//! READMEs describe native requirements in prose ("requires libxml2",
//! "run `apt-get install libpq-dev`"). Each rule below is a regex whose first
//! capture group is a candidate name. Rules are not exclusive: every rule runs
//! over the whole text and the results are unioned.

use regex::Regex;
use std::sync::LazyLock;

use super::{lazy_regex, lookup, HintExtractor, HintSet};

/// Free-text rules as (name, regex_pattern), applied in order.
pub const FREE_TEXT_RULES: &[(&str, &str)] = &[
    (
        "requirement_verb",
        r"(?i)\b(?:requires?|needs?|depends\s+on)\s+(?:the\s+|an?\s+)?([a-z0-9][a-z0-9_+.-]*)",
    ),
    (
        "package_manager_install",
        r"(?i)\b(?:apt-get|apt|yum|dnf|brew|apk|pacman|port|zypper)\s+(?:install|add|-S)\s+(?:-{1,2}[a-z][a-z-]*\s+)*([a-z0-9][a-z0-9_+.-]*)",
    ),
    ("dev_package", r"(?i)\b([a-z0-9][a-z0-9_+.-]*?)-dev(?:el)?\b"),
    ("lib_token", r"(?i)\b(lib[a-z0-9_+-]+)"),
    (
        "section_list",
        r"(?im)^[ \t]*(?:#{1,6}|={1,6})[ \t]*(?:system[ \t]+)?(?:requirements|dependencies|prerequisites)\b[^\n]*\n(?:[ \t]*\n)*[ \t]*(?:[-*+]|\d+\.)[ \t]+`?([A-Za-z0-9][A-Za-z0-9_+.-]*)",
    ),
    ("install_proper_noun", r"\b[Ii]nstall(?:ing)?\s+([A-Z][A-Za-z0-9]+)\b"),
    (
        "known_product",
        r"(?i)\b(postgresql|postgres|mysql|mariadb|sqlite3?|redis|mongodb|imagemagick|graphicsmagick|ffmpeg|libvips|openssl|zlib|libffi|libyaml|libxml2|libxslt|libcurl|curl|freetds|unixodbc|libsodium|libgit2|cmake|gtk[23]?)\b",
    ),
];

/// Aliases applied after suffix stripping. An alias wins outright.
pub const FREE_TEXT_ALIASES: &[(&str, &'static str)] = &[
    ("postgres", "postgresql"),
    ("pg", "postgresql"),
    ("psql", "postgresql"),
    ("libpq", "postgresql"),
    ("mysqlclient", "mysql"),
    ("libmysqlclient", "mysql"),
    ("sqlite", "sqlite3"),
    ("libsqlite3", "sqlite3"),
    ("magick", "imagemagick"),
    ("libmagickwand", "imagemagick"),
    ("ssl", "openssl"),
    ("libssl", "openssl"),
    ("libcurl", "curl"),
    ("libz", "zlib"),
    ("zlib1g", "zlib"),
    ("libxml", "libxml2"),
    ("libxslt1", "libxslt"),
    ("vips", "libvips"),
];

/// Generic, ecosystem, and documentation words that are never hints.
pub const DENYLIST: &[&str] = &[
    "the", "and", "for", "with", "this", "that", "your", "you", "all", "any", "are", "not", "can",
    "from", "into", "also", "using", "use", "some", "other", "etc", "more", "following", "ruby",
    "rubygems", "gem", "gems", "gemfile", "bundle", "bundler", "rails", "rake", "jruby", "rbx",
    "readme", "license", "changelog", "documentation", "docs", "install", "installation",
    "installed", "version", "versions", "package", "packages", "system", "library", "libraries",
    "lib", "libs", "header", "headers", "development", "dev", "devel", "native", "extension",
    "extensions", "build", "make", "gcc", "compiler", "support", "file", "files", "code", "sudo",
    "git", "http", "https", "www", "com", "org", "github", "ruby-dev", "ruby-devel",
];

lazy_regex!(RE_VALID_HINT, r"^[a-z0-9_-]{3,}$");

static COMPILED_RULES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    FREE_TEXT_RULES
        .iter()
        .map(|(name, pattern)| (*name, Regex::new(pattern).unwrap()))
        .collect()
});

/// Strip every trailing `-dev` / `-devel` suffix.
fn strip_dev_suffix(mut name: &str) -> &str {
    loop {
        if let Some(stem) = name.strip_suffix("-devel") {
            name = stem;
        } else if let Some(stem) = name.strip_suffix("-dev") {
            name = stem;
        } else {
            return name;
        }
    }
}

/// Normalize a raw candidate into a hint.
///
/// Trims, lowercases, strips `-dev`/`-devel`, then resolves aliases. A
/// candidate without an alias must look like a package name and must not be
/// on the [`DENYLIST`]. The denylist is consulted only for un-aliased names.
///
/// # Example
///
/// ```
/// use gemlibs::extract::free_text::normalize;
///
/// assert_eq!(normalize(" LibPQ-dev "), Some("postgresql".to_string()));
/// assert_eq!(normalize("libxml2."), Some("libxml2".to_string()));
/// assert_eq!(normalize("Ruby"), None);
/// ```
pub fn normalize(candidate: &str) -> Option<String> {
    let cleaned = candidate
        .trim()
        .trim_matches(|c: char| {
            matches!(
                c,
                '.' | ',' | ';' | ':' | '!' | '?' | '`' | '"' | '\'' | '(' | ')' | '*'
            )
        })
        .to_lowercase();
    let stem = strip_dev_suffix(&cleaned);

    if let Some(alias) = lookup(FREE_TEXT_ALIASES, stem) {
        return Some(alias.to_string());
    }

    if !RE_VALID_HINT.is_match(stem) || DENYLIST.contains(&stem) {
        return None;
    }

    Some(stem.to_string())
}

/// Extracts hints from README-style documentation.
///
/// # Example
///
/// ```
/// use gemlibs::extract::{FreeTextExtractor, HintExtractor};
///
/// let hints = FreeTextExtractor::new().extract("This gem requires libxml2.");
/// assert!(hints.contains("libxml2"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FreeTextExtractor;

impl FreeTextExtractor {
    /// Create a free-text extractor.
    pub fn new() -> Self {
        Self
    }
}

impl HintExtractor for FreeTextExtractor {
    fn name(&self) -> &str {
        "free-text"
    }

    fn extract(&self, text: &str) -> HintSet {
        let mut hints = HintSet::new();
        if text.trim().is_empty() {
            return hints;
        }

        for (rule, regex) in COMPILED_RULES.iter() {
            for caps in regex.captures_iter(text) {
                let Some(candidate) = caps.get(1) else {
                    continue;
                };
                match normalize(candidate.as_str()) {
                    Some(hint) => {
                        if hints.insert(hint.clone()) {
                            tracing::trace!("{} matched '{}' -> {}", rule, candidate.as_str(), hint);
                        }
                    }
                    None => tracing::trace!("{} discarded '{}'", rule, candidate.as_str()),
                }
            }
        }

        hints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> HintSet {
        FreeTextExtractor::new().extract(text)
    }

    #[test]
    fn all_rules_compile() {
        assert_eq!(COMPILED_RULES.len(), FREE_TEXT_RULES.len());
    }

    #[test]
    fn readme_sentence_yields_libraries_and_alias() {
        let hints =
            extract("This gem requires libxml2 and libxslt. Run apt-get install libpq-dev.");
        assert!(hints.contains("libxml2"));
        assert!(hints.contains("libxslt"));
        assert!(hints.contains("postgresql"));
        assert_eq!(hints.len(), 3, "unexpected hints: {:?}", hints.sorted());
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(extract("").is_empty());
        assert!(extract("   \n\t").is_empty());
    }

    #[test]
    fn package_manager_install_skips_flags() {
        let hints = extract("sudo apt-get install -y libmagickwand-dev");
        assert!(hints.contains("imagemagick"));

        let hints = extract("brew install freetds");
        assert!(hints.contains("freetds"));
    }

    #[test]
    fn devel_suffix_is_stripped() {
        let hints = extract("On Fedora: yum install sqlite-devel");
        assert!(hints.contains("sqlite3"));
        assert!(!hints.contains("sqlite-devel"));
    }

    #[test]
    fn section_header_list_first_item() {
        let text = "# Foo\n\n## Requirements\n\n* FreeTDS 0.91 or later\n* something else\n";
        assert!(extract(text).contains("freetds"));

        let rdoc = "= Dependencies\n- unixODBC\n";
        assert!(extract(rdoc).contains("unixodbc"));
    }

    #[test]
    fn install_proper_noun_is_case_sensitive() {
        assert!(extract("Install ImageMagick first.").contains("imagemagick"));
        assert!(extract("Install Ruby 3.2").is_empty());
        assert!(!extract("we install things").contains("things"));
    }

    #[test]
    fn known_products_match_case_insensitively() {
        let hints = extract("Works with PostgreSQL, MySQL and Redis.");
        assert!(hints.contains("postgresql"));
        assert!(hints.contains("mysql"));
        assert!(hints.contains("redis"));
    }

    #[test]
    fn generic_words_are_denied() {
        let hints = extract("This library requires the Ruby headers. It needs bundler.");
        assert!(hints.is_empty(), "unexpected hints: {:?}", hints.sorted());
    }

    #[test]
    fn normalization_is_a_fixed_point() {
        for raw in ["libxml2", "FreeTDS-dev", "libfoo-dev-dev", "cmake.", "unixodbc"] {
            let once = normalize(raw).unwrap();
            assert_eq!(normalize(&once), Some(once.clone()), "not fixed for {}", raw);
        }
    }

    #[test]
    fn short_and_malformed_candidates_are_discarded() {
        assert_eq!(normalize("qt"), None);
        assert_eq!(normalize("libstdc++"), None);
        assert_eq!(normalize("foo.bar"), None);
    }

    #[test]
    fn alias_is_checked_before_denylist_and_length() {
        // "pg" is too short to pass validation, but the alias still applies.
        assert_eq!(normalize("pg"), Some("postgresql".to_string()));
        // "libssl" is aliased even though "lib"-words are often generic.
        assert_eq!(normalize("libssl-dev"), Some("openssl".to_string()));
        // Denied words have no alias and are dropped.
        assert_eq!(normalize("library"), None);
        assert_eq!(normalize("ruby-dev"), None);
    }
}
