//! Dependency hint extraction.
//!
//! Extractors scan raw text for mentions of native libraries and return
//! normalized candidate names ("hints"). Two extractors exist:
//!
//! - [`FreeTextExtractor`] for README-style prose
//! - [`BuildConfigExtractor`] for `extconf.rb` build scripts
//!
//! Both are infallible: empty input yields an empty [`HintSet`].

pub mod build_config;
pub mod free_text;
pub mod hint;

pub use build_config::BuildConfigExtractor;
pub use free_text::FreeTextExtractor;
pub use hint::HintSet;

/// Trait for hint extractors.
pub trait HintExtractor {
    /// The name of this extractor.
    fn name(&self) -> &str;

    /// Extract hints from raw text.
    fn extract(&self, text: &str) -> HintSet;
}

/// Compile a static regex on first use.
macro_rules! lazy_regex {
    ($name:ident, $pattern:expr) => {
        static $name: std::sync::LazyLock<regex::Regex> =
            std::sync::LazyLock::new(|| regex::Regex::new($pattern).unwrap());
    };
}

pub(crate) use lazy_regex;

/// Look up a key in a static `(key, value)` table.
pub(crate) fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}
