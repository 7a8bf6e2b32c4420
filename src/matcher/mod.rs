//! Dependency matching.
//!
//! Maps hints to canonical categories using a layered [`RuleSet`]:
//!
//! 1. Direct mappings (exact hint match)
//! 2. Pattern rules, first match in declaration order
//! 3. Fallback: hints containing `lib` pass through unchanged
//!
//! Hints matching none of these are dropped.

pub mod rules;

pub use rules::{PatternRule, RuleSet, RuleSource, DEFAULT_MAPPINGS, DEFAULT_PATTERNS};

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use crate::extract::HintSet;

/// Which rule layer produced a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Exact direct mapping.
    Direct,
    /// Pattern rule at the given index.
    Pattern(usize),
    /// `lib` substring fallback.
    Fallback,
}

/// A single hint's match result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// The canonical category.
    pub category: String,
    /// The layer that matched.
    pub kind: MatchKind,
}

/// Matches hints against a shared rule set.
///
/// # Example
///
/// ```
/// use gemlibs::extract::HintSet;
/// use gemlibs::matcher::DependencyMatcher;
///
/// let matcher = DependencyMatcher::builtin();
/// let hints: HintSet = ["libpq", "libxml2", "nonsense"].into_iter().collect();
///
/// let categories: Vec<String> = matcher.match_hints(&hints).into_iter().collect();
/// assert_eq!(categories, vec!["libxml2", "postgresql"]);
/// ```
#[derive(Debug, Clone)]
pub struct DependencyMatcher {
    rules: Arc<RuleSet>,
}

impl DependencyMatcher {
    /// Create a matcher over an existing rule set.
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    /// Create a matcher with the built-in rules.
    pub fn builtin() -> Self {
        Self::new(Arc::new(RuleSet::builtin()))
    }

    /// Create a matcher from a rules file, falling back to built-in rules.
    pub fn from_rules_file(path: Option<&Path>) -> Self {
        Self::new(Arc::new(RuleSet::load_or_builtin(path)))
    }

    /// The rule set in use.
    pub fn rules(&self) -> &Arc<RuleSet> {
        &self.rules
    }

    /// Match a single hint, returning the first rule that fires.
    pub fn match_one(&self, hint: &str) -> Option<RuleMatch> {
        if let Some(category) = self.rules.direct(hint) {
            return Some(RuleMatch {
                category: category.to_string(),
                kind: MatchKind::Direct,
            });
        }

        if let Some((index, rule)) = self
            .rules
            .patterns()
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.regex.is_match(hint))
        {
            return Some(RuleMatch {
                category: rule.category.clone(),
                kind: MatchKind::Pattern(index),
            });
        }

        if hint.contains("lib") {
            return Some(RuleMatch {
                category: hint.to_string(),
                kind: MatchKind::Fallback,
            });
        }

        None
    }

    /// Match every hint, returning the deduplicated categories.
    pub fn match_hints(&self, hints: &HintSet) -> BTreeSet<String> {
        let mut categories = BTreeSet::new();

        for hint in hints {
            match self.match_one(hint) {
                Some(found) => {
                    tracing::debug!("{} -> {} ({:?})", hint, found.category, found.kind);
                    categories.insert(found.category);
                }
                None => tracing::debug!("{} -> no match", hint),
            }
        }

        categories
    }
}

impl Default for DependencyMatcher {
    fn default() -> Self {
        Self::builtin()
    }
}
