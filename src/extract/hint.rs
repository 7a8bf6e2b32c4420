//! Hint collection type.

use std::collections::HashSet;

/// An ordered, case-insensitively deduplicated set of hints.
///
/// Iteration yields hints in the order they were first seen. Use
/// [`HintSet::sorted`] for deterministic listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HintSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl HintSet {
    /// Create an empty hint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a hint. Returns `false` if an equal hint (ignoring case) was
    /// already present.
    pub fn insert(&mut self, hint: impl Into<String>) -> bool {
        let hint = hint.into().to_lowercase();
        if hint.is_empty() || !self.seen.insert(hint.clone()) {
            return false;
        }
        self.order.push(hint);
        true
    }

    /// Add every hint from another set, keeping first-seen order.
    pub fn extend(&mut self, other: HintSet) {
        for hint in other.order {
            self.insert(hint);
        }
    }

    /// Check whether a hint is present (case-insensitive).
    pub fn contains(&self, hint: &str) -> bool {
        self.seen.contains(&hint.to_lowercase())
    }

    /// Iterate hints in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Hints sorted ascending.
    pub fn sorted(&self) -> Vec<&str> {
        let mut hints: Vec<&str> = self.iter().collect();
        hints.sort_unstable();
        hints
    }

    /// Number of hints.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for HintSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = HintSet::new();
        for hint in iter {
            set.insert(hint);
        }
        set
    }
}

impl<'a> IntoIterator for &'a HintSet {
    type Item = &'a str;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&String) -> &str>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter().map(String::as_str as fn(&String) -> &str)
    }
}
