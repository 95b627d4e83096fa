//! Client-side substring matching used when a remote search is unavailable.
//!
//! Matching is case-insensitive and tests whole-field substrings; there is no
//! tokenisation and no relevance weighting. Matches keep source order.

use super::DomainItem;

/// Case-folded needle reused across many candidate items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringMatcher {
    needle: String,
}

impl SubstringMatcher {
    /// Build a matcher for `text` (trimmed, lowercased).
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.trim().to_lowercase(),
        }
    }

    /// Whether `haystack` contains the needle, ignoring case.
    ///
    /// An empty needle matches everything.
    pub fn matches_text(&self, haystack: &str) -> bool {
        self.needle.is_empty() || haystack.to_lowercase().contains(&self.needle)
    }

    /// Whether any searchable field of `item` contains the needle.
    pub fn matches_item(&self, item: &DomainItem) -> bool {
        item.searchable_fields()
            .into_iter()
            .any(|field| self.matches_text(field))
    }

    /// Keep the matching items, in source order.
    pub fn filter(&self, items: Vec<DomainItem>) -> Vec<DomainItem> {
        items
            .into_iter()
            .filter(|item| self.matches_item(item))
            .collect()
    }
}
