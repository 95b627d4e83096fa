//! Query text, scope, and filter set.

use serde::Serialize;

use super::DomainScope;

/// Sort direction forwarded to domains that support ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Wire label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Recognised filters. Adapters read the keys they support and ignore the
/// rest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSet {
    /// Field to order by (domain-defined, e.g. `createdAt`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    /// Guide category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Guide difficulty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Catalog genre.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl FilterSet {
    /// Build a filter set from loosely-typed `name -> value` pairs.
    ///
    /// Unknown names, unparseable sort orders, and blank values are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use federated_search::domain::FilterSet;
    ///
    /// let filters = FilterSet::from_pairs([("category", "speedrun"), ("colour", "red")]);
    /// assert_eq!(filters.category.as_deref(), Some("speedrun"));
    /// ```
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut filters = Self::default();
        for (name, value) in pairs {
            filters.set(name, value);
        }
        filters
    }

    /// Set one filter by name, returning whether the name was recognised.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let value = value.trim();
        let owned = (!value.is_empty()).then(|| value.to_owned());
        match name {
            "sortBy" | "sort_by" => self.sort_by = owned,
            "sortOrder" | "sort_order" => self.sort_order = SortOrder::parse(value),
            "category" => self.category = owned,
            "difficulty" => self.difficulty = owned,
            "genre" => self.genre = owned,
            _ => return false,
        }
        true
    }

    /// Overlay `update` onto this set; present values in `update` win.
    #[must_use]
    pub fn merged(mut self, update: Self) -> Self {
        fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }
        overlay(&mut self.sort_by, update.sort_by);
        overlay(&mut self.sort_order, update.sort_order);
        overlay(&mut self.category, update.category);
        overlay(&mut self.difficulty, update.difficulty);
        overlay(&mut self.genre, update.genre);
        self
    }
}

/// One dispatch request. A new query replaces the active one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Raw query text as typed.
    pub text: String,
    /// Domains to target.
    pub scope: DomainScope,
    /// Active filters.
    pub filters: FilterSet,
}

impl SearchQuery {
    /// Query across every domain with no filters.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Replace the scope.
    #[must_use]
    pub fn with_scope(mut self, scope: DomainScope) -> Self {
        self.scope = scope;
        self
    }

    /// Replace the filters.
    #[must_use]
    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    /// Query text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Whether the query has no searchable text.
    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("sortOrder", "DESC", Some(SortOrder::Desc))]
    #[case("sort_order", "ascending", Some(SortOrder::Asc))]
    #[case("sortOrder", "sideways", None)]
    fn parses_sort_order(#[case] name: &str, #[case] raw: &str, #[case] expected: Option<SortOrder>) {
        let filters = FilterSet::from_pairs([(name, raw)]);
        assert_eq!(filters.sort_order, expected);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut filters = FilterSet::default();
        assert!(!filters.set("platform", "pc"));
        assert_eq!(filters, FilterSet::default());
    }

    #[test]
    fn merge_keeps_existing_values_not_overridden() {
        let base = FilterSet::from_pairs([("category", "lore"), ("genre", "rpg")]);
        let update = FilterSet::from_pairs([("genre", "puzzle"), ("difficulty", "expert")]);
        let merged = base.merged(update);
        assert_eq!(merged.category.as_deref(), Some("lore"));
        assert_eq!(merged.genre.as_deref(), Some("puzzle"));
        assert_eq!(merged.difficulty.as_deref(), Some("expert"));
    }

    #[test]
    fn whitespace_query_is_blank() {
        assert!(SearchQuery::new("   ").is_blank());
        assert_eq!(SearchQuery::new(" zelda ").trimmed(), "zelda");
    }
}
