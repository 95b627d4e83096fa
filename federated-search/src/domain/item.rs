//! Canonical result items, one variant per domain.

use serde::Serialize;

use super::SearchDomain;

/// Player account summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    /// Account identifier.
    pub id: String,
    /// Unique alias (username).
    pub username: String,
    /// Optional display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Optional avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Game catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Entry identifier.
    pub id: String,
    /// Game title.
    pub title: String,
    /// Developer studio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Primary genre.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Platforms the game ships on.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,
}

/// Community post summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    /// Post identifier.
    pub id: String,
    /// Post title.
    pub title: String,
    /// Body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Author alias.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Player guide summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideSummary {
    /// Guide identifier.
    pub id: String,
    /// Guide title.
    pub title: String,
    /// Body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Category facet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Difficulty facet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

/// A result from any domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainItem {
    /// Accounts domain item.
    Account(AccountSummary),
    /// Catalog domain item.
    Catalog(CatalogEntry),
    /// Posts domain item.
    Post(PostSummary),
    /// Guides domain item.
    Guide(GuideSummary),
}

impl DomainItem {
    /// Domain this item belongs to.
    pub const fn domain(&self) -> SearchDomain {
        match self {
            Self::Account(_) => SearchDomain::Accounts,
            Self::Catalog(_) => SearchDomain::Catalog,
            Self::Post(_) => SearchDomain::Posts,
            Self::Guide(_) => SearchDomain::Guides,
        }
    }

    /// Identifier within the item's domain.
    pub fn id(&self) -> &str {
        match self {
            Self::Account(account) => &account.id,
            Self::Catalog(entry) => &entry.id,
            Self::Post(post) => &post.id,
            Self::Guide(guide) => &guide.id,
        }
    }

    /// Fields consulted by client-side substring matching.
    ///
    /// - accounts: alias, display name
    /// - catalog: title, developer, description
    /// - posts and guides: title, body text
    pub fn searchable_fields(&self) -> Vec<&str> {
        let fields = match self {
            Self::Account(account) => {
                vec![Some(account.username.as_str()), account.display_name.as_deref()]
            }
            Self::Catalog(entry) => vec![
                Some(entry.title.as_str()),
                entry.developer.as_deref(),
                entry.description.as_deref(),
            ],
            Self::Post(post) => vec![Some(post.title.as_str()), post.content.as_deref()],
            Self::Guide(guide) => vec![Some(guide.title.as_str()), guide.content.as_deref()],
        };
        fields.into_iter().flatten().collect()
    }
}
