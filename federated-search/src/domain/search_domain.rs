//! Searchable content domains, query scope, and a fixed per-domain map.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// One of the four independently searchable content domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchDomain {
    /// Player accounts and profiles.
    Accounts,
    /// Game catalog entries.
    Catalog,
    /// Community posts.
    Posts,
    /// Player-written guides.
    Guides,
}

impl SearchDomain {
    /// Every domain, in fan-out order.
    pub const ALL: [Self; 4] = [Self::Accounts, Self::Catalog, Self::Posts, Self::Guides];

    /// Stable lowercase label used in logs and CLI arguments.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accounts => "accounts",
            Self::Catalog => "catalog",
            Self::Posts => "posts",
            Self::Guides => "guides",
        }
    }
}

impl fmt::Display for SearchDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a domain or scope label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown search scope '{value}'; expected all, accounts, catalog, posts, or guides")]
pub struct ScopeParseError {
    /// Rejected input.
    pub value: String,
}

impl FromStr for SearchDomain {
    type Err = ScopeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "accounts" | "users" => Ok(Self::Accounts),
            "catalog" | "games" => Ok(Self::Catalog),
            "posts" => Ok(Self::Posts),
            "guides" => Ok(Self::Guides),
            _ => Err(ScopeParseError {
                value: value.to_owned(),
            }),
        }
    }
}

/// Which domains a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DomainScope {
    /// Fan out to every domain.
    #[default]
    All,
    /// Query a single domain.
    Only(SearchDomain),
}

impl DomainScope {
    /// Domains covered by this scope, in fan-out order.
    pub fn domains(self) -> Vec<SearchDomain> {
        match self {
            Self::All => SearchDomain::ALL.to_vec(),
            Self::Only(domain) => vec![domain],
        }
    }

    /// Whether `domain` is covered by this scope.
    pub fn includes(self, domain: SearchDomain) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == domain,
        }
    }

    /// Stable lowercase label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(domain) => domain.as_str(),
        }
    }
}

impl fmt::Display for DomainScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainScope {
    type Err = ScopeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }
}

impl Serialize for DomainScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One value per domain, addressable by [`SearchDomain`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DomainMap<T> {
    /// Accounts value.
    pub accounts: T,
    /// Catalog value.
    pub catalog: T,
    /// Posts value.
    pub posts: T,
    /// Guides value.
    pub guides: T,
}

impl<T> DomainMap<T> {
    /// Build a map by evaluating `f` once per domain.
    pub fn from_fn(mut f: impl FnMut(SearchDomain) -> T) -> Self {
        Self {
            accounts: f(SearchDomain::Accounts),
            catalog: f(SearchDomain::Catalog),
            posts: f(SearchDomain::Posts),
            guides: f(SearchDomain::Guides),
        }
    }

    /// Borrow the value for `domain`.
    pub const fn get(&self, domain: SearchDomain) -> &T {
        match domain {
            SearchDomain::Accounts => &self.accounts,
            SearchDomain::Catalog => &self.catalog,
            SearchDomain::Posts => &self.posts,
            SearchDomain::Guides => &self.guides,
        }
    }

    /// Mutably borrow the value for `domain`.
    pub const fn get_mut(&mut self, domain: SearchDomain) -> &mut T {
        match domain {
            SearchDomain::Accounts => &mut self.accounts,
            SearchDomain::Catalog => &mut self.catalog,
            SearchDomain::Posts => &mut self.posts,
            SearchDomain::Guides => &mut self.guides,
        }
    }

    /// Iterate `(domain, value)` pairs in fan-out order.
    pub fn iter(&self) -> impl Iterator<Item = (SearchDomain, &T)> {
        SearchDomain::ALL
            .into_iter()
            .map(move |domain| (domain, self.get(domain)))
    }
}
