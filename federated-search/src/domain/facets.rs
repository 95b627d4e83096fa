//! Selectable filter facets with a static fallback catalog.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::Provenance;
use super::ports::FacetSource;

/// One selectable facet value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    /// Value sent back as a filter.
    pub id: String,
    /// Human-readable label.
    pub name: String,
}

impl Facet {
    /// Build a facet.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The four facet lists offered to filter UIs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FacetCatalog {
    /// Guide categories.
    pub categories: Vec<Facet>,
    /// Guide difficulties.
    pub difficulties: Vec<Facet>,
    /// Catalog genres.
    pub genres: Vec<Facet>,
    /// Catalog platforms.
    pub platforms: Vec<Facet>,
}

const FALLBACK_CATEGORIES: [(&str, &str); 6] = [
    ("walkthrough", "Walkthrough"),
    ("tips-and-tricks", "Tips & Tricks"),
    ("strategy", "Strategy"),
    ("speedrun", "Speedrun"),
    ("lore", "Lore"),
    ("build-guide", "Build Guide"),
];
const FALLBACK_DIFFICULTIES: [(&str, &str); 4] = [
    ("beginner", "Beginner"),
    ("intermediate", "Intermediate"),
    ("advanced", "Advanced"),
    ("expert", "Expert"),
];
const FALLBACK_GENRES: [(&str, &str); 8] = [
    ("action", "Action"),
    ("adventure", "Adventure"),
    ("rpg", "RPG"),
    ("strategy", "Strategy"),
    ("shooter", "Shooter"),
    ("puzzle", "Puzzle"),
    ("simulation", "Simulation"),
    ("sports", "Sports"),
];
const FALLBACK_PLATFORMS: [(&str, &str); 5] = [
    ("pc", "PC"),
    ("playstation", "PlayStation"),
    ("xbox", "Xbox"),
    ("switch", "Nintendo Switch"),
    ("mobile", "Mobile"),
];

fn facets(table: &[(&str, &str)]) -> Vec<Facet> {
    table.iter().map(|(id, name)| Facet::new(*id, *name)).collect()
}

impl FacetCatalog {
    /// Static catalog used when the facet endpoint is unavailable.
    pub fn fallback() -> Self {
        Self {
            categories: facets(&FALLBACK_CATEGORIES),
            difficulties: facets(&FALLBACK_DIFFICULTIES),
            genres: facets(&FALLBACK_GENRES),
            platforms: facets(&FALLBACK_PLATFORMS),
        }
    }

    /// Whether every list is empty.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.difficulties.is_empty()
            && self.genres.is_empty()
            && self.platforms.is_empty()
    }
}

/// Loaded catalog together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedFacets {
    /// Facet lists.
    pub catalog: FacetCatalog,
    /// `backend` or `fallback`.
    pub provenance: Provenance,
}

/// Loads the facet catalog once and serves it for the registry's lifetime.
pub struct FacetRegistry {
    source: Arc<dyn FacetSource>,
    loaded: OnceCell<LoadedFacets>,
}

impl FacetRegistry {
    /// Build a registry over `source`. Nothing is fetched until [`Self::load`].
    pub fn new(source: Arc<dyn FacetSource>) -> Self {
        Self {
            source,
            loaded: OnceCell::new(),
        }
    }

    /// Return the catalog, fetching it on first use.
    ///
    /// Concurrent first callers share a single fetch. A failed fetch yields
    /// the static catalog and is not retried.
    pub async fn load(&self) -> &LoadedFacets {
        self.loaded
            .get_or_init(|| async {
                match self.source.load_facets().await {
                    Ok(catalog) => {
                        debug!(provenance = %Provenance::Backend, "facets loaded");
                        LoadedFacets {
                            catalog,
                            provenance: Provenance::Backend,
                        }
                    }
                    Err(error) => {
                        warn!(
                            error_kind = error.kind(),
                            error = %error,
                            provenance = %Provenance::Fallback,
                            "facet endpoint failed; using static catalog"
                        );
                        LoadedFacets {
                            catalog: FacetCatalog::fallback(),
                            provenance: Provenance::Fallback,
                        }
                    }
                }
            })
            .await
    }

    /// The catalog if it has already been loaded.
    pub fn get(&self) -> Option<&LoadedFacets> {
        self.loaded.get()
    }
}
