//! Search domain model, ports, and orchestration.
//!
//! Purpose: fan one query out across accounts, catalog entries, posts, and
//! guides; degrade each domain independently when its remote search endpoint
//! fails; and keep per-domain paging state so that loading more of one domain
//! never disturbs another.
//!
//! Public surface:
//! - `SearchDispatcher`: owns the `SearchSession` and runs searches.
//! - `DegradationController`: primary/fallback/error-fallback chain.
//! - `SuggestionEngine`: debounced type-ahead.
//! - `FacetRegistry`: once-loaded filter facets.
//! - `ports`: driven port traits implemented by the outbound adapters.

mod aggregate;
mod degradation;
mod dispatcher;
mod error;
mod facets;
mod item;
mod matching;
pub mod ports;
mod provenance;
mod query;
mod search_domain;
mod session;
pub mod suggestions;

pub use self::aggregate::{AggregateResult, DomainResults};
pub use self::degradation::{DEFAULT_LISTING_CAP, DegradationController, DomainResolution};
pub use self::dispatcher::{DispatcherConfig, SearchDispatcher};
pub use self::error::SearchError;
pub use self::facets::{Facet, FacetCatalog, FacetRegistry, LoadedFacets};
pub use self::item::{AccountSummary, CatalogEntry, DomainItem, GuideSummary, PostSummary};
pub use self::matching::SubstringMatcher;
pub use self::provenance::Provenance;
pub use self::query::{FilterSet, SearchQuery, SortOrder};
pub use self::search_domain::{DomainMap, DomainScope, ScopeParseError, SearchDomain};
pub use self::session::{DEFAULT_PAGE_SIZE, DomainTicket, SearchSession};
pub use self::suggestions::{
    Suggestion, SuggestionConfig, SuggestionEngine, SuggestionKind, SuggestionOutcome,
    SuggestionPhase,
};

/// Canonical page of results for one domain.
pub type DomainEnvelope = pagination::PageEnvelope<DomainItem>;
