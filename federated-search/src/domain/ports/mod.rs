//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod domain_search_source;
mod facet_source;
mod suggestion_source;

use std::sync::Arc;

#[cfg(test)]
pub use domain_search_source::MockDomainSearchSource;
pub use domain_search_source::{
    DomainListingRequest, DomainSearchRequest, DomainSearchSource, FixtureDomainSearchSource,
    SearchSourceError,
};
#[cfg(test)]
pub use facet_source::MockFacetSource;
pub use facet_source::FacetSource;
#[cfg(test)]
pub use suggestion_source::MockSuggestionSource;
pub use suggestion_source::{FixtureSuggestionSource, SuggestionSource};

use super::DomainMap;

/// Port bundle required by the search session, suggestion engine, and facet
/// registry.
#[derive(Clone)]
pub struct SearchPorts {
    /// One search source per domain.
    pub domains: DomainMap<Arc<dyn DomainSearchSource>>,
    /// Dedicated suggestion endpoint.
    pub suggestions: Arc<dyn SuggestionSource>,
    /// Facet catalog endpoint.
    pub facets: Arc<dyn FacetSource>,
}

impl SearchPorts {
    /// Build a strongly-typed port bundle.
    pub fn new(
        domains: DomainMap<Arc<dyn DomainSearchSource>>,
        suggestions: Arc<dyn SuggestionSource>,
        facets: Arc<dyn FacetSource>,
    ) -> Self {
        Self {
            domains,
            suggestions,
            facets,
        }
    }
}
