//! HTTP outbound adapters.
//!
//! Thin reqwest implementations of the `DomainSearchSource`,
//! `SuggestionSource`, and `FacetSource` ports, sharing one client.

mod client;
mod domain_source;
mod dto;
mod facet_source;
mod shape;
mod suggestion_source;

use std::sync::Arc;

pub use client::HttpBackend;
pub use domain_source::{
    AccountEndpoints, AccountHttpSource, CatalogEndpoints, CatalogHttpSource, DomainEndpoints,
    GuideEndpoints, GuideHttpSource, HttpDomainSource, PostEndpoints, PostHttpSource,
};
pub use facet_source::HttpFacetSource;
pub use suggestion_source::HttpSuggestionSource;

use crate::domain::ports::{DomainSearchSource, SearchPorts};
use crate::domain::{DomainMap, SearchDomain};

/// Wire every port to `backend`.
pub fn http_search_ports(backend: &HttpBackend) -> SearchPorts {
    let domains = DomainMap::from_fn(|domain| -> Arc<dyn DomainSearchSource> {
        match domain {
            SearchDomain::Accounts => Arc::new(AccountHttpSource::new(backend.clone())),
            SearchDomain::Catalog => Arc::new(CatalogHttpSource::new(backend.clone())),
            SearchDomain::Posts => Arc::new(PostHttpSource::new(backend.clone())),
            SearchDomain::Guides => Arc::new(GuideHttpSource::new(backend.clone())),
        }
    });
    SearchPorts::new(
        domains,
        Arc::new(HttpSuggestionSource::new(backend.clone())),
        Arc::new(HttpFacetSource::new(backend.clone())),
    )
}
