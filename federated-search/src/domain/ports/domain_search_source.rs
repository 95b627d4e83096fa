//! Driven port for one domain's remote search and listing endpoints.
//!
//! The domain owns the request shape and the canonical envelope so the
//! degradation controller can stay adapter-agnostic.

use async_trait::async_trait;
use pagination::PageRequest;

use super::define_port_error;
use crate::domain::{DomainEnvelope, DomainItem, FilterSet, SearchDomain};

/// Primary search request for one domain page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSearchRequest {
    /// Trimmed query text.
    pub text: String,
    /// Page to fetch.
    pub page: PageRequest,
    /// Active filters; adapters forward the keys their endpoint accepts.
    pub filters: FilterSet,
}

/// Listing request used by degraded paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainListingRequest {
    /// Query text, forwarded only to listings that accept a search hint.
    pub text_hint: Option<String>,
    /// Maximum number of items to retrieve.
    pub cap: u32,
}

define_port_error! {
    /// Errors surfaced while calling a remote search backend.
    pub enum SearchSourceError {
        /// Network or HTTP-level failure, including non-2xx statuses.
        Transport { message: String } =>
            "search transport failed: {message}",
        /// The call exceeded the transport timeout.
        Timeout { message: String } =>
            "search request timed out: {message}",
        /// The body did not match any recognised response shape.
        ShapeMismatch { message: String } =>
            "search response shape not recognised: {message}",
    }
}

/// Port for one domain's remote search backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainSearchSource: Send + Sync {
    /// Domain served by this source.
    fn domain(&self) -> SearchDomain;

    /// Query the dedicated search endpoint for one page.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use federated_search::domain::ports::{DomainSearchRequest, DomainSearchSource};
    /// use pagination::PageRequest;
    ///
    /// let envelope = source
    ///     .search(&DomainSearchRequest {
    ///         text: "zelda".to_owned(),
    ///         page: PageRequest::first(10),
    ///         filters: Default::default(),
    ///     })
    ///     .await?;
    /// assert!(envelope.items().len() <= 10);
    /// # Ok::<(), federated_search::domain::ports::SearchSourceError>(())
    /// ```
    async fn search(&self, request: &DomainSearchRequest)
    -> Result<DomainEnvelope, SearchSourceError>;

    /// Fetch an unfiltered, capped slice of the ordinary listing endpoint.
    async fn list(
        &self,
        request: &DomainListingRequest,
    ) -> Result<Vec<DomainItem>, SearchSourceError>;
}

/// Fixture source that finds nothing and lists nothing.
#[derive(Debug, Clone, Copy)]
pub struct FixtureDomainSearchSource(pub SearchDomain);

#[async_trait]
impl DomainSearchSource for FixtureDomainSearchSource {
    fn domain(&self) -> SearchDomain {
        self.0
    }

    async fn search(
        &self,
        _request: &DomainSearchRequest,
    ) -> Result<DomainEnvelope, SearchSourceError> {
        Ok(DomainEnvelope::empty())
    }

    async fn list(
        &self,
        _request: &DomainListingRequest,
    ) -> Result<Vec<DomainItem>, SearchSourceError> {
        Ok(Vec::new())
    }
}
