//! Driven port for the remote facet catalog.

use async_trait::async_trait;

use super::SearchSourceError;
use crate::domain::FacetCatalog;

/// Port for loading selectable filter facets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FacetSource: Send + Sync {
    /// Load the four facet lists.
    async fn load_facets(&self) -> Result<FacetCatalog, SearchSourceError>;
}
