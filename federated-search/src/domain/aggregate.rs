//! Merged, cross-domain view of a search session.

use pagination::PaginationState;
use serde::Serialize;

use super::degradation::DomainResolution;
use super::{DomainItem, DomainMap, DomainScope, Provenance, SearchDomain};

/// Accumulated results for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainResults {
    /// Items loaded so far, across every appended page.
    pub items: Vec<DomainItem>,
    /// Cursor for further paging.
    pub pagination: PaginationState,
    /// Provenance of the most recent settled page.
    pub provenance: Provenance,
    /// Query text the items belong to; `None` before the first settle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_text: Option<String>,
    /// Whether a request for this domain is in flight.
    pub loading: bool,
}

impl DomainResults {
    /// Fold a settled page in, replacing items on `reset` and appending
    /// otherwise.
    pub(crate) fn apply(&mut self, resolution: DomainResolution, query_text: &str, reset: bool) {
        let DomainResolution {
            envelope,
            provenance,
            ..
        } = resolution;
        self.pagination.record_page(&envelope);
        self.provenance = provenance;
        if reset || self.query_text.as_deref() != Some(query_text) {
            self.items = envelope.into_items();
        } else {
            self.items.extend(envelope.into_items());
        }
        self.query_text = Some(query_text.to_owned());
    }
}

/// Unified response exposed to callers.
///
/// Every domain keeps its own slice even when the scope targets a single
/// domain, so switching scope can reuse slices still valid for the current
/// query text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    /// Active query text, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_text: Option<String>,
    /// Active scope.
    pub scope: DomainScope,
    /// Per-domain slices.
    pub domains: DomainMap<DomainResults>,
    /// Sum of every domain's `total`.
    pub total_results: u64,
    /// Whether any search or load-more is still settling.
    pub loading: bool,
}

impl AggregateResult {
    /// Sum of the four domains' reported totals.
    ///
    /// # Examples
    ///
    /// ```
    /// use federated_search::domain::AggregateResult;
    ///
    /// assert_eq!(AggregateResult::default().total_results(), 0);
    /// ```
    pub fn total_results(&self) -> u64 {
        self.domains
            .iter()
            .map(|(_, results)| results.pagination.total())
            .sum()
    }

    /// Slice for `domain`.
    pub const fn domain(&self, domain: SearchDomain) -> &DomainResults {
        self.domains.get(domain)
    }

    /// Items loaded for `domain`.
    pub fn items(&self, domain: SearchDomain) -> &[DomainItem] {
        &self.domains.get(domain).items
    }

    /// Domains considered active for presentation under the current scope.
    pub fn active_domains(&self) -> Vec<SearchDomain> {
        self.scope.domains()
    }

    /// Domains whose slice does not belong to the active query text and
    /// would need a fresh query if brought into scope.
    pub fn stale_domains(&self) -> Vec<SearchDomain> {
        let Some(text) = self.query_text.as_deref() else {
            return Vec::new();
        };
        self.domains
            .iter()
            .filter(|(_, results)| results.query_text.as_deref() != Some(text))
            .map(|(domain, _)| domain)
            .collect()
    }
}
