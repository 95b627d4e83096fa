//! Fallback degradation around one domain adapter call.
//!
//! The controller guarantees that every domain query terminates in an
//! envelope plus provenance pair: primary failures degrade to substring
//! matching over the domain's ordinary listing, and listing failures degrade
//! to an empty envelope. Nothing below this boundary reaches the caller as an
//! error.

use pagination::PageEnvelope;
use tracing::{debug, warn};

use super::matching::SubstringMatcher;
use super::ports::{DomainListingRequest, DomainSearchRequest, DomainSearchSource};
use super::{DomainEnvelope, Provenance, SearchDomain};

/// Default number of listing items fetched when degrading.
pub const DEFAULT_LISTING_CAP: u32 = 100;

/// Settled outcome of one domain query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainResolution {
    /// Domain that was queried.
    pub domain: SearchDomain,
    /// Canonical page of results.
    pub envelope: DomainEnvelope,
    /// Which path produced the envelope.
    pub provenance: Provenance,
}

impl DomainResolution {
    fn error_fallback(domain: SearchDomain) -> Self {
        Self {
            domain,
            envelope: DomainEnvelope::empty(),
            provenance: Provenance::ErrorFallback,
        }
    }
}

/// Wraps adapter calls with the primary → listing → empty degradation chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegradationController {
    listing_cap: u32,
}

impl Default for DegradationController {
    fn default() -> Self {
        Self::new(DEFAULT_LISTING_CAP)
    }
}

impl DegradationController {
    /// Build a controller that fetches at most `listing_cap` listing items.
    pub const fn new(listing_cap: u32) -> Self {
        Self {
            listing_cap: if listing_cap == 0 { 1 } else { listing_cap },
        }
    }

    /// Resolve one page for `source`, degrading as needed.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let resolution = DegradationController::default()
    ///     .resolve(source.as_ref(), &request)
    ///     .await;
    /// assert_ne!(resolution.provenance, Provenance::Pending);
    /// ```
    pub async fn resolve(
        &self,
        source: &dyn DomainSearchSource,
        request: &DomainSearchRequest,
    ) -> DomainResolution {
        let domain = source.domain();
        match source.search(request).await {
            Ok(envelope) => {
                debug!(
                    domain = %domain,
                    total = envelope.total(),
                    page = envelope.current_page(),
                    provenance = Provenance::Backend.as_str(),
                    "domain search resolved"
                );
                return DomainResolution {
                    domain,
                    envelope,
                    provenance: Provenance::Backend,
                };
            }
            Err(error) => {
                warn!(
                    domain = %domain,
                    error_kind = error.kind(),
                    error = %error,
                    "primary domain search failed; degrading to listing"
                );
            }
        }

        let listing = DomainListingRequest {
            text_hint: Some(request.text.clone()),
            cap: self.listing_cap,
        };
        match source.list(&listing).await {
            Ok(items) => {
                let matches = SubstringMatcher::new(&request.text).filter(items);
                let envelope = PageEnvelope::paginate(matches, request.page);
                debug!(
                    domain = %domain,
                    total = envelope.total(),
                    provenance = Provenance::Fallback.as_str(),
                    "domain search resolved from listing"
                );
                DomainResolution {
                    domain,
                    envelope,
                    provenance: Provenance::Fallback,
                }
            }
            Err(error) => {
                warn!(
                    domain = %domain,
                    error_kind = error.kind(),
                    error = %error,
                    provenance = Provenance::ErrorFallback.as_str(),
                    "domain listing failed; returning empty results"
                );
                DomainResolution::error_fallback(domain)
            }
        }
    }
}
