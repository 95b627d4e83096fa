//! Scripted port doubles shared by integration tests.
//!
//! Compiled only with the `test-support` feature.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::{
    DomainListingRequest, DomainSearchRequest, DomainSearchSource, FacetSource,
    SearchSourceError, SuggestionSource,
};
use crate::domain::{
    AccountSummary, CatalogEntry, DomainEnvelope, DomainItem, DomainMap, FacetCatalog,
    GuideSummary, PostSummary, SearchDomain, Suggestion,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("scripted source mutex"),
    }
}

/// Account with `display_name` left empty.
pub fn account(id: &str, username: &str) -> DomainItem {
    DomainItem::Account(AccountSummary {
        id: id.to_owned(),
        username: username.to_owned(),
        display_name: None,
        avatar_url: None,
    })
}

/// Catalog entry with only a title.
pub fn game(id: &str, title: &str) -> DomainItem {
    DomainItem::Catalog(CatalogEntry {
        id: id.to_owned(),
        title: title.to_owned(),
        developer: None,
        description: None,
        genre: None,
        platforms: Vec::new(),
    })
}

/// Post with only a title.
pub fn post(id: &str, title: &str) -> DomainItem {
    DomainItem::Post(PostSummary {
        id: id.to_owned(),
        title: title.to_owned(),
        content: None,
        author: None,
    })
}

/// Guide with only a title.
pub fn guide(id: &str, title: &str) -> DomainItem {
    DomainItem::Guide(GuideSummary {
        id: id.to_owned(),
        title: title.to_owned(),
        content: None,
        category: None,
        difficulty: None,
    })
}

/// `count` guides titled `"{prefix} {n}"`, ids `g1..`.
pub fn guides(prefix: &str, count: usize) -> Vec<DomainItem> {
    (1..=count)
        .map(|n| guide(&format!("g{n}"), &format!("{prefix} {n}")))
        .collect()
}

/// Domain source with scripted search and listing outcomes.
///
/// Search serves pages of a fixed result set with full paging metadata.
/// Each call may be delayed by the next queued delay, which lets tests
/// reorder responses under a paused clock.
pub struct ScriptedDomainSource {
    domain: SearchDomain,
    search: Mutex<Result<Vec<DomainItem>, SearchSourceError>>,
    listing: Mutex<Result<Vec<DomainItem>, SearchSourceError>>,
    delays: Mutex<VecDeque<Duration>>,
    search_calls: Mutex<Vec<DomainSearchRequest>>,
    list_calls: Mutex<Vec<DomainListingRequest>>,
}

impl ScriptedDomainSource {
    /// Source that finds and lists nothing.
    pub fn new(domain: SearchDomain) -> Self {
        Self {
            domain,
            search: Mutex::new(Ok(Vec::new())),
            listing: Mutex::new(Ok(Vec::new())),
            delays: Mutex::new(VecDeque::new()),
            search_calls: Mutex::new(Vec::new()),
            list_calls: Mutex::new(Vec::new()),
        }
    }

    /// Serve `results` from the primary endpoint.
    #[must_use]
    pub fn with_results(self, results: Vec<DomainItem>) -> Self {
        *lock(&self.search) = Ok(results);
        self
    }

    /// Fail every primary call with `error`.
    #[must_use]
    pub fn failing_search(self, error: SearchSourceError) -> Self {
        *lock(&self.search) = Err(error);
        self
    }

    /// Serve `items` from the listing endpoint.
    #[must_use]
    pub fn with_listing(self, items: Vec<DomainItem>) -> Self {
        *lock(&self.listing) = Ok(items);
        self
    }

    /// Fail every listing call with `error`.
    #[must_use]
    pub fn failing_listing(self, error: SearchSourceError) -> Self {
        *lock(&self.listing) = Err(error);
        self
    }

    /// Delay successive primary calls by these durations, in order.
    #[must_use]
    pub fn with_search_delays(self, delays: impl IntoIterator<Item = Duration>) -> Self {
        lock(&self.delays).extend(delays);
        self
    }

    /// Replace the primary result set for later calls.
    pub fn set_results(&self, results: Vec<DomainItem>) {
        *lock(&self.search) = Ok(results);
    }

    /// Primary requests received so far.
    pub fn search_calls(&self) -> Vec<DomainSearchRequest> {
        lock(&self.search_calls).clone()
    }

    /// Listing requests received so far.
    pub fn list_calls(&self) -> Vec<DomainListingRequest> {
        lock(&self.list_calls).clone()
    }
}

#[async_trait]
impl DomainSearchSource for ScriptedDomainSource {
    fn domain(&self) -> SearchDomain {
        self.domain
    }

    async fn search(
        &self,
        request: &DomainSearchRequest,
    ) -> Result<DomainEnvelope, SearchSourceError> {
        lock(&self.search_calls).push(request.clone());
        let delay = lock(&self.delays).pop_front();
        // Results are fixed at call time, not at wake-up.
        let outcome = lock(&self.search).clone();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        outcome.map(|results| DomainEnvelope::paginate(results, request.page))
    }

    async fn list(
        &self,
        request: &DomainListingRequest,
    ) -> Result<Vec<DomainItem>, SearchSourceError> {
        lock(&self.list_calls).push(request.clone());
        let cap = usize::try_from(request.cap).unwrap_or(usize::MAX);
        lock(&self.listing)
            .clone()
            .map(|items| items.into_iter().take(cap).collect())
    }
}

/// One scripted source per domain, plus the trait-object view the
/// dispatcher consumes.
pub struct ScriptedDomains {
    /// Concrete sources, for assertions.
    pub sources: DomainMap<Arc<ScriptedDomainSource>>,
}

impl ScriptedDomains {
    /// Sources that find and list nothing.
    pub fn empty() -> Self {
        Self {
            sources: DomainMap::from_fn(|domain| Arc::new(ScriptedDomainSource::new(domain))),
        }
    }

    /// Replace the source for its domain.
    #[must_use]
    pub fn with(mut self, source: ScriptedDomainSource) -> Self {
        let domain = source.domain;
        *self.sources.get_mut(domain) = Arc::new(source);
        self
    }

    /// Concrete source for `domain`.
    pub fn source(&self, domain: SearchDomain) -> &ScriptedDomainSource {
        self.sources.get(domain)
    }

    /// Trait-object map for the dispatcher.
    pub fn ports(&self) -> DomainMap<Arc<dyn DomainSearchSource>> {
        DomainMap::from_fn(|domain| -> Arc<dyn DomainSearchSource> {
            Arc::clone(self.sources.get(domain)) as Arc<dyn DomainSearchSource>
        })
    }
}

/// Suggestion source that echoes its input, with optional per-call delays.
pub struct ScriptedSuggestionSource {
    failure: Option<SearchSourceError>,
    delays: Mutex<VecDeque<Duration>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSuggestionSource {
    /// Each call returns one generic suggestion equal to the input.
    pub fn echo() -> Self {
        Self {
            failure: None,
            delays: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every call with `error`.
    pub fn failing(error: SearchSourceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::echo()
        }
    }

    /// Delay successive calls by these durations, in order.
    #[must_use]
    pub fn with_delays(self, delays: impl IntoIterator<Item = Duration>) -> Self {
        lock(&self.delays).extend(delays);
        self
    }

    /// Inputs received so far.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl SuggestionSource for ScriptedSuggestionSource {
    async fn suggest(&self, text: &str) -> Result<Vec<Suggestion>, SearchSourceError> {
        lock(&self.calls).push(text.to_owned());
        let delay = lock(&self.delays).pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            None => Ok(vec![Suggestion::generic(text)]),
            Some(error) => Err(error.clone()),
        }
    }
}

/// Facet source with a scripted outcome that counts calls.
pub struct ScriptedFacetSource {
    outcome: Result<FacetCatalog, SearchSourceError>,
    calls: AtomicUsize,
}

impl ScriptedFacetSource {
    /// Source returning `outcome` on every call.
    pub const fn new(outcome: Result<FacetCatalog, SearchSourceError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FacetSource for ScriptedFacetSource {
    async fn load_facets(&self) -> Result<FacetCatalog, SearchSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}
