//! Query dispatch: concurrent fan-out over domain adapters.

use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::future::join_all;
use tracing::info;

use super::aggregate::AggregateResult;
use super::degradation::DegradationController;
use super::error::SearchError;
use super::ports::DomainSearchSource;
use super::session::{DEFAULT_PAGE_SIZE, DomainTicket, SearchSession};
use super::{DomainMap, DomainScope, FilterSet, SearchDomain, SearchQuery};

/// Dispatcher tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Items requested per domain page.
    pub page_size: u32,
    /// Degradation chain settings.
    pub controller: DegradationController,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            controller: DegradationController::default(),
        }
    }
}

/// Owns one [`SearchSession`] and drives it against the domain sources.
///
/// The session lock is only held for synchronous transitions, never across
/// adapter I/O, so a slow domain never blocks another domain's settlement or
/// a concurrent load-more.
pub struct SearchDispatcher {
    sources: DomainMap<Arc<dyn DomainSearchSource>>,
    controller: DegradationController,
    session: Mutex<SearchSession>,
}

impl SearchDispatcher {
    /// Build a dispatcher over one source per domain.
    pub fn new(sources: DomainMap<Arc<dyn DomainSearchSource>>, config: DispatcherConfig) -> Self {
        Self {
            sources,
            controller: config.controller,
            session: Mutex::new(SearchSession::new(config.page_size)),
        }
    }

    /// Run a search.
    ///
    /// A blank query text clears the session. Otherwise every domain in the
    /// query's scope is resolved concurrently; `reset` replaces each
    /// domain's items while `reset = false` appends the next page.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::StateUnavailable`] when the session lock is
    /// poisoned. Domain failures never surface here.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let result = dispatcher.perform_search(SearchQuery::new("zelda"), true).await?;
    /// println!("{} results", result.total_results);
    /// ```
    pub async fn perform_search(
        &self,
        query: SearchQuery,
        reset: bool,
    ) -> Result<AggregateResult, SearchError> {
        let (session_id, tickets) = {
            let mut session = self.lock()?;
            (session.id(), session.begin_search(query, reset))
        };
        if tickets.is_empty() {
            return self.snapshot();
        }

        let outcome = self.run_tickets(tickets).await;
        let snapshot = {
            let mut session = self.lock()?;
            session.finish_search();
            session.snapshot()
        };
        outcome?;
        info!(
            session_id = %session_id,
            query = snapshot.query_text.as_deref().unwrap_or_default(),
            scope = %snapshot.scope,
            total_results = snapshot.total_results,
            "search settled"
        );
        Ok(snapshot)
    }

    /// Load the next page of `domain` for the active query.
    ///
    /// Returns `Ok(None)` without issuing a request when the domain has no
    /// further pages, already has a request in flight, or no query is
    /// active.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::StateUnavailable`] when the session lock is
    /// poisoned.
    pub async fn load_more(
        &self,
        domain: SearchDomain,
    ) -> Result<Option<AggregateResult>, SearchError> {
        let ticket = self.lock()?.begin_load_more(domain);
        let Some(ticket) = ticket else {
            return Ok(None);
        };
        self.run_tickets(vec![ticket]).await?;
        self.snapshot().map(Some)
    }

    /// Merge `filters` into the active set and re-run an active query from
    /// the first page.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::StateUnavailable`] when the session lock is
    /// poisoned.
    pub async fn apply_filters(&self, filters: FilterSet) -> Result<AggregateResult, SearchError> {
        let requery = self.lock()?.apply_filters(filters);
        match requery {
            Some(query) => self.perform_search(query, true).await,
            None => self.snapshot(),
        }
    }

    /// Forget the active query and reset every domain.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::StateUnavailable`] when the session lock is
    /// poisoned.
    pub fn clear(&self) -> Result<(), SearchError> {
        self.lock()?.clear();
        Ok(())
    }

    /// Switch the active scope without re-querying.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::StateUnavailable`] when the session lock is
    /// poisoned.
    pub fn set_scope(&self, scope: DomainScope) -> Result<AggregateResult, SearchError> {
        let mut session = self.lock()?;
        session.set_scope(scope);
        Ok(session.snapshot())
    }

    /// Current aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::StateUnavailable`] when the session lock is
    /// poisoned.
    pub fn snapshot(&self) -> Result<AggregateResult, SearchError> {
        Ok(self.lock()?.snapshot())
    }

    /// Whether any dispatch is still settling.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::StateUnavailable`] when the session lock is
    /// poisoned.
    pub fn is_loading(&self) -> Result<bool, SearchError> {
        Ok(self.lock()?.is_loading())
    }

    async fn run_tickets(&self, tickets: Vec<DomainTicket>) -> Result<(), SearchError> {
        let settlements = tickets.into_iter().map(|ticket| async move {
            let source = self.sources.get(ticket.domain);
            let resolution = self
                .controller
                .resolve(source.as_ref(), &ticket.request)
                .await;
            self.lock()?.settle(&ticket, resolution);
            Ok::<(), SearchError>(())
        });
        join_all(settlements).await.into_iter().collect()
    }

    fn lock(&self) -> Result<MutexGuard<'_, SearchSession>, SearchError> {
        self.session
            .lock()
            .map_err(|_| SearchError::state_unavailable("search session state poisoned"))
    }
}
