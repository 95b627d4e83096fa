//! Explicit search-session state and its transitions.
//!
//! The session owns the aggregate, every domain's pagination cursor, and the
//! request ledger that keeps two in-flight requests for one domain from both
//! mutating its cursor. Transitions are synchronous; the dispatcher performs
//! the adapter I/O between `begin_*` and `settle`.

use pagination::PageRequest;
use tracing::debug;
use uuid::Uuid;

use super::aggregate::{AggregateResult, DomainResults};
use super::degradation::DomainResolution;
use super::ports::DomainSearchRequest;
use super::{DomainMap, DomainScope, FilterSet, SearchDomain, SearchQuery};

/// Default number of items requested per domain page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One issued domain request awaiting settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainTicket {
    /// Domain queried.
    pub domain: SearchDomain,
    /// Monotonic sequence number; only the latest issued per domain settles.
    pub sequence: u64,
    /// Request to hand to the degradation controller.
    pub request: DomainSearchRequest,
    /// Whether the settled page replaces (`true`) or appends to the slice.
    pub reset: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct RequestLedger {
    in_flight: Option<u64>,
}

/// Search session: the single owner of aggregate and cursor state.
#[derive(Debug, Clone)]
pub struct SearchSession {
    id: Uuid,
    page_size: u32,
    query_text: Option<String>,
    scope: DomainScope,
    filters: FilterSet,
    aggregate: AggregateResult,
    ledgers: DomainMap<RequestLedger>,
    next_sequence: u64,
    searches_in_flight: usize,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl SearchSession {
    /// Fresh session requesting `page_size` items per domain page.
    pub fn new(page_size: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            page_size: page_size.max(1),
            query_text: None,
            scope: DomainScope::All,
            filters: FilterSet::default(),
            aggregate: AggregateResult::default(),
            ledgers: DomainMap::default(),
            next_sequence: 0,
            searches_in_flight: 0,
        }
    }

    /// Correlation identifier used in logs.
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Active query text, if a non-empty query is active.
    pub fn query_text(&self) -> Option<&str> {
        self.query_text.as_deref()
    }

    /// Active scope.
    pub const fn scope(&self) -> DomainScope {
        self.scope
    }

    /// Active filter set.
    pub const fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Whether any search dispatch or load-more has not yet settled.
    pub fn is_loading(&self) -> bool {
        self.searches_in_flight > 0
            || SearchDomain::ALL
                .into_iter()
                .any(|domain| self.is_domain_loading(domain))
    }

    /// Whether a request for `domain` is in flight.
    pub const fn is_domain_loading(&self, domain: SearchDomain) -> bool {
        self.ledgers.get(domain).in_flight.is_some()
    }

    /// Reset the aggregate and every cursor to defaults and forget the query.
    ///
    /// Requests still in flight are orphaned: their settlements are ignored.
    pub fn clear(&mut self) {
        self.query_text = None;
        self.aggregate = AggregateResult {
            scope: self.scope,
            ..AggregateResult::default()
        };
        self.ledgers = DomainMap::default();
    }

    /// Start a dispatch for `query`, returning the tickets to resolve.
    ///
    /// A blank query clears the session and issues nothing. With `reset`,
    /// every domain in scope rewinds to page one; otherwise each domain in
    /// scope advances one page, subject to the same gate as
    /// [`Self::begin_load_more`].
    pub fn begin_search(&mut self, query: SearchQuery, reset: bool) -> Vec<DomainTicket> {
        if query.is_blank() {
            self.clear();
            return Vec::new();
        }
        let SearchQuery {
            text,
            scope,
            filters,
        } = query;
        let text = text.trim().to_owned();

        if !reset && self.query_text.as_deref() != Some(text.as_str()) {
            return self.begin_search(
                SearchQuery {
                    text,
                    scope,
                    filters,
                },
                true,
            );
        }

        if self.query_text.as_deref() != Some(text.as_str()) {
            self.drop_out_of_scope(scope);
        }
        self.scope = scope;
        self.filters = filters;
        self.query_text = Some(text);

        let tickets: Vec<_> = scope
            .domains()
            .into_iter()
            .filter_map(|domain| {
                if reset {
                    self.aggregate.domains.get_mut(domain).pagination.reset();
                    Some(self.issue(domain, 1, true))
                } else {
                    self.next_page_ticket(domain)
                }
            })
            .collect();

        if !tickets.is_empty() {
            self.searches_in_flight += 1;
        }
        tickets
    }

    /// Start a single-domain load-more.
    ///
    /// Returns `None` (and changes nothing) when there is no active query,
    /// the domain has no further pages, or the domain already has a request
    /// in flight.
    pub fn begin_load_more(&mut self, domain: SearchDomain) -> Option<DomainTicket> {
        self.query_text.as_ref()?;
        self.next_page_ticket(domain)
    }

    /// Fold a settled resolution into the aggregate.
    ///
    /// Returns `false` when the ticket is no longer the latest issued for its
    /// domain (superseded or orphaned by [`Self::clear`]); the resolution is
    /// then discarded.
    pub fn settle(&mut self, ticket: &DomainTicket, resolution: DomainResolution) -> bool {
        let ledger = self.ledgers.get_mut(ticket.domain);
        if ledger.in_flight != Some(ticket.sequence) {
            debug!(
                session_id = %self.id,
                domain = %ticket.domain,
                sequence = ticket.sequence,
                "discarding stale domain response"
            );
            return false;
        }
        ledger.in_flight = None;
        let Some(text) = self.query_text.as_deref() else {
            return false;
        };
        self.aggregate
            .domains
            .get_mut(ticket.domain)
            .apply(resolution, text, ticket.reset);
        true
    }

    /// Mark one dispatch as fully settled.
    pub const fn finish_search(&mut self) {
        self.searches_in_flight = self.searches_in_flight.saturating_sub(1);
    }

    /// Change the active scope without issuing requests.
    pub const fn set_scope(&mut self, scope: DomainScope) {
        self.scope = scope;
    }

    /// Merge `update` into the active filters, returning the query to
    /// re-dispatch when a non-empty query is active.
    pub fn apply_filters(&mut self, update: FilterSet) -> Option<SearchQuery> {
        self.filters = std::mem::take(&mut self.filters).merged(update);
        let text = self.query_text.clone()?;
        Some(SearchQuery {
            text,
            scope: self.scope,
            filters: self.filters.clone(),
        })
    }

    /// Copy of the aggregate with loading flags and totals filled in.
    pub fn snapshot(&self) -> AggregateResult {
        let mut aggregate = self.aggregate.clone();
        aggregate.query_text.clone_from(&self.query_text);
        aggregate.scope = self.scope;
        for domain in SearchDomain::ALL {
            aggregate.domains.get_mut(domain).loading = self.is_domain_loading(domain);
        }
        aggregate.total_results = aggregate.total_results();
        aggregate.loading = self.is_loading();
        aggregate
    }

    /// Forget slices and in-flight requests outside `scope`; they belong to
    /// a query text that is being replaced.
    fn drop_out_of_scope(&mut self, scope: DomainScope) {
        for domain in SearchDomain::ALL {
            if !scope.includes(domain) {
                *self.aggregate.domains.get_mut(domain) = DomainResults::default();
                *self.ledgers.get_mut(domain) = RequestLedger::default();
            }
        }
    }

    fn next_page_ticket(&mut self, domain: SearchDomain) -> Option<DomainTicket> {
        if self.is_domain_loading(domain) {
            return None;
        }
        let page = self
            .aggregate
            .domains
            .get(domain)
            .pagination
            .next_page_number()?;
        Some(self.issue(domain, page, false))
    }

    fn issue(&mut self, domain: SearchDomain, page: u32, reset: bool) -> DomainTicket {
        self.next_sequence += 1;
        let sequence = self.next_sequence;
        self.ledgers.get_mut(domain).in_flight = Some(sequence);
        let page = PageRequest::new(page, self.page_size)
            .unwrap_or_else(|_| PageRequest::first(self.page_size));
        DomainTicket {
            domain,
            sequence,
            request: DomainSearchRequest {
                text: self.query_text.clone().unwrap_or_default(),
                page,
                filters: self.filters.clone(),
            },
            reset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainEnvelope, DomainItem, PostSummary, Provenance};
    use rstest::{fixture, rstest};

    fn resolution(domain: SearchDomain, count: usize, total: u64, pages: u32, page: u32) -> DomainResolution {
        let items = (0..count)
            .map(|index| {
                DomainItem::Post(PostSummary {
                    id: format!("{domain}-{page}-{index}"),
                    title: "zelda".to_owned(),
                    content: None,
                    author: None,
                })
            })
            .collect();
        DomainResolution {
            domain,
            envelope: DomainEnvelope::new(items, total, pages, page),
            provenance: Provenance::Backend,
        }
    }

    #[fixture]
    fn session() -> SearchSession {
        SearchSession::new(10)
    }

    #[rstest]
    fn search_all_issues_one_ticket_per_domain(mut session: SearchSession) {
        let tickets = session.begin_search(SearchQuery::new("zelda"), true);
        let domains: Vec<_> = tickets.iter().map(|ticket| ticket.domain).collect();
        assert_eq!(domains, SearchDomain::ALL.to_vec());
        assert!(tickets.iter().all(|ticket| ticket.request.page.page() == 1));
        assert!(tickets.iter().all(|ticket| ticket.request.page.limit() == 10));
        assert!(session.is_loading());
    }

    #[rstest]
    fn single_scope_issues_one_ticket(mut session: SearchSession) {
        let query = SearchQuery::new("zelda").with_scope(DomainScope::Only(SearchDomain::Guides));
        let tickets = session.begin_search(query, true);
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].domain, SearchDomain::Guides);
    }

    #[rstest]
    fn load_more_is_gated_on_has_more(mut session: SearchSession) {
        let tickets = session.begin_search(SearchQuery::new("zelda"), true);
        for ticket in &tickets {
            let pages = if ticket.domain == SearchDomain::Guides { 3 } else { 1 };
            assert!(session.settle(ticket, resolution(ticket.domain, 10, 25, pages, 1)));
        }
        session.finish_search();

        assert!(session.begin_load_more(SearchDomain::Posts).is_none());
        let ticket = session
            .begin_load_more(SearchDomain::Guides)
            .expect("guides has more pages");
        assert_eq!(ticket.request.page.page(), 2);
        assert!(!ticket.reset);
    }

    #[rstest]
    fn overlapping_load_more_is_rejected(mut session: SearchSession) {
        let tickets = session.begin_search(SearchQuery::new("zelda"), true);
        for ticket in &tickets {
            session.settle(ticket, resolution(ticket.domain, 10, 30, 3, 1));
        }

        let first = session.begin_load_more(SearchDomain::Guides).expect("first load");
        assert!(session.begin_load_more(SearchDomain::Guides).is_none());
        assert!(session.settle(&first, resolution(SearchDomain::Guides, 10, 30, 3, 2)));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.domain(SearchDomain::Guides).pagination.page(), 2);
        assert_eq!(snapshot.items(SearchDomain::Guides).len(), 20);
        assert!(session.begin_load_more(SearchDomain::Guides).is_some());
    }

    #[rstest]
    fn load_more_in_flight_marks_aggregate_loading(mut session: SearchSession) {
        let tickets = session.begin_search(SearchQuery::new("zelda"), true);
        for ticket in &tickets {
            session.settle(ticket, resolution(ticket.domain, 10, 30, 3, 1));
        }
        session.finish_search();
        assert!(!session.snapshot().loading);

        let ticket = session.begin_load_more(SearchDomain::Posts).expect("posts has more");
        assert!(session.snapshot().loading);
        session.settle(&ticket, resolution(SearchDomain::Posts, 10, 30, 3, 2));
        assert!(!session.snapshot().loading);
    }

    #[rstest]
    fn superseded_ticket_is_discarded(mut session: SearchSession) {
        let stale = session.begin_search(SearchQuery::new("zel"), true);
        let fresh = session.begin_search(SearchQuery::new("zelda"), true);
        assert!(!session.settle(&stale[0], resolution(stale[0].domain, 1, 1, 1, 1)));
        assert!(session.settle(&fresh[0], resolution(fresh[0].domain, 2, 2, 1, 1)));
        assert_eq!(session.snapshot().items(fresh[0].domain).len(), 2);
    }

    #[rstest]
    fn blank_query_clears_everything(mut session: SearchSession) {
        let tickets = session.begin_search(SearchQuery::new("zelda"), true);
        for ticket in &tickets {
            session.settle(ticket, resolution(ticket.domain, 3, 3, 1, 1));
        }
        assert!(session.begin_search(SearchQuery::new(""), true).is_empty());

        let snapshot = session.snapshot();
        assert_eq!(snapshot.query_text, None);
        assert_eq!(snapshot.total_results, 0);
        for (_, results) in snapshot.domains.iter() {
            assert!(results.items.is_empty());
            assert_eq!(results.pagination, pagination::PaginationState::default());
        }
    }

    #[rstest]
    fn clear_orphans_in_flight_requests(mut session: SearchSession) {
        let tickets = session.begin_search(SearchQuery::new("zelda"), true);
        session.clear();
        assert!(!session.settle(&tickets[0], resolution(tickets[0].domain, 1, 1, 1, 1)));
    }

    #[rstest]
    fn new_text_orphans_out_of_scope_requests(mut session: SearchSession) {
        let old = session.begin_search(SearchQuery::new("zelda"), true);
        let query = SearchQuery::new("mario").with_scope(DomainScope::Only(SearchDomain::Guides));
        session.begin_search(query, true);

        let catalog = old
            .iter()
            .find(|ticket| ticket.domain == SearchDomain::Catalog)
            .expect("catalog ticket");
        assert!(!session.settle(catalog, resolution(SearchDomain::Catalog, 3, 3, 1, 1)));
        assert!(!session.is_domain_loading(SearchDomain::Catalog));
        assert_eq!(session.snapshot().total_results, 0);
    }

    #[rstest]
    fn apply_filters_requires_active_query(mut session: SearchSession) {
        let update = FilterSet::from_pairs([("difficulty", "expert")]);
        assert!(session.apply_filters(update.clone()).is_none());
        assert_eq!(session.filters().difficulty.as_deref(), Some("expert"));

        session.begin_search(SearchQuery::new("zelda"), true);
        let query = session
            .apply_filters(FilterSet::from_pairs([("category", "lore")]))
            .expect("active query");
        assert_eq!(query.text, "zelda");
        assert_eq!(query.filters.category.as_deref(), Some("lore"));
    }

    #[rstest]
    fn non_reset_search_for_new_text_resets(mut session: SearchSession) {
        let tickets = session.begin_search(SearchQuery::new("zelda"), false);
        assert_eq!(tickets.len(), 4);
        assert!(tickets.iter().all(|ticket| ticket.reset));
    }
}
