//! Dispatcher behaviour against scripted domain sources.

use std::time::Duration;

use federated_search::domain::ports::SearchSourceError;
use federated_search::domain::{
    DispatcherConfig, DomainItem, DomainScope, FilterSet, Provenance, SearchDispatcher,
    SearchDomain, SearchQuery,
};
use federated_search::test_support::{
    ScriptedDomainSource, ScriptedDomains, account, game, guides, post,
};
use pagination::PaginationState;
use rstest::{fixture, rstest};

fn dispatcher(domains: &ScriptedDomains) -> SearchDispatcher {
    SearchDispatcher::new(domains.ports(), DispatcherConfig::default())
}

fn ids(items: &[DomainItem]) -> Vec<&str> {
    items.iter().map(DomainItem::id).collect()
}

#[fixture]
fn zelda_backend() -> ScriptedDomains {
    ScriptedDomains::empty()
        .with(
            ScriptedDomainSource::new(SearchDomain::Catalog).with_results(vec![
                game("c1", "Zelda: Breath of the Wild"),
                game("c2", "Zelda: Tears of the Kingdom"),
                game("c3", "Zelda: Link's Awakening"),
            ]),
        )
        .with(
            ScriptedDomainSource::new(SearchDomain::Accounts)
                .failing_search(SearchSourceError::transport("status 500"))
                .with_listing(vec![
                    account("a1", "ZeldaFan"),
                    account("a2", "mario_main"),
                    account("a3", "princess_zelda"),
                ]),
        )
        .with(
            ScriptedDomainSource::new(SearchDomain::Posts)
                .failing_search(SearchSourceError::timeout("posts search"))
                .failing_listing(SearchSourceError::transport("connection refused")),
        )
        .with(ScriptedDomainSource::new(SearchDomain::Guides).with_results(guides("Zelda", 25)))
}

#[rstest]
#[tokio::test]
async fn healthy_domain_reports_backend_provenance(zelda_backend: ScriptedDomains) {
    let dispatcher = dispatcher(&zelda_backend);

    let result = dispatcher
        .perform_search(SearchQuery::new("zelda"), true)
        .await
        .expect("search runs");

    let catalog = result.domain(SearchDomain::Catalog);
    assert_eq!(catalog.provenance, Provenance::Backend);
    assert_eq!(catalog.items.len(), 3);
    assert_eq!(catalog.pagination.total(), 3);
    assert_eq!(catalog.pagination.total_pages(), 1);
    assert!(!catalog.pagination.has_more());
}

#[rstest]
#[tokio::test]
async fn failed_primary_degrades_to_filtered_listing(zelda_backend: ScriptedDomains) {
    let dispatcher = dispatcher(&zelda_backend);

    let result = dispatcher
        .perform_search(SearchQuery::new("zelda"), true)
        .await
        .expect("search runs");

    let accounts = result.domain(SearchDomain::Accounts);
    assert_eq!(accounts.provenance, Provenance::Fallback);
    assert_eq!(ids(&accounts.items), vec!["a1", "a3"]);
    assert_eq!(accounts.pagination.total(), 2);

    let listing = zelda_backend.source(SearchDomain::Accounts).list_calls();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].text_hint.as_deref(), Some("zelda"));
    assert_eq!(listing[0].cap, 100);
}

#[rstest]
#[tokio::test]
async fn double_failure_yields_empty_error_fallback(zelda_backend: ScriptedDomains) {
    let dispatcher = dispatcher(&zelda_backend);

    let result = dispatcher
        .perform_search(SearchQuery::new("zelda"), true)
        .await
        .expect("domain failures never surface");

    let posts = result.domain(SearchDomain::Posts);
    assert_eq!(posts.provenance, Provenance::ErrorFallback);
    assert!(posts.items.is_empty());
    assert_eq!(posts.pagination.total(), 0);
    assert_eq!(posts.pagination.total_pages(), 1);
}

#[rstest]
#[tokio::test]
async fn totals_sum_every_domain_and_no_domain_stays_pending(zelda_backend: ScriptedDomains) {
    let dispatcher = dispatcher(&zelda_backend);

    let result = dispatcher
        .perform_search(SearchQuery::new("zelda"), true)
        .await
        .expect("search runs");

    assert_eq!(result.total_results, 3 + 2 + 25);
    assert_eq!(result.total_results(), result.total_results);
    assert!(!result.loading);
    for domain in SearchDomain::ALL {
        assert_ne!(result.domain(domain).provenance, Provenance::Pending);
        assert!(!result.domain(domain).loading);
    }
}

#[rstest]
#[tokio::test]
async fn load_more_appends_next_page_for_one_domain_only(zelda_backend: ScriptedDomains) {
    let dispatcher = dispatcher(&zelda_backend);
    dispatcher
        .perform_search(SearchQuery::new("zelda"), true)
        .await
        .expect("search runs");

    let result = dispatcher
        .load_more(SearchDomain::Guides)
        .await
        .expect("load more runs")
        .expect("guides have more pages");

    let guides = result.domain(SearchDomain::Guides);
    assert_eq!(guides.items.len(), 20);
    assert_eq!(guides.items[10].id(), "g11");
    assert_eq!(guides.pagination.page(), 2);
    assert!(guides.pagination.has_more());
    assert_eq!(result.items(SearchDomain::Catalog).len(), 3);
    assert_eq!(
        zelda_backend.source(SearchDomain::Catalog).search_calls().len(),
        1
    );
}

#[rstest]
#[tokio::test]
async fn load_more_without_further_pages_is_a_no_op(zelda_backend: ScriptedDomains) {
    let dispatcher = dispatcher(&zelda_backend);
    let before = dispatcher
        .perform_search(SearchQuery::new("zelda"), true)
        .await
        .expect("search runs");

    let outcome = dispatcher
        .load_more(SearchDomain::Catalog)
        .await
        .expect("load more runs");

    assert!(outcome.is_none());
    assert_eq!(dispatcher.snapshot().expect("snapshot"), before);
    assert_eq!(
        zelda_backend.source(SearchDomain::Catalog).search_calls().len(),
        1
    );
}

#[tokio::test]
async fn load_more_before_any_query_is_a_no_op() {
    let domains = ScriptedDomains::empty();
    let dispatcher = dispatcher(&domains);

    for domain in SearchDomain::ALL {
        assert!(dispatcher.load_more(domain).await.expect("runs").is_none());
        assert!(domains.source(domain).search_calls().is_empty());
    }
}

#[tokio::test(start_paused = true)]
async fn overlapping_load_more_for_one_domain_issues_one_request() {
    let domains = ScriptedDomains::empty().with(
        ScriptedDomainSource::new(SearchDomain::Guides)
            .with_results(guides("Zelda", 25))
            .with_search_delays([Duration::ZERO, Duration::from_millis(50)]),
    );
    let dispatcher = dispatcher(&domains);
    dispatcher
        .perform_search(SearchQuery::new("zelda"), true)
        .await
        .expect("search runs");

    let (first, second) = tokio::join!(
        dispatcher.load_more(SearchDomain::Guides),
        dispatcher.load_more(SearchDomain::Guides)
    );

    assert!(first.expect("first runs").is_some());
    assert!(second.expect("second runs").is_none());
    let calls = domains.source(SearchDomain::Guides).search_calls();
    let pages: Vec<u32> = calls.iter().map(|call| call.page.page()).collect();
    assert_eq!(pages, vec![1, 2]);
    let guides = dispatcher.snapshot().expect("snapshot");
    assert_eq!(guides.domain(SearchDomain::Guides).pagination.page(), 2);
}

#[rstest]
#[tokio::test]
async fn single_domain_scope_queries_only_that_domain(zelda_backend: ScriptedDomains) {
    let dispatcher = dispatcher(&zelda_backend);

    let result = dispatcher
        .perform_search(
            SearchQuery::new("zelda").with_scope(DomainScope::Only(SearchDomain::Guides)),
            true,
        )
        .await
        .expect("search runs");

    assert_eq!(result.active_domains(), vec![SearchDomain::Guides]);
    for domain in [SearchDomain::Accounts, SearchDomain::Catalog, SearchDomain::Posts] {
        assert!(zelda_backend.source(domain).search_calls().is_empty());
        assert_eq!(result.domain(domain).provenance, Provenance::Pending);
    }
    assert_eq!(result.items(SearchDomain::Guides).len(), 10);
}

#[rstest]
#[tokio::test]
async fn switching_scope_does_not_requery(zelda_backend: ScriptedDomains) {
    let dispatcher = dispatcher(&zelda_backend);
    dispatcher
        .perform_search(SearchQuery::new("zelda"), true)
        .await
        .expect("search runs");

    let result = dispatcher
        .set_scope(DomainScope::Only(SearchDomain::Catalog))
        .expect("scope changes");

    assert_eq!(result.active_domains(), vec![SearchDomain::Catalog]);
    assert!(result.stale_domains().is_empty());
    assert_eq!(result.items(SearchDomain::Catalog).len(), 3);
    assert_eq!(
        zelda_backend.source(SearchDomain::Catalog).search_calls().len(),
        1
    );
}

#[rstest]
#[tokio::test]
async fn new_text_in_single_scope_drops_other_domains(zelda_backend: ScriptedDomains) {
    let dispatcher = dispatcher(&zelda_backend);
    let first = dispatcher
        .perform_search(SearchQuery::new("zelda"), true)
        .await
        .expect("search runs");
    assert_eq!(first.total_results, 30);

    zelda_backend
        .source(SearchDomain::Guides)
        .set_results(guides("Mario", 2));
    let result = dispatcher
        .perform_search(
            SearchQuery::new("mario").with_scope(DomainScope::Only(SearchDomain::Guides)),
            true,
        )
        .await
        .expect("search runs");

    assert_eq!(result.total_results, 2);
    assert_eq!(result.total_results(), 2);
    assert!(result.items(SearchDomain::Catalog).is_empty());
    assert_eq!(result.domain(SearchDomain::Catalog).pagination.total(), 0);
    assert_eq!(
        result.stale_domains(),
        vec![SearchDomain::Accounts, SearchDomain::Catalog, SearchDomain::Posts]
    );
}

#[rstest]
#[case::explicit_clear(true)]
#[case::blank_query(false)]
#[tokio::test]
async fn clearing_resets_every_domain(zelda_backend: ScriptedDomains, #[case] explicit: bool) {
    let dispatcher = dispatcher(&zelda_backend);
    dispatcher
        .perform_search(SearchQuery::new("zelda"), true)
        .await
        .expect("search runs");

    let result = if explicit {
        dispatcher.clear().expect("clears");
        dispatcher.snapshot().expect("snapshot")
    } else {
        dispatcher
            .perform_search(SearchQuery::new("   "), true)
            .await
            .expect("blank query runs")
    };

    assert!(result.query_text.is_none());
    assert_eq!(result.total_results, 0);
    for domain in SearchDomain::ALL {
        assert!(result.items(domain).is_empty());
        assert_eq!(result.domain(domain).pagination, PaginationState::default());
    }
}

#[rstest]
#[tokio::test]
async fn applying_filters_reruns_active_query_from_page_one(zelda_backend: ScriptedDomains) {
    let dispatcher = dispatcher(&zelda_backend);
    dispatcher
        .perform_search(SearchQuery::new("zelda"), true)
        .await
        .expect("search runs");
    dispatcher
        .load_more(SearchDomain::Guides)
        .await
        .expect("load more runs");

    let result = dispatcher
        .apply_filters(FilterSet::from_pairs([("difficulty", "expert")]))
        .await
        .expect("filters apply");

    let calls = zelda_backend.source(SearchDomain::Guides).search_calls();
    let last = calls.last().expect("guides were queried");
    assert_eq!(last.page.page(), 1);
    assert_eq!(last.filters.difficulty.as_deref(), Some("expert"));
    assert_eq!(result.items(SearchDomain::Guides).len(), 10);
    assert_eq!(result.domain(SearchDomain::Guides).pagination.page(), 1);
}

#[tokio::test]
async fn applying_filters_without_query_issues_nothing() {
    let domains = ScriptedDomains::empty();
    let dispatcher = dispatcher(&domains);

    dispatcher
        .apply_filters(FilterSet::from_pairs([("genre", "rpg")]))
        .await
        .expect("filters apply");

    for domain in SearchDomain::ALL {
        assert!(domains.source(domain).search_calls().is_empty());
    }
}

#[tokio::test(start_paused = true)]
async fn superseded_search_response_is_discarded() {
    let domains = ScriptedDomains::empty().with(
        ScriptedDomainSource::new(SearchDomain::Posts)
            .with_results(vec![post("p-old", "zel patch notes")])
            .with_search_delays([Duration::from_millis(200), Duration::from_millis(10)]),
    );
    let dispatcher = dispatcher(&domains);
    let scope = DomainScope::Only(SearchDomain::Posts);

    let (older, newer) = tokio::join!(
        dispatcher.perform_search(SearchQuery::new("zel").with_scope(scope), true),
        async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            domains
                .source(SearchDomain::Posts)
                .set_results(vec![post("p-new", "zelda tier list")]);
            dispatcher
                .perform_search(SearchQuery::new("zelda").with_scope(scope), true)
                .await
        }
    );

    older.expect("older search runs");
    newer.expect("newer search runs");
    let result = dispatcher.snapshot().expect("snapshot");
    assert_eq!(result.query_text.as_deref(), Some("zelda"));
    assert_eq!(ids(result.items(SearchDomain::Posts)), vec!["p-new"]);
    assert!(!result.loading);
}

#[rstest]
#[tokio::test]
async fn non_reset_search_advances_only_domains_with_more_pages(zelda_backend: ScriptedDomains) {
    let dispatcher = dispatcher(&zelda_backend);
    dispatcher
        .perform_search(SearchQuery::new("zelda"), true)
        .await
        .expect("search runs");

    let result = dispatcher
        .perform_search(SearchQuery::new("zelda"), false)
        .await
        .expect("search runs");

    assert_eq!(result.items(SearchDomain::Guides).len(), 20);
    assert_eq!(result.items(SearchDomain::Catalog).len(), 3);
    assert_eq!(
        zelda_backend.source(SearchDomain::Catalog).search_calls().len(),
        1
    );
}
