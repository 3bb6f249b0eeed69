use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use job_board_pager::error::FetchError;
use job_board_pager::models::QueryState;
use job_board_pager::services::{DataSourceOptions, Page, PaginatedDataSource};

/// Fetcher whose answers for selected pages are held back until released.
#[derive(Clone, Default)]
struct GatedFetcher {
    gates: Arc<Mutex<HashMap<u64, Arc<Notify>>>>,
    calls: Arc<AtomicUsize>,
    fail_filtered: bool,
    fail_page: Option<u64>,
}

impl GatedFetcher {
    fn hold(&self, page: u64) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(page, Arc::clone(&gate));
        gate
    }

    async fn fetch(&self, query: String) -> Result<Page<String>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = QueryState::parse(&query);

        let gate = self.gates.lock().unwrap().get(&state.current).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.fail_page == Some(state.current) {
            return Err(FetchError::Status {
                status: 503,
                message: format!("page {} unavailable", state.current),
            });
        }

        if self.fail_filtered && !state.filter.is_empty() {
            return Err(FetchError::Status {
                status: 500,
                message: "backend exploded".into(),
            });
        }

        Ok(Page {
            items: (0..state.page_size)
                .map(|i| format!("page{}-item{}", state.current, i))
                .collect(),
            total: 95,
        })
    }

    fn into_source(self, options: DataSourceOptions) -> PaginatedDataSource<String> {
        PaginatedDataSource::new(
            move |query: String| {
                let fetcher = self.clone();
                async move { fetcher.fetch(query).await }
            },
            options,
        )
    }
}

#[tokio::test]
async fn rapid_page_changes_keep_the_newest_page() {
    let fetcher = GatedFetcher::default();
    let source = fetcher.clone().into_source(DataSourceOptions::default());
    source.settled().await;

    let page_two = fetcher.hold(2);
    source.set_current(2);
    source.set_current(3);

    // Page 3 answers first and is shown even though page 2 is still pending.
    let snapshot = source.settled().await;
    assert_eq!(snapshot.query.current, 3);
    assert_eq!(snapshot.items.as_ref().unwrap()[0], "page3-item0");
    assert_eq!(snapshot.in_flight, 1);

    // The late page-2 answer is dropped.
    page_two.notify_one();
    let snapshot = source.idle().await;
    assert_eq!(snapshot.query.current, 3);
    assert_eq!(snapshot.items.as_ref().unwrap()[0], "page3-item0");
    assert!(snapshot
        .displayed_query
        .as_deref()
        .unwrap()
        .starts_with("current=3&"));
    assert!(!snapshot.is_fetching);
}

#[tokio::test]
async fn late_failure_of_a_superseded_request_is_ignored() {
    let fetcher = GatedFetcher {
        fail_page: Some(2),
        ..GatedFetcher::default()
    };
    let source = fetcher.clone().into_source(DataSourceOptions::default());
    source.settled().await;

    let page_two = fetcher.hold(2);
    source.set_current(2);
    source.set_current(3);

    let shown = source.settled().await;
    assert_eq!(shown.query.current, 3);
    assert_eq!(shown.in_flight, 1);

    // Page 2 now fails, after page 3 is already on screen.
    page_two.notify_one();
    let snapshot = source.idle().await;
    assert!(!snapshot.is_error);
    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.items.as_ref().unwrap()[0], "page3-item0");
    assert_eq!(snapshot.request_id, shown.request_id);
}

#[tokio::test]
async fn previous_page_stays_visible_while_loading() {
    let fetcher = GatedFetcher::default();
    let source = fetcher.clone().into_source(DataSourceOptions::with_page_size(5));
    let first = source.settled().await;

    let gate = fetcher.hold(4);
    source.set_current(4);

    let loading = source.snapshot();
    assert!(loading.is_fetching);
    assert_eq!(loading.query.current, 4);
    assert_eq!(loading.items, first.items);
    assert_eq!(loading.total, 95);

    gate.notify_one();
    let loaded = source.settled().await;
    assert_eq!(loaded.items.as_ref().unwrap()[0], "page4-item0");
}

#[tokio::test]
async fn failed_fetch_keeps_last_good_page() {
    let fetcher = GatedFetcher {
        fail_filtered: true,
        ..GatedFetcher::default()
    };
    let source = fetcher.into_source(DataSourceOptions::default());
    let good = source.settled().await;
    assert!(!good.is_error);

    let mut filter = BTreeMap::new();
    filter.insert("name".to_string(), "/rust/i".to_string());
    source.set_filter(filter);

    let failed = source.settled().await;
    assert!(failed.is_error);
    assert!(failed.error.as_deref().unwrap().contains("backend exploded"));
    assert_eq!(failed.items, good.items);
    assert_eq!(failed.total, good.total);
    assert_eq!(failed.displayed_query, good.displayed_query);

    // Clearing the filter recovers.
    source.set_filter(BTreeMap::new());
    let recovered = source.settled().await;
    assert!(!recovered.is_error);
    assert!(recovered.error.is_none());
}

#[tokio::test]
async fn refetch_always_issues_a_request() {
    let fetcher = GatedFetcher::default();
    let calls = Arc::clone(&fetcher.calls);
    let source = fetcher.into_source(DataSourceOptions::default());
    source.settled().await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    source.set_current(1);
    source.refetch();
    source.idle().await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn independent_sources_do_not_interfere() {
    let a = GatedFetcher::default().into_source(DataSourceOptions::default());
    let b = GatedFetcher::default().into_source(DataSourceOptions::with_page_size(3));

    a.set_current(7);
    let (a, b) = (a.settled().await, b.settled().await);

    assert_eq!(a.query.current, 7);
    assert_eq!(b.query.current, 1);
    assert_eq!(b.items.unwrap().len(), 3);
}

#[tokio::test]
async fn subscribers_see_state_changes() {
    let source = GatedFetcher::default().into_source(DataSourceOptions::default());
    source.settled().await;

    let mut rx = source.subscribe();
    source.set_page_size(20);

    let snapshot = rx
        .wait_for(|s| !s.is_fetching && s.query.page_size == 20)
        .await
        .unwrap()
        .clone();
    assert_eq!(snapshot.items.unwrap().len(), 20);
}
