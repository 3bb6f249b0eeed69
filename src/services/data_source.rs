//! Paginated data source: listing state bound to a page fetcher.
//!
//! Each state change that alters the derived query string issues one fetch
//! tagged with a fresh request id. A response is applied only while its tag
//! is still the newest one, so a slow answer for an old page can never
//! overwrite a newer page. Until the newest answer lands, the previous
//! items stay on display.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::models::query::{QueryState, SortKey, DEFAULT_PAGE_SIZE};
use crate::page_window::{PageControls, PageWindowRequest};

/// One page of results plus the size of the whole listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    async fn fetch_page(&self, query: &str) -> Result<Page<T>, FetchError>;
}

#[async_trait]
impl<T, F, Fut> PageFetcher<T> for F
where
    T: Send + 'static,
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Page<T>, FetchError>> + Send + 'static,
{
    async fn fetch_page(&self, query: &str) -> Result<Page<T>, FetchError> {
        (self)(query.to_string()).await
    }
}

#[derive(Debug, Clone)]
pub struct DataSourceOptions {
    pub current: u64,
    pub page_size: u64,
    pub filter: BTreeMap<String, String>,
    pub sort: Option<SortKey>,
}

impl Default for DataSourceOptions {
    fn default() -> Self {
        let defaults = QueryState::default();
        Self {
            current: defaults.current,
            page_size: DEFAULT_PAGE_SIZE,
            filter: defaults.filter,
            sort: defaults.sort,
        }
    }
}

impl DataSourceOptions {
    pub fn with_page_size(page_size: u64) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    fn into_query(self) -> QueryState {
        QueryState {
            current: self.current.max(1),
            page_size: self.page_size.max(1),
            filter: self.filter,
            sort: self.sort,
        }
    }
}

/// What a listing view renders at a given moment.
#[derive(Debug, Clone)]
pub struct PageSnapshot<T> {
    pub query: QueryState,
    /// Last successfully fetched page; `None` until the first one lands.
    pub items: Option<Vec<T>>,
    pub total: u64,
    /// Query string the displayed items were fetched with.
    pub displayed_query: Option<String>,
    pub is_fetching: bool,
    pub is_error: bool,
    pub error: Option<String>,
    /// Tag of the newest issued request.
    pub request_id: u64,
    /// Requests that have not returned yet, superseded ones included.
    pub in_flight: usize,
}

impl<T> PageSnapshot<T> {
    fn new(query: QueryState) -> Self {
        Self {
            query,
            items: None,
            total: 0,
            displayed_query: None,
            is_fetching: false,
            is_error: false,
            error: None,
            request_id: 0,
            in_flight: 0,
        }
    }

    pub fn page_window(&self, max_visible_pages: u64) -> PageWindowRequest {
        PageWindowRequest::new(
            self.total,
            self.query.current,
            self.query.page_size,
            max_visible_pages,
        )
    }
}

struct Shared<T> {
    fetcher: Arc<dyn PageFetcher<T>>,
    state: watch::Sender<PageSnapshot<T>>,
}

/// Handle to one listing's state. Clones share the same state.
///
/// Setters spawn fetches on the current Tokio runtime.
pub struct PaginatedDataSource<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for PaginatedDataSource<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> PaginatedDataSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create the source and issue the first fetch.
    pub fn new<F>(fetcher: F, options: DataSourceOptions) -> Self
    where
        F: PageFetcher<T> + 'static,
    {
        Self::from_shared_fetcher(Arc::new(fetcher), options)
    }

    pub fn from_shared_fetcher(fetcher: Arc<dyn PageFetcher<T>>, options: DataSourceOptions) -> Self {
        let (state, _) = watch::channel(PageSnapshot::new(options.into_query()));
        let source = Self {
            shared: Arc::new(Shared { fetcher, state }),
        };
        source.refetch();
        source
    }

    pub fn snapshot(&self) -> PageSnapshot<T> {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PageSnapshot<T>> {
        self.shared.state.subscribe()
    }

    /// Wait until the newest request has been answered.
    pub async fn settled(&self) -> PageSnapshot<T> {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let snapshot = match rx.wait_for(|s| !s.is_fetching).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        };
        snapshot
    }

    /// Wait until every issued request returned, stale ones included.
    pub async fn idle(&self) -> PageSnapshot<T> {
        let mut rx = self.subscribe();
        let snapshot = match rx.wait_for(|s| s.in_flight == 0).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        };
        snapshot
    }

    pub fn set_current(&self, current: u64) {
        self.update_query(|q| q.current = current.max(1));
    }

    pub fn set_page_size(&self, page_size: u64) {
        self.update_query(|q| q.page_size = page_size.max(1));
    }

    pub fn set_filter(&self, filter: BTreeMap<String, String>) {
        self.update_query(|q| q.filter = filter);
    }

    pub fn set_sort(&self, sort: Option<SortKey>) {
        self.update_query(|q| q.sort = sort);
    }

    /// Apply several changes at once, issuing at most one fetch.
    pub fn update_query(&self, change: impl FnOnce(&mut QueryState)) {
        let mut issued = None;
        self.shared.state.send_if_modified(|snapshot| {
            let before = snapshot.query.to_query_string();
            change(&mut snapshot.query);
            let after = snapshot.query.to_query_string();
            if before == after {
                return false;
            }
            issued = Some(Self::issue(snapshot, after));
            true
        });

        if let Some((request_id, query)) = issued {
            self.spawn_fetch(request_id, query);
        }
    }

    /// Fetch the current query again, even if nothing changed.
    pub fn refetch(&self) {
        let mut issued = None;
        self.shared.state.send_modify(|snapshot| {
            let query = snapshot.query.to_query_string();
            issued = Some(Self::issue(snapshot, query));
        });

        if let Some((request_id, query)) = issued {
            self.spawn_fetch(request_id, query);
        }
    }

    /// Pagination controls for the current state, wired to `set_current`.
    pub fn page_controls(&self, max_visible_pages: u64) -> PageControls<impl Fn(u64)> {
        let request = self.snapshot().page_window(max_visible_pages);
        let source = self.clone();
        PageControls::new(request, move |page| source.set_current(page))
    }

    fn issue(snapshot: &mut PageSnapshot<T>, query: String) -> (u64, String) {
        snapshot.request_id += 1;
        snapshot.in_flight += 1;
        snapshot.is_fetching = true;
        debug!(request_id = snapshot.request_id, %query, "issuing page fetch");
        (snapshot.request_id, query)
    }

    fn spawn_fetch(&self, request_id: u64, query: String) {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let result = shared.fetcher.fetch_page(&query).await;
            shared.state.send_modify(|snapshot| {
                snapshot.in_flight = snapshot.in_flight.saturating_sub(1);

                if snapshot.request_id != request_id {
                    debug!(
                        request_id,
                        newest = snapshot.request_id,
                        %query,
                        "dropping stale page response"
                    );
                    return;
                }

                snapshot.is_fetching = false;
                match result {
                    Ok(page) => {
                        snapshot.items = Some(page.items);
                        snapshot.total = page.total;
                        snapshot.displayed_query = Some(query);
                        snapshot.is_error = false;
                        snapshot.error = None;
                    }
                    Err(e) => {
                        warn!(request_id, %query, "page fetch failed: {}", e);
                        snapshot.is_error = true;
                        snapshot.error = Some(e.to_string());
                    }
                }
            });
        });
    }
}
