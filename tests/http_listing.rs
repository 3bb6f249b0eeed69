use std::sync::Arc;

use job_board_pager::config::Config;
use job_board_pager::models::{Company, Job, Predicate, QueryState, Resource, SortKey, User};
use job_board_pager::routes::{self, AppState};
use job_board_pager::services::{
    ApiClient, AuthContext, Catalog, DataSourceOptions, PaginatedDataSource,
};

const ADMIN_TOKEN: &str = "admin-token";

/// Start the list backend on an ephemeral port and return a matching
/// client config.
async fn spawn_backend() -> Config {
    let config = Config {
        admin_token: Some(ADMIN_TOKEN.to_string()),
        ..Config::default()
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(Catalog::seeded(), &config);
    tokio::spawn(async move {
        let _ = routes::serve(listener, state).await;
    });

    Config {
        api_base_url: format!("http://{addr}"),
        ..config
    }
}

#[tokio::test]
async fn lists_a_filtered_sorted_page() {
    let config = spawn_backend().await;
    let client = ApiClient::new(&config, Arc::new(AuthContext::new())).unwrap();

    let mut query = QueryState {
        page_size: 5,
        sort: Some(SortKey::ascending("salary")),
        ..QueryState::default()
    };
    query.filter.insert(
        "name".into(),
        Predicate::contains_ignore_case("engineer").to_string(),
    );

    let page = client
        .list::<Job>(Resource::Jobs, &query.to_query_string())
        .await
        .unwrap();

    assert_eq!(page.items.len(), 5);
    assert!(page.total > 5);
    assert!(page
        .items
        .iter()
        .all(|job| job.name.to_lowercase().contains("engineer")));
    assert!(page.items.windows(2).all(|w| w[0].salary <= w[1].salary));
}

#[tokio::test]
async fn back_office_listing_needs_a_session() {
    let config = spawn_backend().await;
    let auth = Arc::new(AuthContext::new());
    let client = ApiClient::new(&config, Arc::clone(&auth)).unwrap();
    let query = QueryState::default().to_query_string();

    let err = client.list::<User>(Resource::Users, &query).await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    auth.sign_in(ADMIN_TOKEN);
    let page = client.list::<User>(Resource::Users, &query).await.unwrap();
    assert_eq!(page.total, 30);
    assert_eq!(page.items.len(), 10);

    auth.sign_out();
    assert!(client.list::<User>(Resource::Users, &query).await.is_err());
}

#[tokio::test]
async fn data_source_pages_through_the_backend() {
    let config = spawn_backend().await;
    let client = ApiClient::new(&config, Arc::new(AuthContext::new())).unwrap();

    let source = PaginatedDataSource::new(
        client.fetcher::<Company>(Resource::Companies),
        DataSourceOptions::with_page_size(5),
    );

    let first = source.settled().await;
    assert_eq!(first.total, 12);
    assert_eq!(first.items.as_ref().unwrap().len(), 5);

    let controls = source.page_controls(3);
    assert_eq!(controls.total_pages(), 3);
    controls.go_to_next();
    controls.go_to_next();

    // Both clicks target page 2, computed from the same window.
    let second = source.settled().await;
    assert_eq!(second.query.current, 2);

    source.page_controls(3).go_to_next();
    let last = source.settled().await;
    assert_eq!(last.query.current, 3);
    assert_eq!(last.items.as_ref().unwrap().len(), 2);

    source.page_controls(3).go_to_next();
    let still_last = source.settled().await;
    assert_eq!(still_last.query.current, 3);
}

#[tokio::test]
async fn fetches_single_records_by_id() {
    let config = spawn_backend().await;
    let client = ApiClient::new(&config, Arc::new(AuthContext::new())).unwrap();

    let job: Job = client.get(Resource::Jobs, "job-042").await.unwrap();
    assert_eq!(job.id, "job-042");
    assert!(job.company.is_some());

    let company: Company = client.get(Resource::Companies, "company-12").await.unwrap();
    assert_eq!(company.name, "Tower Telecom");

    let err = client
        .get::<Company>(Resource::Companies, "company-99")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("Company company-99 not found"));
}

#[tokio::test]
async fn unreachable_backend_surfaces_an_error() {
    let config = Config {
        api_base_url: "http://127.0.0.1:9".to_string(),
        ..Config::default()
    };
    let client = ApiClient::new(&config, Arc::new(AuthContext::new())).unwrap();
    let source = PaginatedDataSource::new(
        client.fetcher::<Job>(Resource::Jobs),
        DataSourceOptions::default(),
    );

    let snapshot = source.settled().await;
    assert!(snapshot.is_error);
    assert!(snapshot.items.is_none());
    assert_eq!(snapshot.total, 0);
}
