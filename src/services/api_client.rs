//! HTTP client for the job-board REST backend.
//!
//! Session state lives in an [`AuthContext`] that is created once and handed
//! to every client that needs it; signing out clears it for all of them.

use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::{ParseError, Url};

use crate::config::Config;
use crate::error::FetchError;
use crate::models::Resource;
use crate::pagination::{BackendResponse, PaginatedResponse};
use crate::services::data_source::{Page, PageFetcher};

/// The signed-in session, if any.
#[derive(Debug, Default)]
pub struct AuthContext {
    access_token: RwLock<Option<String>>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let ctx = Self::new();
        ctx.sign_in(token);
        ctx
    }

    pub fn sign_in(&self, token: impl Into<String>) {
        let mut guard = self.access_token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.into());
        info!("session started");
    }

    pub fn sign_out(&self) {
        let mut guard = self.access_token.write().unwrap_or_else(|e| e.into_inner());
        if guard.take().is_some() {
            info!("session cleared");
        }
    }

    pub fn bearer(&self) -> Option<String> {
        self.access_token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|token| format!("Bearer {token}"))
    }

    pub fn is_signed_in(&self) -> bool {
        self.bearer().is_some()
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Arc<AuthContext>,
}

impl ApiClient {
    pub fn new(config: &Config, auth: Arc<AuthContext>) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.api_base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    fn list_url(&self, resource: Resource, query: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.join(&resource.list_path())?;
        url.set_query((!query.is_empty()).then_some(query));
        Ok(url)
    }

    fn record_url(&self, resource: Resource, id: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.join(&resource.list_path())?;
        url.path_segments_mut()
            .map_err(|()| ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(id);
        Ok(url)
    }

    /// Send a GET and unwrap the `data` of the backend envelope.
    async fn fetch_data<R: DeserializeOwned>(&self, url: Url) -> Result<R, FetchError> {
        let mut request = self.http.get(url);
        if let Some(bearer) = self.auth.bearer() {
            request = request.header(reqwest::header::AUTHORIZATION, bearer);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<BackendResponse<serde_json::Value>>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("error").to_string());
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: BackendResponse<R> = response.json().await?;
        body.data.ok_or(FetchError::MissingData)
    }

    /// `GET /api/v1/<resource>?<query>`, unwrapped to one page.
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: Resource,
        query: &str,
    ) -> Result<Page<T>, FetchError> {
        let url = self.list_url(resource, query)?;
        debug!(%url, "listing {}", resource);

        let page: PaginatedResponse<T> = self.fetch_data(url).await?;
        Ok(Page {
            items: page.result,
            total: page.meta.total,
        })
    }

    /// `GET /api/v1/<resource>/<id>`, a single record.
    pub async fn get<T: DeserializeOwned>(&self, resource: Resource, id: &str) -> Result<T, FetchError> {
        let url = self.record_url(resource, id)?;
        debug!(%url, "fetching one of {}", resource);
        self.fetch_data(url).await
    }

    /// A [`PageFetcher`] for one listing, for use with a data source.
    pub fn fetcher<T>(&self, resource: Resource) -> ResourceFetcher<T> {
        ResourceFetcher {
            client: self.clone(),
            resource,
            _marker: PhantomData,
        }
    }
}

pub struct ResourceFetcher<T> {
    client: ApiClient,
    resource: Resource,
    _marker: PhantomData<fn() -> T>,
}

#[async_trait]
impl<T> PageFetcher<T> for ResourceFetcher<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, query: &str) -> Result<Page<T>, FetchError> {
        self.client.list(self.resource, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_context_lifecycle() {
        let auth = AuthContext::new();
        assert_eq!(auth.bearer(), None);

        auth.sign_in("abc");
        assert_eq!(auth.bearer().as_deref(), Some("Bearer abc"));
        assert!(auth.is_signed_in());

        auth.sign_out();
        assert!(!auth.is_signed_in());
    }

    #[test]
    fn list_url_keeps_query_verbatim() {
        let config = Config {
            api_base_url: "http://localhost:8000".into(),
            ..Config::default()
        };
        let client = ApiClient::new(&config, Arc::new(AuthContext::new())).unwrap();

        let url = client
            .list_url(Resource::Jobs, "current=2&pageSize=8&name=%2Fdev%2Fi&sort=-updatedAt")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/v1/jobs?current=2&pageSize=8&name=%2Fdev%2Fi&sort=-updatedAt"
        );

        let bare = client.list_url(Resource::Resumes, "").unwrap();
        assert_eq!(bare.as_str(), "http://localhost:8000/api/v1/resumes");
    }

    #[test]
    fn record_url_escapes_the_id() {
        let client = ApiClient::new(&Config::default(), Arc::new(AuthContext::new())).unwrap();

        let url = client.record_url(Resource::Jobs, "job-007").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/jobs/job-007");

        let odd = client.record_url(Resource::Companies, "a b/c").unwrap();
        assert_eq!(odd.as_str(), "http://localhost:8000/api/v1/companies/a%20b%2Fc");
    }

    #[test]
    fn with_token_starts_signed_in() {
        let auth = AuthContext::with_token("t0k");
        assert_eq!(auth.bearer().as_deref(), Some("Bearer t0k"));
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let config = Config {
            api_base_url: "not a url".into(),
            ..Config::default()
        };
        let err = ApiClient::new(&config, Arc::new(AuthContext::new())).err().unwrap();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
