//! fsel-remote: HTTP query service for fsel.
//!
//! [`HttpQueryService`] implements [`fsel_core::QueryService`] against an
//! API v3 server:
//!
//! ```text
//! GET {base}/api/v3/users?filters=[...]&pageSize=n
//! GET {base}/api/v3/work_packages?filters=[...]
//! Accept: application/hal+json
//! ```
//!
//! Only plain `http` is supported; put a TLS-terminating proxy in front for
//! anything else.

mod hal;

use async_trait::async_trait;
use bytes::Bytes;
use fsel_core::{QueryError, QueryExpression, QueryService, ResourceKind, SelectOption};
use http_body_util::{BodyExt, Empty};
use hyper::header::ACCEPT;
use hyper::{Request, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpQueryService {
    base: Url,
    page_size: Option<u32>,
    timeout: Duration,
    client: Client<HttpConnector, Empty<Bytes>>,
}

impl HttpQueryService {
    /// Build a service rooted at `base_url` (e.g. `http://localhost:3000`).
    /// A path prefix such as `http://host/openproject` is kept.
    pub fn new(base_url: &str) -> Result<Self, QueryError> {
        let mut base = Url::parse(base_url).map_err(|e| QueryError::InvalidUrl(e.to_string()))?;
        if base.scheme() != "http" {
            return Err(QueryError::InvalidUrl(format!(
                "unsupported scheme `{}` (only http)",
                base.scheme()
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            base,
            page_size: None,
            timeout: DEFAULT_TIMEOUT,
            client: Client::builder(TokioExecutor::new()).build_http(),
        })
    }

    pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full collection URL for one query, with the expression in `filters`.
    pub fn collection_url(
        &self,
        kind: ResourceKind,
        expression: &QueryExpression,
    ) -> Result<Url, QueryError> {
        let mut url = self
            .base
            .join(&format!("api/v3/{}", kind.path_segment()))
            .map_err(|e| QueryError::InvalidUrl(e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("filters", &expression.to_query_param());
            if let Some(page_size) = self.page_size {
                query.append_pair("pageSize", &page_size.to_string());
            }
        }
        Ok(url)
    }

    async fn get(&self, url: &Url) -> Result<Vec<SelectOption>, QueryError> {
        let uri: Uri = url
            .as_str()
            .parse()
            .map_err(|e: hyper::http::uri::InvalidUri| QueryError::InvalidUrl(e.to_string()))?;
        let request = Request::get(uri)
            .header(ACCEPT, "application/hal+json")
            .body(Empty::<Bytes>::new())
            .map_err(|e| QueryError::InvalidUrl(e.to_string()))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?
            .to_bytes();

        if !status.is_success() {
            return Err(QueryError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).trim().to_string(),
            });
        }

        let collection: hal::Collection = serde_json::from_slice(&body)?;
        Ok(collection.into_options())
    }
}

#[async_trait]
impl QueryService for HttpQueryService {
    async fn fetch(
        &self,
        kind: ResourceKind,
        expression: &QueryExpression,
    ) -> Result<Vec<SelectOption>, QueryError> {
        let url = self.collection_url(kind, expression)?;
        tracing::debug!(%url, "api: GET");

        match tokio::time::timeout(self.timeout, self.get(&url)).await {
            Ok(result) => result,
            Err(_) => Err(QueryError::Transport(format!(
                "request timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}
