//! The page's side of the proxy contract.
//!
//! [`NewsFeed`] is what the search page calls to load news. Two
//! implementations exist:
//!
//! - [`ProxyClient`]: calls `GET {server}/api/news?q=...` over HTTP, used by
//!   the terminal client
//! - [`LocalFeed`]: calls the [`Proxy`] relay in-process, used by the
//!   server-rendered page so it shares the exact same contract without a
//!   loopback request

use crate::api::{NewsSource, Proxy};
use crate::error::{ClientFetchError, ConfigError};
use crate::models::NewsResponse;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;
use urlencoding::encode;

/// Trait for loading one page of news through the proxy.
pub trait NewsFeed: Send + Sync {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<NewsResponse, ClientFetchError>> + Send;
}

/// HTTP client for a running proxy.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ProxyClient {
    /// Create a client for the proxy served at `server` (e.g.
    /// `http://127.0.0.1:3000`). A path prefix is kept, so a proxy mounted at
    /// `http://host/portal` is reached at `http://host/portal/api/news`.
    pub fn new(server: &str) -> Result<Self, ConfigError> {
        let invalid = |source| ConfigError::InvalidUrl {
            url: server.to_string(),
            source,
        };
        let mut base = Url::parse(server).map_err(invalid)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join("api/news").map_err(invalid)?;

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
        })
    }

    /// The proxy URL requested for `query`, with the query percent-encoded.
    pub fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.set_query(Some(&format!("q={}", encode(query))));
        url
    }
}

impl NewsFeed for ProxyClient {
    #[instrument(level = "info", skip(self))]
    async fn search(&self, query: &str) -> Result<NewsResponse, ClientFetchError> {
        let response = self.http.get(self.request_url(query)).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Proxy returned non-OK status");
            return Err(ClientFetchError::Status(status));
        }

        let body = response.bytes().await?;
        let news: NewsResponse = serde_json::from_slice(&body)?;
        debug!(results = news.results.len(), "Loaded news from proxy");
        Ok(news)
    }
}

/// In-process feed over a shared [`Proxy`].
#[derive(Debug)]
pub struct LocalFeed<S> {
    proxy: Arc<Proxy<S>>,
}

impl<S> LocalFeed<S> {
    pub fn new(proxy: Arc<Proxy<S>>) -> Self {
        Self { proxy }
    }
}

impl<S> Clone for LocalFeed<S> {
    fn clone(&self) -> Self {
        Self {
            proxy: Arc::clone(&self.proxy),
        }
    }
}

impl<S: NewsSource> NewsFeed for LocalFeed<S> {
    async fn search(&self, query: &str) -> Result<NewsResponse, ClientFetchError> {
        let data = self.proxy.relay(Some(query)).await?;
        Ok(serde_json::from_value(data)?)
    }
}
