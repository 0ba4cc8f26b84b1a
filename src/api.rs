//! Upstream news API client and the proxy relay built on it.
//!
//! # Architecture
//!
//! - [`NewsSource`]: trait for "fetch the latest news for a query"
//! - [`NewsDataClient`]: the newsdata.io implementation over `reqwest`
//! - [`Proxy`]: default-query substitution and error translation in front of
//!   any [`NewsSource`]; the HTTP handler in `server` is a thin shell over it
//!
//! # Upstream Call
//!
//! - Exactly one outbound request per relay
//! - No retry and no timeout beyond the transport defaults
//! - The body is parsed as JSON and returned untouched, with object key
//!   order preserved

use crate::config::UpstreamConfig;
use crate::error::{FetchError, ProxyError};
use crate::utils::truncate_for_log;
use serde_json::Value;
use std::future::Future;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use url::Url;
use urlencoding::encode;

/// Trait for the upstream side of the proxy.
///
/// Implementors fetch one page of the latest news matching `query` and hand
/// back the upstream JSON as-is.
pub trait NewsSource: Send + Sync {
    fn latest(&self, query: &str) -> impl Future<Output = Result<Value, FetchError>> + Send;
}

/// Client for the newsdata.io `latest` endpoint.
///
/// Holds the immutable [`UpstreamConfig`] and a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct NewsDataClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl NewsDataClient {
    pub fn new(config: UpstreamConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Build the upstream request URL for `query`.
    ///
    /// The query is percent-encoded; the key and language filter come from
    /// the configuration.
    ///
    /// ```text
    /// {base_url}?apikey={key}&q={query}&language={language}
    /// ```
    pub fn request_url(&self, query: &str) -> Url {
        let mut url = self.config.base_url.clone();
        url.set_query(Some(&format!(
            "apikey={}&q={}&language={}",
            encode(&self.config.api_key),
            encode(query),
            encode(&self.config.language),
        )));
        url
    }
}

impl NewsSource for NewsDataClient {
    #[instrument(level = "info", skip(self))]
    async fn latest(&self, query: &str) -> Result<Value, FetchError> {
        let t0 = Instant::now();
        let response = self
            .http
            .get(self.request_url(query))
            .send()
            .await
            .map_err(FetchError::transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, elapsed_ms = t0.elapsed().as_millis() as u64, "Upstream returned non-success status");
            return Err(FetchError::Upstream { status });
        }

        let body = response.bytes().await.map_err(FetchError::transport)?;
        let data = serde_json::from_slice::<Value>(&body).map_err(|e| {
            warn!(
                error = %e,
                body_preview = %truncate_for_log(&String::from_utf8_lossy(&body), 300),
                "Upstream body is not valid JSON"
            );
            FetchError::from(e)
        })?;

        debug!(bytes = body.len(), elapsed_ms = t0.elapsed().as_millis() as u64, "Fetched upstream news");
        Ok(data)
    }
}

/// The proxy relay: picks the query, calls the source once, and swallows
/// upstream error detail after logging it.
#[derive(Debug)]
pub struct Proxy<S> {
    source: S,
    default_query: String,
}

impl<S: NewsSource> Proxy<S> {
    pub fn new(source: S, default_query: impl Into<String>) -> Self {
        Self {
            source,
            default_query: default_query.into(),
        }
    }

    #[cfg(test)]
    pub(crate) fn source(&self) -> &S {
        &self.source
    }

    /// Relay a search to the upstream.
    ///
    /// An absent or empty `q` is replaced by the default query. Any
    /// [`FetchError`] is logged and turned into the generic [`ProxyError`].
    #[instrument(level = "info", skip(self))]
    pub async fn relay(&self, q: Option<&str>) -> Result<Value, ProxyError> {
        let query = q.filter(|q| !q.is_empty()).unwrap_or(self.default_query.as_str());

        match self.source.latest(query).await {
            Ok(data) => {
                info!(%query, "Relayed upstream news");
                Ok(data)
            }
            Err(e) => {
                error!(%query, error = %e, "Error fetching news");
                Err(e.into())
            }
        }
    }
}
