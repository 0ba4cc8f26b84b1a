//! Error types for each boundary: startup config, the upstream call, the
//! proxy response, and the page's call to the proxy.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Body text returned to callers whenever the proxy cannot deliver news.
pub const PROXY_ERROR_MESSAGE: &str = "Falha ao buscar notícias";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no upstream API key configured (use --api-key or NEWSDATA_API_KEY)")]
    MissingApiKey,

    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Failure of the single outbound call to the upstream news API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("API returned status: {status}")]
    Upstream { status: reqwest::StatusCode },

    /// Built with [`FetchError::transport`] so the request URL, which
    /// carries the API key, is stripped before the error goes anywhere.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    #[error("malformed upstream body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn transport(err: reqwest::Error) -> Self {
        FetchError::Transport(err.without_url())
    }
}

/// What the proxy endpoint answers when the upstream call fails.
///
/// Carries no detail. The original error is logged where it is
/// caught and never reaches the browser.
#[derive(Debug, Error)]
#[error("Falha ao buscar notícias")]
pub struct ProxyError;

impl From<FetchError> for ProxyError {
    fn from(_: FetchError) -> Self {
        ProxyError
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: PROXY_ERROR_MESSAGE,
            }),
        )
            .into_response()
    }
}

/// Failure of the page's own call to the proxy.
#[derive(Debug, Error)]
pub enum ClientFetchError {
    #[error("proxy answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed proxy body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("proxy failed: {0}")]
    Proxy(#[from] ProxyError),
}
