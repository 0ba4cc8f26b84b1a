//! HTTP surface: the news proxy endpoint, the server-rendered search page and
//! the placeholder image.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /api/news?q=` | [`news_handler`]: relays the upstream JSON |
//! | `GET /?q=` | [`page_handler`]: search page as HTML |
//! | `GET /placeholder.svg` | [`placeholder_handler`]: generated image |

use crate::api::{NewsSource, Proxy};
use crate::error::ProxyError;
use crate::feed::LocalFeed;
use crate::page::{SearchController, SearchPage};
use crate::render::render_html;
use crate::utils::escape_html;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
    routing::get,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// Shared, read-only server state.
pub struct AppState<S> {
    pub proxy: Arc<Proxy<S>>,
    pub default_query: String,
}

/// The search term of a request. A repeated `q` is tolerated and the first
/// occurrence wins, so `?q=a&q=b` searches for `a`.
#[derive(Debug, Default)]
pub struct SearchParams {
    pub q: Option<String>,
}

impl From<Vec<(String, String)>> for SearchParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        let q = pairs.into_iter().find(|(k, _)| k == "q").map(|(_, v)| v);
        Self { q }
    }
}

#[derive(Debug, Deserialize)]
pub struct PlaceholderParams {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub text: Option<String>,
}

pub fn router<S: NewsSource + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(page_handler::<S>))
        .route("/api/news", get(news_handler::<S>))
        .route("/placeholder.svg", get(placeholder_handler))
        .with_state(Arc::new(state))
}

/// Bind `listen` and serve `app` until Ctrl-C.
pub async fn serve(listen: &str, app: Router) -> std::io::Result<()> {
    let listener = TcpListener::bind(listen).await?;
    info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; shutting down");
    }
    info!("Shutdown signal received");
}

/// `GET /api/news`: the proxy endpoint.
#[instrument(level = "info", skip(state))]
pub async fn news_handler<S: NewsSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, ProxyError> {
    let params = SearchParams::from(pairs);
    let data = state.proxy.relay(params.q.as_deref()).await?;
    Ok(Json(data))
}

/// `GET /`: renders the page after its initial load or after the submitted
/// search. A blank `q` is ignored and the page loads as if freshly opened.
#[instrument(level = "info", skip(state))]
pub async fn page_handler<S: NewsSource + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Html<String> {
    let params = SearchParams::from(pairs);
    let controller = SearchController::new(
        LocalFeed::new(Arc::clone(&state.proxy)),
        SearchPage::new(state.default_query.clone()),
    );

    let searched = match params.q.as_deref() {
        Some(term) => controller.search(term).await,
        None => false,
    };
    if !searched {
        controller.load_initial().await;
    }

    Html(render_html(&controller.snapshot().await))
}

/// `GET /placeholder.svg`: grey box with optional centred text.
pub async fn placeholder_handler(Query(params): Query<PlaceholderParams>) -> impl IntoResponse {
    let width = params.width.unwrap_or(400).clamp(1, 2000);
    let height = params.height.unwrap_or(200).clamp(1, 2000);
    let text = params.text.as_deref().map(escape_html).unwrap_or_default();

    let svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         viewBox=\"0 0 {width} {height}\">\
         <rect width=\"100%\" height=\"100%\" fill=\"#e5e7eb\"/>\
         <text x=\"50%\" y=\"50%\" dominant-baseline=\"middle\" text-anchor=\"middle\" \
         font-family=\"sans-serif\" font-size=\"16\" fill=\"#6b7280\">{text}</text></svg>"
    );

    ([(header::CONTENT_TYPE, "image/svg+xml")], svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NewsDataClient;
    use crate::api::tests::StubSource;
    use crate::config::UpstreamConfig;
    use crate::models::tests::item;
    use crate::render::NO_RESULTS_MESSAGE;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DEFAULT: &str = "atualidades do mundo";

    fn app_with<S: NewsSource + 'static>(source: S) -> (Router, Arc<Proxy<S>>) {
        let proxy = Arc::new(Proxy::new(source, DEFAULT));
        let app = router(AppState {
            proxy: Arc::clone(&proxy),
            default_query: DEFAULT.to_string(),
        });
        (app, proxy)
    }

    fn upstream_app(server: &MockServer) -> Router {
        let config = UpstreamConfig {
            base_url: url::Url::parse(&format!("{}/api/1/latest", server.uri())).unwrap(),
            api_key: "pub_test".to_string(),
            language: "pt".to_string(),
            default_query: DEFAULT.to_string(),
        };
        app_with(NewsDataClient::new(config)).0
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_news_relays_json() {
        let body = json!({"status": "success", "totalResults": 0, "results": []});
        let (app, proxy) = app_with(StubSource::ok(body.clone()));

        let (status, bytes) = get_body(app, "/api/news?q=economia").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), body);
        assert_eq!(*proxy_queries(&proxy), vec!["economia"]);
    }

    fn proxy_queries(proxy: &Proxy<StubSource>) -> std::sync::MutexGuard<'_, Vec<String>> {
        proxy.source().queries.lock().unwrap()
    }

    #[tokio::test]
    async fn test_news_without_query_uses_default() {
        let (app, proxy) = app_with(StubSource::ok(json!({})));
        let (status, _) = get_body(app.clone(), "/api/news").await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = get_body(app, "/api/news?q=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(*proxy_queries(&proxy), vec![DEFAULT, DEFAULT]);
    }

    #[tokio::test]
    async fn test_news_repeated_query_uses_first() {
        let (app, proxy) = app_with(StubSource::ok(json!({"results": []})));
        let (status, _) = get_body(app, "/api/news?q=a&q=b").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(*proxy_queries(&proxy), vec!["a"]);
    }

    #[test]
    fn test_search_params_ignore_other_keys() {
        let params = SearchParams::from(vec![
            ("lang".to_string(), "en".to_string()),
            ("q".to_string(), "chuva".to_string()),
        ]);
        assert_eq!(params.q.as_deref(), Some("chuva"));
        assert_eq!(SearchParams::from(vec![]).q, None);
    }

    #[tokio::test]
    async fn test_upstream_500_becomes_generic_500() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(500).set_body_string(r#"{"status":"error","results":{"message":"quota"}}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (status, bytes) = get_body(upstream_app(&server), "/api/news?q=teste").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(bytes, r#"{"error":"Falha ao buscar notícias"}"#.as_bytes());
    }

    #[tokio::test]
    async fn test_upstream_unreachable_becomes_generic_500() {
        let config = UpstreamConfig {
            base_url: url::Url::parse("http://127.0.0.1:9/api/1/latest").unwrap(),
            api_key: "pub_test".to_string(),
            language: "pt".to_string(),
            default_query: DEFAULT.to_string(),
        };
        let (app, _) = app_with(NewsDataClient::new(config));

        let (status, bytes) = get_body(app, "/api/news").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(bytes, r#"{"error":"Falha ao buscar notícias"}"#.as_bytes());
    }

    #[tokio::test]
    async fn test_upstream_body_round_trips_unchanged() {
        let raw = r#"{"status":"success","totalResults":2,"results":[{"title":"Zé","link":"https://a.example","source_id":"g1","pubDate":"2025-05-06 10:00:00","image_url":null,"description":null,"content":null,"keywords":["a","b"]}],"nextPage":"1746"}"#;

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "são paulo"))
            .and(query_param("language", "pt"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(raw, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let (status, bytes) = get_body(upstream_app(&server), "/api/news?q=s%C3%A3o%20paulo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(String::from_utf8(bytes).unwrap(), raw);
    }

    #[tokio::test]
    async fn test_page_renders_results() {
        let results: Vec<Value> = (0..12).map(|i| serde_json::to_value(item(i)).unwrap()).collect();
        let (app, proxy) = app_with(StubSource::ok(json!({
            "status": "success",
            "totalResults": 12,
            "results": results
        })));

        let (status, bytes) = get_body(app, "/?q=%20cultura%20").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(bytes).unwrap();
        assert_eq!(html.matches("class=\"card news-card\"").count(), 9);
        assert_eq!(*proxy_queries(&proxy), vec!["cultura"]);
    }

    #[tokio::test]
    async fn test_page_repeated_query_uses_first() {
        let (app, proxy) = app_with(StubSource::ok(json!({"status": "success", "results": []})));
        let (status, _) = get_body(app, "/?q=a&q=b").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(*proxy_queries(&proxy), vec!["a"]);
    }

    #[tokio::test]
    async fn test_page_blank_search_loads_default() {
        let (app, proxy) = app_with(StubSource::ok(json!({"status": "success", "results": []})));

        let (status, bytes) = get_body(app, "/?q=%20%20").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(bytes).unwrap().contains(NO_RESULTS_MESSAGE));
        assert_eq!(*proxy_queries(&proxy), vec![DEFAULT]);
    }

    #[tokio::test]
    async fn test_page_shows_banner_on_failure() {
        let (app, _) = app_with(StubSource::failing());

        let (status, bytes) = get_body(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(
            String::from_utf8(bytes)
                .unwrap()
                .contains("Erro ao carregar notícias. Por favor, tente novamente.")
        );
    }

    #[tokio::test]
    async fn test_placeholder_svg() {
        let (app, _) = app_with(StubSource::ok(json!({})));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/placeholder.svg?width=300&height=100&text=Imagem%20n%C3%A3o%20dispon%C3%ADvel")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/svg+xml"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let svg = String::from_utf8(body.to_vec()).unwrap();
        assert!(svg.contains("width=\"300\""));
        assert!(svg.contains("Imagem não disponível"));
    }
}
