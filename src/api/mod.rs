//! HTTP surface / HTTP接口层
//!
//! Thin plumbing over the library modules: routing, CORS, panic recovery.
//! 路由、CORS与异常兜底，核心逻辑在库模块中。

pub mod search;
pub mod server;

use axum::http::{header, Method, Response, StatusCode};
use axum::routing::get;
use axum::Router;
use bytes::Bytes;
use http_body_util::Full;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// CORS policy: open read-only API / 开放的只读API跨域策略
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(86400))
}

/// Last-resort handler: surface an opaque 500, log the detail / 兜底500
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response<Full<Bytes>> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Request handler panicked: {}", detail);

    let body = serde_json::json!({
        "success": false,
        "error": "Internal server error"
    })
    .to_string();

    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
        .body(Full::from(Bytes::from(body)))
        .unwrap()
}

/// Build the complete application router / 构建完整路由
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(server::index_page).options(server::preflight))
        .route(
            "/api/health",
            get(server::health_check).options(server::preflight),
        )
        .route("/api/stats", get(server::stats).options(server::preflight))
        .route(
            "/api/search",
            get(search::search).options(server::preflight),
        )
        .fallback(server::fallback)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;
    use zitu_backend::mapping::CHAR_MAPPING_KEY;
    use zitu_backend::storage::{KvStore, MemoryKvStore};

    const MAPPING_JSON: &str = r#"{
        "水": {"url": "https://cdn.example.com/chars/6c34_水.png", "unicode": "U+6C34",
                "filename": "6c34_水.png", "size": 8421, "timestamp": "2024-11-02T10:00:00"},
        "火": {"filename": "706b_火.png"}
    }"#;

    async fn seeded_state() -> (Arc<MemoryKvStore>, Arc<AppState>) {
        let store = Arc::new(MemoryKvStore::new());
        store
            .put(CHAR_MAPPING_KEY, MAPPING_JSON.to_string(), None)
            .await
            .unwrap();
        let state = Arc::new(AppState::new(
            store.clone(),
            "chinese-characters.r2.dev".to_string(),
        ));
        (store, state)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_search_found_and_unavailable() {
        let (_, state) = seeded_state().await;
        // q=水火山
        let (status, body) = get_json(
            router(state),
            "/api/search?q=%E6%B0%B4%E7%81%AB%E5%B1%B1",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["query"], "水火山");
        assert_eq!(body["count"], 3);
        assert!(body["timestamp"].is_string());

        let results = body["results"].as_array().unwrap();
        assert_eq!(results[0]["url"], "https://cdn.example.com/chars/6c34_水.png");
        assert_eq!(
            results[1]["url"],
            "https://chinese-characters.r2.dev/chars/706b_火.png"
        );
        assert_eq!(results[2]["unicode"], "U+5C71");
        assert_eq!(results[2]["available"], false);
        assert_eq!(results[2]["url"], Value::Null);
    }

    #[tokio::test]
    async fn test_search_without_chinese_is_empty_success() {
        let (_, state) = seeded_state().await;
        let (status, body) = get_json(router(state), "/api/search?q=abc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 0);
        assert_eq!(body["results"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_search_missing_query_parameter() {
        let (_, state) = seeded_state().await;
        let (status, body) = get_json(router(state), "/api/search").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Missing query parameter: q");
    }

    #[tokio::test]
    async fn test_search_empty_query_is_success() {
        let (_, state) = seeded_state().await;
        let (status, body) = get_json(router(state), "/api/search?q=").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_search_rate_limited() {
        let (store, state) = seeded_state().await;
        // Without connection info the client resolves to "unknown" / 无连接信息时客户端为unknown
        store
            .put("ratelimit:unknown", "100".to_string(), None)
            .await
            .unwrap();

        let (status, body) = get_json(router(state), "/api/search?q=%E6%B0%B4").await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Rate limit exceeded. Try again later.");
    }

    #[tokio::test]
    async fn test_search_rate_limit_keys_on_forwarded_ip() {
        let (store, state) = seeded_state().await;
        store
            .put("ratelimit:1.2.3.4", "100".to_string(), None)
            .await
            .unwrap();

        let request = Request::builder()
            .uri("/api/search?q=%E6%B0%B4")
            .header("x-forwarded-for", "1.2.3.4")
            .body(Body::empty())
            .unwrap();
        let response = router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_search_survives_empty_store() {
        let store = Arc::new(MemoryKvStore::new());
        let state = Arc::new(AppState::new(store, "chinese-characters.r2.dev".to_string()));

        let (status, body) = get_json(router(state), "/api/search?q=%E6%B0%B4").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["available"], false);
    }

    #[tokio::test]
    async fn test_health() {
        let (_, state) = seeded_state().await;
        let (status, body) = get_json(router(state), "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_stats_counts_mapping() {
        let (_, state) = seeded_state().await;
        let (status, body) = get_json(router(state), "/api/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_characters"], 2);
        assert_eq!(body["api_version"], env!("CARGO_PKG_VERSION"));
        let endpoints = body["endpoints"].as_array().unwrap();
        assert_eq!(endpoints.len(), 3);
        assert_eq!(endpoints[0], "/api/search?q={query}");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let (_, state) = seeded_state().await;
        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_headers_on_responses() {
        let (_, state) = seeded_state().await;
        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let (_, state) = seeded_state().await;
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/search")
            .header("origin", "https://example.com")
            .header("access-control-request-method", "GET")
            .body(Body::empty())
            .unwrap();
        let response = router(state).oneshot(request).await.unwrap();

        assert!(response.status().is_success());
        let headers = response.headers();
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        assert!(headers
            .get("access-control-allow-methods")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("GET"));
        assert_eq!(headers.get("access-control-max-age").unwrap(), "86400");
    }

    #[tokio::test]
    async fn test_bare_options_is_answered() {
        let (_, state) = seeded_state().await;
        // Not a preflight: no Access-Control-Request-Method / 非预检的OPTIONS
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/search")
            .body(Body::empty())
            .unwrap();
        let response = router(state).oneshot(request).await.unwrap();
        assert!(response.status().is_success());
    }

    #[tokio::test]
    async fn test_index_page_serves_html() {
        let (_, state) = seeded_state().await;
        let response = router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/html"));
    }
}
