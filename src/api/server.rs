//! Service endpoints: documentation page, health, stats / 服务端点
//! 文档页、健康检查、统计信息

use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_embed::RustEmbed;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;
use zitu_backend::mapping::load_char_mapping;
use zitu_backend::utils::now_iso;

/// Embedded static documentation page / 嵌入的静态文档页
#[derive(RustEmbed)]
#[folder = "assets"]
#[include = "*.html"]
struct StaticAssets;

/// GET / - API documentation page / API文档页
pub async fn index_page() -> Response {
    serve_embedded_file("index.html")
}

/// Serve an embedded asset / 返回嵌入的静态文件
fn serve_embedded_file(path: &str) -> Response {
    match StaticAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, mime.as_ref())
                .body(axum::body::Body::from(content.data.into_owned()))
                .unwrap()
        }
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

/// GET /api/health - 健康检查
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": now_iso(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/stats - 统计信息
///
/// Character count reflects the mapping as currently loadable; a missing or
/// unreadable mapping reads as zero, not as an error.
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mapping = load_char_mapping(state.store.as_ref()).await;

    Json(json!({
        "total_characters": mapping.len(),
        "api_version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/api/search?q={query}",
            "/api/health",
            "/api/stats",
        ],
    }))
}

/// Non-preflight OPTIONS: empty 200, CORS headers added by the layer
/// 非预检OPTIONS请求：空200，CORS头由中间件补充
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Anything unrouted / 未匹配的路径
pub async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        (StatusCode::NOT_FOUND, "Not Found").into_response()
    }
}
