//! GET /api/search - 汉字图片搜索
//!
//! Control flow per request: parameter check, quota check, mapping load,
//! per-character lookup. Dependency failures degrade (empty mapping,
//! fail-open limiter) rather than erroring.
//! 参数检查 → 限流 → 加载映射 → 逐字查询；依赖故障降级而非报错。

use axum::extract::{ConnectInfo, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::state::AppState;
use zitu_backend::mapping::load_char_mapping;
use zitu_backend::search::search_characters;
use zitu_backend::utils::{client_ip, now_iso};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
    headers: HeaderMap,
    addr: Option<ConnectInfo<SocketAddr>>,
) -> Response {
    // Missing parameter is checked before the quota: a malformed request
    // must not consume it / 参数缺失先于限流检查，不消耗配额
    let Some(query) = params.q else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "Missing query parameter: q",
            })),
        )
            .into_response();
    };

    let ip = client_ip(&headers, addr.map(|ConnectInfo(a)| a));
    if !state.limiter.check_and_consume(&ip).await.allowed {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "success": false,
                "error": "Rate limit exceeded. Try again later.",
            })),
        )
            .into_response();
    }

    let mapping = load_char_mapping(state.store.as_ref()).await;
    let results = search_characters(&query, &mapping, &state.asset_domain);
    let count = results.len();

    tracing::debug!("Search for {:?} from {} returned {} results", query, ip, count);

    Json(json!({
        "success": true,
        "query": query,
        "results": results,
        "count": count,
        "timestamp": now_iso(),
    }))
    .into_response()
}
