//! Request utility functions / 请求工具函数

use axum::http::HeaderMap;
use chrono::{SecondsFormat, Utc};
use std::net::SocketAddr;

/// Resolve the client's apparent IP / 解析客户端IP
///
/// Proxy headers win over the peer address; with neither available the
/// literal "unknown" is returned, which means every unresolvable client
/// shares one rate-limit bucket.
/// 代理头优先于对端地址，都没有时返回 "unknown"（共享一个限流桶）。
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    // X-Forwarded-For: first hop is the original client / 第一跳为原始客户端
    if let Some(value) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = value.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(value) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let value = value.trim();
        if !value.is_empty() {
            return value.to_string();
        }
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

/// Current time as an ISO-8601 UTC string / 当前时间的ISO-8601字符串
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
