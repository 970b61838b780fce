//! Per-IP rate limiting / 按IP限流
//!
//! Fixed 60-second window, 100 requests per window per client. The counter
//! lives in the key-value store with a TTL, so each key's window resets when
//! its last write expires. The read-then-write sequence is not transactional;
//! concurrent requests may slightly overshoot the cap.
//! 固定60秒窗口，每客户端100次。计数器带TTL存储，读写非事务。
//!
//! On storage failure the limiter fails open: availability over strictness.
//! 存储故障时放行请求。

use crate::storage::KvStore;
use std::sync::Arc;
use std::time::Duration;

/// Requests allowed per window / 每窗口允许的请求数
pub const RATE_LIMIT_MAX_REQUESTS: u64 = 100;
/// Window length, enforced by store TTL / 窗口时长，由存储TTL实现
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub allowed: bool,
}

/// Rate limiter over an injected store / 基于注入存储的限流器
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn KvStore>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    fn counter_key(client_id: &str) -> String {
        format!("ratelimit:{}", client_id)
    }

    /// Check the client's quota and consume one request / 检查配额并消费一次请求
    ///
    /// A denied request does not increment the counter, so it neither counts
    /// against the window nor extends it. 被拒绝的请求不增加计数。
    pub async fn check_and_consume(&self, client_id: &str) -> RateLimitDecision {
        let key = Self::counter_key(client_id);

        let count = match self.store.get(&key).await {
            Ok(value) => value.and_then(|v| v.parse::<u64>().ok()).unwrap_or(0),
            Err(e) => {
                tracing::warn!("Rate limit read failed, allowing request: {}", e);
                return RateLimitDecision { allowed: true };
            }
        };

        if count >= RATE_LIMIT_MAX_REQUESTS {
            return RateLimitDecision { allowed: false };
        }

        if let Err(e) = self
            .store
            .put(&key, (count + 1).to_string(), Some(RATE_LIMIT_WINDOW))
            .await
        {
            tracing::warn!("Rate limit write failed, allowing request: {}", e);
        }

        RateLimitDecision { allowed: true }
    }
}
