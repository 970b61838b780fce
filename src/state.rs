use std::sync::Arc;
use zitu_backend::rate_limit::RateLimiter;
use zitu_backend::storage::KvStore;

/// Shared application state / 共享应用状态
///
/// The store is the single source of truth; the limiter holds its own
/// handle to it. 存储为唯一事实来源。
pub struct AppState {
    pub store: Arc<dyn KvStore>,
    pub limiter: RateLimiter,
    /// Public domain for constructed image URLs / 构造图片URL的公开域名
    pub asset_domain: String,
}

impl AppState {
    pub fn new(store: Arc<dyn KvStore>, asset_domain: String) -> Self {
        let limiter = RateLimiter::new(store.clone());
        Self {
            store,
            limiter,
            asset_domain,
        }
    }
}
