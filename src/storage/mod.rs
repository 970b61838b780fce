//! Key-value storage module / 键值存储模块
//!
//! The service keeps all shared state (character mapping, rate-limit
//! counters) behind a narrow get/put-with-ttl interface so the HTTP layer
//! never talks to a concrete backend directly.
//! 服务的共享状态（字符映射、限流计数器）都通过统一的 get/put 接口访问。
//!
//! Backends / 后端：
//! - `sqlite`: persistent, survives restarts (recommended) / 持久化存储（推荐）
//! - `memory`: process-local, for tests and throwaway deployments / 进程内存储

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

/// Storage backend error / 存储后端错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Narrow key-value interface with per-entry TTL / 带TTL的窄键值接口
///
/// `get` returns `Ok(None)` for absent or expired keys. `put` with
/// `ttl: None` stores the value without expiry.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn put(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), StorageError>;
}
