//! SQLite key-value store / SQLite键值存储
//!
//! Single `kv_store` table with an optional absolute expiry timestamp.
//! TTL resolution is one second. 单表存储，过期时间为绝对Unix秒。

use super::{KvStore, StorageError};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use std::time::Duration;

/// Persistent store backed by a SQLite database / 基于SQLite的持久化存储
pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    /// Connect and run idempotent migrations / 连接并执行幂等建表
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = SqlitePool::connect(database_url).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                expires_at INTEGER
            )
            "#,
        )
        .execute(&pool)
        .await?;

        tracing::info!("Key-value store ready at {}", database_url);
        Ok(Self { pool })
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row: Option<(String, Option<i64>)> =
            sqlx::query_as("SELECT value, expires_at FROM kv_store WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((_, Some(expires_at))) if expires_at <= Utc::now().timestamp() => {
                // Expired rows read as absent; remove eagerly / 过期行视为不存在，顺手删除
                sqlx::query("DELETE FROM kv_store WHERE key = ?")
                    .bind(key)
                    .execute(&self.pool)
                    .await
                    .ok();
                Ok(None)
            }
            Some((value, _)) => Ok(Some(value)),
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), StorageError> {
        let now = Utc::now().timestamp();
        let expires_at = ttl.map(|d| now + d.as_secs() as i64);

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, expires_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        // Opportunistic sweep of expired rows / 顺带清理过期行
        sqlx::query("DELETE FROM kv_store WHERE expires_at IS NOT NULL AND expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .ok();

        Ok(())
    }
}
