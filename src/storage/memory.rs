//! In-memory key-value store / 内存键值存储
//!
//! Entries expire lazily: reads treat stale entries as absent, writes sweep
//! them out. 过期条目在读取时视为不存在，写入时顺带清理。

use super::{KvStore, StorageError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |t| t > now)
    }
}

/// Process-local store backed by a guarded HashMap / 进程内HashMap存储
#[derive(Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read();
        let now = Instant::now();
        Ok(entries
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone()))
    }

    async fn put(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), StorageError> {
        let mut entries = self.entries.write();
        let now = Instant::now();
        // Sweep expired entries while holding the write lock / 持写锁时清理过期条目
        entries.retain(|_, e| e.is_live(now));
        entries.insert(
            key.to_string(),
            MemoryEntry {
                value,
                expires_at: ttl.map(|d| now + d),
            },
        );
        Ok(())
    }
}
