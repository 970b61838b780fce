//! Character mapping module / 字符映射模块
//!
//! The mapping from character to image metadata is produced by the external
//! collection pipeline and stored wholesale under one key. The service reads
//! it fresh per request and never writes individual entries.
//! 字符映射由外部采集管线生成，整体存储在一个键下，服务端只读不改。

use crate::storage::KvStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed store key holding the whole mapping / 存放完整映射的固定键
pub const CHAR_MAPPING_KEY: &str = "char_mapping";

/// One collected character / 一个已采集的汉字
///
/// All fields are optional: older pipeline versions wrote partial entries,
/// and `url`/`unicode` are derived from the code point when absent. Extra
/// keys written by the pipeline (e.g. `r2_key`) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unicode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    /// ISO string from the pipeline; numbers tolerated / 管线写入ISO字符串，数字也兼容
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<serde_json::Value>,
}

/// character -> entry, keyed by the character itself / 以汉字本身为键
pub type CharMapping = HashMap<String, CharacterEntry>;

/// Load the mapping from the store / 从存储加载字符映射
///
/// Every failure path degrades to an empty mapping: the request still
/// succeeds and every character reads as not yet collected.
/// 任何失败都降级为空映射，请求仍然成功。
pub async fn load_char_mapping(store: &dyn KvStore) -> CharMapping {
    match store.get(CHAR_MAPPING_KEY).await {
        Ok(Some(raw)) => match serde_json::from_str::<CharMapping>(&raw) {
            Ok(mapping) => mapping,
            Err(e) => {
                tracing::warn!("Character mapping is not valid JSON: {}", e);
                CharMapping::new()
            }
        },
        Ok(None) => {
            tracing::warn!("Character mapping not found in storage");
            CharMapping::new()
        }
        Err(e) => {
            tracing::warn!("Failed to read character mapping: {}", e);
            CharMapping::new()
        }
    }
}

/// Import a mapping JSON file into the store / 导入映射JSON文件到存储
///
/// Validates that the file parses as a mapping, then stores the raw content
/// verbatim (no TTL) so pipeline-specific extra keys survive the round trip.
/// Returns the number of entries imported. 校验后原样存储，返回条目数。
pub async fn import_mapping_file(store: &dyn KvStore, path: &str) -> anyhow::Result<usize> {
    let raw = tokio::fs::read_to_string(path).await?;
    let mapping: CharMapping = serde_json::from_str(&raw)?;
    store.put(CHAR_MAPPING_KEY, raw, None).await?;
    Ok(mapping.len())
}
