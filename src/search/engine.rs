//! Lookup engine / 查询引擎
//!
//! Resolves each Chinese character of a query against the mapping snapshot.
//! Pure function over already-loaded data; storage access stays in the
//! caller. 对已加载的映射快照逐字解析，不访问存储。

use super::classifier::is_chinese_char;
use crate::mapping::CharMapping;
use serde::Serialize;

/// Pass-through metadata of a collected image / 已采集图片的透传元数据
#[derive(Debug, Clone, Serialize)]
pub struct ResultMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<serde_json::Value>,
}

/// One result per Chinese character of the query / 每个汉字一条结果
///
/// Serialized untagged to the original wire shape: found entries carry a
/// url and metadata, uncollected entries carry `available: false` and an
/// explicit null url.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SearchResultItem {
    Found {
        #[serde(rename = "char")]
        character: String,
        url: String,
        unicode: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
        metadata: ResultMetadata,
    },
    Unavailable {
        #[serde(rename = "char")]
        character: String,
        url: Option<String>,
        unicode: String,
        available: bool,
        message: String,
    },
}

/// `U+` followed by uppercase hex, no padding / 大写十六进制，不补零
fn format_unicode(c: char) -> String {
    format!("U+{:X}", c as u32)
}

/// Fallback image URL when the mapping entry carries none / 映射无URL时的兜底构造
///
/// Lowercase hex padded to at least four digits; Extension B code points
/// keep their full five digits.
pub fn construct_image_url(c: char, domain: &str) -> String {
    format!("https://{}/chars/{:04x}_{}.png", domain, c as u32, c)
}

/// Resolve every Chinese character of `query` in input order / 按输入顺序解析
///
/// Non-Chinese code points are dropped silently. Repeated characters yield
/// repeated results. An empty query yields an empty result list.
pub fn search_characters(
    query: &str,
    mapping: &CharMapping,
    asset_domain: &str,
) -> Vec<SearchResultItem> {
    let mut results = Vec::new();

    for c in query.chars() {
        if !is_chinese_char(c) {
            continue;
        }
        let character = c.to_string();

        match mapping.get(&character) {
            Some(entry) => {
                let url = entry
                    .url
                    .clone()
                    .unwrap_or_else(|| construct_image_url(c, asset_domain));
                let unicode = entry.unicode.clone().unwrap_or_else(|| format_unicode(c));
                results.push(SearchResultItem::Found {
                    character,
                    url,
                    unicode,
                    filename: entry.filename.clone(),
                    metadata: ResultMetadata {
                        size: entry.size,
                        timestamp: entry.timestamp.clone(),
                    },
                });
            }
            None => {
                // 未采集的字符返回占位信息 / Placeholder for uncollected characters
                results.push(SearchResultItem::Unavailable {
                    character,
                    url: None,
                    unicode: format_unicode(c),
                    available: false,
                    message: "Character not yet collected".to_string(),
                });
            }
        }
    }

    results
}
