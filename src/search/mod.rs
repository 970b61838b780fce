//! Character search module / 汉字搜索模块
//!
//! Only provides lookup primitives; the HTTP layer controls flow.
//! 只提供查询原语，控制流在HTTP层。
//!
//! - `classifier`: decides whether a code point is a Chinese character
//! - `engine`: resolves each Chinese character in a query against the
//!   mapping, in input order / 按输入顺序逐字解析

pub mod classifier;
pub mod engine;

pub use classifier::is_chinese_char;
pub use engine::{construct_image_url, search_characters, ResultMetadata, SearchResultItem};
