//! Chinese character classifier / 汉字判定
//!
//! Recognized ranges, inclusive / 识别的区段（含边界）：
//! - U+4E00..U+9FFF  CJK统一汉字 / CJK Unified Ideographs
//! - U+3400..U+4DBF  CJK扩展A / Extension A
//! - U+20000..U+2A6DF CJK扩展B / Extension B
//!
//! Extensions C-G and compatibility ideographs are deliberately not
//! recognized; the collection pipeline only ever produced these three
//! ranges, and lookup results must stay in step with it.
//! 扩展C-G与兼容汉字不识别，与采集管线保持一致。

/// True iff the code point is a recognized Chinese character.
/// Operates on a full Unicode scalar value, so Extension B characters
/// (outside the BMP) classify correctly.
pub fn is_chinese_char(c: char) -> bool {
    matches!(c,
        '\u{4e00}'..='\u{9fff}'
        | '\u{3400}'..='\u{4dbf}'
        | '\u{20000}'..='\u{2a6df}')
}
