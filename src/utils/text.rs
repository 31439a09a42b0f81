//! 文本处理辅助函数

use regex::Regex;
use std::sync::OnceLock;

/// 惰性编译并缓存正则，编译失败时返回 None
pub fn cached_regex(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

/// 把所有空白序列压缩为单个空格并去掉首尾空白
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 标题化：字母前若不是字母则大写，否则小写（`DATA-BASE` → `Data-Base`）
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            result.push(c);
            prev_is_letter = false;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a\n\tb   c \r\n"), "a b c");
        assert_eq!(collapse_whitespace(" \n "), "");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("DATABASE MANAGEMENT SYSTEMS"), "Database Management Systems");
        assert_eq!(title_case("DATA-BASE & AI"), "Data-Base & Ai");
        assert_eq!(title_case("computer engineering"), "Computer Engineering");
    }
}
