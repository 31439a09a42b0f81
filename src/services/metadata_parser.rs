//! 试卷元数据解析 - 业务能力层
//!
//! 每条规则都是独立的函数，互不依赖顺序，匹配失败时返回 None。
//! 整体解析从不报错。

use crate::models::question::{MetadataOverrides, PaperMetadata};
use crate::utils::text::{cached_regex, title_case};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

static YEAR_TAG_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static PAREN_TOKEN_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static SUBJECT_CODE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static PAPER_NUMBER_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn year_tag_regex() -> Option<&'static Regex> {
    cached_regex(&YEAR_TAG_REGEX, r"(?i)(F\.E\.|S\.E\.|T\.E\.|B\.E\.)")
}

/// 解析全部元数据，并应用调用方覆盖值
pub fn parse_metadata(text: &str, overrides: &MetadataOverrides) -> PaperMetadata {
    let metadata = PaperMetadata {
        academic_year: parse_academic_year(text),
        department: parse_department(text),
        subject_name: parse_subject_name(text),
        subject_code: parse_subject_code(text),
        paper_number: parse_paper_number(text),
    }
    .with_overrides(overrides);

    debug!("解析到元数据: {:?}", metadata);
    metadata
}

/// 学年标记：`S.E.` / `t.e.` 等，输出大写且去掉标点（`SE`）
pub fn parse_academic_year(text: &str) -> Option<String> {
    let tag = year_tag_regex()?.find(text)?;
    Some(
        tag.as_str()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_uppercase(),
    )
}

/// 学年标记之后的第一个括号内容，没有学年标记时为 None
pub fn parse_department(text: &str) -> Option<String> {
    let tag = year_tag_regex()?.find(text)?;
    let rest = &text[tag.end()..];

    let re = cached_regex(&PAREN_TOKEN_REGEX, r"\(([^)\n]*)\)")?;
    let department = re.captures(rest)?.get(1)?.as_str().trim();
    if department.is_empty() {
        return None;
    }
    Some(title_case(department))
}

/// 括号内的 6 位数字加可选大写字母，例如 `(310241)`、`(410244D)`
pub fn parse_subject_code(text: &str) -> Option<String> {
    let re = cached_regex(&SUBJECT_CODE_REGEX, r"\((\d{6}[A-Z]?)\)")?;
    Some(re.captures(text)?.get(1)?.as_str().to_string())
}

/// 第一行全部由大写字母、空格、连字符、& 组成的文本，输出标题化
pub fn parse_subject_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| is_subject_name_line(line))
        .map(title_case)
}

fn is_subject_name_line(line: &str) -> bool {
    let mut chars = line.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {}
        _ => return false,
    }
    line.len() >= 2
        && chars.all(|c| c.is_ascii_uppercase() || c == ' ' || c == '-' || c == '&')
}

/// 形如 `[6353] - 125` 的试卷编号，去掉方括号
pub fn parse_paper_number(text: &str) -> Option<String> {
    let re = cached_regex(&PAPER_NUMBER_REGEX, r"\[\d+\]\s*-\s*\d+")?;
    let raw = re.find(text)?.as_str();
    Some(raw.replace(['[', ']'], "").trim().to_string())
}
