//! 教学大纲解析 - 业务能力层
//!
//! 按课程代码把大纲文本切分为课程块，再把每个课程块切分为单元和知识点。

use crate::models::question::MetadataOverrides;
use crate::models::syllabus::{SyllabusSubject, SyllabusUnit};
use crate::utils::text::{cached_regex, collapse_whitespace};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

static UNIT_HEADER_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static MAPPING_LINE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static MAPPING_TAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static CO_TAG_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn unit_header_regex() -> Option<&'static Regex> {
    cached_regex(
        &UNIT_HEADER_REGEX,
        r"(?i)(Unit[ \t]+([IVXLC]+)[ \t]+[^\n]*?)[ \t]*(?:\n|$)",
    )
}

/// 大纲解析服务
#[derive(Debug, Clone)]
pub struct SyllabusParser {
    subject_block_regex: Option<Regex>,
}

impl SyllabusParser {
    /// `code_prefix` 为课程代码的前三位，例如 `414`
    pub fn new(code_prefix: &str) -> Self {
        let digits: String = code_prefix.chars().filter(|c| c.is_ascii_digit()).collect();
        let remaining = 6usize.saturating_sub(digits.len());
        let pattern = format!(r"(?m)^[ \t]*({}\d{{{}}})\b", regex::escape(&digits), remaining);
        Self {
            subject_block_regex: Regex::new(&pattern).ok(),
        }
    }

    /// 解析整份大纲
    ///
    /// 调用方提供的课程名和代码优先于解析结果。
    pub fn parse(&self, text: &str, overrides: &MetadataOverrides) -> Vec<SyllabusSubject> {
        let Some(block_re) = self.subject_block_regex.as_ref() else {
            return Vec::new();
        };

        let markers: Vec<(usize, usize, &str)> = block_re
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let code = caps.get(1)?;
                Some((whole.start(), whole.end(), code.as_str()))
            })
            .collect();

        let mut subjects = Vec::with_capacity(markers.len());
        for (i, &(_, end, code)) in markers.iter().enumerate() {
            let next_start = markers.get(i + 1).map_or(text.len(), |m| m.0);
            let content = text[end..next_start].trim();

            let parsed_name = content
                .lines()
                .next()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .unwrap_or("Unknown Subject");

            let subject_name = overrides
                .subject_name
                .clone()
                .unwrap_or_else(|| parsed_name.to_string());
            let subject_code = overrides
                .subject_code
                .clone()
                .unwrap_or_else(|| code.to_string());

            let units = extract_units(content);
            debug!("课程 {} - {}: {} 个单元", subject_code, subject_name, units.len());

            subjects.push(SyllabusSubject {
                subject_code,
                subject_name,
                syllabus_text: content.to_string(),
                units,
            });
        }

        subjects
    }
}

/// 按 `Unit <罗马数字> <标题>` 切分单元
///
/// 标题中带 `COn` 的（课程目标映射行）以及正文为空的单元会被跳过。
pub fn extract_units(text: &str) -> Vec<SyllabusUnit> {
    let (Some(header_re), Some(mapping_re), Some(co_re)) = (
        unit_header_regex(),
        cached_regex(
            &MAPPING_LINE_REGEX,
            r"(?i)Mapping of Course Outcomes\s*for\s+Unit\s+[IVXLC]+\s+CO\d+",
        ),
        cached_regex(&CO_TAG_REGEX, r"(?i)\bCO\d+\b"),
    ) else {
        return Vec::new();
    };

    let headers: Vec<(usize, usize, &str, &str)> = header_re
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((
                whole.start(),
                whole.end(),
                caps.get(1)?.as_str().trim(),
                caps.get(2)?.as_str(),
            ))
        })
        .collect();

    let mut units = Vec::new();
    for (i, &(_, end, heading, roman)) in headers.iter().enumerate() {
        let next_start = headers.get(i + 1).map_or(text.len(), |h| h.0);
        let body = mapping_re.replace_all(&text[end..next_start], "");
        let body = body.trim();

        if body.is_empty() || co_re.is_match(heading) {
            continue;
        }

        units.push(SyllabusUnit {
            unit_number: roman.to_uppercase(),
            heading: heading.to_string(),
            topics: split_into_topics(body),
        });
    }

    units
}

/// 单元正文 → 知识点列表（按逗号切分）
pub fn split_into_topics(unit_text: &str) -> Vec<String> {
    let collapsed = collapse_whitespace(unit_text);
    let cleaned = match cached_regex(&MAPPING_TAIL_REGEX, r"(?i)Mapping of Course Outcomes\s*for.*$") {
        Some(re) => re.replace(&collapsed, "").into_owned(),
        None => collapsed,
    };

    cleaned
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
