//! 题目切分 - 业务能力层
//!
//! 把试卷正文切分为「大题 → OR 分支 → 字母小题」，并为每道小题提取分值、
//! 单元号和内容哈希。
//!
//! 切分规则：
//! 1. 压缩空白
//! 2. 按 `Q<数字>)` 切大题
//! 3. 按独立的大写 `OR` 切分支，第 0 个分支为主分支，其余为替代分支
//! 4. 按 `<字母>)` 切小题
//! 5. 提取 `[n]` 分值并清洗题干，清洗后为空的片段直接丢弃
//!
//! 没有字母小题的大题不会产生任何记录（不回退为整题文本）。

use crate::models::question::{ExtractedQuestion, PaperMetadata};
use crate::utils::text::{cached_regex, collapse_whitespace};
use phf::phf_map;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// 大题编号 → 单元号
static UNIT_MAP: phf::Map<&'static str, u8> = phf_map! {
    "Q1" => 3, "Q2" => 3,
    "Q3" => 4, "Q4" => 4,
    "Q5" => 5, "Q6" => 5,
    "Q7" => 6, "Q8" => 6,
};

static MAIN_MARKER_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static SUB_MARKER_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static OR_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static MARKS_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static TRAILING_PERIODS_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn main_marker_regex() -> Option<&'static Regex> {
    cached_regex(&MAIN_MARKER_REGEX, r"(Q\d+)\)")
}

// 小题标记必须位于开头或空白之后，避免误切 `f(x)` 之类的文本
fn sub_marker_regex() -> Option<&'static Regex> {
    cached_regex(&SUB_MARKER_REGEX, r"(?:^|\s)([a-z])\)")
}

fn or_regex() -> Option<&'static Regex> {
    cached_regex(&OR_REGEX, r"\bOR\b")
}

fn marks_regex() -> Option<&'static Regex> {
    cached_regex(&MARKS_REGEX, r"\[(\d+)\]")
}

fn trailing_periods_regex() -> Option<&'static Regex> {
    cached_regex(&TRAILING_PERIODS_REGEX, r"(?:^|\s)\.+$")
}

/// 题目切分服务
///
/// 职责：
/// - 定位说明文字之后的题目正文
/// - 把正文切分为小题记录
/// - 不关心存储和去重
#[derive(Debug, Clone)]
pub struct QuestionSegmenter {
    body_marker: String,
}

impl QuestionSegmenter {
    /// 使用正文开始标记创建切分器
    pub fn new(body_marker: impl Into<String>) -> Self {
        Self {
            body_marker: body_marker.into(),
        }
    }

    /// 返回最后一个说明标记之后的正文；没有标记时返回全文
    pub fn question_body<'a>(&self, text: &'a str) -> &'a str {
        if self.body_marker.is_empty() {
            return text;
        }
        match text.rfind(&self.body_marker) {
            Some(pos) => &text[pos + self.body_marker.len()..],
            None => text,
        }
    }

    /// 从完整试卷文本中切分题目
    pub fn segment(&self, text: &str, metadata: &PaperMetadata) -> Vec<ExtractedQuestion> {
        segment_body(self.question_body(text), metadata)
    }
}

/// 切分题目正文
pub fn segment_body(body: &str, metadata: &PaperMetadata) -> Vec<ExtractedQuestion> {
    let (Some(main_re), Some(or_re), Some(sub_re)) =
        (main_marker_regex(), or_regex(), sub_marker_regex())
    else {
        return Vec::new();
    };

    let body = collapse_whitespace(body);
    let mut questions = Vec::new();

    for (main_question, content) in split_on_markers(main_re, &body) {
        let unit = unit_for(main_question);
        let before = questions.len();

        for (branch_index, branch) in or_re.split(content).enumerate() {
            let is_alternative = branch_index > 0;

            for (sub_question, sub_content) in split_on_markers(sub_re, branch) {
                let (text, marks) = clean_sub_question(sub_content);
                if text.is_empty() {
                    debug!("丢弃空题干: {}{}", main_question, sub_question);
                    continue;
                }

                let mut question_id = format!("{}{}", main_question, sub_question);
                if is_alternative {
                    question_id.push_str(" (Alternative)");
                }

                questions.push(ExtractedQuestion {
                    academic_year: metadata.academic_year.clone(),
                    department: metadata.department.clone(),
                    subject_name: metadata.subject_name.clone(),
                    subject_code: metadata.subject_code.clone(),
                    paper_number: metadata.paper_number.clone(),
                    question_id,
                    main_question: main_question.to_string(),
                    sub_question: sub_question.to_string(),
                    is_alternative,
                    content_hash: ExtractedQuestion::compute_hash(&text),
                    text,
                    unit,
                    marks,
                });
            }
        }

        if questions.len() == before {
            debug!("{} 没有可识别的小题，未生成记录", main_question);
        }
    }

    questions
}

/// 按标记切分为 (标记名, 内容) 对；第一个标记之前的文本被忽略
///
/// 标记名取第 1 个捕获组，内容为本标记结束到下一个标记开始之间的文本。
fn split_on_markers<'a>(re: &Regex, text: &'a str) -> Vec<(&'a str, &'a str)> {
    let markers: Vec<(usize, usize, &'a str)> = re
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let label = caps.get(1)?;
            Some((whole.start(), whole.end(), label.as_str()))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, &(_, end, label))| {
            let next_start = markers.get(i + 1).map_or(text.len(), |m| m.0);
            (label, &text[end..next_start])
        })
        .collect()
}

/// 提取分值并清洗题干
///
/// 返回 (清洗后的题干, 分值)。题干中的所有 `[n]` 都会被去掉，只取第一个作为分值。
pub fn clean_sub_question(raw: &str) -> (String, Option<u32>) {
    let (Some(marks_re), Some(trailing_re)) = (marks_regex(), trailing_periods_regex()) else {
        return (collapse_whitespace(raw), None);
    };

    let marks = marks_re
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());

    let stripped = marks_re.replace_all(raw, " ");
    let collapsed = collapse_whitespace(&stripped);
    let text = trailing_re.replace(&collapsed, "").trim().to_string();

    (text, marks)
}

/// 查询大题对应的单元号
pub fn unit_for(main_question: &str) -> Option<u8> {
    UNIT_MAP.get(main_question).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> PaperMetadata {
        PaperMetadata {
            academic_year: Some("TE".to_string()),
            subject_code: Some("310241".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_segment_basic_paper() {
        let body = "Q1) a) What is X? [5] b) Define Y. [3] Q2) a) Explain Z. [10]";
        let questions = segment_body(body, &metadata());

        assert_eq!(questions.len(), 3);

        assert_eq!(questions[0].question_id, "Q1a");
        assert_eq!(questions[0].text, "What is X?");
        assert_eq!(questions[0].marks, Some(5));
        assert_eq!(questions[0].unit, Some(3));

        assert_eq!(questions[1].question_id, "Q1b");
        assert_eq!(questions[1].text, "Define Y.");
        assert_eq!(questions[1].marks, Some(3));
        assert_eq!(questions[1].unit, Some(3));

        assert_eq!(questions[2].question_id, "Q2a");
        assert_eq!(questions[2].text, "Explain Z.");
        assert_eq!(questions[2].marks, Some(10));
        assert_eq!(questions[2].unit, Some(3));

        assert!(questions.iter().all(|q| !q.is_alternative));
        assert!(questions
            .iter()
            .all(|q| q.subject_code.as_deref() == Some("310241")));
    }

    #[test]
    fn test_or_branch_is_alternative() {
        let body = "Q3) a) Explain joins. [6] b) What is a view? [4] \
                    OR a) Explain normalization. [6] b) Define BCNF. [4]";
        let questions = segment_body(body, &metadata());

        let ids: Vec<&str> = questions.iter().map(|q| q.question_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "Q3a",
                "Q3b",
                "Q3a (Alternative)",
                "Q3b (Alternative)"
            ]
        );
        assert!(!questions[0].is_alternative);
        assert!(!questions[1].is_alternative);
        assert!(questions[2].is_alternative);
        assert!(questions[3].is_alternative);
        assert_eq!(questions[2].main_question, "Q3");
        assert_eq!(questions[2].sub_question, "a");
        assert_eq!(questions[2].unit, Some(4));
    }

    #[test]
    fn test_or_inside_word_does_not_split() {
        let body = "Q1) a) Explain FOR loops and ORDER BY. [4]";
        let questions = segment_body(body, &metadata());

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Explain FOR loops and ORDER BY.");
    }

    #[test]
    fn test_main_question_without_sub_parts_yields_nothing() {
        let body = "Q1) Write a short note on indexing. [10] Q2) a) Define B-tree. [5]";
        let questions = segment_body(body, &metadata());

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_id, "Q2a");
    }

    #[test]
    fn test_empty_fragment_is_dropped() {
        let body = "Q4) a) [5] b) Explain locking. [5]";
        let questions = segment_body(body, &metadata());

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_id, "Q4b");
    }

    #[test]
    fn test_unit_outside_map_is_none() {
        let body = "Q9) a) Bonus question. [2]";
        let questions = segment_body(body, &metadata());

        assert_eq!(questions[0].unit, None);
        assert_eq!(unit_for("Q7"), Some(6));
        assert_eq!(unit_for("Q8"), Some(6));
    }

    #[test]
    fn test_clean_sub_question() {
        assert_eq!(
            clean_sub_question("  Explain\n 2PC   protocol. [8] "),
            ("Explain 2PC protocol.".to_string(), Some(8))
        );
        assert_eq!(
            clean_sub_question("Draw ER diagram [6] ."),
            ("Draw ER diagram".to_string(), Some(6))
        );
        assert_eq!(
            clean_sub_question("No marks here"),
            ("No marks here".to_string(), None)
        );
        assert_eq!(clean_sub_question(" . "), (String::new(), None));
    }

    #[test]
    fn test_question_body_after_last_marker() {
        let segmenter = QuestionSegmenter::new("Instructions to the candidates:");
        let text = "HEADER Q9) a) ignored. Instructions to the candidates: 1) Neat diagrams \
                    Instructions to the candidates: Q1) a) Kept? [2]";

        let questions = segmenter.segment(text, &PaperMetadata::default());
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Kept?");

        assert_eq!(segmenter.question_body("no marker"), "no marker");
    }

    #[test]
    fn test_content_hash_is_deterministic() {
        let body = "Q1) a) What is X? [5] b) Define Y. [3]";
        let first = segment_body(body, &metadata());
        let second = segment_body(body, &PaperMetadata::default());

        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.content_hash, b.content_hash);
            assert_eq!(a.content_hash, ExtractedQuestion::compute_hash(&a.text));
        }
    }
}
