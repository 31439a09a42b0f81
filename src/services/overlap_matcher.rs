//! 重复率检查 - 业务能力层
//!
//! 将已生成试卷的题干与往年题库做归一化后的集合交集。
//! 比较基于集合：同一份试卷中文本相同的题目只计一次。

use crate::error::StoreResult;
use crate::models::report::OverlapReport;
use crate::store::{PaperStore, QuestionStore};
use crate::utils::text::cached_regex;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use tracing::{debug, info};

static NON_WORD_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

/// 归一化题干：小写、去首尾空白、去掉非单词非空白字符
///
/// 去标点后再去一次首尾空白，保证幂等。
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let trimmed = lowered.trim();
    match cached_regex(&NON_WORD_REGEX, r"[^\w\s]") {
        Some(re) => re.replace_all(trimmed, "").trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// 归一化后的题干集合
pub fn normalized_set<I, S>(texts: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts.into_iter().map(|t| normalize(t.as_ref())).collect()
}

/// 计算重复率报告
pub fn compute_overlap<G, H, S, T>(generated: G, historical: H) -> OverlapReport
where
    G: IntoIterator<Item = S>,
    S: AsRef<str>,
    H: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let generated_set = normalized_set(generated);
    let historical_set = normalized_set(historical);

    let matched_questions: BTreeSet<String> = generated_set
        .intersection(&historical_set)
        .cloned()
        .collect();

    let total_generated = generated_set.len();
    let total_matched = matched_questions.len();
    let repeated_percent = if total_generated == 0 {
        0.0
    } else {
        round2(100.0 * total_matched as f64 / total_generated as f64)
    };

    OverlapReport {
        matched_questions,
        repeated_percent,
        total_generated,
        total_matched,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 重复率检查服务
pub struct OverlapMatcher<'a> {
    papers: &'a dyn PaperStore,
    corpus: &'a dyn QuestionStore,
}

impl<'a> OverlapMatcher<'a> {
    pub fn new(papers: &'a dyn PaperStore, corpus: &'a dyn QuestionStore) -> Self {
        Self { papers, corpus }
    }

    /// 检查某个用户最新生成的试卷与全部往年题的重复情况
    ///
    /// 用户没有试卷时按空集合处理，重复率为 0。
    pub fn check_latest(&self, owner_id: &str) -> StoreResult<OverlapReport> {
        let generated = match self.papers.latest_for_owner(owner_id)? {
            Some(paper) => {
                debug!("用户 {} 的最新试卷: {}", owner_id, paper.title);
                paper.question_texts()
            }
            None => {
                debug!("用户 {} 没有已生成的试卷", owner_id);
                Vec::new()
            }
        };
        let historical = self.corpus.all_texts()?;

        let report = compute_overlap(&generated, &historical);
        info!("🔁 用户 {} 重复率检查: {}", owner_id, report);
        Ok(report)
    }
}
