//! 单个试卷处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责把一份往年试卷 PDF 导入题库，是试卷级别的编排器。
//!
//! ## 核心流程
//!
//! 1. **文本提取**：PDF → 文本，失败即终止本份试卷
//! 2. **元数据解析**：学年、专业、课程代码/名称、试卷编号
//! 3. **题目切分**：大题 → OR 分支 → 小题
//! 4. **去重入库**：按内容哈希只插入新题，整份试卷完成后写回题库
//! 5. **统计输出**：记录提取/新增/重复数量

use crate::models::question::{MetadataOverrides, PaperMetadata};
use crate::services::{extract_text, parse_metadata, Deduplicator, QuestionSegmenter};
use crate::store::QuestionStore;
use crate::utils::logging::truncate_text;
use anyhow::{Context, Result};
use tracing::{debug, info};

/// 单份试卷的导入统计
#[derive(Debug, Default, Clone)]
pub struct IngestSummary {
    pub metadata: PaperMetadata,
    /// 切分出的小题数
    pub extracted: usize,
    /// 新插入题库的数量
    pub inserted: usize,
    /// 题库中已存在的数量
    pub duplicates: usize,
}

/// 导入单份 PDF
///
/// # 参数
/// - `bytes`: PDF 原始字节
/// - `overrides`: 调用方提供的课程名/代码
/// - `segmenter`: 题目切分器
/// - `store`: 题库
/// - `paper_index`: 试卷索引（用于日志）
pub fn process_pdf(
    bytes: &[u8],
    overrides: &MetadataOverrides,
    segmenter: &QuestionSegmenter,
    store: &dyn QuestionStore,
    paper_index: usize,
) -> Result<IngestSummary> {
    let text = extract_text(bytes).context("PDF文本提取失败")?;
    debug!("[试卷 {}] 提取到 {} 个字符", paper_index, text.len());

    process_text(&text, overrides, segmenter, store, paper_index)
}

/// 导入已提取的试卷文本
pub fn process_text(
    text: &str,
    overrides: &MetadataOverrides,
    segmenter: &QuestionSegmenter,
    store: &dyn QuestionStore,
    paper_index: usize,
) -> Result<IngestSummary> {
    let metadata = parse_metadata(text, overrides);
    log_metadata(paper_index, &metadata);

    let questions = segmenter.segment(text, &metadata);
    let mut summary = IngestSummary {
        extracted: questions.len(),
        ..Default::default()
    };

    let dedup = Deduplicator::new(store);
    for question in questions {
        let question_id = question.question_id.clone();
        let (stored, was_new) = dedup
            .persist(question)
            .with_context(|| format!("题目 {} 入库失败", question_id))?;

        if was_new {
            summary.inserted += 1;
            debug!(
                "[试卷 {}] + {} {}",
                paper_index,
                question_id,
                truncate_text(&stored.question.text, 60)
            );
        } else {
            summary.duplicates += 1;
            debug!("[试卷 {}] = {} 已存在", paper_index, question_id);
        }
    }

    // 每份试卷写回一次
    store.flush().context("题库写回失败")?;

    summary.metadata = metadata;
    log_paper_complete(paper_index, &summary);
    Ok(summary)
}

// ========== 日志辅助函数 ==========

fn log_metadata(paper_index: usize, metadata: &PaperMetadata) {
    let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    info!(
        "[试卷 {}] 学年: {} | 专业: {} | 课程: {} ({}) | 编号: {}",
        paper_index,
        show(&metadata.academic_year),
        show(&metadata.department),
        show(&metadata.subject_name),
        show(&metadata.subject_code),
        show(&metadata.paper_number)
    );
}

fn log_paper_complete(paper_index: usize, summary: &IngestSummary) {
    info!(
        "[试卷 {}] 题目统计: 提取 {}, 新增 {}, 重复 {}",
        paper_index, summary.extracted, summary.inserted, summary.duplicates
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::text_extractor::tests::build_pdf;
    use crate::store::MemoryStore;

    const PAPER: &str = "Total No. of Questions : 8]\n\
        [6353] - 125\n\
        T.E. (Computer Engineering)\n\
        DATABASE MANAGEMENT SYSTEMS\n\
        (2019 Pattern) (310241)\n\
        Instructions to the candidates:\n\
        1) Answer Q1 or Q2.\n\
        Q1) a) What is X? [5]\n\
        b) Define Y. [3]\n\
        OR\n\
        Q2) a) Explain Z. [10]\n";

    #[test]
    fn test_process_text_inserts_then_dedups() {
        let store = MemoryStore::new();
        let segmenter = QuestionSegmenter::new("Instructions to the candidates:");
        let overrides = MetadataOverrides::default();

        let first = process_text(PAPER, &overrides, &segmenter, &store, 1).unwrap();
        assert_eq!(first.extracted, 3);
        assert_eq!(first.inserted, 3);
        assert_eq!(first.duplicates, 0);
        assert_eq!(first.metadata.subject_code.as_deref(), Some("310241"));

        let second = process_text(PAPER, &overrides, &segmenter, &store, 2).unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.duplicates, 3);
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_records_carry_paper_metadata() {
        let store = MemoryStore::new();
        let segmenter = QuestionSegmenter::new("Instructions to the candidates:");
        process_text(PAPER, &MetadataOverrides::default(), &segmenter, &store, 1).unwrap();

        let records = store.snapshot().unwrap();
        assert!(records.iter().all(|r| {
            r.question.academic_year.as_deref() == Some("TE")
                && r.question.department.as_deref() == Some("Computer Engineering")
                && r.question.paper_number.as_deref() == Some("6353 - 125")
        }));
    }

    #[test]
    fn test_process_pdf_rejects_unreadable_input() {
        let store = MemoryStore::new();
        let segmenter = QuestionSegmenter::new("Instructions to the candidates:");

        let result = process_pdf(b"%PDF-garbage", &MetadataOverrides::default(), &segmenter, &store, 1);
        assert!(result.is_err());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_process_pdf_end_to_end() {
        let pdf = build_pdf(&[
            &["T.E. (Computer Engineering)", "Instructions to the candidates:"],
            &["Q1) a) What is X? [5]", "b) Define Y. [3]"],
        ]);
        let store = MemoryStore::new();
        let segmenter = QuestionSegmenter::new("Instructions to the candidates:");

        let summary =
            process_pdf(&pdf, &MetadataOverrides::default(), &segmenter, &store, 1).unwrap();
        assert_eq!(summary.metadata.academic_year.as_deref(), Some("TE"));
        assert_eq!(summary.inserted, 2);
    }

    #[test]
    fn test_paper_fails_when_store_cannot_be_written() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        std::fs::create_dir_all(&data_dir).unwrap();
        let path = data_dir.join("store.json");
        let store = crate::store::JsonFileStore::open(&path).unwrap();
        let segmenter = QuestionSegmenter::new("Instructions to the candidates:");
        let overrides = MetadataOverrides::default();

        std::fs::remove_dir_all(&data_dir).unwrap();
        assert!(process_text(PAPER, &overrides, &segmenter, &store, 1).is_err());

        // 重新导入时题目都已在内存中，写回成功后文件里有全部题目
        std::fs::create_dir_all(&data_dir).unwrap();
        let retry = process_text(PAPER, &overrides, &segmenter, &store, 1).unwrap();
        assert_eq!(retry.duplicates, 3);

        let reopened = crate::store::JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 3);
    }
}
