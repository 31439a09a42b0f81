use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// 从试卷头部解析出的元数据，所有字段都是尽力而为
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperMetadata {
    pub academic_year: Option<String>,
    pub department: Option<String>,
    pub subject_name: Option<String>,
    pub subject_code: Option<String>,
    pub paper_number: Option<String>,
}

/// 调用方显式提供的元数据，优先于解析结果
#[derive(Debug, Clone, Default)]
pub struct MetadataOverrides {
    pub subject_name: Option<String>,
    pub subject_code: Option<String>,
}

impl PaperMetadata {
    /// 应用调用方覆盖值（仅覆盖非空字段）
    pub fn with_overrides(mut self, overrides: &MetadataOverrides) -> Self {
        if let Some(name) = overrides.subject_name.as_deref().filter(|s| !s.trim().is_empty()) {
            self.subject_name = Some(name.trim().to_string());
        }
        if let Some(code) = overrides.subject_code.as_deref().filter(|s| !s.trim().is_empty()) {
            self.subject_code = Some(code.trim().to_string());
        }
        self
    }
}

/// 从往年试卷中切分出的单个小题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedQuestion {
    pub academic_year: Option<String>,
    pub department: Option<String>,
    pub subject_name: Option<String>,
    pub subject_code: Option<String>,
    pub paper_number: Option<String>,
    /// 组合编号，例如 `Q1a` 或 `Q3b (Alternative)`
    pub question_id: String,
    /// 大题编号，例如 `Q1`
    pub main_question: String,
    /// 小题字母，例如 `a`
    pub sub_question: String,
    pub is_alternative: bool,
    pub text: String,
    pub unit: Option<u8>,
    pub marks: Option<u32>,
    /// 清洗后题干的 MD5，全局去重键
    pub content_hash: String,
}

impl ExtractedQuestion {
    /// 计算题干的内容哈希（纯函数）
    pub fn compute_hash(text: &str) -> String {
        format!("{:x}", Md5::digest(text.as_bytes()))
    }

    /// 入库前校验
    pub fn validate(&self) -> StoreResult<()> {
        if self.text.trim().is_empty() {
            return Err(StoreError::invalid("text", "题干为空"));
        }
        if self.question_id.is_empty() {
            return Err(StoreError::invalid("question_id", "题号为空"));
        }
        let expected = Self::compute_hash(&self.text);
        if self.content_hash != expected {
            return Err(StoreError::invalid(
                "content_hash",
                format!("哈希与题干不一致: {} != {}", self.content_hash, expected),
            ));
        }
        Ok(())
    }
}

/// 已入库的题目记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredQuestion {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub question: ExtractedQuestion,
}

impl StoredQuestion {
    pub fn new(question: ExtractedQuestion) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            question,
        }
    }
}
