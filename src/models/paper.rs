use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 已生成试卷中的一道题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

/// 已生成的试卷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPaper {
    #[serde(default = "new_paper_id")]
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub subject_name: String,
    #[serde(default)]
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub questions: Vec<GeneratedQuestion>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

fn new_paper_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl GeneratedPaper {
    /// 题干文本列表
    pub fn question_texts(&self) -> Vec<String> {
        self.questions.iter().map(|q| q.text.clone()).collect()
    }

    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }
}
