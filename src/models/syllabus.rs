use serde::{Deserialize, Serialize};

/// 教学大纲中的一门课程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllabusSubject {
    pub subject_code: String,
    pub subject_name: String,
    /// 课程块原文
    pub syllabus_text: String,
    pub units: Vec<SyllabusUnit>,
}

/// 教学大纲中的一个单元
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllabusUnit {
    /// 罗马数字单元号，例如 `III`
    pub unit_number: String,
    pub heading: String,
    pub topics: Vec<String>,
}
