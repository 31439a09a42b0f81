use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 生成试卷与往年题库的重复情况
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapReport {
    /// 归一化后命中的题干
    pub matched_questions: BTreeSet<String>,
    /// 重复率（百分比，保留两位小数）
    pub repeated_percent: f64,
    /// 归一化去重后的生成题数
    pub total_generated: usize,
    pub total_matched: usize,
}

impl std::fmt::Display for OverlapReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "重复 {}/{} 道 ({:.2}%)",
            self.total_matched, self.total_generated, self.repeated_percent
        )
    }
}
