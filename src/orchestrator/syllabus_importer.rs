//! 教学大纲导入 - 编排层
//!
//! 大纲 PDF → 文本 → 课程/单元/知识点，结果写成 JSON 文件。

use crate::models::question::MetadataOverrides;
use crate::models::syllabus::SyllabusSubject;
use crate::services::{extract_text, SyllabusParser};
use anyhow::{Context, Result};
use std::fs;
use tracing::{info, warn};

/// 解析一份大纲 PDF
pub fn import_syllabus(
    bytes: &[u8],
    parser: &SyllabusParser,
    overrides: &MetadataOverrides,
) -> Result<Vec<SyllabusSubject>> {
    let text = extract_text(bytes).context("大纲PDF文本提取失败")?;
    let subjects = parser.parse(&text, overrides);

    if subjects.is_empty() {
        warn!("⚠️ 大纲中没有找到任何课程代码");
    }
    for subject in &subjects {
        info!(
            "📘 {} - {}: {} 个单元",
            subject.subject_code,
            subject.subject_name,
            subject.units.len()
        );
    }

    Ok(subjects)
}

/// 把解析结果写入 JSON 文件
pub fn write_syllabus(subjects: &[SyllabusSubject], output_path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(subjects).context("大纲序列化失败")?;
    fs::write(output_path, json).with_context(|| format!("无法写入大纲文件: {}", output_path))?;
    info!("💾 大纲已写入 {} ({} 门课程)", output_path, subjects.len());
    Ok(())
}
