use crate::models::paper::GeneratedPaper;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载数据并转换为 GeneratedPaper 对象
pub async fn load_toml_to_generated_paper(toml_file_path: &Path) -> Result<GeneratedPaper> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let paper: GeneratedPaper = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    Ok(paper.with_file_path(toml_file_path.to_string_lossy().to_string()))
}

/// 从文件夹中加载所有 TOML 文件并转换为 GeneratedPaper 对象列表
///
/// 单个文件解析失败只记录警告，不影响其他文件
pub async fn load_all_toml_files(folder_path: &str) -> Result<Vec<GeneratedPaper>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut papers = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            tracing::info!(
                "正在加载: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );

            match load_toml_to_generated_paper(&path).await {
                Ok(paper) => {
                    tracing::info!("成功加载 {} 个题目", paper.questions.len());
                    papers.push(paper);
                }
                Err(e) => {
                    tracing::warn!("加载文件失败 {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(papers)
}
