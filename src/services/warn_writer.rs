//! 警告写入服务 - 业务能力层
//!
//! 只负责"写 warn.txt"能力，不关心流程

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;
use tracing::debug;

/// 警告写入服务
///
/// 职责：
/// - 将导入失败的 PDF 写入 warn.txt
/// - 每次只记录一个文件
pub struct WarnWriter {
    warn_file_path: String,
    // 多个导入任务可能同时写入
    lock: Mutex<()>,
}

impl WarnWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// 写入警告信息
    ///
    /// # 参数
    /// - `file_name`: 导入失败的 PDF 文件名
    /// - `reason`: 失败原因
    pub fn write(&self, file_name: &str, reason: &str) -> Result<()> {
        debug!("写入警告: {} | {}", file_name, reason);

        let _guard = self
            .lock
            .lock()
            .map_err(|e| anyhow::anyhow!("警告文件锁已失效: {}", e))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)?;

        let warn_msg = format!(
            "{} | 文件 {} | 原因: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            file_name,
            reason
        );

        file.write_all(warn_msg.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warn.txt");
        let writer = WarnWriter::with_path(path.to_string_lossy().to_string());

        writer.write("scan.pdf", "没有可提取的文本").unwrap();
        writer.write("broken.pdf", "无法打开").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("scan.pdf"));
        assert!(lines[1].contains("broken.pdf"));
    }
}
