use crate::error::{AppResult, ConfigError};
use std::num::NonZeroUsize;
use std::str::FromStr;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时处理的试卷数量
    pub max_concurrent_papers: usize,
    /// 待导入的往年试卷 PDF 目录
    pub pdf_folder: String,
    /// 题库 JSON 文件路径
    pub question_store_path: String,
    /// 已生成试卷 TOML 文件存放目录
    pub generated_folder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 导入失败的 PDF 记录文件
    pub warn_file: String,
    /// 题目正文开始前的说明标记
    pub body_marker: String,
    /// 重复率检查的用户ID（为空时跳过检查）
    pub overlap_owner_id: Option<String>,
    // --- 教学大纲 ---
    /// 教学大纲 PDF（为空时跳过大纲解析）
    pub syllabus_pdf: Option<String>,
    pub syllabus_code_prefix: String,
    /// 大纲解析结果输出文件
    pub syllabus_output: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_papers: 8,
            pdf_folder: "pyq_pdfs".to_string(),
            question_store_path: "question_store.json".to_string(),
            generated_folder: "generated_toml".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            warn_file: "warn.txt".to_string(),
            body_marker: "Instructions to the candidates:".to_string(),
            overlap_owner_id: None,
            syllabus_pdf: None,
            syllabus_code_prefix: "414".to_string(),
            syllabus_output: "syllabus.json".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置，未设置的项使用默认值
    ///
    /// 设置了但无法解析的值直接报错，不静默回退。
    pub fn from_env() -> AppResult<Self> {
        let default = Self::default();
        Ok(Self {
            max_concurrent_papers: parse_env_value::<NonZeroUsize>(
                "MAX_CONCURRENT_PAPERS",
                std::env::var("MAX_CONCURRENT_PAPERS").ok(),
                "正整数",
            )?
            .map_or(default.max_concurrent_papers, NonZeroUsize::get),
            pdf_folder: std::env::var("PDF_FOLDER").unwrap_or(default.pdf_folder),
            question_store_path: std::env::var("QUESTION_STORE_PATH").unwrap_or(default.question_store_path),
            generated_folder: std::env::var("GENERATED_FOLDER").unwrap_or(default.generated_folder),
            verbose_logging: parse_env_value::<bool>("VERBOSE_LOGGING", std::env::var("VERBOSE_LOGGING").ok(), "bool")?
                .unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            warn_file: std::env::var("WARN_FILE").unwrap_or(default.warn_file),
            body_marker: std::env::var("BODY_MARKER").unwrap_or(default.body_marker),
            overlap_owner_id: std::env::var("OVERLAP_OWNER_ID").ok().filter(|v| !v.trim().is_empty()),
            syllabus_pdf: std::env::var("SYLLABUS_PDF").ok().filter(|v| !v.trim().is_empty()),
            syllabus_code_prefix: std::env::var("SYLLABUS_CODE_PREFIX").unwrap_or(default.syllabus_code_prefix),
            syllabus_output: std::env::var("SYLLABUS_OUTPUT").unwrap_or(default.syllabus_output),
        })
    }
}

/// 解析单个环境变量的值；未设置或为空时返回 `None`
fn parse_env_value<T: FromStr>(
    var_name: &str,
    raw: Option<String>,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::env_var_parse_failed(var_name, value, expected_type)),
    }
}
