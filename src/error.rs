use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// PDF 文本提取错误
///
/// 对单次上传来说是终止性错误，不做部分提取
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 文档无法打开（损坏或不是 PDF）
    #[error("无法打开PDF文档: {source}")]
    OpenFailed {
        #[source]
        source: lopdf::Error,
    },
    /// 单页文本提取失败
    #[error("第 {page} 页文本提取失败: {source}")]
    PageFailed {
        page: u32,
        #[source]
        source: lopdf::Error,
    },
    /// 文档没有页面
    #[error("PDF文档不包含任何页面")]
    NoPages,
    /// 没有可提取的文本（例如扫描件）
    #[error("PDF中没有可提取的文本（可能是扫描件）")]
    EmptyText,
}

/// 题库存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 记录未通过入库校验
    #[error("记录校验失败 ({field}): {reason}")]
    InvalidRecord { field: &'static str, reason: String },
    /// 内部锁被毒化
    #[error("存储锁已失效: {0}")]
    Poisoned(String),
    /// 持久化失败
    #[error("持久化失败 ({path}): {source}")]
    PersistFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

impl ConfigError {
    /// 创建环境变量解析错误
    pub fn env_var_parse_failed(
        var_name: impl Into<String>,
        value: impl Into<String>,
        expected_type: impl Into<String>,
    ) -> Self {
        ConfigError::EnvVarParseFailed {
            var_name: var_name.into(),
            value: value.into(),
            expected_type: expected_type.into(),
        }
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

impl StoreError {
    /// 创建记录校验错误
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        StoreError::InvalidRecord {
            field,
            reason: reason.into(),
        }
    }

    /// 创建持久化错误
    pub fn persist_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        StoreError::PersistFailed {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

// ========== Result 类型别名 ==========
// anyhow 已为所有实现了 std::error::Error 的类型提供转换，编排层直接用 `?`

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

/// 存储层结果类型
pub type StoreResult<T> = Result<T, StoreError>;
