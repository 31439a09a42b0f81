//! # PYQ Ingest
//!
//! 往年试卷（PYQ）导入与重复率检查
//!
//! ## 架构设计
//!
//! ### ① 存储层（Store）
//! - `store/` - 题库和已生成试卷的最小能力接口，以 trait 对象注入
//! - `MemoryStore` - 内存实现，`JsonFileStore` - JSON 文件实现
//!
//! ### ② 业务能力层（Services）
//! - `text_extractor` - PDF → 文本
//! - `metadata_parser` - 学年 / 专业 / 课程 / 试卷编号
//! - `question_segmenter` - 大题 / OR 分支 / 小题
//! - `deduplicator` - 按内容哈希去重入库
//! - `overlap_matcher` - 生成试卷与往年题库的重复率
//! - `syllabus_parser` - 教学大纲 → 单元 / 知识点
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量导入，管理资源和并发
//! - `orchestrator/paper_processor` - 单份试卷导入
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod store;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, ExtractionError, StoreError};
pub use models::{ExtractedQuestion, GeneratedPaper, OverlapReport, PaperMetadata, StoredQuestion};
pub use orchestrator::{import_syllabus, process_pdf, process_text, App, IngestSummary};
pub use store::{JsonFileStore, MemoryStore, PaperStore, QuestionStore};
