//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量导入器
//! - 管理应用生命周期（初始化、运行）
//! - 扫描 PDF 目录，分批并发导入（Semaphore）
//! - 持有题库和警告文件
//! - 输出全局统计信息，按需执行重复率检查
//!
//! ### `paper_processor` - 单份试卷处理器
//! - 提取文本 → 解析元数据 → 切分题目 → 去重入库
//! - 输出单份试卷的统计信息
//!
//! ### `syllabus_importer` - 教学大纲导入
//! - 大纲 PDF → 课程/单元/知识点 → JSON 文件
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<PDF>)
//!     ↓
//! paper_processor (处理一份 PDF)
//!     ↓
//! services (能力层：extract / metadata / segment / dedup / overlap)
//!     ↓
//! store (外部协作者：题库 / 试卷)
//! ```

pub mod batch_processor;
pub mod paper_processor;
pub mod syllabus_importer;

// 重新导出主要类型
pub use batch_processor::App;
pub use paper_processor::{process_pdf, process_text, IngestSummary};
pub use syllabus_importer::{import_syllabus, write_syllabus};
