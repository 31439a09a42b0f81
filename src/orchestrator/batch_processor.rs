//! 批量试卷处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量导入往年试卷和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写日志文件头、打开题库
//! 2. **批量扫描**：扫描 PDF 目录下所有待导入的文件
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：将试卷分批次处理，每批完成后再开始下一批
//! 5. **失败记录**：导入失败的 PDF 写入 warn 文件
//! 6. **重复率检查**：配置了用户ID时，检查其最新试卷与题库的重复情况
//! 7. **大纲解析**：配置了大纲 PDF 时，解析并写出课程单元结构
//!
//! 切分和去重本身是同步的，每份 PDF 在 `spawn_blocking` 中执行。

use crate::config::Config;
use crate::models::question::MetadataOverrides;
use crate::models::report::OverlapReport;
use crate::orchestrator::paper_processor::{self, IngestSummary};
use crate::orchestrator::syllabus_importer;
use crate::services::{OverlapMatcher, QuestionSegmenter, SyllabusParser, WarnWriter};
use crate::store::{JsonFileStore, MemoryStore, PaperStore, QuestionStore};
use crate::utils::logging::{
    init_log_file, log_batch_complete, log_batch_start, log_papers_loaded, log_startup,
    print_final_stats,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    store: Arc<JsonFileStore>,
    segmenter: QuestionSegmenter,
    warn_writer: Arc<WarnWriter>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(config.max_concurrent_papers, &config.question_store_path);

        let store = JsonFileStore::open(&config.question_store_path)
            .with_context(|| format!("无法打开题库: {}", config.question_store_path))?;

        Ok(Self {
            segmenter: QuestionSegmenter::new(config.body_marker.clone()),
            warn_writer: Arc::new(WarnWriter::with_path(config.warn_file.clone())),
            store: Arc::new(store),
            config,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let pdf_files = self.scan_pdfs().await?;

        if pdf_files.is_empty() {
            warn!("⚠️ 没有找到待导入的PDF文件");
        } else {
            log_papers_loaded(pdf_files.len(), self.config.max_concurrent_papers);
            let stats = self.process_all_papers(pdf_files).await?;
            print_final_stats(
                stats.success,
                stats.failed,
                stats.inserted,
                stats.duplicates,
                &self.config.output_log_file,
            );
        }

        if let Some(owner_id) = self.config.overlap_owner_id.as_deref() {
            self.check_overlap(owner_id).await?;
        }

        if let Some(syllabus_pdf) = self.config.syllabus_pdf.as_deref() {
            self.import_syllabus(syllabus_pdf).await?;
        }

        Ok(())
    }

    /// 解析教学大纲并写出结果
    async fn import_syllabus(&self, syllabus_pdf: &str) -> Result<()> {
        info!("\n📘 正在解析教学大纲: {}", syllabus_pdf);
        let bytes = tokio::fs::read(syllabus_pdf)
            .await
            .with_context(|| format!("无法读取大纲PDF: {}", syllabus_pdf))?;

        let parser = SyllabusParser::new(&self.config.syllabus_code_prefix);
        let subjects = tokio::task::spawn_blocking(move || {
            syllabus_importer::import_syllabus(&bytes, &parser, &MetadataOverrides::default())
        })
        .await??;

        syllabus_importer::write_syllabus(&subjects, &self.config.syllabus_output)
    }

    /// 扫描 PDF 目录（按文件名排序）
    async fn scan_pdfs(&self) -> Result<Vec<PathBuf>> {
        info!("\n📁 正在扫描待导入的PDF...");
        let folder = Path::new(&self.config.pdf_folder);
        if !folder.exists() {
            anyhow::bail!("文件夹不存在: {}", self.config.pdf_folder);
        }

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(folder)
            .await
            .with_context(|| format!("无法读取文件夹: {}", self.config.pdf_folder))?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_pdf = path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
            if is_pdf {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// 处理所有试卷
    async fn process_all_papers(&self, pdf_files: Vec<PathBuf>) -> Result<ProcessingStats> {
        let max_concurrent = self.config.max_concurrent_papers.max(1);
        let semaphore = Arc::new(Semaphore::new(max_concurrent));
        let total_papers = pdf_files.len();
        let mut stats = ProcessingStats::default();

        // 分批处理
        for batch_start in (0..total_papers).step_by(max_concurrent) {
            let batch_end = (batch_start + max_concurrent).min(total_papers);
            let batch_num = (batch_start / max_concurrent) + 1;
            let total_batches = total_papers.div_ceil(max_concurrent);

            log_batch_start(batch_num, total_batches, batch_start + 1, batch_end, total_papers);

            let batch_result = self
                .process_batch(&pdf_files[batch_start..batch_end], batch_start, semaphore.clone())
                .await?;

            log_batch_complete(
                batch_num,
                batch_result.success,
                batch_result.success + batch_result.failed,
            );
            stats.merge(batch_result);
        }

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch_files: &[PathBuf],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<ProcessingStats> {
        let mut batch_handles = Vec::new();

        // 为本批创建并发任务
        for (idx, path) in batch_files.iter().enumerate() {
            let paper_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;

            let path = path.clone();
            let store = self.store.clone();
            let segmenter = self.segmenter.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                info!("[试卷 {}] 开始导入: {}", paper_index, path.display());

                let bytes = tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("无法读取PDF: {}", path.display()))?;

                tokio::task::spawn_blocking(move || {
                    paper_processor::process_pdf(
                        &bytes,
                        &MetadataOverrides::default(),
                        &segmenter,
                        store.as_ref(),
                        paper_index,
                    )
                })
                .await?
            });
            batch_handles.push((paper_index, batch_files[idx].clone(), handle));
        }

        // 等待本批所有任务完成
        let mut result = ProcessingStats::default();

        for (paper_index, path, handle) in batch_handles {
            let outcome: Result<IngestSummary> = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(anyhow::anyhow!("任务执行失败: {}", e)),
            };

            match outcome {
                Ok(summary) => {
                    result.success += 1;
                    result.inserted += summary.inserted;
                    result.duplicates += summary.duplicates;
                }
                Err(e) => {
                    error!("[试卷 {}] ❌ 导入失败: {:#}", paper_index, e);
                    result.failed += 1;
                    self.record_failure(&path, &e);
                }
            }
        }

        Ok(result)
    }

    fn record_failure(&self, path: &Path, err: &anyhow::Error) {
        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if let Err(write_err) = self.warn_writer.write(&file_name, &format!("{:#}", err)) {
            warn!("写入警告文件失败: {}", write_err);
        }
    }

    /// 检查用户最新试卷与题库的重复情况
    async fn check_overlap(&self, owner_id: &str) -> Result<OverlapReport> {
        info!("\n🔍 正在检查用户 {} 最新试卷的重复率...", owner_id);

        let papers = MemoryStore::new();
        if Path::new(&self.config.generated_folder).exists() {
            for paper in crate::models::load_all_toml_files(&self.config.generated_folder).await? {
                papers.insert_paper(paper)?;
            }
        } else {
            warn!("⚠️ 生成试卷目录不存在: {}", self.config.generated_folder);
        }

        let matcher = OverlapMatcher::new(&papers, self.store.as_ref());
        let report = matcher.check_latest(owner_id)?;

        if self.config.verbose_logging {
            for question in &report.matched_questions {
                info!("  ↺ {}", question);
            }
        }
        info!("📈 历史题库共 {} 道题", self.store.count()?);

        Ok(report)
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    success: usize,
    failed: usize,
    inserted: usize,
    duplicates: usize,
}

impl ProcessingStats {
    fn merge(&mut self, other: ProcessingStats) {
        self.success += other.success;
        self.failed += other.failed;
        self.inserted += other.inserted;
        self.duplicates += other.duplicates;
    }
}
