//! JSON 文件题库
//!
//! 启动时整体读入内存；插入只改内存并标记待写，`flush` 时整体写回文件。
//! 编排层每导入完一份试卷写回一次。

use crate::error::{AppError, AppResult, FileError, StoreError, StoreResult};
use crate::models::question::{ExtractedQuestion, StoredQuestion};
use crate::store::{MemoryStore, QuestionStore};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{debug, info};

/// JSON 文件题库
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
    // 有尚未写回文件的记录
    dirty: AtomicBool,
    // 串行化写文件
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// 打开题库文件，文件不存在时从空题库开始
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let path_str = path.display().to_string();

        let questions: Vec<StoredQuestion> = if path.exists() {
            let content =
                fs::read_to_string(&path).map_err(|e| AppError::file_read_failed(&path_str, e))?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    AppError::File(FileError::JsonParseFailed {
                        path: path_str.clone(),
                        source: Box::new(e),
                    })
                })?
            }
        } else {
            Vec::new()
        };

        info!("📚 题库已加载: {} ({} 条记录)", path_str, questions.len());

        Ok(Self {
            path,
            inner: MemoryStore::with_questions(questions),
            dirty: AtomicBool::new(false),
            write_lock: Mutex::new(()),
        })
    }

    fn write_snapshot(&self) -> StoreResult<usize> {
        let path_str = self.path.display().to_string();
        let snapshot = self.inner.snapshot()?;
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| StoreError::persist_failed(&path_str, e))?;

        // 先写临时文件再重命名，避免写到一半的文件
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| StoreError::persist_failed(&path_str, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::persist_failed(&path_str, e))?;

        Ok(snapshot.len())
    }
}

impl QuestionStore for JsonFileStore {
    fn find_by_hash(&self, content_hash: &str) -> StoreResult<Option<StoredQuestion>> {
        self.inner.find_by_hash(content_hash)
    }

    fn insert(&self, question: ExtractedQuestion) -> StoreResult<(StoredQuestion, bool)> {
        let (stored, inserted) = self.inner.insert(question)?;
        if inserted {
            self.dirty.store(true, Ordering::SeqCst);
        }
        Ok((stored, inserted))
    }

    fn all_texts(&self) -> StoreResult<Vec<String>> {
        self.inner.all_texts()
    }

    fn count(&self) -> StoreResult<usize> {
        self.inner.count()
    }

    fn flush(&self) -> StoreResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;

        // 先清标记再取快照：写回期间新插入的记录会重新置位
        if !self.dirty.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        match self.write_snapshot() {
            Ok(count) => {
                debug!("题库已写回 {} ({} 条)", self.path.display(), count);
                Ok(())
            }
            Err(e) => {
                self.dirty.store(true, Ordering::SeqCst);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str) -> ExtractedQuestion {
        ExtractedQuestion {
            academic_year: Some("SE".to_string()),
            department: Some("Computer Engineering".to_string()),
            subject_name: Some("Data Structures".to_string()),
            subject_code: Some("210242".to_string()),
            paper_number: Some("5869 - 201".to_string()),
            question_id: "Q2b (Alternative)".to_string(),
            main_question: "Q2".to_string(),
            sub_question: "b".to_string(),
            is_alternative: true,
            text: text.to_string(),
            unit: Some(3),
            marks: Some(6),
            content_hash: ExtractedQuestion::compute_hash(text),
        }
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.count().unwrap(), 0);
        let (stored, _) = store.insert(question("Explain AVL rotations.")).unwrap();
        store.flush().unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
        let found = reopened
            .find_by_hash(&stored.question.content_hash)
            .unwrap()
            .unwrap();
        assert_eq!(found, stored);
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();

        let result = JsonFileStore::open(&path);
        assert!(matches!(
            result,
            Err(AppError::File(FileError::JsonParseFailed { .. }))
        ));
    }

    #[test]
    fn test_insert_without_flush_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.insert(question("Explain B-trees.")).unwrap();
        assert!(!path.exists());

        store.flush().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_failed_flush_keeps_records_pending() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        fs::create_dir_all(&data_dir).unwrap();
        let path = data_dir.join("store.json");

        let store = JsonFileStore::open(&path).unwrap();
        let dedup = crate::services::Deduplicator::new(&store);
        fs::remove_dir_all(&data_dir).unwrap();

        let (_, was_new) = dedup.persist(question("What is X?")).unwrap();
        assert!(was_new);
        assert!(store.flush().is_err());

        // 重试时题目已在内存中，但下一次写回仍会把它写入文件
        let (_, was_new) = dedup.persist(question("What is X?")).unwrap();
        assert!(!was_new);
        fs::create_dir_all(&data_dir).unwrap();
        store.flush().unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
        assert_eq!(reopened.all_texts().unwrap(), vec!["What is X?".to_string()]);
    }
}
