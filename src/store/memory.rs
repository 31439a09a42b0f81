//! 内存存储
//!
//! 同时实现题库和试卷两种能力，用于测试以及 JSON 文件存储的内部状态。

use crate::error::{StoreError, StoreResult};
use crate::models::paper::GeneratedPaper;
use crate::models::question::{ExtractedQuestion, StoredQuestion};
use crate::store::{PaperStore, QuestionStore};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct State {
    questions: Vec<StoredQuestion>,
    by_hash: HashMap<String, usize>,
    papers: Vec<GeneratedPaper>,
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用已有记录初始化；重复哈希只保留第一条
    pub fn with_questions(questions: Vec<StoredQuestion>) -> Self {
        let mut state = State::default();
        for stored in questions {
            if state.by_hash.contains_key(&stored.question.content_hash) {
                continue;
            }
            state
                .by_hash
                .insert(stored.question.content_hash.clone(), state.questions.len());
            state.questions.push(stored);
        }
        Self {
            state: Mutex::new(state),
        }
    }

    /// 全部题库记录（按插入顺序）
    pub fn snapshot(&self) -> StoreResult<Vec<StoredQuestion>> {
        Ok(self.lock()?.questions.clone())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl QuestionStore for MemoryStore {
    fn find_by_hash(&self, content_hash: &str) -> StoreResult<Option<StoredQuestion>> {
        let state = self.lock()?;
        Ok(state
            .by_hash
            .get(content_hash)
            .map(|&idx| state.questions[idx].clone()))
    }

    fn insert(&self, question: ExtractedQuestion) -> StoreResult<(StoredQuestion, bool)> {
        question.validate()?;

        let mut state = self.lock()?;
        // 并发导入同一道题时，先插入者胜出
        if let Some(&idx) = state.by_hash.get(&question.content_hash) {
            return Ok((state.questions[idx].clone(), false));
        }

        let stored = StoredQuestion::new(question);
        let idx = state.questions.len();
        state
            .by_hash
            .insert(stored.question.content_hash.clone(), idx);
        state.questions.push(stored.clone());
        Ok((stored, true))
    }

    fn all_texts(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .lock()?
            .questions
            .iter()
            .map(|q| q.question.text.clone())
            .collect())
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.lock()?.questions.len())
    }
}

impl PaperStore for MemoryStore {
    fn insert_paper(&self, paper: GeneratedPaper) -> StoreResult<GeneratedPaper> {
        if paper.owner_id.trim().is_empty() {
            return Err(StoreError::invalid("owner_id", "用户ID为空"));
        }
        self.lock()?.papers.push(paper.clone());
        Ok(paper)
    }

    fn latest_for_owner(&self, owner_id: &str) -> StoreResult<Option<GeneratedPaper>> {
        let state = self.lock()?;
        // 时间相同的按插入顺序取最后一份
        Ok(state
            .papers
            .iter()
            .enumerate()
            .filter(|(_, p)| p.owner_id == owner_id)
            .max_by_key(|(idx, p)| (p.created_at, *idx))
            .map(|(_, p)| p.clone()))
    }
}
