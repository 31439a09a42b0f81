//! 去重入库 - 业务能力层
//!
//! 只负责"按内容哈希入库"能力：哈希已存在时返回已有记录且不覆盖，
//! 第一次入库的版本永久保留。

use crate::error::StoreResult;
use crate::models::question::{ExtractedQuestion, StoredQuestion};
use crate::store::QuestionStore;
use tracing::debug;

/// 去重入库服务
pub struct Deduplicator<'a> {
    store: &'a dyn QuestionStore,
}

impl<'a> Deduplicator<'a> {
    pub fn new(store: &'a dyn QuestionStore) -> Self {
        Self { store }
    }

    /// 入库单道题
    ///
    /// # 返回
    /// 返回 (库中记录, 是否为新插入)
    pub fn persist(&self, question: ExtractedQuestion) -> StoreResult<(StoredQuestion, bool)> {
        if let Some(existing) = self.store.find_by_hash(&question.content_hash)? {
            debug!(
                "已存在: {} ({})",
                existing.question.question_id, existing.question.content_hash
            );
            return Ok((existing, false));
        }

        // 查找与插入之间可能有其他任务插入了同一道题，以 insert 的结果为准
        let (stored, inserted) = self.store.insert(question)?;
        if inserted {
            debug!(
                "已插入: {} ({})",
                stored.question.question_id, stored.question.content_hash
            );
        } else {
            debug!(
                "并发导入中已存在: {} ({})",
                stored.question.question_id, stored.question.content_hash
            );
        }
        Ok((stored, inserted))
    }
}
