//! 存储适配层
//!
//! 题库和已生成试卷都是外部协作者，这里只定义核心需要的最小能力：
//! 按哈希查找、插入、读取全部题干、按用户读取最新试卷。
//! 存储以 trait 对象的形式显式注入，不使用进程级单例。

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StoreResult;
use crate::models::paper::GeneratedPaper;
use crate::models::question::{ExtractedQuestion, StoredQuestion};

/// 往年题库
pub trait QuestionStore: Send + Sync {
    /// 按内容哈希查找已有记录
    fn find_by_hash(&self, content_hash: &str) -> StoreResult<Option<StoredQuestion>>;

    /// 插入记录
    ///
    /// 哈希已存在时不覆盖，返回库中已有记录；第二项表示是否真正插入。
    fn insert(&self, question: ExtractedQuestion) -> StoreResult<(StoredQuestion, bool)>;

    /// 全部历史题干
    fn all_texts(&self) -> StoreResult<Vec<String>>;

    /// 记录总数
    fn count(&self) -> StoreResult<usize>;

    /// 把尚未持久化的记录写回底层存储
    ///
    /// 写回失败时记录仍保留在待写状态，下一次成功的写回会一并带上。
    fn flush(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// 已生成试卷
pub trait PaperStore: Send + Sync {
    fn insert_paper(&self, paper: GeneratedPaper) -> StoreResult<GeneratedPaper>;

    /// 某个用户最近生成的一份试卷
    fn latest_for_owner(&self, owner_id: &str) -> StoreResult<Option<GeneratedPaper>>;
}
