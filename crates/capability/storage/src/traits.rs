//! 存储接口 Trait 定义
//!
//! TagDataStore 只暴露写入所需的最小语句集合，表结构判定与
//! 「先更新后插入」的组合逻辑都在 `writer` 中完成。

use crate::error::StorageError;
use crate::models::{CurrentRow, LegacyRow, ReferenceTagCheck};
use async_trait::async_trait;

/// tag_data 表存储接口。
#[async_trait]
pub trait TagDataStore: Send + Sync {
    /// 目标表当前的列名（用于结构识别，每批次调用一次）。
    async fn table_columns(&self) -> Result<Vec<String>, StorageError>;

    /// 新表原子写入：冲突时覆盖 value / hourno / shiftno。
    async fn upsert_current(&self, row: &CurrentRow) -> Result<(), StorageError>;

    /// 若 tag_name 上有外键，确保引用表中存在对应行。
    async fn ensure_reference_tag(&self, tag_name: &str) -> Result<ReferenceTagCheck, StorageError>;

    /// 旧表按完整键更新，返回受影响行数。
    async fn update_legacy(&self, row: &LegacyRow) -> Result<u64, StorageError>;

    /// 旧表插入一行。
    async fn insert_legacy(&self, row: &LegacyRow) -> Result<(), StorageError>;
}
