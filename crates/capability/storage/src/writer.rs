//! 写入器：按表结构选定一次，批次内复用。
//!
//! - `CurrentWriter`：单条 `insert ... on conflict do update`，同键最多一行，后写覆盖
//! - `LegacyWriter`：先按完整键更新，受影响 0 行时再插入
//!
//! 旧表两步写入对同一键的并发写入者不是原子的：两个写入者可能都看到
//! 0 行并各自插入，留下重复行。调度上同一标签/窗口每个周期只触发一次，
//! 该竞争被接受，不做检测。

use crate::error::StorageError;
use crate::models::{CurrentRow, LegacyRow, ReferenceTagCheck};
use crate::traits::TagDataStore;
use domain::{ResolvedWindow, SchemaKind, TagWriteRequest};
use tracing::{debug, warn};

/// 单项写入结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// 新表 upsert
    Upserted,
    /// 旧表命中已有行
    Updated,
    /// 旧表新插入
    Inserted,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentWriter;

#[derive(Debug, Clone)]
pub struct LegacyWriter {
    /// 写入 `source` 列的来源标记
    pub source_label: String,
}

#[derive(Debug, Clone)]
pub enum TagDataWriter {
    Legacy(LegacyWriter),
    Current(CurrentWriter),
}

impl TagDataWriter {
    pub fn for_schema(kind: SchemaKind, source_label: impl Into<String>) -> Self {
        match kind {
            SchemaKind::Legacy => TagDataWriter::Legacy(LegacyWriter {
                source_label: source_label.into(),
            }),
            SchemaKind::Current => TagDataWriter::Current(CurrentWriter),
        }
    }

    pub fn schema(&self) -> SchemaKind {
        match self {
            TagDataWriter::Legacy(_) => SchemaKind::Legacy,
            TagDataWriter::Current(_) => SchemaKind::Current,
        }
    }

    /// 新表需要目标 tag id；旧表总能回退到 source id 作为标签名。
    pub fn accepts(&self, request: &TagWriteRequest) -> bool {
        match self {
            TagDataWriter::Legacy(_) => true,
            TagDataWriter::Current(_) => request.target_tag_id > 0,
        }
    }

    pub async fn write(
        &self,
        store: &dyn TagDataStore,
        request: &TagWriteRequest,
        window: &ResolvedWindow,
        value: f64,
    ) -> Result<WriteOutcome, StorageError> {
        match self {
            TagDataWriter::Legacy(writer) => writer.write(store, request, window, value).await,
            TagDataWriter::Current(writer) => writer.write(store, request, window, value).await,
        }
    }
}

impl CurrentWriter {
    pub async fn write(
        &self,
        store: &dyn TagDataStore,
        request: &TagWriteRequest,
        window: &ResolvedWindow,
        value: f64,
    ) -> Result<WriteOutcome, StorageError> {
        if request.target_tag_id <= 0 {
            return Err(StorageError::new(format!(
                "{} has no target tag id",
                request.source_id
            )));
        }
        let row = CurrentRow::new(request.target_tag_id, window, value);
        store.upsert_current(&row).await?;
        Ok(WriteOutcome::Upserted)
    }
}

impl LegacyWriter {
    pub async fn write(
        &self,
        store: &dyn TagDataStore,
        request: &TagWriteRequest,
        window: &ResolvedWindow,
        value: f64,
    ) -> Result<WriteOutcome, StorageError> {
        let tag_name = request.legacy_tag_name();
        match store.ensure_reference_tag(tag_name).await {
            Ok(ReferenceTagCheck::Created { table }) => {
                debug!(target: "hist.storage", "reference tag {} created in {}", tag_name, table);
            }
            Ok(_) => {}
            Err(err) if err.is_connection() => return Err(err),
            Err(err) => {
                // 字典行可能已存在，继续尝试写入
                warn!(
                    target: "hist.storage",
                    "reference tag check skipped for {}: {}",
                    tag_name,
                    err
                );
            }
        }

        let row = LegacyRow::new(tag_name, window, value, &self.source_label);
        if store.update_legacy(&row).await? > 0 {
            return Ok(WriteOutcome::Updated);
        }
        store.insert_legacy(&row).await?;
        Ok(WriteOutcome::Inserted)
    }
}
