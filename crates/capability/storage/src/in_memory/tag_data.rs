//! tag_data 内存实现
//!
//! 模拟两种表结构与旧表外键，记录执行过的语句数量，可按标签注入失败。

use crate::error::{StorageError, StorageErrorKind};
use crate::models::{CurrentRow, LegacyRow, ReferenceTagCheck};
use crate::schema::{CURRENT_COLUMNS, LEGACY_COLUMNS};
use crate::traits::TagDataStore;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// 已执行语句计数（用于测试）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatementCounts {
    pub upserts: u64,
    pub updates: u64,
    pub inserts: u64,
}

/// 旧表外键引用的字典表。
struct ReferenceTable {
    name: String,
    tags: HashSet<String>,
}

/// tag_data 内存存储
pub struct InMemoryTagDataStore {
    columns: Vec<String>,
    reference: Option<RwLock<ReferenceTable>>,
    reference_denied: bool,
    failures: HashMap<String, StorageErrorKind>,
    current: RwLock<Vec<CurrentRow>>,
    legacy: RwLock<Vec<LegacyRow>>,
    counts: RwLock<StatementCounts>,
}

impl InMemoryTagDataStore {
    /// 使用任意列清单创建存储
    pub fn with_columns<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            reference: None,
            reference_denied: false,
            failures: HashMap::new(),
            current: RwLock::new(Vec::new()),
            legacy: RwLock::new(Vec::new()),
            counts: RwLock::new(StatementCounts::default()),
        }
    }

    /// 新表结构
    pub fn current() -> Self {
        let mut columns: Vec<&str> = CURRENT_COLUMNS.to_vec();
        columns.extend(["hourno", "shiftno", "value"]);
        Self::with_columns(columns.as_slice())
    }

    /// 旧表结构
    pub fn legacy() -> Self {
        let mut columns: Vec<&str> = LEGACY_COLUMNS.to_vec();
        columns.extend(["date", "shift_num", "value", "source"]);
        Self::with_columns(columns.as_slice())
    }

    /// 给 tag_name 加上指向字典表的外键，`existing` 为字典表中已有的标签。
    pub fn with_reference_table(mut self, name: &str, existing: &[&str]) -> Self {
        self.reference = Some(RwLock::new(ReferenceTable {
            name: name.to_string(),
            tags: existing.iter().map(|tag| tag.to_string()).collect(),
        }));
        self
    }

    /// 模拟没有权限查询目录或写字典表。
    pub fn deny_reference_access(mut self) -> Self {
        self.reference_denied = true;
        self
    }

    /// 对指定标签（新表为 tag id 文本，旧表为 tag_name）的写入返回错误。
    pub fn fail_on(mut self, key: impl Into<String>, kind: StorageErrorKind) -> Self {
        self.failures.insert(key.into(), kind);
        self
    }

    pub fn current_rows(&self) -> Vec<CurrentRow> {
        self.current.read().map(|rows| rows.clone()).unwrap_or_default()
    }

    pub fn legacy_rows(&self) -> Vec<LegacyRow> {
        self.legacy.read().map(|rows| rows.clone()).unwrap_or_default()
    }

    pub fn reference_tags(&self) -> Vec<String> {
        let Some(reference) = &self.reference else {
            return Vec::new();
        };
        let mut tags: Vec<String> = reference
            .read()
            .map(|table| table.tags.iter().cloned().collect())
            .unwrap_or_default();
        tags.sort();
        tags
    }

    pub fn counts(&self) -> StatementCounts {
        self.counts.read().map(|counts| *counts).unwrap_or_default()
    }

    fn check_failure(&self, key: &str) -> Result<(), StorageError> {
        match self.failures.get(key) {
            Some(kind) => Err(StorageError::with_kind(
                *kind,
                format!("injected failure for {}", key),
            )),
            None => Ok(()),
        }
    }

    fn bump(&self, update: impl FnOnce(&mut StatementCounts)) -> Result<(), StorageError> {
        let mut counts = self
            .counts
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        update(&mut counts);
        Ok(())
    }
}

#[async_trait::async_trait]
impl TagDataStore for InMemoryTagDataStore {
    async fn table_columns(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.columns.clone())
    }

    async fn upsert_current(&self, row: &CurrentRow) -> Result<(), StorageError> {
        self.check_failure(&row.tag_id.to_string())?;
        let mut rows = self
            .current
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        match rows.iter_mut().find(|stored| stored.same_key(row)) {
            Some(stored) => {
                stored.value = row.value;
                stored.hour_no = row.hour_no;
                stored.shift_no = row.shift_no;
            }
            None => rows.push(row.clone()),
        }
        drop(rows);
        self.bump(|counts| counts.upserts += 1)
    }

    async fn ensure_reference_tag(&self, tag_name: &str) -> Result<ReferenceTagCheck, StorageError> {
        let Some(reference) = &self.reference else {
            return Ok(ReferenceTagCheck::NotRequired);
        };
        if self.reference_denied {
            return Err(StorageError::new("permission denied for table pg_constraint"));
        }
        let mut table = reference
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let name = table.name.clone();
        if table.tags.insert(tag_name.to_string()) {
            Ok(ReferenceTagCheck::Created { table: name })
        } else {
            Ok(ReferenceTagCheck::AlreadyPresent { table: name })
        }
    }

    async fn update_legacy(&self, row: &LegacyRow) -> Result<u64, StorageError> {
        self.check_failure(&row.tag_name)?;
        let mut rows = self
            .legacy
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut affected = 0;
        for stored in rows.iter_mut().filter(|stored| stored.same_key(row)) {
            stored.value = row.value;
            stored.source = row.source.clone();
            affected += 1;
        }
        drop(rows);
        self.bump(|counts| counts.updates += 1)?;
        Ok(affected)
    }

    async fn insert_legacy(&self, row: &LegacyRow) -> Result<(), StorageError> {
        self.check_failure(&row.tag_name)?;
        if let Some(reference) = &self.reference {
            let table = reference
                .read()
                .map_err(|_| StorageError::new("lock failed"))?;
            if !table.tags.contains(&row.tag_name) {
                return Err(StorageError::new(format!(
                    "insert violates foreign key constraint: tag {} not present in {}",
                    row.tag_name, table.name
                )));
            }
        }
        let mut rows = self
            .legacy
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        rows.push(row.clone());
        drop(rows);
        self.bump(|counts| counts.inserts += 1)
    }
}
