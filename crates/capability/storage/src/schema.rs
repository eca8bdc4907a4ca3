//! 目标表结构识别。
//!
//! 每个批次都对实时的列清单重新识别一次，表迁移后无需重新部署。

use crate::error::{StorageError, StorageErrorKind};
use domain::SchemaKind;
use std::collections::HashSet;

/// 旧表特征列。
pub const LEGACY_COLUMNS: [&str; 3] = ["tag_name", "period", "hour_num"];
/// 新表特征列。
pub const CURRENT_COLUMNS: [&str; 3] = ["tagid", "periodstart", "periodtype"];

/// 按列名集合判定表结构。
///
/// 同时具备两组特征列时按旧表处理；两组都不完整时返回
/// `SchemaAmbiguous`，不做任何回退。列名比较忽略大小写。
pub fn detect_schema<S: AsRef<str>>(columns: &[S]) -> Result<SchemaKind, StorageError> {
    let present: HashSet<String> = columns
        .iter()
        .map(|column| column.as_ref().trim().to_ascii_lowercase())
        .collect();
    let has_all = |wanted: &[&str]| wanted.iter().all(|column| present.contains(*column));

    if has_all(&LEGACY_COLUMNS) {
        return Ok(SchemaKind::Legacy);
    }
    if has_all(&CURRENT_COLUMNS) {
        return Ok(SchemaKind::Current);
    }

    let mut found: Vec<&str> = present.iter().map(String::as_str).collect();
    found.sort_unstable();
    Err(StorageError::with_kind(
        StorageErrorKind::SchemaAmbiguous,
        format!(
            "table matches neither legacy nor current layout (columns: {})",
            found.join(", ")
        ),
    ))
}
