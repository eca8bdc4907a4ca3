//! 数据模型
//!
//! - CurrentRow：新表一行（键 tagid + periodtype + periodstart）
//! - LegacyRow：旧表一行（键 tag_name + period + date + hour_num + shift_num）
//! - ReferenceTagCheck：旧表外键引用行的处理结果

use chrono::{NaiveDate, NaiveDateTime};
use domain::{ResolvedWindow, WindowKind};

/// 新表写入行。
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentRow {
    pub tag_id: i32,
    pub period_type: WindowKind,
    pub period_start: NaiveDateTime,
    pub hour_no: Option<i32>,
    pub shift_no: Option<i32>,
    pub value: f64,
}

impl CurrentRow {
    pub fn new(tag_id: i32, window: &ResolvedWindow, value: f64) -> Self {
        Self {
            tag_id,
            period_type: window.kind(),
            period_start: window.period_start(),
            hour_no: window.hour_no().map(|hour| hour as i32),
            shift_no: window.shift_no(),
            value,
        }
    }

    /// 同一键只允许一行。
    pub fn same_key(&self, other: &CurrentRow) -> bool {
        self.tag_id == other.tag_id
            && self.period_type == other.period_type
            && self.period_start == other.period_start
    }
}

/// 旧表写入行。
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyRow {
    pub tag_name: String,
    pub date: NaiveDate,
    pub period: WindowKind,
    pub hour_num: Option<i32>,
    pub shift_num: Option<i32>,
    pub value: f64,
    pub source: String,
}

impl LegacyRow {
    pub fn new(
        tag_name: impl Into<String>,
        window: &ResolvedWindow,
        value: f64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            tag_name: tag_name.into(),
            date: window.production_date(),
            period: window.kind(),
            hour_num: window.hour_no().map(|hour| hour as i32),
            shift_num: window.shift_no(),
            value,
            source: source.into(),
        }
    }

    /// 键比较，NULL 与 NULL 视为相等（对应 SQL 的 `is not distinct from`）。
    pub fn same_key(&self, other: &LegacyRow) -> bool {
        self.tag_name == other.tag_name
            && self.date == other.date
            && self.period == other.period
            && self.hour_num == other.hour_num
            && self.shift_num == other.shift_num
    }
}

/// 旧表外键引用行处理结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceTagCheck {
    /// 目标表没有 tag_name 外键。
    NotRequired,
    Created { table: String },
    AlreadyPresent { table: String },
}
