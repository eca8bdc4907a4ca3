//! 写入窗口与目标表结构分类。

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 窗口类型：小时 / 班次 / 生产日。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowKind {
    Hour,
    Shift,
    Day,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown window kind: {0}")]
pub struct WindowKindParseError(pub String);

impl WindowKind {
    /// 新表 `periodtype` 列取值。
    pub fn as_period_type(&self) -> &'static str {
        match self {
            WindowKind::Hour => "Hour",
            WindowKind::Shift => "Shift",
            WindowKind::Day => "Day",
        }
    }

    /// 旧表 `period` 列取值。
    pub fn as_legacy_period(&self) -> &'static str {
        match self {
            WindowKind::Hour => "hour",
            WindowKind::Shift => "shift",
            WindowKind::Day => "day",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_period_type())
    }
}

impl FromStr for WindowKind {
    type Err = WindowKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(WindowKind::Hour),
            "shift" => Ok(WindowKind::Shift),
            "day" => Ok(WindowKind::Day),
            _ => Err(WindowKindParseError(s.to_string())),
        }
    }
}

/// 解析结果：一次写入对应的窗口。
///
/// 构造函数保证：Hour 只带 `hour_no`，Shift 只带 `shift_no`，Day 两者皆无。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedWindow {
    kind: WindowKind,
    period_start: NaiveDateTime,
    production_date: NaiveDate,
    hour_no: Option<u32>,
    shift_no: Option<i32>,
}

impl ResolvedWindow {
    pub fn hour(hour_no: u32, period_start: NaiveDateTime, production_date: NaiveDate) -> Self {
        Self {
            kind: WindowKind::Hour,
            period_start,
            production_date,
            hour_no: Some(hour_no),
            shift_no: None,
        }
    }

    pub fn shift(shift_no: i32, period_start: NaiveDateTime, production_date: NaiveDate) -> Self {
        Self {
            kind: WindowKind::Shift,
            period_start,
            production_date,
            hour_no: None,
            shift_no: Some(shift_no),
        }
    }

    pub fn day(period_start: NaiveDateTime, production_date: NaiveDate) -> Self {
        Self {
            kind: WindowKind::Day,
            period_start,
            production_date,
            hour_no: None,
            shift_no: None,
        }
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    /// 窗口开始时间（新表使用）。
    pub fn period_start(&self) -> NaiveDateTime {
        self.period_start
    }

    /// 生产日日期（旧表使用）。
    pub fn production_date(&self) -> NaiveDate {
        self.production_date
    }

    pub fn hour_no(&self) -> Option<u32> {
        self.hour_no
    }

    pub fn shift_no(&self) -> Option<i32> {
        self.shift_no
    }
}

/// 目标表结构分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// tag_name, date, period, hour_num, shift_num, value, source
    Legacy,
    /// tagid, periodstart, periodtype, hourno, shiftno, value
    Current,
}
