//! 生产日与班次配置。
//!
//! `PeriodSettings` 是不可变快照：修改配置时整体替换，不在解析过程中原地改动班次列表。

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 班次开始时间（本地 `HH:mm`）。
///
/// 只能从合法的 `HH:mm` 构造，非法字符串在反序列化阶段即被拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShiftStart(NaiveTime);

/// 班次开始时间格式错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid shift start '{0}', expected HH:mm")]
pub struct ShiftStartError(pub String);

impl ShiftStart {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// 自午夜起的分钟数。
    pub fn minutes_of_day(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }
}

impl FromStr for ShiftStart {
    type Err = ShiftStartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (hour, minute) = trimmed
            .split_once(':')
            .ok_or_else(|| ShiftStartError(s.to_string()))?;
        if hour.len() != 2 || minute.len() != 2 {
            return Err(ShiftStartError(s.to_string()));
        }
        let hour = hour
            .parse::<u32>()
            .map_err(|_| ShiftStartError(s.to_string()))?;
        let minute = minute
            .parse::<u32>()
            .map_err(|_| ShiftStartError(s.to_string()))?;
        if hour > 23 || minute > 59 {
            return Err(ShiftStartError(s.to_string()));
        }
        Self::new(hour, minute).ok_or_else(|| ShiftStartError(s.to_string()))
    }
}

impl TryFrom<String> for ShiftStart {
    type Error = ShiftStartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShiftStart> for String {
    fn from(value: ShiftStart) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ShiftStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

/// 单个班次定义。
///
/// `number` 仅作标识，不要求唯一或连续；`length_hours` 仅供展示，
/// 班次边界只由开始时间决定。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDef {
    pub number: i32,
    #[serde(default)]
    pub name: String,
    pub start: ShiftStart,
    #[serde(default = "default_length_hours")]
    pub length_hours: u32,
}

fn default_length_hours() -> u32 {
    8
}

/// 小时写入的特殊改写规则（旧策略）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HourRule {
    pub enabled: bool,
    pub threshold_hour: u32,
    pub write_as_hour: u32,
    pub shift_date_to_next_day: bool,
}

impl Default for HourRule {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_hour: 23,
            write_as_hour: 22,
            shift_date_to_next_day: true,
        }
    }
}

/// 生产日与班次配置快照。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeriodSettings {
    /// 生产日开始的本地小时（0..23）。
    pub production_day_start_hour: u32,
    /// 班次列表，不要求按开始时间排序，可以为空。
    pub shifts: Vec<ShiftDef>,
    pub hour_rule: HourRule,
}

impl Default for PeriodSettings {
    /// 出厂配置：22 点开始生产日，三个 8 小时班次（22:00/06:00/14:00）。
    fn default() -> Self {
        let shift = |number: i32, hour: u32| ShiftDef {
            number,
            name: format!("Shift {number}"),
            start: ShiftStart(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default()),
            length_hours: 8,
        };
        Self {
            production_day_start_hour: 22,
            shifts: vec![shift(1, 22), shift(2, 6), shift(3, 14)],
            hour_rule: HourRule::default(),
        }
    }
}
