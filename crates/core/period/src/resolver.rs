//! 窗口解析。
//!
//! 生产日从 `production_day_start_hour` 开始，持续 24 小时，以结束那天的日期命名
//! （22:00 开始于 8 月 25 日的生产日记为 8 月 26 日）。
//! 所有区间均为左闭右开：恰好落在边界上的时刻属于新窗口。
//!
//! 班次顺序按「距生产日开始的偏移」排序，而不是按午夜排序；偏移相同的班次属于配置错误，
//! 按列表中先出现者生效。

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use domain::{PeriodSettings, ResolvedWindow, WindowKind};
use std::fmt;
use std::str::FromStr;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// 小时窗口的选取策略。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HourPolicy {
    /// 最近一个完整结束的整点小时。
    #[default]
    LastCompleted,
    /// 旧的阈值改写规则（`HourRule`）。
    Rule,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown hour policy: {0}")]
pub struct HourPolicyParseError(pub String);

impl FromStr for HourPolicy {
    type Err = HourPolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-completed" | "last_completed" => Ok(HourPolicy::LastCompleted),
            "rule" => Ok(HourPolicy::Rule),
            _ => Err(HourPolicyParseError(s.to_string())),
        }
    }
}

impl fmt::Display for HourPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HourPolicy::LastCompleted => f.write_str("last-completed"),
            HourPolicy::Rule => f.write_str("rule"),
        }
    }
}

/// 某一时刻所在的班次。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftSlot {
    /// 在按偏移排序后的班次列表中的位置。
    pub index: usize,
    pub number: i32,
    pub start: NaiveDateTime,
}

/// 待写入的小时窗口。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourWindow {
    pub hour_no: u32,
    pub production_date: NaiveDate,
    pub period_start: NaiveDateTime,
}

/// 待写入的班次窗口（上一个已结束的班次）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub shift_no: i32,
    pub shift_start: NaiveDateTime,
    pub production_date: NaiveDate,
}

#[derive(Debug, Clone, Copy)]
struct RankedShift {
    number: i32,
    offset_minutes: i64,
}

fn start_hour(settings: &PeriodSettings) -> u32 {
    settings.production_day_start_hour.min(23)
}

fn at_hour(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or_default())
}

/// 生产日开始时刻：`local` 之前（含）最近的一个 `production_day_start_hour:00`。
pub fn day_start(local: NaiveDateTime, settings: &PeriodSettings) -> NaiveDateTime {
    let today_start = at_hour(local.date(), start_hour(settings));
    if local >= today_start {
        today_start
    } else {
        today_start - TimeDelta::days(1)
    }
}

/// 生产日日期：生产日开始时刻 + 1 天的日期部分。
pub fn production_date(local: NaiveDateTime, settings: &PeriodSettings) -> NaiveDate {
    (day_start(local, settings) + TimeDelta::days(1)).date()
}

/// 按距生产日开始的偏移升序排列；排序稳定，偏移相同时保留列表中靠前的班次。
fn ranked_shifts(settings: &PeriodSettings) -> Vec<RankedShift> {
    let base = i64::from(start_hour(settings)) * 60;
    let mut ranked: Vec<RankedShift> = settings
        .shifts
        .iter()
        .map(|shift| RankedShift {
            number: shift.number,
            offset_minutes: (i64::from(shift.start.minutes_of_day()) - base)
                .rem_euclid(MINUTES_PER_DAY),
        })
        .collect();
    ranked.sort_by_key(|shift| shift.offset_minutes);
    // 偏移相同的班次只保留第一个，被遮蔽的班次既不会成为当前班次也不会成为上一班次
    ranked.dedup_by_key(|shift| shift.offset_minutes);
    ranked
}

/// 找到区间 `[offset_i, offset_{i+1})` 包含 `elapsed` 的班次；
/// 早于第一个偏移时属于列表末尾的班次（跨越生产日边界）。
fn active_index(ranked: &[RankedShift], elapsed: TimeDelta) -> usize {
    let elapsed_seconds = elapsed.num_seconds();
    ranked
        .iter()
        .rposition(|shift| shift.offset_minutes * 60 <= elapsed_seconds)
        .unwrap_or(ranked.len() - 1)
}

/// 当前所在班次。未配置班次时视为从生产日开始的全天「1 班」。
pub fn current_shift(local: NaiveDateTime, settings: &PeriodSettings) -> ShiftSlot {
    let day_start = day_start(local, settings);
    let ranked = ranked_shifts(settings);
    if ranked.is_empty() {
        return ShiftSlot {
            index: 0,
            number: 1,
            start: day_start,
        };
    }
    let elapsed = local - day_start;
    let index = active_index(&ranked, elapsed);
    ShiftSlot {
        index,
        number: ranked[index].number,
        start: slot_start(day_start, elapsed, &ranked[index]),
    }
}

/// 班次开始时刻。偏移晚于已过时长（跨越生产日边界）时，该班次开始于上一个生产日。
fn slot_start(day_start: NaiveDateTime, elapsed: TimeDelta, shift: &RankedShift) -> NaiveDateTime {
    let start = day_start + TimeDelta::minutes(shift.offset_minutes);
    if shift.offset_minutes * 60 > elapsed.num_seconds() {
        start - TimeDelta::days(1)
    } else {
        start
    }
}

/// 最近一个完整结束的整点小时。不应用 `HourRule`。
pub fn hour_for_write(local: NaiveDateTime, settings: &PeriodSettings) -> HourWindow {
    let period_start = at_hour(local.date(), local.hour()) - TimeDelta::hours(1);
    HourWindow {
        hour_no: period_start.hour(),
        production_date: production_date(period_start, settings),
        period_start,
    }
}

/// 旧的阈值改写规则。
///
/// 规则未触发时写当前所在的整点小时，日期为该小时所属的生产日；
/// 触发（`hour >= threshold_hour`）时写为 `write_as_hour`，日期取日历日期
/// （`shift_date_to_next_day` 时 +1 天）。
pub fn hour_by_rule(local: NaiveDateTime, settings: &PeriodSettings) -> HourWindow {
    let rule = settings.hour_rule;
    if !rule.enabled || local.hour() < rule.threshold_hour {
        let period_start = at_hour(local.date(), local.hour());
        return HourWindow {
            hour_no: period_start.hour(),
            production_date: production_date(period_start, settings),
            period_start,
        };
    }

    let date = if rule.shift_date_to_next_day {
        (local + TimeDelta::days(1)).date()
    } else {
        local.date()
    };
    let hour_no = rule.write_as_hour.min(23);
    HourWindow {
        hour_no,
        production_date: date,
        period_start: at_hour(date, hour_no),
    }
}

/// 上一个班次（当前班次在排序列表中的前一个，循环）。
///
/// 前一班次开始于当前班次开始之前 `(offset_cur - offset_prev) mod 24h`，
/// 因此前一班次偏移大于当前班次时它落在上一个生产日。
/// 只有一个班次或未配置班次时，结果是前一天同一班次。
pub fn previous_shift_for_write(local: NaiveDateTime, settings: &PeriodSettings) -> ShiftWindow {
    let current = current_shift(local, settings);
    let ranked = ranked_shifts(settings);
    if ranked.is_empty() {
        let shift_start = current.start - TimeDelta::days(1);
        return ShiftWindow {
            shift_no: 1,
            shift_start,
            production_date: production_date(shift_start, settings),
        };
    }

    let previous = (current.index + ranked.len() - 1) % ranked.len();
    let mut gap = (ranked[current.index].offset_minutes - ranked[previous].offset_minutes)
        .rem_euclid(MINUTES_PER_DAY);
    if gap == 0 {
        gap = MINUTES_PER_DAY;
    }
    let shift_start = current.start - TimeDelta::minutes(gap);
    ShiftWindow {
        shift_no: ranked[previous].number,
        shift_start,
        production_date: production_date(shift_start, settings),
    }
}

/// 生产日写入总是指向当前尚未结束的生产日开始时刻。
pub fn day_for_write(local: NaiveDateTime, settings: &PeriodSettings) -> NaiveDateTime {
    day_start(local, settings)
}

/// 为一个批次解析写入窗口。
pub fn resolve_window(
    kind: WindowKind,
    local: NaiveDateTime,
    settings: &PeriodSettings,
    policy: HourPolicy,
) -> ResolvedWindow {
    match kind {
        WindowKind::Hour => {
            let hour = match policy {
                HourPolicy::LastCompleted => hour_for_write(local, settings),
                HourPolicy::Rule => hour_by_rule(local, settings),
            };
            ResolvedWindow::hour(hour.hour_no, hour.period_start, hour.production_date)
        }
        WindowKind::Shift => {
            let shift = previous_shift_for_write(local, settings);
            ResolvedWindow::shift(shift.shift_no, shift.shift_start, shift.production_date)
        }
        WindowKind::Day => {
            let period_start = day_for_write(local, settings);
            ResolvedWindow::day(period_start, production_date(local, settings))
        }
    }
}
