//! 候选配置预览。
//!
//! 直接接收候选 `PeriodSettings`，用于在保存配置前查看各窗口的解析结果。

use crate::resolver::{
    HourPolicy, HourWindow, ShiftSlot, ShiftWindow, current_shift, day_start, hour_by_rule,
    hour_for_write, previous_shift_for_write, production_date,
};
use chrono::{NaiveDate, NaiveDateTime};
use domain::PeriodSettings;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodPreview {
    pub local: NaiveDateTime,
    pub day_start: NaiveDateTime,
    pub production_date: NaiveDate,
    pub current_shift: ShiftSlot,
    pub previous_shift: ShiftWindow,
    pub hour: HourWindow,
    pub hour_policy: HourPolicy,
}

pub fn preview(local: NaiveDateTime, settings: &PeriodSettings, policy: HourPolicy) -> PeriodPreview {
    let hour = match policy {
        HourPolicy::LastCompleted => hour_for_write(local, settings),
        HourPolicy::Rule => hour_by_rule(local, settings),
    };
    PeriodPreview {
        local,
        day_start: day_start(local, settings),
        production_date: production_date(local, settings),
        current_shift: current_shift(local, settings),
        previous_shift: previous_shift_for_write(local, settings),
        hour,
        hour_policy: policy,
    }
}

impl fmt::Display for PeriodPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "time:            {}", self.local.format("%Y-%m-%d %H:%M"))?;
        writeln!(
            f,
            "production day:  {} (starts {})",
            self.production_date,
            self.day_start.format("%Y-%m-%d %H:%M")
        )?;
        writeln!(
            f,
            "current shift:   #{} (starts {})",
            self.current_shift.number,
            self.current_shift.start.format("%Y-%m-%d %H:%M")
        )?;
        writeln!(
            f,
            "shift to write:  #{} date={} (starts {})",
            self.previous_shift.shift_no,
            self.previous_shift.production_date,
            self.previous_shift.shift_start.format("%Y-%m-%d %H:%M")
        )?;
        write!(
            f,
            "hour to write:   {} date={} periodStart={} [{}]",
            self.hour.hour_no,
            self.hour.production_date,
            self.hour.period_start.format("%Y-%m-%d %H:%M"),
            self.hour_policy
        )
    }
}
