//! 生产日、班次与小时窗口解析。
//!
//! 所有解析函数都是纯函数：输入本地墙钟时间与一份 `PeriodSettings` 快照，
//! 不读取任何全局状态，可被任意数量的调用方并发使用。
//!
//! - [`clock`]：站点时区换算（未知时区回退到系统本地时区）
//! - [`resolver`]：生产日开始、当前班次、待写入的小时/班次/生产日窗口
//! - [`preview`]：针对候选配置的一次性预览（配置编辑时使用）

pub mod clock;
pub mod preview;
pub mod resolver;

pub use clock::SiteClock;
pub use preview::{PeriodPreview, preview};
pub use resolver::{
    HourPolicy, HourPolicyParseError, HourWindow, ShiftSlot, ShiftWindow, current_shift,
    day_for_write, day_start, hour_by_rule, hour_for_write, previous_shift_for_write,
    production_date, resolve_window,
};
