//! 站点时钟：UTC → 站点本地墙钟时间。

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SiteZone {
    Named(Tz),
    SystemLocal,
}

/// 站点时钟。
///
/// 时区解析失败时回退到系统本地时区，不返回错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteClock {
    zone: SiteZone,
}

impl SiteClock {
    /// 按 IANA 时区名创建（如 `Asia/Tashkent`）。
    pub fn from_zone_id(zone_id: &str) -> Self {
        match zone_id.trim().parse::<Tz>() {
            Ok(tz) => Self {
                zone: SiteZone::Named(tz),
            },
            Err(err) => {
                warn!(
                    target: "hist.period",
                    "unknown time zone '{}', falling back to system local: {}", zone_id, err
                );
                Self::system_local()
            }
        }
    }

    pub fn system_local() -> Self {
        Self {
            zone: SiteZone::SystemLocal,
        }
    }

    /// 实际使用的时区名称。
    pub fn zone_name(&self) -> String {
        match self.zone {
            SiteZone::Named(tz) => tz.name().to_string(),
            SiteZone::SystemLocal => "system-local".to_string(),
        }
    }

    pub fn is_system_local(&self) -> bool {
        matches!(self.zone, SiteZone::SystemLocal)
    }

    /// 将 UTC 时刻换算为站点本地墙钟时间。
    pub fn to_local(&self, utc: DateTime<Utc>) -> NaiveDateTime {
        match self.zone {
            SiteZone::Named(tz) => utc.with_timezone(&tz).naive_local(),
            SiteZone::SystemLocal => utc.with_timezone(&Local).naive_local(),
        }
    }

    pub fn now_local(&self) -> NaiveDateTime {
        self.to_local(Utc::now())
    }
}
