//! 配置校验。
//!
//! 非法配置在编辑/加载阶段即被拒绝，不会进入窗口解析。

use crate::ConfigError;
use domain::PeriodSettings;

/// 校验生产日与班次配置。
pub fn validate_period_settings(settings: &PeriodSettings) -> Result<(), ConfigError> {
    if settings.production_day_start_hour > 23 {
        return Err(ConfigError::Invalid(
            "productionDayStartHour".to_string(),
            settings.production_day_start_hour.to_string(),
        ));
    }
    for shift in &settings.shifts {
        if shift.length_hours == 0 || shift.length_hours > 24 {
            return Err(ConfigError::Invalid(
                format!("shift {} lengthHours", shift.number),
                shift.length_hours.to_string(),
            ));
        }
    }
    let rule = &settings.hour_rule;
    if rule.threshold_hour > 23 {
        return Err(ConfigError::Invalid(
            "hourRule.thresholdHour".to_string(),
            rule.threshold_hour.to_string(),
        ));
    }
    if rule.write_as_hour > 23 {
        return Err(ConfigError::Invalid(
            "hourRule.writeAsHour".to_string(),
            rule.write_as_hour.to_string(),
        ));
    }
    Ok(())
}

/// SQL 标识符（schema/表名）只允许 `[A-Za-z_][A-Za-z0-9_]*`。
pub fn is_valid_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_valid_identifier("tag_data"));
        assert!(is_valid_identifier("_v2"));
        assert!(!is_valid_identifier("2tags"));
        assert!(!is_valid_identifier("tag-data"));
        assert!(!is_valid_identifier("tag_data; drop table x"));
        assert!(!is_valid_identifier(""));
    }
}
