//! 公式计算挂载点。
//!
//! 目前只实现恒等变换：空表达式或 `x` 原样返回；其他表达式同样原样返回，
//! 并告警「未应用」。接入表达式引擎时只需替换 `evaluate` 的实现。

use chrono::NaiveDateTime;
use tracing::warn;

/// 恒等表达式。
pub const IDENTITY: &str = "x";

/// 计算写入值。`local` 与 `shift_no` 供将来的表达式引用。
pub fn evaluate(expression: &str, raw: f64, local: NaiveDateTime, shift_no: Option<i32>) -> f64 {
    let expression = expression.trim();
    if expression.is_empty() || expression == IDENTITY {
        return raw;
    }
    warn!(
        target: "hist.pipeline",
        local = %local,
        shift_no = ?shift_no,
        "formula '{}' not applied, value written as-is",
        expression
    );
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn local() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 8, 26)
            .and_then(|date| date.and_hms_opt(7, 30, 0))
            .expect("timestamp")
    }

    #[test]
    fn identity_forms_return_raw() {
        assert_eq!(evaluate("", 4.5, local(), None), 4.5);
        assert_eq!(evaluate(" x ", 4.5, local(), Some(2)), 4.5);
    }

    #[test]
    fn other_expressions_are_not_applied() {
        assert_eq!(evaluate("x * 1000", 4.5, local(), Some(1)), 4.5);
    }
}
