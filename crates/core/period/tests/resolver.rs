use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use domain::{HourRule, PeriodSettings, ShiftDef, WindowKind};
use hist_period::{
    HourPolicy, current_shift, day_for_write, day_start, hour_by_rule, hour_for_write, preview,
    previous_shift_for_write, production_date, resolve_window,
};

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("timestamp")
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
}

fn shift(number: i32, start: &str) -> ShiftDef {
    ShiftDef {
        number,
        name: format!("Shift {number}"),
        start: start.parse().expect("start"),
        length_hours: 8,
    }
}

fn settings_with(start_hour: u32, shifts: Vec<ShiftDef>) -> PeriodSettings {
    PeriodSettings {
        production_day_start_hour: start_hour,
        shifts,
        hour_rule: HourRule::default(),
    }
}

#[test]
fn day_start_bounds_hold_for_every_minute() {
    for start_hour in [0, 6, 22, 23] {
        let settings = settings_with(start_hour, Vec::new());
        let mut t = at("2024-02-28 00:00:00");
        let end = at("2024-03-02 00:00:00");
        while t < end {
            let start = day_start(t, &settings);
            assert!(start <= t, "start {start} after {t}");
            assert!(t < start + TimeDelta::hours(24), "window too short at {t}");
            assert_eq!(start.hour(), start_hour);
            assert_eq!(production_date(t, &settings), (start + TimeDelta::days(1)).date());
            t += TimeDelta::minutes(17);
        }
    }
}

#[test]
fn day_boundary_is_half_open() {
    let settings = settings_with(22, Vec::new());

    let t = at("2024-08-25 22:00:00");
    assert_eq!(day_start(t, &settings), at("2024-08-25 22:00:00"));
    assert_eq!(production_date(t, &settings), date("2024-08-26"));

    let t = at("2024-08-25 21:59:59");
    assert_eq!(day_start(t, &settings), at("2024-08-24 22:00:00"));
    assert_eq!(production_date(t, &settings), date("2024-08-25"));
}

#[test]
fn day_start_hour_is_clamped() {
    let settings = settings_with(30, Vec::new());
    assert_eq!(day_start(at("2024-08-25 23:30:00"), &settings), at("2024-08-25 23:00:00"));
}

#[test]
fn current_shift_follows_start_times() {
    let settings = PeriodSettings::default();

    let slot = current_shift(at("2024-08-25 23:00:00"), &settings);
    assert_eq!(slot.number, 1);
    assert_eq!(slot.start, at("2024-08-25 22:00:00"));

    let slot = current_shift(at("2024-08-26 07:00:00"), &settings);
    assert_eq!(slot.number, 2);
    assert_eq!(slot.start, at("2024-08-26 06:00:00"));

    let slot = current_shift(at("2024-08-26 15:00:00"), &settings);
    assert_eq!(slot.number, 3);
    assert_eq!(slot.start, at("2024-08-26 14:00:00"));

    let slot = current_shift(at("2024-08-26 06:00:00"), &settings);
    assert_eq!(slot.number, 2, "boundary belongs to the new shift");
}

#[test]
fn current_shift_ignores_list_order() {
    let settings = settings_with(22, vec![shift(3, "14:00"), shift(1, "22:00"), shift(2, "06:00")]);
    let slot = current_shift(at("2024-08-26 01:00:00"), &settings);
    assert_eq!(slot.number, 1);
    assert_eq!(slot.index, 0);
    let slot = current_shift(at("2024-08-26 20:00:00"), &settings);
    assert_eq!(slot.number, 3);
    assert_eq!(slot.index, 2);
}

#[test]
fn current_shift_wraps_when_no_shift_starts_with_the_day() {
    // 生产日 22:00 开始，但第一班 00:00 才开始：22:00-00:00 属于最后一班。
    let settings = settings_with(22, vec![shift(1, "00:00"), shift(2, "12:00")]);
    let slot = current_shift(at("2024-08-25 23:00:00"), &settings);
    assert_eq!(slot.number, 2);
    assert_eq!(slot.start, at("2024-08-25 12:00:00"));

    let window = previous_shift_for_write(at("2024-08-25 23:00:00"), &settings);
    assert_eq!(window.shift_no, 1);
    assert_eq!(window.shift_start, at("2024-08-25 00:00:00"));
    assert_eq!(window.production_date, date("2024-08-25"));
}

#[test]
fn duplicate_offsets_prefer_first_listed() {
    let settings = settings_with(0, vec![shift(7, "08:00"), shift(9, "08:00"), shift(1, "00:00")]);
    let slot = current_shift(at("2024-08-26 09:00:00"), &settings);
    assert_eq!(slot.number, 7);
}

#[test]
fn shadowed_duplicate_is_never_written_as_previous_shift() {
    let settings = settings_with(0, vec![shift(7, "08:00"), shift(9, "08:00"), shift(1, "00:00")]);

    let current = current_shift(at("2024-08-25 09:00:00"), &settings);
    assert_eq!(current.number, 7);

    let window = previous_shift_for_write(at("2024-08-26 03:00:00"), &settings);
    assert_eq!(window.shift_no, 7);
    assert_eq!(window.shift_start, at("2024-08-25 08:00:00"));
    assert_eq!(window.production_date, date("2024-08-26"));

    let window = previous_shift_for_write(at("2024-08-26 09:00:00"), &settings);
    assert_eq!(window.shift_no, 1);
    assert_eq!(window.shift_start, at("2024-08-26 00:00:00"));
}

#[test]
fn previous_shift_points_to_completed_shift() {
    let settings = PeriodSettings::default();

    let window = previous_shift_for_write(at("2024-08-26 07:30:00"), &settings);
    assert_eq!(window.shift_no, 1);
    assert_eq!(window.shift_start, at("2024-08-25 22:00:00"));
    assert_eq!(window.production_date, date("2024-08-26"));

    let window = previous_shift_for_write(at("2024-08-25 23:00:00"), &settings);
    assert_eq!(window.shift_no, 3);
    assert_eq!(window.shift_start, at("2024-08-25 14:00:00"));
    assert_eq!(window.production_date, date("2024-08-25"));

    let window = previous_shift_for_write(at("2024-08-26 15:00:00"), &settings);
    assert_eq!(window.shift_no, 2);
    assert_eq!(window.shift_start, at("2024-08-26 06:00:00"));
}

#[test]
fn empty_shift_list_degrades_to_single_day_window() {
    let settings = settings_with(22, Vec::new());
    let t = at("2024-08-26 10:00:00");

    let slot = current_shift(t, &settings);
    assert_eq!(slot.index, 0);
    assert_eq!(slot.number, 1);
    assert_eq!(slot.start, at("2024-08-25 22:00:00"));

    let window = previous_shift_for_write(t, &settings);
    assert_eq!(window.shift_no, 1);
    assert_eq!(window.shift_start, at("2024-08-24 22:00:00"));
    assert_eq!(window.production_date, date("2024-08-25"));
}

#[test]
fn single_shift_previous_is_yesterday() {
    let settings = settings_with(6, vec![shift(4, "06:00")]);
    let window = previous_shift_for_write(at("2024-08-26 10:00:00"), &settings);
    assert_eq!(window.shift_no, 4);
    assert_eq!(window.shift_start, at("2024-08-25 06:00:00"));
}

#[test]
fn hour_for_write_uses_last_completed_hour() {
    let settings = PeriodSettings::default();
    let window = hour_for_write(at("2024-08-26 00:05:00"), &settings);
    assert_eq!(window.hour_no, 23);
    assert_eq!(window.period_start, at("2024-08-25 23:00:00"));
    assert_eq!(
        window.production_date,
        production_date(at("2024-08-25 23:00:00"), &settings)
    );
    assert_eq!(window.production_date, date("2024-08-26"));

    let window = hour_for_write(at("2024-08-25 22:00:00"), &settings);
    assert_eq!(window.hour_no, 21);
    assert_eq!(window.production_date, date("2024-08-25"));
}

#[test]
fn hour_rule_rewrites_late_hour() {
    let settings = PeriodSettings::default();

    let window = hour_by_rule(at("2024-08-25 23:10:00"), &settings);
    assert_eq!(window.hour_no, 22);
    assert_eq!(window.production_date, date("2024-08-26"));
    assert_eq!(window.period_start, at("2024-08-26 22:00:00"));

    let window = hour_by_rule(at("2024-08-25 10:10:00"), &settings);
    assert_eq!(window.hour_no, 10);
    assert_eq!(window.production_date, date("2024-08-25"));
    assert_eq!(window.period_start, at("2024-08-25 10:00:00"));
}

#[test]
fn hour_rule_disabled_keeps_current_hour() {
    let mut settings = PeriodSettings::default();
    settings.hour_rule.enabled = false;
    let window = hour_by_rule(at("2024-08-25 23:10:00"), &settings);
    assert_eq!(window.hour_no, 23);
    assert_eq!(window.production_date, date("2024-08-26"));
    assert_eq!(window.period_start, at("2024-08-25 23:00:00"));
}

#[test]
fn hour_rule_below_threshold_stays_in_containing_day() {
    let settings = PeriodSettings::default();

    // 生产日已开始（22 点）但尚未到阈值（23 点）
    let window = hour_by_rule(at("2024-08-25 22:30:00"), &settings);
    assert_eq!(window.hour_no, 22);
    assert_eq!(window.period_start, at("2024-08-25 22:00:00"));
    assert_eq!(window.production_date, date("2024-08-26"));
    assert_eq!(
        window.production_date,
        production_date(window.period_start, &settings)
    );

    for minute in (0..24 * 60).step_by(7) {
        let local = at("2024-08-25 00:00:00") + TimeDelta::minutes(minute);
        if local.hour() >= settings.hour_rule.threshold_hour {
            continue;
        }
        let window = hour_by_rule(local, &settings);
        assert_eq!(
            window.production_date,
            production_date(window.period_start, &settings),
            "date mismatch at {local}"
        );
        assert!(window.period_start <= local);
    }
}

#[test]
fn resolved_windows_carry_expected_numbers() {
    let settings = PeriodSettings::default();
    let t = at("2024-08-26 07:30:00");

    let hour = resolve_window(WindowKind::Hour, t, &settings, HourPolicy::LastCompleted);
    assert_eq!(hour.hour_no(), Some(6));
    assert_eq!(hour.shift_no(), None);

    let shift = resolve_window(WindowKind::Shift, t, &settings, HourPolicy::LastCompleted);
    assert_eq!(shift.hour_no(), None);
    assert_eq!(shift.shift_no(), Some(1));

    let day = resolve_window(WindowKind::Day, t, &settings, HourPolicy::LastCompleted);
    assert_eq!(day.hour_no(), None);
    assert_eq!(day.shift_no(), None);
    assert_eq!(day.period_start(), day_for_write(t, &settings));
    assert_eq!(day.production_date(), date("2024-08-26"));
}

#[test]
fn preview_uses_candidate_settings() {
    let candidate = settings_with(6, vec![shift(1, "06:00"), shift(2, "18:00")]);
    let result = preview(at("2024-08-26 19:00:00"), &candidate, HourPolicy::LastCompleted);
    assert_eq!(result.day_start, at("2024-08-26 06:00:00"));
    assert_eq!(result.current_shift.number, 2);
    assert_eq!(result.previous_shift.shift_no, 1);
    assert_eq!(result.hour.hour_no, 18);
    assert!(result.to_string().contains("hour to write:   18"));
}
