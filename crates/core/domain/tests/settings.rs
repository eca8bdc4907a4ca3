use domain::{PeriodSettings, RawValue, ShiftStart, TagWriteRequest, WindowKind};

#[test]
fn default_settings_match_factory_shape() {
    let settings = PeriodSettings::default();
    assert_eq!(settings.production_day_start_hour, 22);
    let starts: Vec<String> = settings.shifts.iter().map(|s| s.start.to_string()).collect();
    assert_eq!(starts, vec!["22:00", "06:00", "14:00"]);
    assert!(settings.hour_rule.enabled);
    assert_eq!(settings.hour_rule.threshold_hour, 23);
    assert_eq!(settings.hour_rule.write_as_hour, 22);
    assert!(settings.hour_rule.shift_date_to_next_day);
}

#[test]
fn settings_deserialize_camel_case() {
    let json = r#"{
        "productionDayStartHour": 6,
        "shifts": [
            { "number": 1, "name": "Day", "start": "06:00", "lengthHours": 12 },
            { "number": 2, "name": "Night", "start": "18:00", "lengthHours": 12 }
        ],
        "hourRule": { "enabled": false, "thresholdHour": 5, "writeAsHour": 4, "shiftDateToNextDay": false }
    }"#;
    let settings: PeriodSettings = serde_json::from_str(json).expect("parse");
    assert_eq!(settings.production_day_start_hour, 6);
    assert_eq!(settings.shifts.len(), 2);
    assert_eq!(settings.shifts[1].start, ShiftStart::new(18, 0).expect("time"));
    assert!(!settings.hour_rule.enabled);
}

#[test]
fn settings_reject_bad_shift_start() {
    let json = r#"{ "shifts": [ { "number": 1, "start": "25:00" } ] }"#;
    let err = serde_json::from_str::<PeriodSettings>(json).expect_err("invalid start");
    assert!(err.to_string().contains("25:00"));
}

#[test]
fn shift_start_parses_strict_hh_mm() {
    assert_eq!("06:30".parse::<ShiftStart>().expect("ok").minutes_of_day(), 390);
    assert!("6:30".parse::<ShiftStart>().is_err());
    assert!("06:60".parse::<ShiftStart>().is_err());
    assert!("06:30:00".parse::<ShiftStart>().is_err());
}

#[test]
fn raw_value_numeric_conversion() {
    assert_eq!(RawValue::I64(3).as_f64(), Some(3.0));
    assert_eq!(RawValue::Bool(true).as_f64(), Some(1.0));
    assert_eq!(RawValue::String(" 12.5 ".to_string()).as_f64(), Some(12.5));
    assert_eq!(RawValue::String("bad".to_string()).as_f64(), None);
    assert_eq!(RawValue::F64(f64::NAN).as_f64(), None);
}

#[test]
fn legacy_tag_name_falls_back_to_source_id() {
    let request = TagWriteRequest::new("Plant.FT101", "", 7);
    assert_eq!(request.legacy_tag_name(), "Plant.FT101");
    let request = TagWriteRequest::new("Plant.FT101", "FT101", 0);
    assert_eq!(request.legacy_tag_name(), "FT101");
    assert!(request.is_mapped());
    assert!(!TagWriteRequest::new("Plant.FT101", " ", 0).is_mapped());
}

#[test]
fn window_kind_parses_case_insensitive() {
    assert_eq!("SHIFT".parse::<WindowKind>().expect("kind"), WindowKind::Shift);
    assert_eq!(WindowKind::Day.as_legacy_period(), "day");
    assert!("week".parse::<WindowKind>().is_err());
}
