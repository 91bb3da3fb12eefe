use super::*;
use chrono::NaiveDate;

#[test]
fn test_new_accepts_domain_bounds() {
    let low = TemporalInput::new(0, 0, 1).unwrap();
    assert_eq!(low.entry_hour.value(), 0);
    assert_eq!(low.day_of_week.value(), 0);
    assert_eq!(low.duration_minutes.value(), 1);

    let high = TemporalInput::new(23, 6, 1440).unwrap();
    assert_eq!(high.entry_hour.value(), 23);
    assert_eq!(high.day_of_week.value(), 6);
    assert_eq!(high.duration_minutes.value(), 1440);
}

#[test]
fn test_entry_hour_24_rejected() {
    let err = TemporalInput::new(24, 0, 60).unwrap_err();
    assert_eq!(
        err,
        FeatureError::InvalidInput {
            field: "entry_hour",
            value: 24,
            min: 0,
            max: 23,
        }
    );
}

#[test]
fn test_negative_hour_rejected() {
    assert!(EntryHour::new(-1).is_err());
}

#[test]
fn test_day_of_week_out_of_range() {
    let err = TemporalInput::new(12, 7, 60).unwrap_err();
    assert!(matches!(err, FeatureError::InvalidInput { field: "day_of_week", value: 7, .. }));
}

#[test]
fn test_duration_zero_and_over_a_day_rejected() {
    assert!(matches!(
        DurationMinutes::new(0),
        Err(FeatureError::InvalidInput { field: "duration_minutes", .. })
    ));
    assert!(DurationMinutes::new(1441).is_err());
}

#[test]
fn test_first_violation_reported() {
    // Both hour and day are invalid: hour is checked first.
    let err = TemporalInput::new(30, 9, 60).unwrap_err();
    assert!(matches!(err, FeatureError::InvalidInput { field: "entry_hour", .. }));
}

#[test]
fn test_day_of_week_weekend() {
    for day in 0..5 {
        assert!(!DayOfWeek::new(day).unwrap().is_weekend());
    }
    assert!(DayOfWeek::new(5).unwrap().is_weekend());
    assert!(DayOfWeek::new(6).unwrap().is_weekend());
}

#[test]
fn test_from_entry_time_monday_noon() {
    // 2024-01-01 was a Monday.
    let entry = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(12, 30, 0)
        .unwrap();
    let input = TemporalInput::from_entry_time(entry, 60).unwrap();
    assert_eq!(input.entry_hour.value(), 12);
    assert_eq!(input.day_of_week.value(), 0);
}

#[test]
fn test_from_entry_time_sunday_late() {
    let entry = NaiveDate::from_ymd_opt(2024, 1, 7)
        .unwrap()
        .and_hms_opt(23, 59, 59)
        .unwrap();
    let input = TemporalInput::from_entry_time(entry, 1440).unwrap();
    assert_eq!(input.entry_hour.value(), 23);
    assert_eq!(input.day_of_week.value(), 6);
}

#[test]
fn test_deserialize_validates() {
    let ok: TemporalInput =
        serde_json::from_str(r#"{"entry_hour": 8, "day_of_week": 2, "duration_minutes": 30}"#).unwrap();
    assert_eq!(ok.entry_hour.value(), 8);

    let bad = serde_json::from_str::<TemporalInput>(
        r#"{"entry_hour": 24, "day_of_week": 2, "duration_minutes": 30}"#,
    );
    assert!(bad.is_err());
}

#[test]
fn test_serialize_as_plain_integers() {
    let input = TemporalInput::new(9, 4, 120).unwrap();
    let json = serde_json::to_value(input).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"entry_hour": 9, "day_of_week": 4, "duration_minutes": 120})
    );
}
