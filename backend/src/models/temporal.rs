use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::define_bounded_type;
use crate::features::FeatureError;

define_bounded_type!(u32, EntryHour, "entry_hour", 0, 23);
define_bounded_type!(u32, DayOfWeek, "day_of_week", 0, 6);
define_bounded_type!(u32, DurationMinutes, "duration_minutes", 1, 1440);

impl DayOfWeek {
    /// Saturday and Sunday (5 and 6 with Monday = 0).
    pub fn is_weekend(&self) -> bool {
        self.0 >= 5
    }
}

/// Raw temporal input for one prediction request.
///
/// All three fields are validated on construction, so any `TemporalInput`
/// value is inside the domain the classifiers were trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemporalInput {
    pub entry_hour: EntryHour,
    pub day_of_week: DayOfWeek,
    pub duration_minutes: DurationMinutes,
}

impl TemporalInput {
    /// Validate raw integers into a temporal input.
    ///
    /// Fields are checked in the order entry hour, day of week, duration; the
    /// first violation is returned.
    pub fn new(entry_hour: i64, day_of_week: i64, duration_minutes: i64) -> Result<Self, FeatureError> {
        Ok(Self {
            entry_hour: EntryHour::new(entry_hour)?,
            day_of_week: DayOfWeek::new(day_of_week)?,
            duration_minutes: DurationMinutes::new(duration_minutes)?,
        })
    }

    /// Build an input from a wall-clock entry time.
    ///
    /// The hour is taken from the timestamp and the weekday is counted from
    /// Monday = 0.
    pub fn from_entry_time(entry: NaiveDateTime, duration_minutes: i64) -> Result<Self, FeatureError> {
        Self::new(
            entry.hour() as i64,
            entry.weekday().num_days_from_monday() as i64,
            duration_minutes,
        )
    }
}

#[cfg(test)]
#[path = "temporal_tests.rs"]
mod temporal_tests;
