use super::vectors::{VacancyFeatures, VehicleFeatures};
use super::FeatureError;
use crate::models::{DayOfWeek, EntryHour, TemporalInput};

/// Half-open hour intervals `[edge[i], edge[i + 1])`, one per bin.
pub const HOUR_BIN_EDGES: [u32; 7] = [0, 6, 9, 12, 17, 20, 24];

pub const HOUR_BIN_COUNT: usize = HOUR_BIN_EDGES.len() - 1;

/// Index of the time-of-day bin containing `hour`.
pub fn hour_bin(hour: EntryHour) -> u32 {
    let h = hour.value();
    // EntryHour is bounded to [0, 23], so the last interval always matches.
    HOUR_BIN_EDGES
        .windows(2)
        .position(|edge| edge[0] <= h && h < edge[1])
        .unwrap_or(HOUR_BIN_COUNT - 1) as u32
}

/// 1 for Saturday/Sunday, 0 otherwise.
pub fn is_weekend(day: DayOfWeek) -> u32 {
    u32::from(day.is_weekend())
}

/// Derive both feature vectors from an already validated input.
pub fn derive_input(input: &TemporalInput) -> (VacancyFeatures, VehicleFeatures) {
    let entry_hour = input.entry_hour.value();
    let day_of_week = input.day_of_week.value();
    let weekend = is_weekend(input.day_of_week);
    let bin = hour_bin(input.entry_hour);

    (
        VacancyFeatures::new(entry_hour, day_of_week, weekend, bin),
        VehicleFeatures::new(entry_hour, input.duration_minutes.value(), day_of_week, weekend, bin),
    )
}

/// Validate raw integers and derive both feature vectors.
///
/// Out-of-range arguments fail with [`FeatureError::InvalidInput`]; nothing
/// is clamped.
pub fn derive(
    entry_hour: i64,
    day_of_week: i64,
    duration_minutes: i64,
) -> Result<(VacancyFeatures, VehicleFeatures), FeatureError> {
    let input = TemporalInput::new(entry_hour, day_of_week, duration_minutes)?;
    Ok(derive_input(&input))
}
