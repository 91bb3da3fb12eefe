use serde::Serialize;

/// Column order of the vacancy model input.
pub const VACANCY_COLUMNS: [&str; 4] = ["Entry_Hour", "DayOfWeek", "Is_Weekend", "Hour_Bin"];

/// Column order of the vehicle-type model input.
pub const VEHICLE_COLUMNS: [&str; 5] = ["Entry_Hour", "Duration", "DayOfWeek", "Is_Weekend", "Hour_Bin"];

/// A fixed-width, fixed-order numeric vector handed to a classifier.
pub trait FeatureVector {
    /// Column names, in the order the model was trained with.
    fn columns() -> &'static [&'static str];

    /// Integer values in column order.
    fn values(&self) -> Vec<u32>;

    /// Values as the floating point row the tree ensemble consumes.
    fn to_row(&self) -> Vec<f64> {
        self.values().into_iter().map(f64::from).collect()
    }

    /// `(column, value)` pairs, used for feature previews.
    fn named(&self) -> Vec<(&'static str, u32)> {
        Self::columns().iter().copied().zip(self.values()).collect()
    }
}

/// Vacancy model input. Duration is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VacancyFeatures {
    #[serde(rename = "Entry_Hour")]
    entry_hour: u32,
    #[serde(rename = "DayOfWeek")]
    day_of_week: u32,
    #[serde(rename = "Is_Weekend")]
    is_weekend: u32,
    #[serde(rename = "Hour_Bin")]
    hour_bin: u32,
}

impl VacancyFeatures {
    pub const WIDTH: usize = 4;

    pub(crate) fn new(entry_hour: u32, day_of_week: u32, is_weekend: u32, hour_bin: u32) -> Self {
        Self {
            entry_hour,
            day_of_week,
            is_weekend,
            hour_bin,
        }
    }

    pub fn to_array(&self) -> [u32; 4] {
        [self.entry_hour, self.day_of_week, self.is_weekend, self.hour_bin]
    }
}

impl FeatureVector for VacancyFeatures {
    fn columns() -> &'static [&'static str] {
        &VACANCY_COLUMNS
    }

    fn values(&self) -> Vec<u32> {
        self.to_array().to_vec()
    }
}

/// Vehicle-type model input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VehicleFeatures {
    #[serde(rename = "Entry_Hour")]
    entry_hour: u32,
    #[serde(rename = "Duration")]
    duration_minutes: u32,
    #[serde(rename = "DayOfWeek")]
    day_of_week: u32,
    #[serde(rename = "Is_Weekend")]
    is_weekend: u32,
    #[serde(rename = "Hour_Bin")]
    hour_bin: u32,
}

impl VehicleFeatures {
    pub const WIDTH: usize = 5;

    pub(crate) fn new(
        entry_hour: u32,
        duration_minutes: u32,
        day_of_week: u32,
        is_weekend: u32,
        hour_bin: u32,
    ) -> Self {
        Self {
            entry_hour,
            duration_minutes,
            day_of_week,
            is_weekend,
            hour_bin,
        }
    }

    pub fn to_array(&self) -> [u32; 5] {
        [
            self.entry_hour,
            self.duration_minutes,
            self.day_of_week,
            self.is_weekend,
            self.hour_bin,
        ]
    }
}

impl FeatureVector for VehicleFeatures {
    fn columns() -> &'static [&'static str] {
        &VEHICLE_COLUMNS
    }

    fn values(&self) -> Vec<u32> {
        self.to_array().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths_match_columns() {
        assert_eq!(VACANCY_COLUMNS.len(), VacancyFeatures::WIDTH);
        assert_eq!(VEHICLE_COLUMNS.len(), VehicleFeatures::WIDTH);
    }

    #[test]
    fn test_vacancy_columns_exclude_duration() {
        assert!(!VACANCY_COLUMNS.contains(&"Duration"));
        assert_eq!(VEHICLE_COLUMNS[1], "Duration");
    }

    #[test]
    fn test_named_pairs_follow_column_order() {
        let v = VehicleFeatures::new(7, 45, 2, 0, 1);
        assert_eq!(
            v.named(),
            vec![
                ("Entry_Hour", 7),
                ("Duration", 45),
                ("DayOfWeek", 2),
                ("Is_Weekend", 0),
                ("Hour_Bin", 1),
            ]
        );
        assert_eq!(v.to_row(), vec![7.0, 45.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_serialize_uses_contract_names() {
        let v = VacancyFeatures::new(12, 0, 0, 3);
        let json = serde_json::to_value(v).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Entry_Hour": 12, "DayOfWeek": 0, "Is_Weekend": 0, "Hour_Bin": 3})
        );
    }
}
