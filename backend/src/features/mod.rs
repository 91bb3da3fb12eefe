//! Feature derivation for the two parking classifiers.
//!
//! A [`TemporalInput`](crate::models::TemporalInput) is turned into two fixed
//! order feature vectors:
//!
//! ```text
//! vacancy: (Entry_Hour, DayOfWeek, Is_Weekend, Hour_Bin)
//! vehicle: (Entry_Hour, Duration, DayOfWeek, Is_Weekend, Hour_Bin)
//! ```
//!
//! The column order is the contract with the trained models and is exposed as
//! [`VACANCY_COLUMNS`] and [`VEHICLE_COLUMNS`].

pub mod deriver;
pub mod vectors;

pub use deriver::{derive, derive_input, hour_bin, is_weekend, HOUR_BIN_EDGES, HOUR_BIN_COUNT};
pub use vectors::{FeatureVector, VacancyFeatures, VehicleFeatures, VACANCY_COLUMNS, VEHICLE_COLUMNS};

/// Error raised when a temporal input lies outside its documented domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeatureError {
    #[error("Invalid input: {field}={value} is outside [{min}, {max}]")]
    InvalidInput {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}
