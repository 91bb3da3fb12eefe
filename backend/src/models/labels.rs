use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which of the two deployed classifiers a model artifact belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Vacancy,
    Vehicle,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Vacancy => "vacancy",
            ModelKind::Vehicle => "vehicle",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vacancy" => Ok(Self::Vacancy),
            "vehicle" | "vehicle-type" | "vehicle_type" => Ok(Self::Vehicle),
            _ => Err(format!("Unknown model kind: {}. Use vacancy or vehicle.", s)),
        }
    }
}

/// Parking slot state predicted by the vacancy model (label 1 = vacant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacancyStatus {
    Vacant,
    Occupied,
}

impl VacancyStatus {
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            VacancyStatus::Vacant
        } else {
            VacancyStatus::Occupied
        }
    }

    pub fn label(&self) -> u8 {
        match self {
            VacancyStatus::Vacant => 1,
            VacancyStatus::Occupied => 0,
        }
    }
}

impl fmt::Display for VacancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VacancyStatus::Vacant => write!(f, "Vacant"),
            VacancyStatus::Occupied => write!(f, "Occupied"),
        }
    }
}

/// Vehicle class predicted by the vehicle-type model (label 1 = two wheeler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    TwoWheeler,
    FourWheeler,
}

impl VehicleType {
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            VehicleType::TwoWheeler
        } else {
            VehicleType::FourWheeler
        }
    }

    pub fn label(&self) -> u8 {
        match self {
            VehicleType::TwoWheeler => 1,
            VehicleType::FourWheeler => 0,
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleType::TwoWheeler => write!(f, "Two Wheeler"),
            VehicleType::FourWheeler => write!(f, "Four Wheeler"),
        }
    }
}
