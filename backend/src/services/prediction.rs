//! Prediction orchestration: derive features, run both classifiers, map
//! labels to domain values.

use serde::Serialize;

use crate::classifier::{Classifier, ModelRegistry, ModelResult};
use crate::features::{derive_input, FeatureVector, VacancyFeatures, VehicleFeatures};
use crate::models::{TemporalInput, VacancyStatus, VehicleType};

/// Both feature vectors for one input, as shown in the dashboard preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturePreview {
    pub input: TemporalInput,
    pub vacancy_features: VacancyFeatures,
    pub vehicle_features: VehicleFeatures,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VacancyPrediction {
    pub label: u8,
    pub status: VacancyStatus,
    /// `[p_occupied, p_vacant]`
    pub probabilities: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehiclePrediction {
    pub label: u8,
    pub vehicle_type: VehicleType,
    /// `[p_four_wheeler, p_two_wheeler]`
    pub probabilities: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    pub features: FeaturePreview,
    pub vacancy: VacancyPrediction,
    pub vehicle: VehiclePrediction,
}

pub fn preview(input: &TemporalInput) -> FeaturePreview {
    let (vacancy_features, vehicle_features) = derive_input(input);
    FeaturePreview {
        input: *input,
        vacancy_features,
        vehicle_features,
    }
}

/// Run both models from the registry, loading them on first use.
pub fn predict(registry: &ModelRegistry, input: &TemporalInput) -> ModelResult<PredictionOutcome> {
    let vacancy = registry.vacancy()?;
    let vehicle = registry.vehicle()?;
    predict_with(vacancy.as_ref(), vehicle.as_ref(), input)
}

pub fn predict_with(
    vacancy_model: &dyn Classifier,
    vehicle_model: &dyn Classifier,
    input: &TemporalInput,
) -> ModelResult<PredictionOutcome> {
    let features = preview(input);

    let vacancy_row = features.vacancy_features.to_row();
    let vacancy_label = vacancy_model.predict(&vacancy_row)?;
    let vacancy = VacancyPrediction {
        label: vacancy_label,
        status: VacancyStatus::from_label(vacancy_label),
        probabilities: vacancy_model.predict_proba(&vacancy_row)?,
    };

    let vehicle_row = features.vehicle_features.to_row();
    let vehicle_label = vehicle_model.predict(&vehicle_row)?;
    let vehicle = VehiclePrediction {
        label: vehicle_label,
        vehicle_type: VehicleType::from_label(vehicle_label),
        probabilities: vehicle_model.predict_proba(&vehicle_row)?,
    };

    Ok(PredictionOutcome {
        features,
        vacancy,
        vehicle,
    })
}
