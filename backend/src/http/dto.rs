//! Data Transfer Objects for the HTTP API.
//!
//! Feature and prediction payloads reuse the service-layer types, which
//! already serialize with the contract column names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::classifier::ModelInfo;
pub use crate::services::prediction::{FeaturePreview, PredictionOutcome, VacancyPrediction, VehiclePrediction};

use crate::features::FeatureError;
use crate::models::{ModelKind, TemporalInput};

/// Request body for `/v1/features` and `/v1/predict`.
///
/// Fields are plain integers so any `i64` outside a field's domain reaches
/// validation and comes back as `INVALID_INPUT`. Values that are not JSON
/// integers or do not fit an `i64` fail deserialization (`BAD_REQUEST`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TemporalRequest {
    pub entry_hour: i64,
    pub day_of_week: i64,
    pub duration_minutes: i64,
}

impl TryFrom<TemporalRequest> for TemporalInput {
    type Error = FeatureError;

    fn try_from(request: TemporalRequest) -> Result<Self, Self::Error> {
        TemporalInput::new(request.entry_hour, request.day_of_week, request.duration_minutes)
    }
}

/// Response for `/v1/predict`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    /// Unique identifier for this prediction
    pub prediction_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub outcome: PredictionOutcome,
}

/// Load state of one model handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Loaded,
    NotLoaded,
}

impl From<bool> for LoadState {
    fn from(loaded: bool) -> Self {
        if loaded {
            LoadState::Loaded
        } else {
            LoadState::NotLoaded
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsHealth {
    pub vacancy: LoadState,
    pub vehicle: LoadState,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub models: ModelsHealth,
}

/// One entry of `/v1/models`.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatusDto {
    pub kind: ModelKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub state: LoadState,
    /// Metadata once the model has loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<ModelInfo>,
    /// Load error when the artifact could not be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response for `/v1/models`.
#[derive(Debug, Clone, Serialize)]
pub struct ModelListResponse {
    pub models: Vec<ModelStatusDto>,
}
