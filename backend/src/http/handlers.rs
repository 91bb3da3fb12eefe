//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer. Model loading and tree evaluation are CPU/disk bound and
//! run on the blocking pool.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

use super::dto::{
    FeaturePreview, HealthResponse, LoadState, ModelListResponse, ModelStatusDto, ModelsHealth, PredictResponse,
    TemporalRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::classifier::ModelRegistry;
use crate::models::{ModelKind, TemporalInput};
use crate::services::prediction;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn validated(payload: Result<Json<TemporalRequest>, JsonRejection>) -> Result<TemporalInput, AppError> {
    let Json(request) = payload?;
    Ok(TemporalInput::try_from(request)?)
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Reports whether each model has been loaded yet. Never triggers a load.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let registry = &state.registry;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        models: ModelsHealth {
            vacancy: registry.handle(ModelKind::Vacancy).is_loaded().into(),
            vehicle: registry.handle(ModelKind::Vehicle).is_loaded().into(),
        },
    }))
}

// =============================================================================
// Features and Prediction
// =============================================================================

/// POST /v1/features
///
/// Derive both feature vectors without touching the models.
pub async fn derive_features(
    payload: Result<Json<TemporalRequest>, JsonRejection>,
) -> HandlerResult<FeaturePreview> {
    let input = validated(payload)?;
    Ok(Json(prediction::preview(&input)))
}

/// POST /v1/predict
///
/// Run both classifiers. The first call loads the artifacts.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<TemporalRequest>, JsonRejection>,
) -> HandlerResult<PredictResponse> {
    let input = validated(payload)?;
    let registry = Arc::clone(&state.registry);

    let outcome = tokio::task::spawn_blocking(move || prediction::predict(&registry, &input)).await??;

    let response = PredictResponse {
        prediction_id: uuid::Uuid::new_v4().to_string(),
        timestamp: chrono::Utc::now(),
        outcome,
    };
    tracing::debug!(
        "prediction {}: vacancy={} vehicle={}",
        response.prediction_id,
        response.outcome.vacancy.status,
        response.outcome.vehicle.vehicle_type
    );
    Ok(Json(response))
}

// =============================================================================
// Model Metadata
// =============================================================================

fn model_status(registry: &ModelRegistry, kind: ModelKind) -> ModelStatusDto {
    let handle = registry.handle(kind);
    let path = handle.source().map(|p| p.display().to_string());
    match handle.get() {
        Ok(model) => ModelStatusDto {
            kind,
            path,
            state: LoadState::Loaded,
            info: Some(model.info()),
            error: None,
        },
        Err(e) => {
            tracing::warn!("Failed to load {} model: {}", kind, e);
            ModelStatusDto {
                kind,
                path,
                state: LoadState::NotLoaded,
                info: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// GET /v1/models
///
/// Metadata for both models, loading them if needed. A model that fails to
/// load is reported with its error rather than failing the request.
pub async fn list_models(State(state): State<AppState>) -> HandlerResult<ModelListResponse> {
    let registry = Arc::clone(&state.registry);
    let models = tokio::task::spawn_blocking(move || {
        [ModelKind::Vacancy, ModelKind::Vehicle]
            .into_iter()
            .map(|kind| model_status(&registry, kind))
            .collect::<Vec<_>>()
    })
    .await?;

    Ok(Json(ModelListResponse { models }))
}
