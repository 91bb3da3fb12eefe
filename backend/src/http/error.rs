//! HTTP error handling and response types.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::classifier::ModelError;
use crate::features::FeatureError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request body
    BadRequest(String),
    /// Well-formed request with out-of-range values
    InvalidInput(FeatureError),
    /// A model artifact could not be loaded
    ModelUnavailable(ModelError),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::InvalidInput(e) => {
                let FeatureError::InvalidInput { field, .. } = &e;
                (
                    StatusCode::BAD_REQUEST,
                    ApiError::new("INVALID_INPUT", e.to_string()).with_details(format!("field: {}", field)),
                )
            }
            AppError::ModelUnavailable(e) => {
                tracing::error!("Model unavailable: {}", e);
                let error = match &e.context().model {
                    Some(model) => ApiError::new("MODEL_UNAVAILABLE", e.to_string()).with_details(format!("model: {}", model)),
                    None => ApiError::new("MODEL_UNAVAILABLE", e.to_string()),
                };
                (StatusCode::SERVICE_UNAVAILABLE, error)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, ApiError::new("INTERNAL_ERROR", msg))
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<FeatureError> for AppError {
    fn from(err: FeatureError) -> Self {
        AppError::InvalidInput(err)
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        if err.is_load_failure() {
            AppError::ModelUnavailable(err)
        } else {
            AppError::Internal(err.to_string())
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Worker task failed: {}", err))
    }
}
