//! Classifier capability consumed by the prediction service.
//!
//! The trained models are opaque to the rest of the crate: callers only see
//! [`Classifier::predict`] and [`Classifier::predict_proba`] over a feature
//! row in the column order of [`crate::features`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  ModelRegistry (vacancy + vehicle)                        │
//! │  - injected into HTTP state / CLI                         │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  LazyClassifier                                           │
//! │  - loads an artifact at most once per process             │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Classifier trait                                         │
//! │  - BoostedTreeModel (native JSON tree dump)               │
//! │  - FixedClassifier (in-memory, tests and local dev)       │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod boosted_trees;
pub mod checksum;
pub mod error;
pub mod fixed;
pub mod lazy;

pub use boosted_trees::BoostedTreeModel;
pub use checksum::calculate_checksum;
pub use error::{ErrorContext, ModelError, ModelResult};
pub use fixed::FixedClassifier;
pub use lazy::{LazyClassifier, ModelRegistry};

use serde::{Deserialize, Serialize};

use crate::features::{VACANCY_COLUMNS, VEHICLE_COLUMNS};
use crate::models::ModelKind;

/// Decision threshold applied to the positive-class probability.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Column contract a model of the given kind must have been trained with.
pub fn expected_columns(kind: ModelKind) -> &'static [&'static str] {
    match kind {
        ModelKind::Vacancy => &VACANCY_COLUMNS,
        ModelKind::Vehicle => &VEHICLE_COLUMNS,
    }
}

/// Descriptive metadata for a loaded model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub kind: ModelKind,
    /// Implementation name ("boosted_trees", "fixed")
    pub backend: String,
    pub objective: String,
    pub n_features: usize,
    pub feature_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_trees: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Binary classifier over a fixed-width feature row.
pub trait Classifier: Send + Sync {
    fn info(&self) -> ModelInfo;

    fn n_features(&self) -> usize;

    /// Class probabilities `[p0, p1]`, summing to one.
    fn predict_proba(&self, row: &[f64]) -> ModelResult<[f64; 2]>;

    /// Predicted label: 1 iff `p1 > 0.5`.
    fn predict(&self, row: &[f64]) -> ModelResult<u8> {
        let [_, p1] = self.predict_proba(row)?;
        Ok(u8::from(p1 > DECISION_THRESHOLD))
    }
}

/// Reject rows whose width does not match the model.
pub(crate) fn check_row_width(kind: ModelKind, expected: usize, row: &[f64]) -> ModelResult<()> {
    if row.len() != expected {
        return Err(ModelError::feature_mismatch(
            format!("expected {} features, got {}", expected, row.len()),
            ErrorContext::new("predict_proba").with_model(kind),
        ));
    }
    Ok(())
}
