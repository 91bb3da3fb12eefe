//! Service layer for prediction and retraining workflows.
//!
//! Services sit between the feature/classifier core and the outer surfaces
//! (HTTP handlers and the CLI). They orchestrate model calls and dataset I/O
//! but hold no state of their own.

pub mod dataset;
pub mod evaluation;
pub mod labeling;
pub mod prediction;

pub use dataset::{
    load_feature_table, load_labeled, prepare_training_data, stratified_split, DatasetError, DatasetResult,
    LabeledSample, PreparationReport, PrepareOptions,
};
pub use evaluation::{evaluate, report_from_predictions, ClassMetrics, EvaluationReport};
pub use labeling::{vacancy_probability, SyntheticVacancyLabeler};
pub use prediction::{predict, predict_with, preview, FeaturePreview, PredictionOutcome};
