//! # Smart Parking Backend
//!
//! Feature derivation and model serving for the smart parking dashboard.
//!
//! Given an entry hour, a day of week and a parking duration, the crate
//! derives the two fixed feature vectors the trained gradient-boosted models
//! expect, runs the vacancy and vehicle-type classifiers and maps their
//! labels to domain values. The same derivation feeds the retraining
//! pipeline so serving and training never disagree.
//!
//! ## Features
//!
//! - **Feature Derivation**: Hour bins, weekend flag and column-ordered vectors
//! - **Model Serving**: Native evaluation of exported boosted-tree JSON artifacts
//! - **Retraining Support**: Synthetic vacancy labels, stratified splits, hold-out evaluation
//! - **HTTP API**: RESTful endpoints for the dashboard
//! - **CLI**: Operational commands for data preparation and model inspection
//!
//! ## Architecture
//!
//! - [`models`]: Validated temporal inputs and label enums
//! - [`features`]: The feature deriver and the two vector contracts
//! - [`classifier`]: Classifier trait, tree-ensemble adapter, lazy registry
//! - [`services`]: Prediction, labeling, dataset and evaluation workflows
//! - [`config`]: TOML configuration with environment overrides
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod classifier;
pub mod config;
pub mod features;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use classifier::{Classifier, ModelRegistry};
pub use config::ServiceConfig;
pub use features::{derive, FeatureError};
pub use models::TemporalInput;
