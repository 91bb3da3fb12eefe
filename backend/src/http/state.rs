//! Application state for the HTTP server.

use std::sync::Arc;

use crate::classifier::ModelRegistry;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Both classifiers, loaded on first use
    pub registry: Arc<ModelRegistry>,
}

impl AppState {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }
}
