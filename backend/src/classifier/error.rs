//! Error types for model loading and inference.

use std::fmt;

/// Result type for classifier operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Structured context for model errors.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "load_model", "predict_proba")
    pub operation: Option<String>,
    /// Which model was involved ("vacancy", "vehicle")
    pub model: Option<String>,
    /// Artifact path if applicable
    pub path: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl ToString) -> Self {
        self.model = Some(model.to_string());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref model) = self.model {
            parts.push(format!("model={}", model));
        }
        if let Some(ref path) = self.path {
            parts.push(format!("path={}", path));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for classifier operations
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The artifact could not be read from disk.
    #[error("IO error: {message} {context}")]
    Io {
        message: String,
        context: ErrorContext,
    },

    /// The artifact is not a well-formed tree ensemble.
    #[error("Parse error: {message} {context}")]
    Parse {
        message: String,
        context: ErrorContext,
    },

    /// The artifact is valid but uses an objective we cannot evaluate.
    #[error("Unsupported model: {message} {context}")]
    UnsupportedModel {
        message: String,
        context: ErrorContext,
    },

    /// Feature count or names disagree with the expected column contract.
    #[error("Feature mismatch: {message} {context}")]
    FeatureMismatch {
        message: String,
        context: ErrorContext,
    },

    /// Missing or invalid model configuration.
    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },
}

impl ModelError {
    pub fn io(message: impl Into<String>, context: ErrorContext) -> Self {
        ModelError::Io {
            message: message.into(),
            context,
        }
    }

    pub fn parse(message: impl Into<String>, context: ErrorContext) -> Self {
        ModelError::Parse {
            message: message.into(),
            context,
        }
    }

    pub fn unsupported(message: impl Into<String>, context: ErrorContext) -> Self {
        ModelError::UnsupportedModel {
            message: message.into(),
            context,
        }
    }

    pub fn feature_mismatch(message: impl Into<String>, context: ErrorContext) -> Self {
        ModelError::FeatureMismatch {
            message: message.into(),
            context,
        }
    }

    pub fn configuration(message: impl Into<String>, context: ErrorContext) -> Self {
        ModelError::ConfigurationError {
            message: message.into(),
            context,
        }
    }

    /// Whether the failure happened while bringing a model into memory, as
    /// opposed to while evaluating one.
    pub fn is_load_failure(&self) -> bool {
        match self {
            ModelError::Io { .. }
            | ModelError::Parse { .. }
            | ModelError::UnsupportedModel { .. }
            | ModelError::ConfigurationError { .. } => true,
            // An artifact trained on the wrong columns is rejected at load time.
            ModelError::FeatureMismatch { context, .. } => context.operation.as_deref() == Some("load_model"),
        }
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            ModelError::Io { context, .. }
            | ModelError::Parse { context, .. }
            | ModelError::UnsupportedModel { context, .. }
            | ModelError::FeatureMismatch { context, .. }
            | ModelError::ConfigurationError { context, .. } => context,
        }
    }
}
