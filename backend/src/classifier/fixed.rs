//! In-memory classifier for testing and local development.

use super::{check_row_width, expected_columns, Classifier, ErrorContext, ModelError, ModelInfo, ModelResult};
use crate::models::ModelKind;

/// Classifier that returns the same probability for every row.
///
/// Rows are still width-checked against the column contract of `kind`.
#[derive(Debug, Clone)]
pub struct FixedClassifier {
    kind: ModelKind,
    positive_probability: f64,
}

impl FixedClassifier {
    pub fn new(kind: ModelKind, positive_probability: f64) -> ModelResult<Self> {
        if !(0.0..=1.0).contains(&positive_probability) {
            return Err(ModelError::configuration(
                format!("probability {} is outside [0, 1]", positive_probability),
                ErrorContext::new("fixed_classifier").with_model(kind),
            ));
        }
        Ok(Self {
            kind,
            positive_probability,
        })
    }

    /// Always predicts label 1.
    pub fn positive(kind: ModelKind) -> Self {
        Self {
            kind,
            positive_probability: 1.0,
        }
    }

    /// Always predicts label 0.
    pub fn negative(kind: ModelKind) -> Self {
        Self {
            kind,
            positive_probability: 0.0,
        }
    }
}

impl Classifier for FixedClassifier {
    fn info(&self) -> ModelInfo {
        ModelInfo {
            kind: self.kind,
            backend: "fixed".to_string(),
            objective: "binary:logistic".to_string(),
            n_features: self.n_features(),
            feature_names: expected_columns(self.kind).iter().map(|c| c.to_string()).collect(),
            n_trees: None,
            source: None,
            checksum: None,
        }
    }

    fn n_features(&self) -> usize {
        expected_columns(self.kind).len()
    }

    fn predict_proba(&self, row: &[f64]) -> ModelResult<[f64; 2]> {
        check_row_width(self.kind, self.n_features(), row)?;
        Ok([1.0 - self.positive_probability, self.positive_probability])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_probability() {
        let clf = FixedClassifier::new(ModelKind::Vacancy, 0.75).unwrap();
        let proba = clf.predict_proba(&[12.0, 0.0, 0.0, 3.0]).unwrap();
        assert_eq!(proba, [0.25, 0.75]);
        assert_eq!(clf.predict(&[12.0, 0.0, 0.0, 3.0]).unwrap(), 1);
    }

    #[test]
    fn test_threshold_is_strict() {
        let clf = FixedClassifier::new(ModelKind::Vacancy, 0.5).unwrap();
        assert_eq!(clf.predict(&[0.0; 4]).unwrap(), 0);
    }

    #[test]
    fn test_width_checked() {
        let clf = FixedClassifier::positive(ModelKind::Vehicle);
        assert!(clf.predict(&[12.0, 60.0, 0.0, 0.0, 3.0]).is_ok());
        let err = clf.predict(&[12.0, 0.0, 0.0, 3.0]).unwrap_err();
        assert!(matches!(err, ModelError::FeatureMismatch { .. }));
    }

    #[test]
    fn test_invalid_probability_rejected() {
        assert!(FixedClassifier::new(ModelKind::Vehicle, 1.5).is_err());
        assert!(FixedClassifier::new(ModelKind::Vehicle, -0.1).is_err());
    }

    #[test]
    fn test_info() {
        let info = FixedClassifier::negative(ModelKind::Vehicle).info();
        assert_eq!(info.kind, ModelKind::Vehicle);
        assert_eq!(info.n_features, 5);
        assert_eq!(info.feature_names[1], "Duration");
        assert_eq!(info.backend, "fixed");
    }
}
