//! Hold-out evaluation of a classifier on a prepared test table.
//!
//! Produces accuracy, per-class precision/recall/F1 and the confusion matrix,
//! the same summary printed after retraining.

use serde::Serialize;
use std::fmt;

use super::dataset::LabeledSample;
use crate::classifier::{Classifier, ModelResult};
use crate::models::{ModelKind, VacancyStatus, VehicleType};

/// Metrics for one class label.
///
/// # Fields
///
/// * `label` - Numeric class label (0 or 1)
/// * `name` - Human-readable class name
/// * `precision` - TP / (TP + FP), 0 when nothing was predicted for the class
/// * `recall` - TP / (TP + FN), 0 when the class has no support
/// * `f1` - Harmonic mean of precision and recall
/// * `support` - Number of samples whose true label is this class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: u8,
    pub name: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub kind: ModelKind,
    pub samples: usize,
    pub accuracy: f64,
    pub classes: [ClassMetrics; 2],
    /// `confusion[actual][predicted]`
    pub confusion: [[usize; 2]; 2],
}

fn class_name(kind: ModelKind, label: u8) -> String {
    match kind {
        ModelKind::Vacancy => VacancyStatus::from_label(label).to_string(),
        ModelKind::Vehicle => VehicleType::from_label(label).to_string(),
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Build a report from paired true and predicted labels.
///
/// Labels other than 0/1 are counted as 1. An empty input yields accuracy 0.
pub fn report_from_predictions(kind: ModelKind, actual: &[u8], predicted: &[u8]) -> EvaluationReport {
    let mut confusion = [[0usize; 2]; 2];
    for (&a, &p) in actual.iter().zip(predicted) {
        confusion[usize::from(a.min(1))][usize::from(p.min(1))] += 1;
    }

    let samples = confusion.iter().flatten().sum();
    let correct = confusion[0][0] + confusion[1][1];

    let class = |label: u8| {
        let l = usize::from(label);
        let tp = confusion[l][l];
        let predicted_as = confusion[0][l] + confusion[1][l];
        let support = confusion[l][0] + confusion[l][1];
        let precision = ratio(tp, predicted_as);
        let recall = ratio(tp, support);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        ClassMetrics {
            label,
            name: class_name(kind, label),
            precision,
            recall,
            f1,
            support,
        }
    };

    EvaluationReport {
        kind,
        samples,
        accuracy: ratio(correct, samples),
        classes: [class(0), class(1)],
        confusion,
    }
}

/// Run `model` over every sample and score the predictions.
pub fn evaluate(model: &dyn Classifier, samples: &[LabeledSample]) -> ModelResult<EvaluationReport> {
    let predicted = samples
        .iter()
        .map(|s| model.predict(&s.row))
        .collect::<ModelResult<Vec<u8>>>()?;
    let actual: Vec<u8> = samples.iter().map(|s| s.label).collect();

    let report = report_from_predictions(model.info().kind, &actual, &predicted);
    log::info!(
        "Evaluated {} model on {} samples: accuracy {:.4}",
        report.kind,
        report.samples,
        report.accuracy
    );
    Ok(report)
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} model: {} samples", self.kind, self.samples)?;
        writeln!(f, "Accuracy: {:.4}", self.accuracy)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                c.name, c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Confusion matrix (rows = actual, columns = predicted):")?;
        for row in &self.confusion {
            writeln!(f, "  {:>8} {:>8}", row[0], row[1])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FixedClassifier;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_report_counts() {
        let actual = [1, 1, 1, 0, 0, 0, 0, 0];
        let predicted = [1, 1, 0, 0, 0, 0, 1, 0];
        let report = report_from_predictions(ModelKind::Vacancy, &actual, &predicted);

        assert_eq!(report.samples, 8);
        assert_eq!(report.confusion, [[4, 1], [1, 2]]);
        assert!(close(report.accuracy, 0.75));

        let vacant = &report.classes[1];
        assert_eq!(vacant.name, "Vacant");
        assert_eq!(vacant.support, 3);
        assert!(close(vacant.precision, 2.0 / 3.0));
        assert!(close(vacant.recall, 2.0 / 3.0));
        assert!(close(vacant.f1, 2.0 / 3.0));

        let occupied = &report.classes[0];
        assert_eq!(occupied.support, 5);
        assert!(close(occupied.precision, 0.8));
        assert!(close(occupied.recall, 0.8));
    }

    #[test]
    fn test_empty_input() {
        let report = report_from_predictions(ModelKind::Vehicle, &[], &[]);
        assert_eq!(report.samples, 0);
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.classes[0].f1, 0.0);
    }

    #[test]
    fn test_unpredicted_class_has_zero_precision() {
        let report = report_from_predictions(ModelKind::Vehicle, &[0, 1, 1], &[0, 0, 0]);
        assert_eq!(report.classes[1].precision, 0.0);
        assert_eq!(report.classes[1].f1, 0.0);
        assert_eq!(report.classes[1].name, "Two Wheeler");
    }

    #[test]
    fn test_evaluate_with_fixed_model() {
        let model = FixedClassifier::positive(ModelKind::Vacancy);
        let samples = vec![
            LabeledSample { row: vec![1.0, 0.0, 0.0, 0.0], label: 1 },
            LabeledSample { row: vec![12.0, 2.0, 0.0, 3.0], label: 0 },
        ];
        let report = evaluate(&model, &samples).unwrap();
        assert_eq!(report.kind, ModelKind::Vacancy);
        assert!(close(report.accuracy, 0.5));
        assert_eq!(report.confusion, [[0, 1], [0, 1]]);
    }

    #[test]
    fn test_evaluate_rejects_wrong_width() {
        let model = FixedClassifier::positive(ModelKind::Vehicle);
        let samples = vec![LabeledSample { row: vec![1.0, 0.0, 0.0, 0.0], label: 1 }];
        assert!(evaluate(&model, &samples).is_err());
    }

    #[test]
    fn test_display_lists_classes() {
        let report = report_from_predictions(ModelKind::Vacancy, &[0, 1], &[0, 1]);
        let text = report.to_string();
        assert!(text.contains("Accuracy: 1.0000"));
        assert!(text.contains("Occupied"));
        assert!(text.contains("Vacant"));
    }
}
