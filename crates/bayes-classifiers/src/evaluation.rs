//! Confusion-matrix evaluation of a fitted model on a held-out frame.
//!
//! Label `1` is the positive class and `0` the negative class. Metrics whose
//! denominator is zero are reported as `None` rather than 0 or `NaN`, so a
//! caller can always tell "undefined" apart from "exactly zero".
use serde::Serialize;

use crate::error::{ClassifierError, Result};
use crate::frame::Frame;
use crate::models::{
    check_features, predict, ClassPriors, FeatureStats, Model, Prediction, POSITIVE_CLASS,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionCounts {
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
    /// Rows where the predictor reported no confident class.
    pub abstained: usize,
}

impl ConfusionCounts {
    pub fn new(tp: usize, tn: usize, fp: usize, fn_: usize) -> Self {
        Self {
            tp,
            tn,
            fp,
            fn_,
            abstained: 0,
        }
    }

    /// Every evaluated row, abstentions included.
    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_ + self.abstained
    }

    /// Record one outcome. Both labels must already be known to be 0 or 1.
    fn record(&mut self, truth: i64, predicted: Option<i64>) {
        let Some(predicted) = predicted else {
            self.abstained += 1;
            return;
        };
        match (predicted == POSITIVE_CLASS, truth == POSITIVE_CLASS) {
            (true, true) => self.tp += 1,
            (false, false) => self.tn += 1,
            (true, false) => self.fp += 1,
            (false, true) => self.fn_ += 1,
        }
    }
}

/// Derived classification metrics; `None` marks an undefined value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub accuracy: Option<f64>,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f1: Option<f64>,
}

impl Metrics {
    pub fn from_counts(counts: &ConfusionCounts) -> Self {
        let ratio = |num: usize, den: usize| {
            if den == 0 {
                None
            } else {
                Some(num as f64 / den as f64)
            }
        };

        let accuracy = ratio(counts.tp + counts.tn, counts.total());
        let precision = ratio(counts.tp, counts.tp + counts.fp);
        let recall = ratio(counts.tp, counts.tp + counts.fn_);
        let f1 = match (precision, recall) {
            (Some(p), Some(r)) if p + r > 0.0 => Some(2.0 * p * r / (p + r)),
            _ => None,
        };

        Metrics {
            accuracy,
            precision,
            recall,
            f1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub counts: ConfusionCounts,
    pub metrics: Metrics,
}

/// Predict every row of `test` in order and tally the outcomes.
///
/// # Arguments
///
/// * `test` - Held-out frame including the label column
/// * `label_column` - Name of the 0/1 label column
/// * `priors` - Fitted class priors
/// * `stats` - Fitted feature statistics
///
/// # Errors
///
/// Fails on a missing or non-binary label column, on a fitted feature absent
/// from `test`, on any prediction error
/// (unknown feature, zero variance, undefined statistics), and when the
/// model predicts a label outside 0/1.
pub fn evaluate(
    test: &Frame,
    label_column: &str,
    priors: &ClassPriors,
    stats: &FeatureStats,
) -> Result<Evaluation> {
    let labels = test.binary_labels(label_column)?;
    check_features(test, label_column, stats)?;
    let mut counts = ConfusionCounts::default();

    for (row, &truth) in labels.iter().enumerate() {
        let sample = test.row(row, label_column);
        let prediction = predict(&sample, priors, stats)?;

        if let Prediction::Class(class) = prediction {
            if class != 0 && class != 1 {
                return Err(ClassifierError::NonBinaryLabel {
                    column: "prediction".to_string(),
                    row,
                    value: class,
                });
            }
        }
        counts.record(truth, prediction.class());
    }

    let metrics = Metrics::from_counts(&counts);
    log::info!(
        "Evaluated {} rows: TP={} TN={} FP={} FN={} abstained={}",
        counts.total(),
        counts.tp,
        counts.tn,
        counts.fp,
        counts.fn_,
        counts.abstained
    );

    Ok(Evaluation { counts, metrics })
}

impl Model {
    pub fn evaluate(&self, test: &Frame, label_column: &str) -> Result<Evaluation> {
        evaluate(test, label_column, &self.priors, &self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{fit, GaussianParams};

    #[test]
    fn metrics_from_reference_counts() {
        let counts = ConfusionCounts::new(8, 10, 2, 0);
        let m = Metrics::from_counts(&counts);
        assert!((m.accuracy.unwrap() - 0.9).abs() < 1e-12);
        assert!((m.precision.unwrap() - 0.8).abs() < 1e-12);
        assert!((m.recall.unwrap() - 1.0).abs() < 1e-12);
        assert!((m.f1.unwrap() - 0.888_888_888_9).abs() < 1e-9);
    }

    #[test]
    fn undefined_precision_propagates_to_f1() {
        // never predicted positive
        let m = Metrics::from_counts(&ConfusionCounts::new(0, 5, 0, 3));
        assert_eq!(m.precision, None);
        assert_eq!(m.recall, Some(0.0));
        assert_eq!(m.f1, None);
        assert!((m.accuracy.unwrap() - 0.625).abs() < 1e-12);
    }

    #[test]
    fn zero_precision_and_recall_leave_f1_undefined() {
        let m = Metrics::from_counts(&ConfusionCounts::new(0, 1, 2, 3));
        assert_eq!(m.precision, Some(0.0));
        assert_eq!(m.recall, Some(0.0));
        assert_eq!(m.f1, None);
    }

    #[test]
    fn empty_counts_are_all_undefined() {
        let m = Metrics::from_counts(&ConfusionCounts::default());
        assert_eq!(m, Metrics::default());
    }

    #[test]
    fn evaluate_counts_each_row_once() {
        let train = Frame::from_columns(vec![
            ("age", vec![25, 30, 70, 72]),
            ("class", vec![0, 0, 1, 1]),
        ])
        .unwrap();
        let (priors, stats) = fit(&train, "class").unwrap();

        let test = Frame::from_columns(vec![
            ("age", vec![26, 71, 29, 69, 31]),
            ("class", vec![0, 1, 1, 0, 0]),
        ])
        .unwrap();
        let eval = evaluate(&test, "class", &priors, &stats).unwrap();

        assert_eq!(eval.counts, ConfusionCounts::new(1, 2, 1, 1));
        assert_eq!(eval.counts.total(), 5);
        assert!((eval.metrics.accuracy.unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn abstentions_count_against_accuracy() {
        let train = Frame::from_columns(vec![
            ("age", vec![25, 30, 70, 72]),
            ("class", vec![0, 0, 1, 1]),
        ])
        .unwrap();
        let model = Model::fit(&train, "class", &Default::default()).unwrap();
        let test =
            Frame::from_columns(vec![("age", vec![71, 1_000_000]), ("class", vec![1, 1])]).unwrap();

        let eval = model.evaluate(&test, "class").unwrap();
        assert_eq!(eval.counts.tp, 1);
        assert_eq!(eval.counts.abstained, 1);
        assert_eq!(eval.metrics.accuracy, Some(0.5));
    }

    #[test]
    fn evaluate_rejects_predicted_label_outside_convention() {
        let mut stats = FeatureStats::new();
        stats.insert("x", 2, Some(GaussianParams::new(0.0, 1.0)));
        let priors: ClassPriors = vec![(2, 1.0)].into_iter().collect();
        let test = Frame::from_columns(vec![("x", vec![0]), ("class", vec![1])]).unwrap();

        assert!(matches!(
            evaluate(&test, "class", &priors, &stats),
            Err(ClassifierError::NonBinaryLabel { .. })
        ));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let train = Frame::from_columns(vec![
            ("a", vec![1, 2, 3, 8, 9, 10, 2, 9]),
            ("b", vec![5, 4, 6, 1, 0, 2, 5, 1]),
            ("class", vec![0, 0, 0, 1, 1, 1, 0, 1]),
        ])
        .unwrap();
        let (priors, stats) = fit(&train, "class").unwrap();

        let first = evaluate(&train, "class", &priors, &stats).unwrap();
        for _ in 0..5 {
            assert_eq!(evaluate(&train, "class", &priors, &stats).unwrap(), first);
        }
    }

    #[test]
    fn evaluate_rejects_frame_missing_a_fitted_feature() {
        let train = Frame::from_columns(vec![
            ("age", vec![25, 30, 70, 72]),
            ("bmi", vec![20, 22, 31, 29]),
            ("class", vec![0, 0, 1, 1]),
        ])
        .unwrap();
        let (priors, stats) = fit(&train, "class").unwrap();
        let test = Frame::from_columns(vec![("age", vec![26, 71]), ("class", vec![0, 1])]).unwrap();

        let err = evaluate(&test, "class", &priors, &stats).unwrap_err();
        assert!(matches!(err, ClassifierError::MissingColumn(ref name) if name == "bmi"));
        assert_eq!(err.kind(), crate::error::ErrorKind::MalformedInput);
    }
}
