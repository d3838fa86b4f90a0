//! Estimation and prediction for the Gaussian Naive Bayes classifier.
use std::collections::BTreeMap;
use std::fmt;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::ModelConfig;
use crate::error::{ClassifierError, Result};
use crate::frame::{Frame, Sample};
use crate::models::params::{ClassPriors, FeatureStats, GaussianParams, Model, BINARY_CLASSES};

/// Outcome of scoring one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Prediction {
    Class(i64),
    /// No class scored above zero.
    NoConfidentClass,
}

impl Prediction {
    pub fn class(&self) -> Option<i64> {
        match self {
            Prediction::Class(c) => Some(*c),
            Prediction::NoConfidentClass => None,
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Prediction::Class(c) => write!(f, "{}", c),
            Prediction::NoConfidentClass => write!(f, "NA"),
        }
    }
}

/// Running sums for one (feature, class) cell.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    count: usize,
    sum: f64,
    sum_sq: f64,
}

impl Accumulator {
    fn push(&mut self, value: i64) {
        let value = value as f64;
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    fn finish(&self, var_smoothing: f64) -> Option<GaussianParams> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        let mean = self.sum / n;
        // population variance; cancellation can push it slightly below zero
        let variance = (self.sum_sq / n - mean * mean).max(0.0);
        Some(GaussianParams::new(mean, variance + var_smoothing))
    }
}

/// Fit class priors and feature statistics with default settings.
pub fn fit(train: &Frame, label_column: &str) -> Result<(ClassPriors, FeatureStats)> {
    fit_with_config(train, label_column, &ModelConfig::default())
}

/// Fit class priors and per (feature, class) Gaussian parameters.
///
/// Priors cover only the classes present in `train`. Statistics are produced
/// for both labels of the binary convention; a label with no training rows
/// gets undefined (`None`) cells.
///
/// # Arguments
///
/// * `train` - Training frame including the label column
/// * `label_column` - Name of the 0/1 label column
/// * `config` - Estimation settings
pub fn fit_with_config(
    train: &Frame,
    label_column: &str,
    config: &ModelConfig,
) -> Result<(ClassPriors, FeatureStats)> {
    config.validate()?;
    let labels = train.binary_labels(label_column)?;
    let total = labels.len();

    let mut class_counts: BTreeMap<i64, usize> = BTreeMap::new();
    for &class in labels {
        *class_counts.entry(class).or_default() += 1;
    }

    let priors: ClassPriors = class_counts
        .iter()
        .map(|(&class, &count)| (class, count as f64 / total as f64))
        .collect();

    log::debug!(
        "Fitting on {} rows: class counts {:?}",
        total,
        class_counts
    );

    let features: Vec<(&str, &[i64])> = train
        .columns()
        .filter(|(name, _)| *name != label_column)
        .collect();

    // Each feature column is summed independently.
    let sums: Vec<(&str, BTreeMap<i64, Accumulator>)> = features
        .par_iter()
        .map(|&(feature, values)| {
            let mut by_class: BTreeMap<i64, Accumulator> = BTreeMap::new();
            for (&value, &class) in values.iter().zip(labels) {
                by_class.entry(class).or_default().push(value);
            }
            (feature, by_class)
        })
        .collect();

    // Each (feature, class) cell is finalised on its own task.
    let var_smoothing = config.var_smoothing;
    let jobs: Vec<(&str, &BTreeMap<i64, Accumulator>, i64)> = sums
        .iter()
        .flat_map(|(feature, by_class)| {
            BINARY_CLASSES
                .iter()
                .map(move |&class| (*feature, by_class, class))
        })
        .collect();

    let cells: Vec<(&str, i64, Option<GaussianParams>)> = jobs
        .into_par_iter()
        .map(|(feature, by_class, class)| {
            let params = by_class
                .get(&class)
                .and_then(|acc| acc.finish(var_smoothing));
            match params {
                Some(p) => log::debug!(
                    "Class {}, Feature {}: Mean = {:.2}, Variance = {:.2}",
                    class,
                    feature,
                    p.mean,
                    p.variance
                ),
                None => log::debug!(
                    "Class {}, Feature {}: no training rows, statistics undefined",
                    class,
                    feature
                ),
            }
            (feature, class, params)
        })
        .collect();

    Ok((priors, cells.into_iter().collect()))
}

/// Score every class in `priors` and return the most likely one.
///
/// The score of a class is its prior multiplied by the Gaussian density of
/// each feature in `sample`. A class must score strictly above zero and
/// strictly above every earlier class (ascending label order) to win.
///
/// # Errors
///
/// * `UnknownFeature` if a sample feature has no statistics
/// * `UndefinedStatistics` if a scored class has an undefined cell
/// * `ZeroVariance` if a scored class has a zero-variance cell
pub fn predict(sample: &Sample, priors: &ClassPriors, stats: &FeatureStats) -> Result<Prediction> {
    let mut best: Option<(i64, f64)> = None;

    for (class, prior) in priors.iter() {
        let mut score = prior;
        for (feature, &value) in sample {
            let params = stats.lookup(feature, class)?;
            score *= params.likelihood(value as f64, feature, class)?;
        }
        log::trace!("Class {}: score = {:.6e}", class, score);

        let best_score = best.map_or(0.0, |(_, s)| s);
        if score > best_score {
            best = Some((class, score));
        }
    }

    let prediction = match best {
        Some((class, _)) => Prediction::Class(class),
        None => Prediction::NoConfidentClass,
    };
    log::trace!("Predicted class: {}", prediction);
    Ok(prediction)
}

/// Fail with `MissingColumn` unless `frame` has every fitted feature as a
/// non-label column.
pub fn check_features(frame: &Frame, label_column: &str, stats: &FeatureStats) -> Result<()> {
    for feature in stats.features() {
        if feature == label_column || frame.column(feature).is_none() {
            return Err(ClassifierError::MissingColumn(feature.to_string()));
        }
    }
    Ok(())
}

impl Model {
    /// Fit a model on `train`.
    pub fn fit(train: &Frame, label_column: &str, config: &ModelConfig) -> Result<Self> {
        let (priors, stats) = fit_with_config(train, label_column, config)?;
        Ok(Model::new(priors, stats))
    }

    pub fn predict(&self, sample: &Sample) -> Result<Prediction> {
        predict(sample, &self.priors, &self.stats)
    }

    /// Predict every row of `frame`, ignoring `label_column` if present.
    pub fn predict_frame(&self, frame: &Frame, label_column: &str) -> Result<Vec<Prediction>> {
        check_features(frame, label_column, &self.stats)?;
        (0..frame.nrows())
            .map(|i| self.predict(&frame.row(i, label_column)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn age_frame() -> Frame {
        Frame::from_columns(vec![
            ("age", vec![25, 30, 70, 72]),
            ("class", vec![0, 0, 1, 1]),
        ])
        .unwrap()
    }

    fn sample(pairs: &[(&str, i64)]) -> Sample {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn fit_matches_hand_computed_statistics() {
        let (priors, stats) = fit(&age_frame(), "class").unwrap();

        assert!((priors.get(0).unwrap() - 0.5).abs() < 1e-12);
        assert!((priors.get(1).unwrap() - 0.5).abs() < 1e-12);

        let c0 = stats.lookup("age", 0).unwrap();
        assert!((c0.mean - 27.5).abs() < 1e-12);
        assert!((c0.variance - 6.25).abs() < 1e-12);

        let c1 = stats.lookup("age", 1).unwrap();
        assert!((c1.mean - 71.0).abs() < 1e-12);
        assert!((c1.variance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn predict_picks_closest_class() {
        let (priors, stats) = fit(&age_frame(), "class").unwrap();
        let prediction = predict(&sample(&[("age", 71)]), &priors, &stats).unwrap();
        assert_eq!(prediction, Prediction::Class(1));

        let prediction = predict(&sample(&[("age", 28)]), &priors, &stats).unwrap();
        assert_eq!(prediction, Prediction::Class(0));
    }

    #[test]
    fn priors_sum_to_one() {
        let frame = Frame::from_columns(vec![
            ("x", vec![1, 2, 3, 4, 5, 6, 7]),
            ("class", vec![0, 1, 1, 0, 1, 1, 1]),
        ])
        .unwrap();
        let (priors, _) = fit(&frame, "class").unwrap();
        assert!((priors.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn absent_class_has_no_prior_and_undefined_stats() {
        let frame =
            Frame::from_columns(vec![("x", vec![1, 2, 3]), ("class", vec![0, 0, 0])]).unwrap();
        let (priors, stats) = fit(&frame, "class").unwrap();

        assert_eq!(priors.len(), 1);
        assert!(priors.get(1).is_none());
        assert_eq!(stats.get("x", 1), Some(None));
        assert!(stats.get("x", 0).unwrap().is_some());
    }

    #[test]
    fn empty_training_frame_gives_empty_model() {
        let frame = Frame::from_columns(vec![("x", vec![]), ("class", vec![])]).unwrap();
        let (priors, stats) = fit(&frame, "class").unwrap();
        assert!(priors.is_empty());
        assert!(stats.iter().all(|(_, _, p)| p.is_none()));

        let prediction = predict(&sample(&[("x", 1)]), &priors, &stats).unwrap();
        assert_eq!(prediction, Prediction::NoConfidentClass);
    }

    #[test]
    fn fit_rejects_non_binary_labels() {
        let frame = Frame::from_columns(vec![("x", vec![1, 2]), ("class", vec![0, 3])]).unwrap();
        let err = fit(&frame, "class").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn fit_rejects_missing_label_column() {
        let frame = Frame::from_columns(vec![("x", vec![1, 2])]).unwrap();
        assert!(matches!(
            fit(&frame, "class"),
            Err(ClassifierError::MissingColumn(_))
        ));
    }

    #[test]
    fn zero_variance_is_a_model_quality_error() {
        let frame = Frame::from_columns(vec![
            ("flag", vec![1, 1, 0, 1]),
            ("class", vec![0, 0, 1, 1]),
        ])
        .unwrap();
        let (priors, stats) = fit(&frame, "class").unwrap();
        assert_eq!(stats.lookup("flag", 0).unwrap().variance, 0.0);

        let err = predict(&sample(&[("flag", 0)]), &priors, &stats).unwrap_err();
        assert!(matches!(err, ClassifierError::ZeroVariance { class: 0, .. }));
        assert_eq!(err.kind(), ErrorKind::ModelQuality);
    }

    #[test]
    fn smoothing_keeps_zero_variance_cells_usable() {
        let frame = Frame::from_columns(vec![
            ("flag", vec![1, 1, 0, 1]),
            ("class", vec![0, 0, 1, 1]),
        ])
        .unwrap();
        let model = Model::fit(&frame, "class", &ModelConfig::new(1e-3)).unwrap();
        let prediction = model.predict(&sample(&[("flag", 1)])).unwrap();
        assert_eq!(prediction, Prediction::Class(0));
    }

    #[test]
    fn unknown_feature_is_malformed_input() {
        let (priors, stats) = fit(&age_frame(), "class").unwrap();
        let err = predict(&sample(&[("height", 180)]), &priors, &stats).unwrap_err();
        assert!(matches!(err, ClassifierError::UnknownFeature(_)));
    }

    #[test]
    fn underflowing_scores_report_no_confident_class() {
        let (priors, stats) = fit(&age_frame(), "class").unwrap();
        let prediction = predict(&sample(&[("age", 100_000)]), &priors, &stats).unwrap();
        assert_eq!(prediction, Prediction::NoConfidentClass);
        assert_eq!(prediction.class(), None);
        assert_eq!(prediction.to_string(), "NA");
    }

    #[test]
    fn ties_keep_the_lower_label() {
        let mut stats = FeatureStats::new();
        stats.insert("x", 0, Some(GaussianParams::new(0.0, 1.0)));
        stats.insert("x", 1, Some(GaussianParams::new(0.0, 1.0)));
        let priors: ClassPriors = vec![(0, 0.5), (1, 0.5)].into_iter().collect();

        let prediction = predict(&sample(&[("x", 0)]), &priors, &stats).unwrap();
        assert_eq!(prediction, Prediction::Class(0));
    }

    #[test]
    fn predict_frame_skips_label_column() {
        let model = Model::fit(&age_frame(), "class", &ModelConfig::default()).unwrap();
        let predictions = model.predict_frame(&age_frame(), "class").unwrap();
        assert_eq!(
            predictions,
            vec![
                Prediction::Class(0),
                Prediction::Class(0),
                Prediction::Class(1),
                Prediction::Class(1)
            ]
        );
    }

    #[test]
    fn predict_frame_requires_every_fitted_feature() {
        let train = Frame::from_columns(vec![
            ("age", vec![25, 30, 70, 72]),
            ("bmi", vec![20, 22, 31, 29]),
            ("class", vec![0, 0, 1, 1]),
        ])
        .unwrap();
        let model = Model::fit(&train, "class", &ModelConfig::default()).unwrap();

        let without_bmi = age_frame();
        let err = model.predict_frame(&without_bmi, "class").unwrap_err();
        assert!(matches!(err, ClassifierError::MissingColumn(ref name) if name == "bmi"));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);

        // the label column may be absent at prediction time
        let unlabelled = Frame::from_columns(vec![("age", vec![71]), ("bmi", vec![30])]).unwrap();
        assert_eq!(
            model.predict_frame(&unlabelled, "class").unwrap(),
            vec![Prediction::Class(1)]
        );
    }
}
