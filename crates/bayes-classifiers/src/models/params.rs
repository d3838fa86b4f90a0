//! Fitted parameters of the Gaussian Naive Bayes model.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};

/// Label treated as the negative class.
pub const NEGATIVE_CLASS: i64 = 0;
/// Label treated as the positive class.
pub const POSITIVE_CLASS: i64 = 1;
/// Every label allowed under the two-label convention.
pub const BINARY_CLASSES: [i64; 2] = [NEGATIVE_CLASS, POSITIVE_CLASS];

/// Mean and population variance of one feature within one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianParams {
    pub mean: f64,
    pub variance: f64,
}

impl GaussianParams {
    pub fn new(mean: f64, variance: f64) -> Self {
        Self { mean, variance }
    }

    /// Density at `x`, refusing parameters that cannot form a distribution.
    pub fn likelihood(&self, x: f64, feature: &str, class: i64) -> Result<f64> {
        if !self.mean.is_finite() || !self.variance.is_finite() {
            return Err(ClassifierError::UndefinedStatistics {
                feature: feature.to_string(),
                class,
            });
        }
        if self.variance <= 0.0 {
            return Err(ClassifierError::ZeroVariance {
                feature: feature.to_string(),
                class,
            });
        }
        Ok(gaussian_density(x, self.mean, self.variance))
    }
}

/// Normal probability density `1/sqrt(2*pi*var) * exp(-(x-mean)^2 / (2*var))`.
///
/// No validation is done here; a zero variance yields `inf` or `NaN`.
/// Prediction goes through [`GaussianParams::likelihood`] instead.
pub fn gaussian_density(x: f64, mean: f64, variance: f64) -> f64 {
    let exponent = (-(x - mean).powi(2) / (2.0 * variance)).exp();
    exponent / (2.0 * std::f64::consts::PI * variance).sqrt()
}

/// Class label to prior probability, ordered by label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassPriors(BTreeMap<i64, f64>);

impl ClassPriors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class: i64, probability: f64) {
        self.0.insert(class, probability);
    }

    pub fn get(&self, class: i64) -> Option<f64> {
        self.0.get(&class).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.0.iter().map(|(&c, &p)| (c, p))
    }

    pub fn classes(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

impl FromIterator<(i64, f64)> for ClassPriors {
    fn from_iter<I: IntoIterator<Item = (i64, f64)>>(iter: I) -> Self {
        ClassPriors(iter.into_iter().collect())
    }
}

/// Per feature, per class Gaussian parameters.
///
/// A `None` cell marks a class that had no training rows: its mean and
/// variance are undefined and must not be used for prediction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureStats {
    cells: BTreeMap<String, BTreeMap<i64, Option<GaussianParams>>>,
}

impl FeatureStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, feature: &str, class: i64, params: Option<GaussianParams>) {
        self.cells
            .entry(feature.to_string())
            .or_default()
            .insert(class, params);
    }

    /// Raw cell access; the outer `Option` is `None` when no cell exists.
    pub fn get(&self, feature: &str, class: i64) -> Option<Option<GaussianParams>> {
        self.cells
            .get(feature)
            .and_then(|by_class| by_class.get(&class))
            .copied()
    }

    /// Parameters to use for prediction, or the reason none are usable.
    pub fn lookup(&self, feature: &str, class: i64) -> Result<GaussianParams> {
        let by_class = self
            .cells
            .get(feature)
            .ok_or_else(|| ClassifierError::UnknownFeature(feature.to_string()))?;

        by_class
            .get(&class)
            .copied()
            .flatten()
            .ok_or_else(|| ClassifierError::UndefinedStatistics {
                feature: feature.to_string(),
                class,
            })
    }

    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64, Option<GaussianParams>)> {
        self.cells.iter().flat_map(|(feature, by_class)| {
            by_class
                .iter()
                .map(move |(&class, &params)| (feature.as_str(), class, params))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, i64, Option<GaussianParams>)> for FeatureStats {
    fn from_iter<I: IntoIterator<Item = (&'a str, i64, Option<GaussianParams>)>>(iter: I) -> Self {
        let mut stats = FeatureStats::new();
        for (feature, class, params) in iter {
            stats.insert(feature, class, params);
        }
        stats
    }
}

/// The trained classifier: class priors plus feature statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub priors: ClassPriors,
    pub stats: FeatureStats,
}

impl Model {
    pub fn new(priors: ClassPriors, stats: FeatureStats) -> Self {
        Self { priors, stats }
    }
}
