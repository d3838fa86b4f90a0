//! JSON persistence of a fitted `Model`.
//!
//! The record keeps the layout of earlier model files:
//!
//! ```json
//! {
//!   "ClassProbabilities": { "0": 0.6, "1": 0.4 },
//!   "FeatureStats": { "Age": { "0": { "mean": 46.1, "variance": 143.2 } } }
//! }
//! ```
//!
//! Undefined cells are written as a zero mean and zero variance, so a loaded
//! model never contains undefined cells. Extra keys per cell (such as running
//! sums) are ignored when loading.
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{ClassPriors, FeatureStats, GaussianParams, Model};

#[derive(Debug, Serialize, Deserialize)]
struct ModelRecord {
    #[serde(rename = "ClassProbabilities")]
    class_probabilities: BTreeMap<i64, f64>,
    #[serde(rename = "FeatureStats")]
    feature_stats: BTreeMap<String, BTreeMap<i64, GaussianParams>>,
}

impl From<&Model> for ModelRecord {
    fn from(model: &Model) -> Self {
        let mut feature_stats: BTreeMap<String, BTreeMap<i64, GaussianParams>> = BTreeMap::new();
        for (feature, class, params) in model.stats.iter() {
            feature_stats
                .entry(feature.to_string())
                .or_default()
                .insert(class, params.unwrap_or(GaussianParams::new(0.0, 0.0)));
        }

        ModelRecord {
            class_probabilities: model.priors.iter().collect(),
            feature_stats,
        }
    }
}

impl From<ModelRecord> for Model {
    fn from(record: ModelRecord) -> Self {
        let priors: ClassPriors = record.class_probabilities.into_iter().collect();
        let mut stats = FeatureStats::new();
        for (feature, by_class) in &record.feature_stats {
            for (&class, &params) in by_class {
                stats.insert(feature, class, Some(params));
            }
        }
        Model::new(priors, stats)
    }
}

pub fn to_json(model: &Model) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ModelRecord::from(model))?)
}

pub fn from_json(json: &str) -> Result<Model> {
    let record: ModelRecord = serde_json::from_str(json)?;
    Ok(record.into())
}

/// Write `model` to `path` as pretty-printed JSON.
pub fn save_model<P: AsRef<Path>>(path: P, model: &Model) -> Result<()> {
    let json = to_json(model)?;
    fs::write(path.as_ref(), json)?;
    log::info!("Saved model to {}", path.as_ref().display());
    Ok(())
}

/// Read a model written by [`save_model`].
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Model> {
    let json = fs::read_to_string(path.as_ref())?;
    let model = from_json(&json)?;
    log::info!(
        "Loaded model from {} ({} classes)",
        path.as_ref().display(),
        model.priors.len()
    );
    Ok(model)
}
