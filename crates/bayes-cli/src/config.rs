//! Run configuration shared by every subcommand.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use bayes_classifiers::config::ModelConfig;
use bayes_classifiers::preprocessing::BinaryLabeller;
use bayes_classifiers::report::ReportStyle;

use crate::util::validate_tsv_or_csv_file;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Delimited dataset with a header row.
    pub data: String,
    pub label_column: String,
    /// Fraction of rows held out for evaluation.
    pub test_ratio: f64,
    /// The model is saved only when test accuracy is strictly above this.
    pub accuracy_threshold: f64,
    pub model_path: String,
    /// Fixes the train/test permutation when set.
    pub seed: Option<u64>,
    pub model: ModelConfig,
    pub labeller: BinaryLabeller,
    pub colored: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data: String::from("data/diabetes_data_upload.csv"),
            label_column: String::from("class"),
            test_ratio: 0.2,
            accuracy_threshold: 0.85,
            model_path: String::from("model.json"),
            seed: None,
            model: ModelConfig::default(),
            labeller: BinaryLabeller::default(),
            colored: true,
        }
    }
}

impl TrainConfig {
    /// Build the config from an optional JSON file, then apply CLI overrides.
    pub fn from_arguments(config_path: Option<&Path>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => load_train_config(path)?,
            None => TrainConfig::default(),
        };
        config.apply_overrides(matches)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, matches: &ArgMatches) -> Result<()> {
        if let Ok(Some(data)) = matches.try_get_one::<String>("data") {
            self.data = data.clone();
        }
        validate_tsv_or_csv_file(&self.data)?;

        if let Ok(Some(label)) = matches.try_get_one::<String>("label") {
            self.label_column = label.clone();
        }
        if let Ok(Some(model_path)) = matches.try_get_one::<String>("model_path") {
            self.model_path = model_path.clone();
        }
        if let Ok(Some(ratio)) = matches.try_get_one::<f64>("test_ratio") {
            self.test_ratio = *ratio;
        }
        if let Ok(Some(threshold)) = matches.try_get_one::<f64>("threshold") {
            self.accuracy_threshold = *threshold;
        }
        if let Ok(Some(seed)) = matches.try_get_one::<u64>("seed") {
            self.seed = Some(*seed);
        }
        if let Ok(Some(smoothing)) = matches.try_get_one::<f64>("var_smoothing") {
            self.model.var_smoothing = *smoothing;
        }
        if matches!(matches.try_get_one::<bool>("no_color"), Ok(Some(true))) {
            self.colored = false;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.test_ratio) {
            anyhow::bail!("test_ratio must be within [0, 1], got {}", self.test_ratio);
        }
        if !(0.0..=1.0).contains(&self.accuracy_threshold) {
            anyhow::bail!(
                "accuracy_threshold must be within [0, 1], got {}",
                self.accuracy_threshold
            );
        }
        self.model.validate()?;
        Ok(())
    }

    pub fn report_style(&self) -> ReportStyle {
        if self.colored {
            ReportStyle::Colored
        } else {
            ReportStyle::Plain
        }
    }
}

/// Load a run configuration from a JSON file.
pub fn load_train_config<P: AsRef<Path>>(path: P) -> Result<TrainConfig> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: TrainConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}
