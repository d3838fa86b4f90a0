//! Apply a saved model to every row of a dataset.
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};

use bayes_classifiers::io::{load_model, read_frame_with_config, write_predictions, ReaderConfig};
use bayes_classifiers::models::Prediction;

use crate::config::TrainConfig;
use crate::util::ensure_parent_dir;

/// Predict each row and write the dataset plus a `prediction` column.
///
/// The label column, when present, is not used as a feature. Output goes to
/// `output` or to stdout.
pub fn run_prediction(config: &TrainConfig, output: Option<&Path>) -> Result<Vec<Prediction>> {
    let model = load_model(&config.model_path)
        .with_context(|| format!("Failed to load model: {}", config.model_path))?;
    let frame = read_frame_with_config(&config.data, &ReaderConfig::default(), &config.labeller)?;

    let predictions = model
        .predict_frame(&frame, &config.label_column)
        .context("Failed to predict dataset rows")?;

    match output {
        Some(path) => {
            ensure_parent_dir(path)?;
            let file = File::create(path)
                .with_context(|| format!("Failed to create output: {}", path.display()))?;
            write_predictions(BufWriter::new(file), &frame, &predictions)?;
            log::info!("Wrote {} predictions to {}", predictions.len(), path.display());
        }
        None => write_predictions(io::stdout().lock(), &frame, &predictions)?,
    }

    Ok(predictions)
}
