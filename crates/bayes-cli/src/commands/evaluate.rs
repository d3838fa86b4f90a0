//! Score a saved model against a whole labelled dataset.
use anyhow::{Context, Result};

use bayes_classifiers::evaluation::Evaluation;
use bayes_classifiers::io::{load_model, read_frame_with_config, ReaderConfig};
use bayes_classifiers::report::render_evaluation;

use crate::config::TrainConfig;

pub fn run_evaluation(config: &TrainConfig) -> Result<Evaluation> {
    let model = load_model(&config.model_path)
        .with_context(|| format!("Failed to load model: {}", config.model_path))?;
    let frame = read_frame_with_config(&config.data, &ReaderConfig::default(), &config.labeller)?;

    let evaluation = model
        .evaluate(&frame, &config.label_column)
        .context("Failed to evaluate model")?;
    print!("{}", render_evaluation(&evaluation, config.report_style()));
    Ok(evaluation)
}
