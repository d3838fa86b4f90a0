//! Split, fit, evaluate, and conditionally persist a model.
use std::path::Path;

use anyhow::{Context, Result};

use bayes_classifiers::data_handling::split_seeded;
use bayes_classifiers::evaluation::Evaluation;
use bayes_classifiers::io::{load_model, read_frame_with_config, save_model, ReaderConfig};
use bayes_classifiers::models::Model;
use bayes_classifiers::report::{format_metric, render_evaluation};

use crate::config::TrainConfig;
use crate::util::ensure_parent_dir;

/// Everything a training run produced.
#[derive(Debug)]
pub struct TrainOutcome {
    pub model: Model,
    pub evaluation: Evaluation,
    /// Whether the model cleared the accuracy threshold and was written.
    pub saved: bool,
}

pub fn run_training(config: &TrainConfig) -> Result<TrainOutcome> {
    let frame = read_frame_with_config(&config.data, &ReaderConfig::default(), &config.labeller)?;
    frame
        .binary_labels(&config.label_column)
        .context("Dataset label column is not usable")?;

    let split = split_seeded(&frame, config.test_ratio, config.seed)?;
    log::info!(
        "Training on {} rows, evaluating on {} rows",
        split.train.nrows(),
        split.test.nrows()
    );
    if split.train.is_empty() {
        anyhow::bail!("Training set is empty; lower test_ratio ({})", config.test_ratio);
    }
    if split.test.is_empty() {
        log::warn!("Test set is empty; accuracy will be undefined and the model will not be saved");
    }

    let model = Model::fit(&split.train, &config.label_column, &config.model)
        .context("Failed to fit model")?;
    let evaluation = model
        .evaluate(&split.test, &config.label_column)
        .context("Failed to evaluate model")?;

    print!("{}", render_evaluation(&evaluation, config.report_style()));

    let saved = match evaluation.metrics.accuracy {
        Some(accuracy) if accuracy > config.accuracy_threshold => {
            ensure_parent_dir(Path::new(&config.model_path))?;
            save_model(&config.model_path, &model)
                .with_context(|| format!("Failed to save model to {}", config.model_path))?;
            true
        }
        accuracy => {
            log::warn!(
                "Accuracy {} does not exceed threshold {:.2}; model not saved",
                format_metric(accuracy),
                config.accuracy_threshold
            );
            false
        }
    };

    match evaluation.metrics.accuracy {
        Some(accuracy) => println!("Model accuracy: {:.2}%", accuracy * 100.0),
        None => println!("Model accuracy: undefined"),
    }

    Ok(TrainOutcome {
        model,
        evaluation,
        saved,
    })
}

/// Load the model at `config.model_path`, training a new one if it is missing.
pub fn load_or_train(config: &TrainConfig) -> Result<Model> {
    if Path::new(&config.model_path).exists() {
        log::info!("Model found. Loading {}", config.model_path);
        let model = load_model(&config.model_path)
            .with_context(|| format!("Failed to load model: {}", config.model_path))?;
        Ok(model)
    } else {
        log::info!("Model not found. Training the model...");
        Ok(run_training(config)?.model)
    }
}
