use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use bayes_cli::commands::{describe, evaluate, predict, train};
use bayes_cli::config::TrainConfig;

const DEFAULT_LOG_FILTER: &str = "error,bayes=info,bayes_cli=info,bayes_classifiers=info";

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("BAYES_LOG", DEFAULT_LOG_FILTER))
        .init();

    let matches = Command::new("bayes")
        .version(clap::crate_version!())
        .about("Gaussian Naive Bayes binary classifier for integer-coded tabular data")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("train")
                .about("Split a dataset, fit a model, evaluate it, and save it if accurate enough")
                .arg(data_arg())
                .arg(config_arg())
                .arg(label_arg())
                .arg(
                    Arg::new("model_path")
                        .short('o')
                        .long("output")
                        .help(
                            "File the trained model is written to. \
                             Overrides the configuration file.",
                        )
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("test_ratio")
                        .long("test-ratio")
                        .help("Fraction of rows held out for evaluation (default 0.2)")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("threshold")
                        .long("threshold")
                        .help("Accuracy the model must exceed to be saved (default 0.85)")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed for a reproducible train/test split")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("var_smoothing")
                        .long("var-smoothing")
                        .help("Value added to every fitted variance")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(no_color_arg()),
        )
        .subcommand(
            Command::new("evaluate")
                .about("Evaluate a saved model against a labelled dataset")
                .arg(data_arg())
                .arg(config_arg())
                .arg(label_arg())
                .arg(model_arg())
                .arg(no_color_arg()),
        )
        .subcommand(
            Command::new("predict")
                .about("Predict the class of every row in a dataset with a saved model")
                .arg(data_arg())
                .arg(config_arg())
                .arg(label_arg())
                .arg(model_arg())
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path to write predictions (CSV). Defaults to stdout.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("describe")
                .about("Summarise the columns of a dataset and show its first rows")
                .arg(data_arg())
                .arg(config_arg())
                .arg(
                    Arg::new("head")
                        .long("head")
                        .help("Number of rows to show")
                        .default_value("5")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("Load the saved model, or train and save one if it does not exist yet")
                .arg(data_arg())
                .arg(config_arg())
                .arg(label_arg())
                .arg(model_arg()),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some((name, sub_m)) => dispatch(name, sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn data_arg() -> Arg {
    Arg::new("data")
        .help("Path to the dataset (*.csv or *.tsv) with a header row")
        .required(true)
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
        .value_hint(ValueHint::FilePath)
}

fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .help("Path to a JSON run configuration")
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn label_arg() -> Arg {
    Arg::new("label")
        .short('l')
        .long("label")
        .help("Name of the 0/1 label column (default \"class\")")
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
}

fn model_arg() -> Arg {
    Arg::new("model_path")
        .short('m')
        .long("model")
        .help("Path to the saved model (*.json)")
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
        .value_hint(ValueHint::FilePath)
}

fn no_color_arg() -> Arg {
    Arg::new("no_color")
        .long("no-color")
        .help("Disable ANSI colours in the report")
        .action(ArgAction::SetTrue)
}

fn dispatch(name: &str, matches: &ArgMatches) -> Result<()> {
    let config_path = matches.get_one::<PathBuf>("config");
    let config = TrainConfig::from_arguments(config_path.map(|p| p.as_path()), matches)?;

    if config_path.is_none() {
        let default_json = serde_json::to_string_pretty(&config).unwrap_or_default();
        log::debug!("No config provided; effective config:\n{}", default_json);
    }

    let result = match name {
        "train" => {
            log::info!("[Bayes::Train] Training on {}", config.data);
            train::run_training(&config).map(|outcome| {
                if outcome.saved {
                    log::info!("[Bayes::Train] Model saved to {}", config.model_path);
                }
            })
        }
        "evaluate" => {
            log::info!("[Bayes::Evaluate] Evaluating {} on {}", config.model_path, config.data);
            evaluate::run_evaluation(&config).map(|_| ())
        }
        "predict" => {
            let output: Option<&PathBuf> = matches.get_one("output_file");
            predict::run_prediction(&config, output.map(|p| p.as_path())).map(|predictions| {
                log::info!("[Bayes::Predict] Predicted {} rows", predictions.len());
            })
        }
        "describe" => {
            let head = matches.get_one::<usize>("head").copied().unwrap_or(5);
            describe::run_describe(&config, head).map(|text| print!("{}", text))
        }
        "run" => train::load_or_train(&config).map(|model| {
            log::info!("[Bayes::Run] Model ready with {} classes", model.priors.len());
            println!("Done");
        }),
        _ => unreachable!(),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            log::error!("{} failed: {:#}", name, e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1)
        }
    }
}
