use anyhow::Result;

use bayes_classifiers::io::{read_frame_with_config, ReaderConfig};
use bayes_classifiers::report::{render_frame, render_summary};

use crate::config::TrainConfig;

/// Column summary followed by the first `head` rows.
pub fn run_describe(config: &TrainConfig, head: usize) -> Result<String> {
    let frame = read_frame_with_config(&config.data, &ReaderConfig::default(), &config.labeller)?;
    let mut out = render_summary(&frame.describe());
    out.push('\n');
    out.push_str(&render_frame(&frame.head(head)));
    Ok(out)
}
