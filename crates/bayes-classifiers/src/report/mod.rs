//! Human readable rendering of evaluation results and datasets.
//!
//! Nothing in the statistical core prints; callers pick a `ReportStyle` and
//! write the returned strings wherever they like.
pub mod text;

pub use text::{format_metric, render_evaluation, render_frame, render_summary, ReportStyle};
