use std::fmt::Write;

use colored::{Color, Colorize};

use crate::evaluation::Evaluation;
use crate::frame::{ColumnSummary, Frame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    #[default]
    Plain,
    /// ANSI colours via `colored`.
    Colored,
}

fn paint(text: String, color: Color, style: ReportStyle) -> String {
    match style {
        ReportStyle::Plain => text,
        ReportStyle::Colored => text.color(color).to_string(),
    }
}

/// Two decimals, or `undefined`.
pub fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "undefined".to_string(),
    }
}

pub fn render_evaluation(evaluation: &Evaluation, style: ReportStyle) -> String {
    let c = &evaluation.counts;
    let m = &evaluation.metrics;
    let mut out = String::new();

    let _ = writeln!(out, "Confusion Matrix:");
    let _ = writeln!(
        out,
        "{} | {}",
        paint(format!("TP: {}", c.tp), Color::Green, style),
        paint(format!("FP: {}", c.fp), Color::Red, style)
    );
    let _ = writeln!(
        out,
        "{} | {}",
        paint(format!("FN: {}", c.fn_), Color::Red, style),
        paint(format!("TN: {}", c.tn), Color::Green, style)
    );
    if c.abstained > 0 {
        let _ = writeln!(
            out,
            "{}",
            paint(format!("No confident class: {}", c.abstained), Color::Yellow, style)
        );
    }

    let rows = [
        ("Accuracy", m.accuracy, Color::Cyan),
        ("Precision", m.precision, Color::Yellow),
        ("Recall", m.recall, Color::Blue),
        ("F1 Score", m.f1, Color::Magenta),
    ];
    for (name, value, color) in rows {
        let _ = writeln!(
            out,
            "{}",
            paint(format!("{}: {}", name, format_metric(value)), color, style)
        );
    }
    out
}

pub fn render_summary(summaries: &[ColumnSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20}{:<20}{:<20}{:<20}",
        "Column", "Mean", "Unique Count", "Mode"
    );
    for s in summaries {
        let mean = s
            .mean
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "-".to_string());
        let mode = s
            .mode
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, "{:<20}{:<20}{:<20}{:<20}", s.name, mean, s.unique, mode);
    }
    out
}

/// Aligned table of every row in `frame`.
pub fn render_frame(frame: &Frame) -> String {
    let columns: Vec<(&str, &[i64])> = frame.columns().collect();
    let widths: Vec<usize> = columns
        .iter()
        .map(|(name, values)| {
            values
                .iter()
                .map(|v| v.to_string().len())
                .chain(std::iter::once(name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|((name, _), w)| format!("{:<w$}", name, w = *w))
        .collect();
    let _ = writeln!(out, "| {} |", header.join(" | "));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "|-{}-|", rule.join("-|-"));

    for row in 0..frame.nrows() {
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|((_, values), w)| format!("{:>w$}", values[row], w = *w))
            .collect();
        let _ = writeln!(out, "| {} |", cells.join(" | "));
    }
    out
}
