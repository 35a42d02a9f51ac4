//! Formatted terminal output.
//!
//! Formatting lives in one place so the solver and server stay free of
//! presentation code, and output changes are localized.

use crate::analysis::{AnalysisReport, weakest_first};
use crate::report::SolveSummary;

/// Format a solve: shape, rank, residuals, and one line per weight.
pub fn format_solve(weights: &[f64], summary: &SolveSummary) -> String {
    let mut out = String::new();

    out.push_str("=== weakness - least-squares weights ===\n");
    out.push_str(&format!(
        "Shape: {} x {} | rank={}\n",
        summary.rows, summary.cols, summary.rank
    ));
    out.push_str(&format!("Residual: SSE={:.6} RMSE={:.6}\n", summary.sse, summary.rmse));
    out.push('\n');

    if weights.is_empty() {
        out.push_str("(no weights: empty matrix)\n");
        return out;
    }

    out.push_str(&format!("{:>6} {:>16}\n", "column", "weight"));
    out.push_str(&format!("{:-<6} {:-<16}\n", "", ""));
    for (i, w) in weights.iter().enumerate() {
        out.push_str(&format!("{i:>6} {w:>16.9}\n"));
    }
    out.push_str(&format!("\nweights: {}\n", fmt_vec(weights)));

    out
}

/// Format a topic analysis as a table with score bars, followed by the weakest topics.
pub fn format_topic_report(report: &AnalysisReport, source: &str, width: usize) -> String {
    let mut out = String::new();

    out.push_str("=== weakness - topic mastery ===\n");
    out.push_str(&format!("Solver: {source}\n"));
    out.push_str(&format!(
        "Items: used={} skipped={}\n",
        report.items_used, report.items_skipped
    ));
    out.push('\n');

    if report.scores.is_empty() {
        out.push_str("No items matched the topic list; nothing to score.\n");
        return out;
    }

    let name_width = report
        .scores
        .iter()
        .map(|s| s.topic.chars().count())
        .max()
        .unwrap_or(5)
        .clamp(5, 32);

    out.push_str(&format!(
        "{:<name_width$} {:>9} {:>5}  {}\n",
        "topic", "weight", "score", "mastery"
    ));
    out.push_str(
        format!(
            "{:-<name_width$} {:-<9} {:-<5}  {:-<w$}\n",
            "",
            "",
            "",
            "",
            w = width.max(1)
        )
        .as_str(),
    );
    for s in &report.scores {
        out.push_str(&format!(
            "{:<name_width$} {:>9.4} {:>5}  {}\n",
            truncate(&s.topic, name_width),
            s.weight,
            s.score,
            bar(s.score, width)
        ));
    }

    let weakest: Vec<String> = weakest_first(&report.scores)
        .iter()
        .take(3)
        .map(|s| format!("{} ({})", s.topic, s.score))
        .collect();
    out.push_str(&format!("\nWeakest: {}\n", weakest.join(", ")));

    out
}

/// Horizontal bar for a 0..=100 score.
pub fn bar(score: u8, width: usize) -> String {
    let width = width.max(1);
    let filled = ((score.min(100) as usize * width) + 50) / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
