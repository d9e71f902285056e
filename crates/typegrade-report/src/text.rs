//! Plain-text and markdown renderers.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use typegrade_core::model::{AlignmentOp, EvaluationResult};
use typegrade_core::report::EvaluationReport;

/// Render the alignment as a single inline diff line.
///
/// Correct words are printed as-is, substitutions as `[ref→typed]`,
/// omitted words as `[-ref]` and extra words as `{+typed}`.
pub fn render_diff(result: &EvaluationResult) -> String {
    let mut tokens = Vec::with_capacity(result.alignment.len());
    for step in &result.alignment {
        let reference = step.ref_word.as_deref().unwrap_or_default();
        let typed = step.typed_word.as_deref().unwrap_or_default();
        tokens.push(match step.op {
            AlignmentOp::Correct => reference.to_string(),
            AlignmentOp::Sub => format!("[{reference}→{typed}]"),
            AlignmentOp::Del => format!("[-{reference}]"),
            AlignmentOp::Ins => format!("{{+{typed}}}"),
        });
    }
    tokens.join(" ")
}

/// Render the metrics of one evaluation, one per line.
pub fn render_summary(result: &EvaluationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Precision: {:.1}%", result.precision_percent);
    let _ = writeln!(
        out,
        "WER:       {:.1}% (S:{} I:{} D:{} of {} words)",
        result.wer * 100.0,
        result.substitutions,
        result.insertions,
        result.deletions,
        result.reference_word_count
    );
    let _ = writeln!(out, "WPM:       {}", result.wpm);
    let _ = writeln!(out, "Score:     {}", result.score());
    out
}

fn md_cell(s: &str) -> String {
    s.replace('|', "\\|")
}

/// Render a batch report as GitHub-flavoured markdown.
pub fn render_markdown(report: &EvaluationReport) -> String {
    let stats = &report.stats;
    let mut md = String::new();

    let _ = writeln!(md, "# typegrade report: {}", report.attempt_set.name);
    let _ = writeln!(md);
    let _ = writeln!(
        md,
        "{} attempts, {} evaluated, {} failed. Generated {}.",
        report.attempt_set.attempt_count,
        report.outcomes.len(),
        report.failures.len(),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(md);

    let _ = writeln!(md, "## Summary");
    let _ = writeln!(md);
    let _ = writeln!(md, "| Metric | Value |");
    let _ = writeln!(md, "|---|---|");
    let _ = writeln!(md, "| Mean precision | {:.1}% |", stats.mean_precision_percent);
    let _ = writeln!(md, "| Mean WER | {:.1}% |", stats.mean_wer * 100.0);
    let _ = writeln!(md, "| Mean WPM | {:.1} |", stats.mean_wpm);
    let _ = writeln!(
        md,
        "| Errors (S/I/D) | {}/{}/{} |",
        stats.totals.substitutions, stats.totals.insertions, stats.totals.deletions
    );
    if let Some(best) = &stats.best {
        let _ = writeln!(md, "| Best | {} ({}) |", md_cell(&best.attempt_id), best.score);
    }
    let _ = writeln!(md);

    if !report.outcomes.is_empty() {
        let _ = writeln!(md, "## Ranking");
        let _ = writeln!(md);
        let _ = writeln!(md, "| # | Attempt | Audio | Score | Precision | WER | WPM |");
        let _ = writeln!(md, "|---|---|---|---|---|---|---|");
        for (rank, o) in report.ranking().iter().enumerate() {
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {:.1}% | {:.1}% | {} |",
                rank + 1,
                md_cell(&o.attempt_id),
                md_cell(&o.audio_id),
                o.submission.score,
                o.result.precision_percent,
                o.result.wer * 100.0,
                o.result.wpm
            );
        }
        let _ = writeln!(md);

        let _ = writeln!(md, "## Diffs");
        let _ = writeln!(md);
        for o in &report.outcomes {
            let _ = writeln!(md, "### {}", o.attempt_id);
            let _ = writeln!(md);
            let _ = writeln!(md, "```");
            let _ = writeln!(md, "{}", render_diff(&o.result));
            let _ = writeln!(md, "```");
            let _ = writeln!(md);
        }
    }

    if !report.failures.is_empty() {
        let _ = writeln!(md, "## Not evaluated");
        let _ = writeln!(md);
        for f in &report.failures {
            let _ = writeln!(md, "- **{}**: {}", f.attempt_id, f.message);
        }
        let _ = writeln!(md);
    }

    md
}

/// Write the markdown rendering of a report to a file.
pub fn write_markdown_report(report: &EvaluationReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_markdown(report))
        .with_context(|| format!("failed to write markdown report to {}", path.display()))?;
    Ok(())
}
