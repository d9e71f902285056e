//! The `typegrade run` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use typegrade_core::engine::{BatchConfig, BatchEvaluator, ProgressReporter};
use typegrade_core::error::AttemptError;
use typegrade_core::parser;
use typegrade_core::report::{AttemptOutcome, EvaluationReport};
use typegrade_report::html::write_html_report;
use typegrade_report::text::write_markdown_report;

use super::split_list;
use crate::config::load_config_from;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_attempt_complete(&self, outcome: &AttemptOutcome) {
        eprintln!(
            "  Done: {} :: {} precision {:.1}% wpm {} score {}",
            outcome.attempt_id,
            outcome.audio_id,
            outcome.result.precision_percent,
            outcome.result.wpm,
            outcome.submission.score,
        );
    }

    fn on_attempt_error(&self, attempt_id: &str, error: &AttemptError) {
        eprintln!("  SKIPPED: {attempt_id}: {error}");
    }

    fn on_set_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} evaluated, {failed} skipped ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub fn execute(
    attempts_path: PathBuf,
    output: Option<PathBuf>,
    format: Option<String>,
    filter: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    anyhow::ensure!(
        config.max_alignment_cells > 0,
        "max_alignment_cells must be at least 1"
    );

    let attempt_sets = parser::load_attempt_sets(&attempts_path)?;

    let output = output.unwrap_or_else(|| config.output_dir.clone());
    let format = format.unwrap_or_else(|| config.default_format.clone());
    let formats: Vec<String> = if format == "all" {
        vec!["json".into(), "html".into(), "md".into()]
    } else {
        split_list(&format)
    };
    for fmt in &formats {
        anyhow::ensure!(
            matches!(fmt.as_str(), "json" | "html" | "md"),
            "unknown format '{fmt}' (expected json, html, md or all)"
        );
    }

    let evaluator = BatchEvaluator::new(BatchConfig {
        max_alignment_cells: config.max_alignment_cells,
        tags: filter.as_deref().map(split_list).unwrap_or_default(),
    });
    let reporter = ConsoleReporter;

    for set in &attempt_sets {
        eprintln!(
            "typegrade v{}: evaluating {} attempts of '{}'",
            env!("CARGO_PKG_VERSION"),
            set.attempts.len(),
            set.name
        );
        eprintln!();

        let report = evaluator.run(set, &reporter);

        print_summary(&report);

        std::fs::create_dir_all(&output)?;
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
        let stem = format!("{}-{timestamp}", set.id);

        for fmt in &formats {
            match fmt.as_str() {
                "json" => {
                    let path = output.join(format!("{stem}.json"));
                    report.save_json(&path)?;
                    eprintln!("Results saved to: {}", path.display());
                }
                "html" => {
                    let path = output.join(format!("{stem}.html"));
                    write_html_report(&report, &path)?;
                    eprintln!("HTML report: {}", path.display());
                }
                "md" => {
                    let path = output.join(format!("{stem}.md"));
                    write_markdown_report(&report, &path)?;
                    eprintln!("Markdown report: {}", path.display());
                }
                other => anyhow::bail!("unknown format '{other}'"),
            }
        }
    }

    Ok(())
}

fn print_summary(report: &EvaluationReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "#",
        "Attempt",
        "Audio",
        "Score",
        "Precision",
        "WER",
        "WPM",
        "S/I/D",
    ]);

    for (rank, o) in report.ranking().iter().enumerate() {
        let r = &o.result;
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&o.attempt_id),
            Cell::new(&o.audio_id),
            Cell::new(o.submission.score),
            Cell::new(format!("{:.1}%", r.precision_percent)),
            Cell::new(format!("{:.1}%", r.wer * 100.0)),
            Cell::new(r.wpm),
            Cell::new(format!("{}/{}/{}", r.substitutions, r.insertions, r.deletions)),
        ]);
    }

    eprintln!("\n{table}");

    let stats = &report.stats;
    if stats.evaluated > 0 {
        eprintln!(
            "Mean precision {:.1}%, mean WER {:.1}%, mean wpm {:.1}",
            stats.mean_precision_percent,
            stats.mean_wer * 100.0,
            stats.mean_wpm
        );
    }
}
