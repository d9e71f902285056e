//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined. Tokens are
//! coloured by alignment op: correct in green, substitutions and omissions
//! in red, extra words in amber. A missing side is shown as `∅`.

use anyhow::Result;
use std::path::Path;

use typegrade_core::model::{AlignmentOp, EvaluationResult};
use typegrade_core::report::{AttemptOutcome, EvaluationReport};

/// Placeholder for the absent side of an insertion or deletion.
const EMPTY_SIDE: &str = "∅";

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn reference_class(op: AlignmentOp) -> &'static str {
    match op {
        AlignmentOp::Correct => "tok-correct",
        AlignmentOp::Sub => "tok-sub",
        AlignmentOp::Del => "tok-del",
        AlignmentOp::Ins => "tok-ins",
    }
}

fn typed_class(op: AlignmentOp) -> &'static str {
    match op {
        AlignmentOp::Correct => "tok-correct",
        AlignmentOp::Sub => "tok-sub typed-sub",
        AlignmentOp::Ins => "tok-ins typed-ins",
        AlignmentOp::Del => "tok-del typed-del",
    }
}

/// Render the two-pane reference/typed diff for one result.
pub fn render_alignment(result: &EvaluationResult) -> String {
    let mut reference = String::new();
    let mut typed = String::new();

    for step in &result.alignment {
        reference.push_str(&format!(
            "<span class=\"{}\" title=\"{}\">{}</span> ",
            reference_class(step.op),
            step.op,
            html_escape(step.ref_word.as_deref().unwrap_or(EMPTY_SIDE))
        ));
        typed.push_str(&format!(
            "<span class=\"{}\" title=\"{}\">{}</span> ",
            typed_class(step.op),
            step.op,
            html_escape(step.typed_word.as_deref().unwrap_or(EMPTY_SIDE))
        ));
    }

    let mut html = String::new();
    html.push_str("<div class=\"diff\">\n");
    html.push_str("<div class=\"pane\"><h4>Reference</h4>\n<p>");
    html.push_str(reference.trim_end());
    html.push_str("</p></div>\n");
    html.push_str("<div class=\"pane\"><h4>Typed</h4>\n<p>");
    html.push_str(typed.trim_end());
    html.push_str("</p></div>\n");
    html.push_str("</div>\n");
    html.push_str(LEGEND);
    html
}

fn render_metrics(result: &EvaluationResult) -> String {
    format!(
        "<table class=\"metrics\"><tbody>\n\
         <tr><th>Precision</th><td>{:.1}%</td></tr>\n\
         <tr><th>WER</th><td>{:.1}% <small>S:{} I:{} D:{}</small></td></tr>\n\
         <tr><th>WPM</th><td>{}</td></tr>\n\
         <tr><th>Score</th><td>{}</td></tr>\n\
         <tr><th>Words</th><td>{} reference / {} typed</td></tr>\n\
         </tbody></table>\n",
        result.precision_percent,
        result.wer * 100.0,
        result.substitutions,
        result.insertions,
        result.deletions,
        result.wpm,
        result.score(),
        result.reference_word_count,
        result.typed_word_count,
    )
}

fn page_head(title: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");
    html
}

/// Generate a standalone page for a single evaluation.
pub fn generate_result_html(result: &EvaluationResult, title: &str) -> String {
    let mut html = page_head(title);
    html.push_str(&format!("<header>\n<h1>{}</h1>\n</header>\n", html_escape(title)));
    html.push_str("<section>\n");
    html.push_str(&render_metrics(result));
    html.push_str(&render_alignment(result));
    html.push_str("</section>\n");
    html.push_str("</body>\n</html>");
    html
}

/// Generate an HTML report from a batch report.
pub fn generate_html(report: &EvaluationReport) -> String {
    let mut html = page_head(&format!("typegrade report: {}", report.attempt_set.name));

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>typegrade report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Attempt set: <strong>{}</strong> | {} attempts | {} evaluated | {} failed | {}</p>\n",
        html_escape(&report.attempt_set.name),
        report.attempt_set.attempt_count,
        report.outcomes.len(),
        report.failures.len(),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary
    let stats = &report.stats;
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Evaluated</th><th>Mean precision</th><th>Mean WER</th><th>Mean WPM</th><th>S / I / D</th><th>Best</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    let best = stats
        .best
        .as_ref()
        .map(|b| format!("{} ({})", html_escape(&b.attempt_id), b.score))
        .unwrap_or_else(|| "-".to_string());
    html.push_str(&format!(
        "<tr><td>{}</td><td>{:.1}%</td><td>{:.1}%</td><td>{:.1}</td><td>{} / {} / {}</td><td>{}</td></tr>\n",
        stats.evaluated,
        stats.mean_precision_percent,
        stats.mean_wer * 100.0,
        stats.mean_wpm,
        stats.totals.substitutions,
        stats.totals.insertions,
        stats.totals.deletions,
        best,
    ));
    html.push_str("</tbody></table>\n");

    if !report.outcomes.is_empty() {
        html.push_str(&generate_bar_chart(&report.ranking()));
    }
    html.push_str("</section>\n");

    // Ranking
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Ranking</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">#</th><th onclick=\"sortTable(1)\">Attempt</th><th onclick=\"sortTable(2)\">Audio</th><th onclick=\"sortTable(3)\">Score</th><th onclick=\"sortTable(4)\">Precision</th><th onclick=\"sortTable(5)\">WER</th><th onclick=\"sortTable(6)\">WPM</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for (rank, o) in report.ranking().iter().enumerate() {
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td><a href=\"#attempt-{}\">{}</a></td><td>{}</td><td>{}</td><td>{:.1}%</td><td>{:.1}%</td><td>{}</td></tr>\n",
            precision_class(o.result.precision_percent),
            rank + 1,
            html_escape(&o.attempt_id),
            html_escape(&o.attempt_id),
            html_escape(&o.audio_id),
            o.submission.score,
            o.result.precision_percent,
            o.result.wer * 100.0,
            o.result.wpm,
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    if !report.failures.is_empty() {
        html.push_str("<section class=\"failures\">\n<h2>Not evaluated</h2>\n<ul>\n");
        for f in &report.failures {
            html.push_str(&format!(
                "<li><strong>{}</strong>: {}</li>\n",
                html_escape(&f.attempt_id),
                html_escape(&f.message)
            ));
        }
        html.push_str("</ul>\n</section>\n");
    }

    // Per-attempt diffs
    html.push_str("<section class=\"attempts\">\n<h2>Attempts</h2>\n");
    for o in &report.outcomes {
        html.push_str(&format!(
            "<details id=\"attempt-{}\">\n<summary>{}: {:.1}% precision, score {}</summary>\n",
            html_escape(&o.attempt_id),
            html_escape(&o.attempt_id),
            o.result.precision_percent,
            o.submission.score
        ));
        html.push_str(&render_alignment(&o.result));
        html.push_str("</details>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &EvaluationReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn precision_class(precision_percent: f64) -> &'static str {
    if precision_percent >= 90.0 {
        "pass"
    } else if precision_percent >= 60.0 {
        "warn"
    } else {
        "fail"
    }
}

fn generate_bar_chart(ranked: &[&AttemptOutcome]) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 200;

    let total_height = ranked.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, o) in ranked.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let precision = o.result.precision_percent;
        let width = (precision / 100.0 * max_width as f64) as usize;

        let color = if precision >= 90.0 {
            "#22c55e"
        } else if precision >= 60.0 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&o.attempt_id)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            precision
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const LEGEND: &str = "<p class=\"legend\"><span class=\"tok-correct\">green</span>: correct \
<span class=\"tok-sub\">red</span>: wrong word \
<span class=\"tok-ins\">amber</span>: extra word \
<span class=\"tok-del\">∅</span>: omitted</p>\n";

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --warn: #fef9c3; --fail: #fde2e2;
        --ok: #15803d; --err: #b91c1c; --extra: #b45309; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --warn: #713f12; --fail: #7f1d1d;
          --ok: #4ade80; --err: #f87171; --extra: #fbbf24; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.warn { background: var(--warn); }
.fail { background: var(--fail); }
.diff { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
.pane p { padding: 0.75rem; border: 1px solid var(--border); border-radius: 8px; line-height: 1.8; }
.tok-correct { color: var(--ok); }
.tok-sub { color: var(--err); }
.tok-del { color: var(--err); }
.tok-ins { color: var(--extra); }
.typed-sub { text-decoration: underline; }
.typed-del { text-decoration: line-through; }
.typed-ins { background: var(--warn); padding: 0 0.2rem; border-radius: 4px; }
.legend { font-size: 0.8rem; opacity: 0.8; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    const cmp = !isNaN(na) && !isNaN(nb) ? na - nb : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
