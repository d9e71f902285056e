//! The `typegrade evaluate` command.

use std::path::PathBuf;

use anyhow::Result;

use typegrade_core::engine::{BatchConfig, BatchEvaluator};
use typegrade_core::model::Attempt;
use typegrade_report::{html, text};

use super::TextSource;
use crate::config::load_config_from;

pub struct EvaluateArgs {
    pub reference: TextSource,
    pub typed: TextSource,
    pub wpm: Option<f64>,
    pub elapsed_secs: Option<f64>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let attempt = Attempt {
        id: "cli".to_string(),
        audio_id: String::new(),
        reference: Some(args.reference.read()?),
        typed: args.typed.read()?,
        wpm: args.wpm,
        elapsed_secs: args.elapsed_secs,
        tags: vec![],
    };

    let evaluator = BatchEvaluator::new(BatchConfig {
        max_alignment_cells: config.max_alignment_cells,
        ..Default::default()
    });
    let outcome = evaluator.evaluate_attempt(&attempt)?;
    let result = &outcome.result;

    let rendered = match args.format.as_str() {
        "text" => {
            let mut out = text::render_summary(result);
            if config.show_alignment {
                out.push('\n');
                out.push_str(&text::render_diff(result));
                out.push('\n');
            }
            out
        }
        "json" => serde_json::to_string_pretty(result)? + "\n",
        "html" => html::generate_result_html(result, "typegrade evaluation"),
        other => anyhow::bail!("unknown format '{other}' (expected text, json or html)"),
    };

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, rendered)?;
            eprintln!("Evaluation written to: {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
