//! The `typegrade validate` command.

use std::path::PathBuf;

use anyhow::Result;

use typegrade_core::parser;

pub fn execute(attempts_path: PathBuf) -> Result<()> {
    let sets = parser::load_attempt_sets(&attempts_path)?;

    let mut total_warnings = 0;

    for set in &sets {
        println!("Attempt set: {} ({} attempts)", set.name, set.attempts.len());

        let warnings = parser::validate_attempt_set(set);
        for w in &warnings {
            let prefix = w
                .attempt_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All attempt sets valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
