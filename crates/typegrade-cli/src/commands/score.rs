//! The `typegrade score` command.

use anyhow::Result;

use typegrade_core::scorer::composite_score;

pub fn execute(precision: f64, wpm: f64) -> Result<()> {
    anyhow::ensure!(
        precision.is_finite() && (0.0..=100.0).contains(&precision),
        "precision must be between 0 and 100"
    );
    anyhow::ensure!(wpm.is_finite(), "wpm must be a finite number");

    println!("{}", composite_score(precision, wpm));
    Ok(())
}
