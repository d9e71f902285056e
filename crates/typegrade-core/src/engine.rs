//! Batch evaluation driver.
//!
//! Runs every attempt of an [`AttemptSet`] through the evaluator, collects
//! outcomes and failures, and aggregates them into an [`EvaluationReport`].

use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::error::AttemptError;
use crate::evaluator::evaluate_bounded;
use crate::model::{Attempt, AttemptSet};
use crate::report::{AttemptFailure, AttemptOutcome, AttemptSetSummary, EvaluationReport};
use crate::scorer::Submission;
use crate::statistics::compute_batch_stats;

/// Default budget: two 2 000-word texts.
pub const DEFAULT_MAX_ALIGNMENT_CELLS: usize = 2_001 * 2_001;

/// Configuration for batch evaluation.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Upper bound on `(n + 1) * (m + 1)` for any single alignment.
    pub max_alignment_cells: usize,
    /// Only evaluate attempts carrying at least one of these tags.
    pub tags: Vec<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_alignment_cells: DEFAULT_MAX_ALIGNMENT_CELLS,
            tags: Vec::new(),
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter {
    fn on_attempt_complete(&self, outcome: &AttemptOutcome);
    fn on_attempt_error(&self, attempt_id: &str, error: &AttemptError);
    fn on_set_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_attempt_complete(&self, _: &AttemptOutcome) {}
    fn on_attempt_error(&self, _: &str, _: &AttemptError) {}
    fn on_set_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Evaluates whole attempt sets.
pub struct BatchEvaluator {
    config: BatchConfig,
}

impl BatchEvaluator {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Evaluate a single attempt, validating it first.
    pub fn evaluate_attempt(&self, attempt: &Attempt) -> Result<AttemptOutcome, AttemptError> {
        let reference = attempt.require_reference()?;
        let wpm = attempt.resolve_wpm()?;
        let result = evaluate_bounded(
            reference,
            &attempt.typed,
            wpm,
            self.config.max_alignment_cells,
        )?;

        Ok(AttemptOutcome {
            attempt_id: attempt.id.clone(),
            audio_id: attempt.audio_id.clone(),
            submission: Submission::from_result(attempt.audio_id.clone(), &result),
            result,
        })
    }

    fn selected(&self, attempt: &Attempt) -> bool {
        self.config.tags.is_empty()
            || attempt
                .tags
                .iter()
                .any(|t| self.config.tags.iter().any(|wanted| wanted == t))
    }

    /// Evaluate every selected attempt of a set.
    pub fn run(&self, set: &AttemptSet, progress: &dyn ProgressReporter) -> EvaluationReport {
        let start = Instant::now();
        let mut outcomes = Vec::new();
        let mut failures = Vec::new();

        let selected: Vec<&Attempt> = set.attempts.iter().filter(|a| self.selected(a)).collect();

        for attempt in &selected {
            match self.evaluate_attempt(attempt) {
                Ok(outcome) => {
                    progress.on_attempt_complete(&outcome);
                    outcomes.push(outcome);
                }
                Err(e) => {
                    tracing::warn!("attempt {} not evaluated: {e}", attempt.id);
                    progress.on_attempt_error(&attempt.id, &e);
                    failures.push(AttemptFailure {
                        attempt_id: attempt.id.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let elapsed = start.elapsed();
        progress.on_set_complete(selected.len(), outcomes.len(), failures.len(), elapsed);
        tracing::info!(
            set = %set.id,
            evaluated = outcomes.len(),
            failed = failures.len(),
            "attempt set evaluated"
        );

        EvaluationReport {
            id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
            attempt_set: AttemptSetSummary {
                id: set.id.clone(),
                name: set.name.clone(),
                attempt_count: selected.len(),
            },
            stats: compute_batch_stats(&outcomes),
            outcomes,
            failures,
            duration_ms: elapsed.as_millis() as u64,
        }
    }
}
