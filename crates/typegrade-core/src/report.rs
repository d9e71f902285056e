//! Batch report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::EvaluationResult;
use crate::scorer::Submission;
use crate::statistics::BatchStats;

/// A complete batch evaluation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the attempt set.
    pub attempt_set: AttemptSetSummary,
    /// Evaluated attempts, in input order.
    pub outcomes: Vec<AttemptOutcome>,
    /// Attempts that could not be evaluated.
    #[serde(default)]
    pub failures: Vec<AttemptFailure>,
    /// Aggregate statistics over `outcomes`.
    pub stats: BatchStats,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Summary of an attempt set (without the transcripts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptSetSummary {
    pub id: String,
    pub name: String,
    pub attempt_count: usize,
}

/// One evaluated attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptOutcome {
    pub attempt_id: String,
    pub audio_id: String,
    pub result: EvaluationResult,
    /// The record a storage layer would persist for this attempt.
    pub submission: Submission,
}

/// An attempt that was rejected before evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptFailure {
    pub attempt_id: String,
    pub message: String,
}

impl EvaluationReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: EvaluationReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Outcomes ordered by score, best first.
    ///
    /// Ties fall back to higher precision, then to input order.
    pub fn ranking(&self) -> Vec<&AttemptOutcome> {
        let mut ranked: Vec<&AttemptOutcome> = self.outcomes.iter().collect();
        ranked.sort_by(|a, b| {
            b.submission.score.cmp(&a.submission.score).then_with(|| {
                b.result
                    .precision_percent
                    .total_cmp(&a.result.precision_percent)
            })
        });
        ranked
    }

    /// Look up an outcome by attempt ID.
    pub fn outcome(&self, attempt_id: &str) -> Option<&AttemptOutcome> {
        self.outcomes.iter().find(|o| o.attempt_id == attempt_id)
    }
}
