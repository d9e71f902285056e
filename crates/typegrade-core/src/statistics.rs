//! Aggregate statistics over a batch of evaluated attempts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::alignment::EditCounts;
use crate::report::AttemptOutcome;

/// Aggregate statistics across all evaluated attempts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Number of attempts that were evaluated.
    pub evaluated: usize,
    pub mean_wer: f64,
    pub mean_precision_percent: f64,
    pub mean_wpm: f64,
    /// Summed op counts over every alignment.
    pub totals: EditCounts,
    /// Highest composite score, if anything was evaluated.
    pub best: Option<BestAttempt>,
    /// Per audio clip breakdown.
    pub per_audio: BTreeMap<String, AudioStats>,
}

/// The top-scoring attempt of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestAttempt {
    pub attempt_id: String,
    pub score: i64,
}

/// Statistics for every attempt made against one audio clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioStats {
    pub audio_id: String,
    pub attempts: usize,
    pub mean_wer: f64,
    pub mean_precision_percent: f64,
    pub best_score: i64,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Compute aggregate statistics from evaluated attempts.
pub fn compute_batch_stats(outcomes: &[AttemptOutcome]) -> BatchStats {
    let mut totals = EditCounts::default();
    for o in outcomes {
        totals.correct += o.result.correct;
        totals.substitutions += o.result.substitutions;
        totals.insertions += o.result.insertions;
        totals.deletions += o.result.deletions;
    }

    // First attempt wins a tie on score.
    let best = outcomes
        .iter()
        .fold(None::<&AttemptOutcome>, |best, o| match best {
            Some(b) if b.submission.score >= o.submission.score => Some(b),
            _ => Some(o),
        })
        .map(|o| BestAttempt {
            attempt_id: o.attempt_id.clone(),
            score: o.submission.score,
        });

    let mut by_audio: BTreeMap<&str, Vec<&AttemptOutcome>> = BTreeMap::new();
    for o in outcomes {
        by_audio.entry(o.audio_id.as_str()).or_default().push(o);
    }

    let per_audio = by_audio
        .into_iter()
        .map(|(audio_id, group)| {
            let stats = AudioStats {
                audio_id: audio_id.to_string(),
                attempts: group.len(),
                mean_wer: mean(group.iter().map(|o| o.result.wer)),
                mean_precision_percent: mean(group.iter().map(|o| o.result.precision_percent)),
                best_score: group.iter().map(|o| o.submission.score).max().unwrap_or(0),
            };
            (audio_id.to_string(), stats)
        })
        .collect();

    BatchStats {
        evaluated: outcomes.len(),
        mean_wer: mean(outcomes.iter().map(|o| o.result.wer)),
        mean_precision_percent: mean(outcomes.iter().map(|o| o.result.precision_percent)),
        mean_wpm: mean(outcomes.iter().map(|o| o.result.wpm)),
        totals,
        best,
        per_audio,
    }
}
