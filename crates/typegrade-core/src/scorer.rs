//! Accuracy and speed metrics.
//!
//! WER and precision come from the alignment; words per minute is measured
//! elsewhere and only passed through. The composite score is the ranking
//! key stored with each attempt.

use serde::{Deserialize, Serialize};

use crate::model::EvaluationResult;

/// Word Error Rate: edits over reference length, 0 for an empty reference.
pub fn word_error_rate(edits: usize, reference_len: usize) -> f64 {
    if reference_len == 0 {
        return 0.0;
    }
    edits as f64 / reference_len as f64
}

/// Precision percentage, floored at 0 once WER exceeds 1.
pub fn precision_percent(wer: f64) -> f64 {
    (100.0 * (1.0 - wer)).max(0.0)
}

/// Composite ranking score: `round(precision * ln(1 + wpm))`.
///
/// Negative speeds are clamped to 0 before the logarithm so a bogus wpm
/// can never produce NaN. Both inputs should be the unrounded values.
pub fn composite_score(precision_percent: f64, wpm: f64) -> i64 {
    let speed = wpm.max(0.0);
    round_half_up(precision_percent * speed.ln_1p())
}

/// Round to the nearest integer, halves towards positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Words per minute from a typed text and the elapsed typing time.
///
/// Words are whitespace-separated runs of the trimmed text. Returns 0 when
/// no time has elapsed.
pub fn words_per_minute(typed: &str, elapsed_secs: f64) -> f64 {
    let words = typed.split_whitespace().count();
    let minutes = elapsed_secs / 60.0;
    if minutes > 0.0 {
        round_half_up(words as f64 / minutes) as f64
    } else {
        0.0
    }
}

/// The per-attempt record handed to storage.
///
/// Speed and precision are rounded for storage, while the score is
/// computed from the unrounded values first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub audio_id: String,
    pub wpm: i64,
    pub precision_percent: i64,
    pub score: i64,
}

impl Submission {
    pub fn from_result(audio_id: impl Into<String>, result: &EvaluationResult) -> Self {
        Self {
            audio_id: audio_id.into(),
            wpm: round_half_up(result.wpm),
            precision_percent: round_half_up(result.precision_percent),
            score: composite_score(result.precision_percent, result.wpm),
        }
    }
}
