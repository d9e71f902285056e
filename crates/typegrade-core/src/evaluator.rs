//! The transcription evaluator.
//!
//! [`evaluate`] is a total, pure function: any two strings and any wpm give
//! a result. Validation of the wpm value and of a missing reference is the
//! caller's job (see [`crate::error::AttemptError`]).

use serde::{Deserialize, Serialize};

use crate::alignment::{align, cell_count};
use crate::error::AttemptError;
use crate::model::EvaluationResult;
use crate::normalizer::tokenize;
use crate::scorer::{precision_percent, word_error_rate};

/// Inputs for one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateParams {
    /// The canonical transcript.
    pub reference: String,
    /// What the user typed.
    pub typed: String,
    /// Externally measured speed, echoed unchanged.
    pub wpm: f64,
}

/// Evaluate a typed transcript against its reference.
pub fn evaluate(params: &EvaluateParams) -> EvaluationResult {
    evaluate_transcription(&params.reference, &params.typed, params.wpm)
}

/// Evaluate without building an [`EvaluateParams`] first.
///
/// An empty reference always yields `wer = 0` and 100% precision, whatever
/// was typed.
pub fn evaluate_transcription(reference: &str, typed: &str, wpm: f64) -> EvaluationResult {
    evaluate_tokens(tokenize(reference), tokenize(typed), wpm)
}

/// Like [`evaluate_transcription`], but refuses inputs whose alignment
/// tables would need more than `max_cells` cells.
pub fn evaluate_bounded(
    reference: &str,
    typed: &str,
    wpm: f64,
    max_cells: usize,
) -> Result<EvaluationResult, AttemptError> {
    let ref_tokens = tokenize(reference);
    let typed_tokens = tokenize(typed);
    if cell_count(ref_tokens.len(), typed_tokens.len()) > max_cells {
        return Err(AttemptError::TooLarge {
            reference_words: ref_tokens.len(),
            typed_words: typed_tokens.len(),
            max_cells,
        });
    }
    Ok(evaluate_tokens(ref_tokens, typed_tokens, wpm))
}

fn evaluate_tokens(ref_tokens: Vec<String>, typed_tokens: Vec<String>, wpm: f64) -> EvaluationResult {
    let n = ref_tokens.len();
    let m = typed_tokens.len();

    let alignment = align(&ref_tokens, &typed_tokens);
    let counts = alignment.counts;

    let wer = word_error_rate(counts.errors(), n);
    let precision = precision_percent(wer);

    tracing::debug!(
        reference_words = n,
        typed_words = m,
        substitutions = counts.substitutions,
        insertions = counts.insertions,
        deletions = counts.deletions,
        wer,
        "evaluated transcription"
    );

    EvaluationResult {
        wpm,
        wer,
        precision_percent: precision,
        substitutions: counts.substitutions,
        insertions: counts.insertions,
        deletions: counts.deletions,
        correct: counts.correct,
        reference_word_count: n,
        typed_word_count: m,
        alignment: alignment.steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AlignmentOp, AlignmentStep};

    #[test]
    fn identical_text_is_perfect() {
        let text = "A rapida raposa, castanha. Salta!";
        let r = evaluate_transcription(text, text, 55.0);
        assert_eq!(r.wer, 0.0);
        assert_eq!(r.precision_percent, 100.0);
        assert_eq!(r.edit_count(), 0);
        assert_eq!(r.correct, 5);
        assert_eq!(r.wpm, 55.0);
    }

    #[test]
    fn omitted_word_scenario() {
        let r = evaluate(&EvaluateParams {
            reference: "o gato preto dormiu".into(),
            typed: "o gato dormiu".into(),
            wpm: 30.0,
        });
        assert_eq!(r.reference_word_count, 4);
        assert_eq!(r.typed_word_count, 3);
        assert_eq!((r.substitutions, r.insertions, r.deletions, r.correct), (0, 0, 1, 3));
        assert!((r.wer - 0.25).abs() < 1e-12);
        assert!((r.precision_percent - 75.0).abs() < 1e-9);
        assert_eq!(r.alignment[2], AlignmentStep::del("preto"));
    }

    #[test]
    fn empty_reference_scores_perfectly() {
        let r = evaluate_transcription("?!", "qualquer coisa escrita", 20.0);
        assert_eq!(r.reference_word_count, 0);
        assert_eq!(r.wer, 0.0);
        assert_eq!(r.precision_percent, 100.0);
        assert_eq!(r.insertions, 3);
        assert!(r.alignment.iter().all(|s| s.op == AlignmentOp::Ins));
    }

    #[test]
    fn empty_typed_is_full_omission() {
        let r = evaluate_transcription("um dois três", "", 0.0);
        assert_eq!(r.deletions, 3);
        assert_eq!(r.insertions, 0);
        assert_eq!(r.substitutions, 0);
        assert_eq!(r.wer, 1.0);
        assert_eq!(r.precision_percent, 0.0);
    }

    #[test]
    fn case_difference_is_a_substitution() {
        let r = evaluate_transcription("Energia", "energia", 10.0);
        assert_eq!(r.substitutions, 1);
        assert_eq!(r.correct, 0);
    }

    #[test]
    fn accent_difference_is_a_substitution() {
        let r = evaluate_transcription("café", "cafe", 10.0);
        assert_eq!(r.substitutions, 1);
    }

    #[test]
    fn bounded_evaluation_rejects_oversized_input() {
        let err = evaluate_bounded("um dois três", "um dois três", 10.0, 15).unwrap_err();
        assert_eq!(
            err,
            AttemptError::TooLarge {
                reference_words: 3,
                typed_words: 3,
                max_cells: 15,
            }
        );

        let ok = evaluate_bounded("um dois três", "um dois três", 10.0, 16).unwrap();
        assert_eq!(ok, evaluate_transcription("um dois três", "um dois três", 10.0));
    }

    #[test]
    fn many_insertions_push_wer_above_one() {
        let r = evaluate_transcription("sim", "nao nao nao nao", 10.0);
        assert!(r.wer > 1.0);
        assert_eq!(r.precision_percent, 0.0);
    }

    #[test]
    fn punctuation_only_differences_are_ignored_except_comma_and_period() {
        let r = evaluate_transcription("Olá!! mundo", "Olá mundo", 10.0);
        assert_eq!(r.correct, 2);

        let r = evaluate_transcription("Olá, mundo", "Olá mundo", 10.0);
        assert_eq!(r.substitutions, 1);
    }
}
