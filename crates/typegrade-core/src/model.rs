//! Core data model types for typegrade.
//!
//! Evaluation results are produced fresh by a single evaluation call and
//! never mutated afterwards. Their fields serialize in camelCase so the JSON
//! shape matches what the persistence and rendering layers consume.
//! Attempts and attempt sets describe the inputs of a batch run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AttemptError;
use crate::scorer::words_per_minute;

/// Classification of one step of the edit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentOp {
    /// Reference and typed token are identical.
    Correct,
    /// Typed token replaced the reference token.
    Sub,
    /// Extra typed token with no reference counterpart.
    Ins,
    /// Reference token the typist omitted.
    Del,
}

impl AlignmentOp {
    /// Returns `true` for every op that counts towards the edit distance.
    pub fn is_error(self) -> bool {
        !matches!(self, AlignmentOp::Correct)
    }
}

impl fmt::Display for AlignmentOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentOp::Correct => write!(f, "correct"),
            AlignmentOp::Sub => write!(f, "sub"),
            AlignmentOp::Ins => write!(f, "ins"),
            AlignmentOp::Del => write!(f, "del"),
        }
    }
}

impl FromStr for AlignmentOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "correct" | "match" => Ok(AlignmentOp::Correct),
            "sub" | "substitution" => Ok(AlignmentOp::Sub),
            "ins" | "insertion" => Ok(AlignmentOp::Ins),
            "del" | "deletion" => Ok(AlignmentOp::Del),
            other => Err(format!("unknown alignment op: {other}")),
        }
    }
}

/// One step of the word alignment.
///
/// `ref_word` is absent for insertions, `typed_word` is absent for
/// deletions; both are present for `correct` and `sub`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typed_word: Option<String>,
    pub op: AlignmentOp,
}

impl AlignmentStep {
    pub fn correct(word: &str) -> Self {
        Self {
            ref_word: Some(word.to_string()),
            typed_word: Some(word.to_string()),
            op: AlignmentOp::Correct,
        }
    }

    pub fn sub(reference: &str, typed: &str) -> Self {
        Self {
            ref_word: Some(reference.to_string()),
            typed_word: Some(typed.to_string()),
            op: AlignmentOp::Sub,
        }
    }

    pub fn ins(typed: &str) -> Self {
        Self {
            ref_word: None,
            typed_word: Some(typed.to_string()),
            op: AlignmentOp::Ins,
        }
    }

    pub fn del(reference: &str) -> Self {
        Self {
            ref_word: Some(reference.to_string()),
            typed_word: None,
            op: AlignmentOp::Del,
        }
    }
}

/// The outcome of evaluating one typed transcript against its reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// Words per minute, echoed from the caller.
    pub wpm: f64,
    /// Word Error Rate; 0 when the reference has no tokens. Unbounded above.
    pub wer: f64,
    /// `max(0, 100 * (1 - wer))`, never pre-rounded.
    pub precision_percent: f64,
    pub substitutions: usize,
    pub insertions: usize,
    pub deletions: usize,
    pub correct: usize,
    /// Reference token count (N).
    pub reference_word_count: usize,
    /// Typed token count (M).
    pub typed_word_count: usize,
    /// Left-to-right edit path.
    pub alignment: Vec<AlignmentStep>,
}

impl EvaluationResult {
    /// Total edit operations (S + I + D).
    pub fn edit_count(&self) -> usize {
        self.substitutions + self.insertions + self.deletions
    }

    /// Composite ranking score derived from this result.
    pub fn score(&self) -> i64 {
        crate::scorer::composite_score(self.precision_percent, self.wpm)
    }
}

/// One typing attempt to grade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    /// Unique identifier within its set.
    pub id: String,
    /// Which audio clip (and transcript) the attempt was made against.
    #[serde(default)]
    pub audio_id: String,
    /// The reference transcript; `None` when the clip has none yet.
    #[serde(default)]
    pub reference: Option<String>,
    /// What the user typed.
    #[serde(default)]
    pub typed: String,
    /// Externally measured words per minute.
    #[serde(default)]
    pub wpm: Option<f64>,
    /// Elapsed typing time, used to derive wpm when `wpm` is absent.
    #[serde(default)]
    pub elapsed_secs: Option<f64>,
    /// Tags for filtering attempts.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Attempt {
    /// The speed to evaluate with: `wpm` if given, else derived from
    /// `elapsed_secs` and the typed text.
    pub fn resolve_wpm(&self) -> Result<f64, AttemptError> {
        if let Some(wpm) = self.wpm {
            if !wpm.is_finite() || wpm < 0.0 {
                return Err(AttemptError::InvalidWpm {
                    attempt_id: self.id.clone(),
                    value: wpm,
                });
            }
            return Ok(wpm);
        }
        match self.elapsed_secs {
            Some(secs) if !secs.is_finite() || secs < 0.0 => Err(AttemptError::InvalidElapsed {
                attempt_id: self.id.clone(),
                value: secs,
            }),
            Some(secs) => Ok(words_per_minute(&self.typed, secs)),
            None => Err(AttemptError::MissingSpeed {
                attempt_id: self.id.clone(),
            }),
        }
    }

    /// The reference transcript, or an error if the attempt has none.
    pub fn require_reference(&self) -> Result<&str, AttemptError> {
        self.reference
            .as_deref()
            .ok_or_else(|| AttemptError::MissingReference {
                attempt_id: self.id.clone(),
            })
    }
}

/// A named batch of attempts, e.g. one week of tournament entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptSet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attempts: Vec<Attempt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_display_and_parse() {
        assert_eq!(AlignmentOp::Correct.to_string(), "correct");
        assert_eq!(AlignmentOp::Del.to_string(), "del");
        assert_eq!("sub".parse::<AlignmentOp>().unwrap(), AlignmentOp::Sub);
        assert_eq!("Insertion".parse::<AlignmentOp>().unwrap(), AlignmentOp::Ins);
        assert!("swap".parse::<AlignmentOp>().is_err());
    }

    #[test]
    fn step_serializes_with_optional_sides_omitted() {
        let json = serde_json::to_string(&AlignmentStep::del("preto")).unwrap();
        assert_eq!(json, r#"{"refWord":"preto","op":"del"}"#);

        let json = serde_json::to_string(&AlignmentStep::ins("extra")).unwrap();
        assert_eq!(json, r#"{"typedWord":"extra","op":"ins"}"#);
    }

    #[test]
    fn result_uses_camel_case_keys() {
        let result = EvaluationResult {
            wpm: 40.0,
            wer: 0.0,
            precision_percent: 100.0,
            substitutions: 0,
            insertions: 0,
            deletions: 0,
            correct: 1,
            reference_word_count: 1,
            typed_word_count: 1,
            alignment: vec![AlignmentStep::correct("ola")],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["precisionPercent"], 100.0);
        assert_eq!(value["referenceWordCount"], 1);
        assert_eq!(value["typedWordCount"], 1);
        assert_eq!(value["alignment"][0]["op"], "correct");
    }

    fn attempt(wpm: Option<f64>, elapsed_secs: Option<f64>) -> Attempt {
        Attempt {
            id: "a1".into(),
            audio_id: "audio-1".into(),
            reference: Some("um dois três".into()),
            typed: "um dois três".into(),
            wpm,
            elapsed_secs,
            tags: vec![],
        }
    }

    #[test]
    fn explicit_wpm_wins_over_elapsed() {
        assert_eq!(attempt(Some(33.0), Some(60.0)).resolve_wpm().unwrap(), 33.0);
    }

    #[test]
    fn wpm_derived_from_elapsed_time() {
        assert_eq!(attempt(None, Some(30.0)).resolve_wpm().unwrap(), 6.0);
    }

    #[test]
    fn bad_speed_values_are_rejected() {
        assert!(matches!(
            attempt(Some(-1.0), None).resolve_wpm(),
            Err(AttemptError::InvalidWpm { .. })
        ));
        assert!(matches!(
            attempt(Some(f64::NAN), None).resolve_wpm(),
            Err(AttemptError::InvalidWpm { .. })
        ));
        assert!(matches!(
            attempt(None, Some(-10.0)).resolve_wpm(),
            Err(AttemptError::InvalidElapsed { .. })
        ));
        assert!(matches!(
            attempt(None, None).resolve_wpm(),
            Err(AttemptError::MissingSpeed { .. })
        ));
    }

    #[test]
    fn missing_reference_is_an_error() {
        let mut a = attempt(Some(10.0), None);
        a.reference = None;
        assert!(matches!(
            a.require_reference(),
            Err(AttemptError::MissingReference { .. })
        ));
    }

    #[test]
    fn only_correct_is_not_an_error() {
        assert!(!AlignmentOp::Correct.is_error());
        assert!(AlignmentOp::Sub.is_error());
        assert!(AlignmentOp::Ins.is_error());
        assert!(AlignmentOp::Del.is_error());
    }
}
