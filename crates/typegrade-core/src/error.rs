//! Attempt validation errors.
//!
//! The evaluator itself never fails. These errors describe inputs a caller
//! should reject before evaluating: a missing transcript, an unusable speed
//! value, or an alignment too large to compute.

use thiserror::Error;

/// Reasons an attempt cannot be evaluated.
#[derive(Debug, Error, PartialEq)]
pub enum AttemptError {
    /// The attempt has no reference transcript to compare against.
    #[error("attempt '{attempt_id}' has no reference transcript")]
    MissingReference { attempt_id: String },

    /// The supplied words-per-minute value is negative or not finite.
    #[error("invalid wpm {value} for attempt '{attempt_id}'")]
    InvalidWpm { attempt_id: String, value: f64 },

    /// The elapsed time is negative or not finite.
    #[error("invalid elapsed time {value}s for attempt '{attempt_id}'")]
    InvalidElapsed { attempt_id: String, value: f64 },

    /// Neither a wpm value nor an elapsed time was given.
    #[error("attempt '{attempt_id}' needs either wpm or elapsed_secs")]
    MissingSpeed { attempt_id: String },

    /// The alignment tables would exceed the configured cell budget.
    #[error("alignment of {reference_words}x{typed_words} words exceeds the limit of {max_cells} cells")]
    TooLarge {
        reference_words: usize,
        typed_words: usize,
        max_cells: usize,
    },
}

impl AttemptError {
    /// Returns `true` if the attempt data itself must change before a retry.
    ///
    /// `TooLarge` depends on configuration, so it can succeed with a larger
    /// cell budget.
    pub fn is_permanent(&self) -> bool {
        !matches!(self, AttemptError::TooLarge { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_attempt() {
        let err = AttemptError::MissingReference {
            attempt_id: "ana".into(),
        };
        assert_eq!(err.to_string(), "attempt 'ana' has no reference transcript");

        let err = AttemptError::InvalidWpm {
            attempt_id: "rui".into(),
            value: -3.0,
        };
        assert!(err.to_string().contains("-3"));
    }

    #[test]
    fn too_large_is_not_permanent() {
        let err = AttemptError::TooLarge {
            reference_words: 10,
            typed_words: 10,
            max_cells: 50,
        };
        assert!(!err.is_permanent());
        assert!(AttemptError::MissingSpeed {
            attempt_id: "x".into()
        }
        .is_permanent());
    }
}
