//! typegrade-core: Transcription evaluation engine.
//!
//! This crate turns a reference transcript and a user-typed text into a
//! word-level alignment, Word Error Rate, precision and the composite score
//! used to rank typing attempts. Everything above the evaluator (attempt
//! files, batch reports, aggregate statistics) also lives here.

pub mod alignment;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod report;
pub mod scorer;
pub mod statistics;

pub use engine::{BatchConfig, BatchEvaluator};
pub use evaluator::{evaluate, evaluate_transcription, EvaluateParams};
pub use model::{AlignmentOp, AlignmentStep, EvaluationResult};
