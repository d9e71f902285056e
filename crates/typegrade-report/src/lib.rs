//! typegrade-report: Renderers for evaluation results.
//!
//! `html` produces self-contained pages with a colour-coded word diff;
//! `text` produces terminal and markdown output.

pub mod html;
pub mod text;
