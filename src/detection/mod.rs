//! Term detection: classifies every token of a document as known, candidate or noise.

mod engine;
mod report;
mod screening;

pub use engine::DetectionEngine;
pub use report::{DetectionReport, RecognizedTerm};
pub use screening::{ScreeningRules, SkipReason, DEFAULT_MIN_TOKEN_LENGTH, SPANISH_STOP_WORDS};
