//! Pure reconciliation of detections against a reference kit, and the
//! scoring that reduces the result to a percentage and a verdict.

pub mod matcher;
pub mod scoring;

pub use matcher::reconcile;
pub use scoring::{present_ratio, score, tally, verdict, ConformityLevel, InstrumentTally};
